//! Waymaker CLI.
//!
//! Generates `routes/waymaker.php` from the route attributes on a Laravel
//! application's controllers.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use tracing_subscriber::EnvFilter;

use waymaker::config::resolve_config;
use waymaker::{Environment, Generator, GeneratorConfig};

mod ui;

#[derive(Parser)]
#[command(name = "waymaker", version)]
#[command(about = "Generate Laravel routes from controller attributes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: ConfigArgs,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Options that override `waymaker.toml`.
#[derive(Args, Clone, Default)]
struct ConfigArgs {
    /// Configuration file (default: ./waymaker.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Controller directory
    #[arg(long, global = true)]
    controllers: Option<PathBuf>,

    /// Base controller namespace
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Route file to write
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Application environment (local, testing, production)
    #[arg(long = "env", env = "WAYMAKER_ENV", value_parser = parse_environment, global = true)]
    environment: Option<Environment>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the route file (default)
    Generate,

    /// Resolve routes and report them without writing anything
    Check,

    /// Regenerate the route file whenever a controller changes
    Watch,

    /// Remove the production route cache
    CacheClear,
}

fn parse_environment(value: &str) -> Result<Environment, String> {
    Environment::from_str(value).ok_or_else(|| format!("unknown environment '{}'", value))
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli.overrides)?;

    match cli.command.unwrap_or(Commands::Generate) {
        Commands::Generate => generate(config),
        Commands::Check => check(config),
        Commands::Watch => watch(config),
        Commands::CacheClear => cache_clear(config),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &ConfigArgs) -> miette::Result<GeneratorConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let mut config = resolve_config(&cwd, args.config.as_deref())?;

    if let Some(dir) = &args.controllers {
        config.controller_dir = cwd.join(dir);
    }
    if let Some(namespace) = &args.namespace {
        config.base_namespace = namespace.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = cwd.join(output);
    }
    if let Some(environment) = args.environment {
        config.environment = environment;
    }

    tracing::debug!(
        controllers = %config.controller_dir.display(),
        output = %config.output_path.display(),
        environment = config.environment.as_str(),
        "resolved configuration"
    );
    Ok(config)
}

fn generate(config: GeneratorConfig) -> miette::Result<()> {
    let start = Instant::now();
    let spinner = ui::spinner("Scanning controllers...");

    let result = Generator::new(config).generate();
    spinner.finish_and_clear();
    let result = result?;

    let source = if result.from_cache { " (from cache)" } else { "" };
    ui::success(&format!(
        "{} route(s) from {} controller(s) written to {}{}",
        result.stats.routes,
        result.stats.controllers,
        display_path(&result.output_path),
        source
    ));
    ui::timing("Done", start.elapsed().as_millis());
    Ok(())
}

fn check(config: GeneratorConfig) -> miette::Result<()> {
    let spinner = ui::spinner("Resolving routes...");
    let report = Generator::new(config).check();
    spinner.finish_and_clear();
    let report = report?;

    if report.groups.is_empty() {
        ui::info("No routes found.");
    }
    for group in &report.groups {
        ui::route_group(group);
        println!();
    }

    ui::success(&format!(
        "{} route(s) in {} group(s) from {} controller(s). No duplicates.",
        report.stats.routes, report.stats.groups, report.stats.controllers
    ));
    ui::unrouted(&report.unrouted);
    Ok(())
}

fn cache_clear(config: GeneratorConfig) -> miette::Result<()> {
    let generator = Generator::new(config);
    if generator.clear_cache()? {
        ui::success(&format!("Removed {}", display_path(&generator.config().cache.path)));
    } else {
        ui::info("No route cache to remove.");
    }
    Ok(())
}

fn watch(config: GeneratorConfig) -> miette::Result<()> {
    let controller_dir = config.controller_dir.clone();
    let generator = Generator::new(config);

    // Start from a fresh file; a failure here is reported like any later one.
    regenerate(&generator);

    let (tx, rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(300), tx).into_diagnostic()?;
    debouncer
        .watcher()
        .watch(&controller_dir, RecursiveMode::Recursive)
        .into_diagnostic()?;

    println!();
    ui::info(&format!("Watching {} for changes...", display_path(&controller_dir)));

    for result in rx {
        match result {
            Ok(events) => {
                let touched_php = events
                    .iter()
                    .any(|event| event.path.extension().is_some_and(|ext| ext == "php"));
                if touched_php {
                    println!();
                    regenerate(&generator);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "file watcher error");
            }
        }
    }

    ui::dim("Stopping watch mode.");
    Ok(())
}

fn regenerate(generator: &Generator) {
    let start = Instant::now();
    match generator.generate() {
        Ok(result) => ui::success(&format!(
            "{} route(s) written in {}ms",
            result.stats.routes,
            start.elapsed().as_millis()
        )),
        Err(e) => ui::error(&format!("{:?}", miette::Report::new(e))),
    }
}

fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .filter(|relative| !relative.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_environment() {
        assert_eq!(parse_environment("prod"), Ok(Environment::Production));
        assert_eq!(parse_environment("LOCAL"), Ok(Environment::Local));
        assert!(parse_environment("staging").is_err());
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["waymaker", "--output", "routes/web.php", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.overrides.output, Some(PathBuf::from("routes/web.php")));
    }

    #[test]
    fn test_cache_clear_subcommand() {
        let cli = Cli::try_parse_from(["waymaker", "cache-clear"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CacheClear)));
    }
}
