//! # Waymaker
//!
//! Generates a Laravel route file from routing attributes (`#[Get]`,
//! `#[Post]`, `#[Put]`, `#[Patch]`, `#[Delete]`) on PHP controller methods.
//!
//! ## Architecture
//!
//! ```text
//! Controller sources (*.php)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  Discovery + tree-sitter parsing
//! │  (PHP → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │     Scan     │  URIs, names, middleware; duplicate detection
//! │ (IR → routes)│
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Grouping, ordering, rendering
//! │(routes → PHP)│
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use waymaker::{Generator, GeneratorConfig};
//!
//! let generator = Generator::new(GeneratorConfig::default());
//! let result = generator.generate()?;
//! println!("{} routes written to {}", result.stats.routes, result.output_path.display());
//! ```

pub mod cache;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod frontend;
pub mod ir;
pub mod naming;
pub mod scan;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use config::{Environment, GeneratorConfig, MethodDefaults};
pub use diagnostic::GeneratorError;
pub use ir::{HttpVerb, RouteGroup, RouteRecord};
pub use scan::UnroutedMethod;

/// Counts describing one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStats {
    pub controllers: usize,
    pub routes: usize,
    pub groups: usize,
}

/// Rendered route definitions, one output line per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRoutes {
    pub lines: Vec<String>,
    pub stats: RouteStats,
}

impl RenderedRoutes {
    /// Full contents of the route file.
    pub fn to_file_contents(&self) -> String {
        codegen::compose_file(&self.lines)
    }
}

/// Routes as they will be rendered, without writing anything.
#[derive(Debug, Clone)]
pub struct RouteReport {
    pub groups: Vec<RouteGroup>,
    /// Public methods without route attributes that look like actions.
    pub unrouted: Vec<UnroutedMethod>,
    pub stats: RouteStats,
}

/// Result of a successful [`Generator::generate`].
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub output_path: PathBuf,
    pub stats: RouteStats,
    /// Whether the definitions were served from the route cache.
    pub from_cache: bool,
}

/// Orchestrates discovery, scanning, rendering and output.
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Discovers controllers and resolves their routes.
    ///
    /// Fails on the first duplicate `(verb, uri)`.
    fn synthesize(&self) -> Result<(scan::ScanOutput, usize), GeneratorError> {
        let mut frontend = frontend::create_frontend(&self.config.language)?;
        let controllers = frontend.discover(&self.config)?;
        let output = scan::scan_controllers(&controllers, &self.config)?;
        Ok((output, controllers.len()))
    }

    /// Resolves and groups routes without rendering or writing.
    pub fn check(&self) -> Result<RouteReport, GeneratorError> {
        let (output, controllers) = self.synthesize()?;
        let groups = codegen::plan(&output.records);
        let stats = RouteStats {
            controllers,
            routes: output.records.len(),
            groups: groups.len(),
        };
        Ok(RouteReport {
            groups,
            unrouted: output.unrouted,
            stats,
        })
    }

    /// Renders route definitions from the controller sources, bypassing the cache.
    pub fn render(&self) -> Result<RenderedRoutes, GeneratorError> {
        let (output, controllers) = self.synthesize()?;
        let groups = codegen::plan(&output.records);
        let lines = codegen::render::render_groups(&groups);

        Ok(RenderedRoutes {
            lines,
            stats: RouteStats {
                controllers,
                routes: output.records.len(),
                groups: groups.len(),
            },
        })
    }

    /// Route definitions, served from the cache when the environment allows it.
    pub fn route_definitions(&self) -> Result<RenderedRoutes, GeneratorError> {
        self.cached_definitions().map(|(routes, _)| routes)
    }

    fn cached_definitions(&self) -> Result<(RenderedRoutes, bool), GeneratorError> {
        if !self.config.environment.uses_cache() {
            return Ok((self.render()?, false));
        }

        let fingerprint = match cache::fingerprint(&self.config) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                tracing::warn!(error = %e, "route cache disabled: could not fingerprint controllers");
                return Ok((self.render()?, false));
            }
        };

        let route_cache = cache::RouteCache::from_config(&self.config);
        if let Some(routes) = route_cache.load(&fingerprint) {
            return Ok((routes, true));
        }

        let routes = self.render()?;
        if let Err(e) = route_cache.store(&fingerprint, &routes) {
            tracing::warn!(error = %e, "failed to write route cache");
        }
        Ok((routes, false))
    }

    /// Generates the route file.
    ///
    /// Nothing is written when generation fails, so a previous route file
    /// stays in place.
    pub fn generate(&self) -> Result<GenerateResult, GeneratorError> {
        let (routes, from_cache) = self.cached_definitions()?;
        write_atomic(&self.config.output_path, &routes.to_file_contents())?;

        tracing::info!(
            path = %self.config.output_path.display(),
            routes = routes.stats.routes,
            from_cache,
            "route file written"
        );

        Ok(GenerateResult {
            output_path: self.config.output_path.clone(),
            stats: routes.stats,
            from_cache,
        })
    }

    /// Removes the route cache. Returns whether an entry existed.
    pub fn clear_cache(&self) -> Result<bool, GeneratorError> {
        cache::RouteCache::from_config(&self.config).clear()
    }
}

/// Writes `content` to a sibling temporary file and renames it over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e.to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| GeneratorError::io(path, "output path has no file name"))?;
    let tmp = parent.join(format!(".{}.{}.tmp", file_name, std::process::id()));

    fs::write(&tmp, content).map_err(|e| GeneratorError::io(&tmp, e.to_string()))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(GeneratorError::io(path, e.to_string()));
    }
    Ok(())
}
