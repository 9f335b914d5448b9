//! Generator configuration.
//!
//! [`GeneratorConfig`] is the runtime value threaded through a run. It starts
//! from Laravel's conventional layout and can be overridden by an optional
//! `waymaker.toml` ([`WaymakerConfig`]) and then by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;
use crate::ir::HttpVerb;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "waymaker.toml";

/// Runtime environment of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development machine. Routes are always regenerated from source.
    #[default]
    Local,

    /// Test runs. Behaves like `Local`.
    Testing,

    /// Deployed application. Route definitions are served from the cache
    /// while the controller sources are unchanged.
    Production,
}

impl Environment {
    /// Parse an environment from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" | "development" | "dev" => Some(Environment::Local),
            "testing" | "test" => Some(Environment::Testing),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }

    /// Whether the route cache is consulted in this environment.
    pub fn uses_cache(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Conventional method names per HTTP verb.
///
/// Only used to hint at public methods that look like actions but carry no
/// route attribute. It never creates routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct MethodDefaults {
    #[serde(default)]
    pub get: Vec<String>,
    #[serde(default)]
    pub post: Vec<String>,
    #[serde(default)]
    pub put: Vec<String>,
    #[serde(default)]
    pub patch: Vec<String>,
    #[serde(default)]
    pub delete: Vec<String>,
}

impl Default for MethodDefaults {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            get: names(&["index", "show"]),
            post: names(&["store"]),
            put: names(&["update"]),
            patch: names(&["update"]),
            delete: names(&["destroy"]),
        }
    }
}

impl MethodDefaults {
    /// Method names listed for a verb.
    pub fn methods_for(&self, verb: HttpVerb) -> &[String] {
        match verb {
            HttpVerb::Get => &self.get,
            HttpVerb::Post => &self.post,
            HttpVerb::Put => &self.put,
            HttpVerb::Patch => &self.patch,
            HttpVerb::Delete => &self.delete,
        }
    }

    /// First verb whose list contains `method`.
    pub fn suggest(&self, method: &str) -> Option<HttpVerb> {
        HttpVerb::ALL
            .into_iter()
            .find(|verb| self.methods_for(*verb).iter().any(|m| m == method))
    }
}

/// Route cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Cache file location.
    pub path: PathBuf,
    /// Minutes before a cache entry expires.
    pub ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bootstrap/cache/waymaker-routes.json"),
            ttl_minutes: 60,
        }
    }
}

/// Configuration for a generator run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory containing controller classes.
    pub controller_dir: PathBuf,

    /// Namespace that `controller_dir` maps to.
    pub base_namespace: String,

    /// Namespace of the `Get`/`Post`/... attribute classes.
    pub attribute_namespace: String,

    /// Route file to write.
    pub output_path: PathBuf,

    /// Source language of the controllers (default: "php").
    pub language: String,

    pub environment: Environment,

    pub method_defaults: MethodDefaults,

    pub cache: CacheConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            controller_dir: PathBuf::from("app/Http/Controllers"),
            base_namespace: "App\\Http\\Controllers".to_string(),
            attribute_namespace: "HardImpact\\Waymaker".to_string(),
            output_path: PathBuf::from("routes/waymaker.php"),
            language: "php".to_string(),
            environment: Environment::default(),
            method_defaults: MethodDefaults::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Base namespace without surrounding backslashes.
    pub fn namespace(&self) -> &str {
        self.base_namespace.trim_matches('\\')
    }

    /// Attribute namespace without surrounding backslashes.
    pub fn attribute_namespace(&self) -> &str {
        self.attribute_namespace.trim_matches('\\')
    }
}

/// Contents of `waymaker.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaymakerConfig {
    pub controllers: Option<PathBuf>,
    pub namespace: Option<String>,
    pub attribute_namespace: Option<String>,
    pub output: Option<PathBuf>,
    pub environment: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub cache: CacheSection,
    pub method_defaults: Option<MethodDefaults>,
}

/// `[cache]` table of `waymaker.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    pub path: Option<PathBuf>,
    pub ttl_minutes: Option<u64>,
}

impl WaymakerConfig {
    /// Overlays the file's values onto `config`.
    ///
    /// Relative paths are resolved against `base_dir`, the directory that
    /// holds the configuration file.
    pub fn apply(self, config: &mut GeneratorConfig, base_dir: &Path, source: &Path) -> Result<(), GeneratorError> {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base_dir.join(p) };

        if let Some(dir) = self.controllers {
            config.controller_dir = resolve(dir);
        }
        if let Some(namespace) = self.namespace {
            config.base_namespace = namespace;
        }
        if let Some(namespace) = self.attribute_namespace {
            config.attribute_namespace = namespace;
        }
        if let Some(output) = self.output {
            config.output_path = resolve(output);
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(env) = self.environment {
            config.environment = Environment::from_str(&env).ok_or_else(|| GeneratorError::InvalidConfig {
                path: source.to_path_buf(),
                message: format!("unknown environment '{}'", env),
            })?;
        }
        if let Some(path) = self.cache.path {
            config.cache.path = resolve(path);
        }
        if let Some(ttl) = self.cache.ttl_minutes {
            config.cache.ttl_minutes = ttl;
        }
        if let Some(defaults) = self.method_defaults {
            config.method_defaults = defaults;
        }
        Ok(())
    }
}

/// Loads a `waymaker.toml` file.
pub fn load_config(path: &Path) -> Result<WaymakerConfig, GeneratorError> {
    let content = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;
    toml::from_str(&content).map_err(|e| GeneratorError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Builds a [`GeneratorConfig`] from defaults and an optional config file.
///
/// With an explicit `path`, the file must exist. Without one, `waymaker.toml`
/// in `root` is used when present. Relative defaults are anchored at `root`.
pub fn resolve_config(root: &Path, path: Option<&Path>) -> Result<GeneratorConfig, GeneratorError> {
    let mut config = GeneratorConfig::default();
    config.controller_dir = root.join(&config.controller_dir);
    config.output_path = root.join(&config.output_path);
    config.cache.path = root.join(&config.cache.path);

    let file = match path {
        Some(p) => Some(p.to_path_buf()),
        None => Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
    };

    if let Some(file) = file {
        let base_dir = file.parent().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
        load_config(&file)?.apply(&mut config, &base_dir, &file)?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(Environment::from_str("Production"), Some(Environment::Production));
        assert_eq!(Environment::from_str("local"), Some(Environment::Local));
        assert_eq!(Environment::from_str("staging"), None);
        assert!(Environment::Production.uses_cache());
        assert!(!Environment::Testing.uses_cache());
    }

    #[test]
    fn suggest_follows_verb_order() {
        let defaults = MethodDefaults::default();
        assert_eq!(defaults.suggest("index"), Some(HttpVerb::Get));
        assert_eq!(defaults.suggest("store"), Some(HttpVerb::Post));
        // Listed under both PUT and PATCH; PUT comes first.
        assert_eq!(defaults.suggest("update"), Some(HttpVerb::Put));
        assert_eq!(defaults.suggest("destroy"), Some(HttpVerb::Delete));
        assert_eq!(defaults.suggest("export"), None);
    }

    #[test]
    fn defaults_follow_laravel_layout() {
        let config = GeneratorConfig::default();
        assert_eq!(config.controller_dir, PathBuf::from("app/Http/Controllers"));
        assert_eq!(config.namespace(), "App\\Http\\Controllers");
        assert_eq!(config.output_path, PathBuf::from("routes/waymaker.php"));
        assert_eq!(config.cache.ttl_minutes, 60);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
controllers = "src/Controllers"
namespace = "Acme\\Controllers"
environment = "production"

[cache]
ttl_minutes = 5

[method_defaults]
GET = ["list"]
"#,
        )
        .unwrap();

        let config = resolve_config(dir.path(), None).unwrap();
        assert_eq!(config.controller_dir, dir.path().join("src/Controllers"));
        assert_eq!(config.base_namespace, "Acme\\Controllers");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.cache.ttl_minutes, 5);
        assert_eq!(config.output_path, dir.path().join("routes/waymaker.php"));
        assert_eq!(config.method_defaults.suggest("list"), Some(HttpVerb::Get));
        assert_eq!(config.method_defaults.suggest("store"), None);
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "environment = \"staging\"\n").unwrap();

        let err = resolve_config(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidConfig { .. }));

        fs::write(&path, "unknown_key = 1\n").unwrap();
        let err = resolve_config(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidConfig { .. }));
    }

    #[test]
    fn missing_default_config_file_is_fine() {
        let dir = TempDir::new().unwrap();
        let config = resolve_config(dir.path(), None).unwrap();
        assert_eq!(config.controller_dir, dir.path().join("app/Http/Controllers"));
    }
}
