//! PHP frontend: controller discovery and parsing.

pub mod ast;
pub mod parser;
pub mod to_ir;

use std::path::Path;
use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;
use crate::ir::ControllerIR;
use super::Frontend;
use parser::PhpParser;
use to_ir::DiscoveredFile;

/// File name suffix of controller classes.
pub const CONTROLLER_SUFFIX: &str = "Controller.php";

/// PHP frontend implementation.
pub struct PhpFrontend {
    parser: PhpParser,
}

impl PhpFrontend {
    /// Creates a new PHP frontend.
    pub fn new() -> Result<Self, GeneratorError> {
        Ok(Self {
            parser: PhpParser::new()?,
        })
    }

    fn parse_file(&mut self, path: &Path) -> Option<to_ir::DiscoveredFile> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                return None;
            }
        };

        let parsed = match self.parser.parse(&source, path) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unparsable file");
                return None;
            }
        };

        if parsed.has_errors {
            tracing::warn!(path = %path.display(), "file contains syntax errors; routes may be incomplete");
        }

        Some(DiscoveredFile {
            class_name: None,
            parsed,
        })
    }
}

impl Frontend for PhpFrontend {
    fn language(&self) -> &str {
        "php"
    }

    fn extensions(&self) -> &[&str] {
        &["php"]
    }

    fn discover(&mut self, config: &GeneratorConfig) -> Result<Vec<ControllerIR>, GeneratorError> {
        let root = &config.controller_dir;
        if !root.is_dir() {
            tracing::error!(path = %root.display(), "controller directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        // Every PHP file is parsed so that base classes without the
        // controller suffix can still supply inherited statics.
        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let is_php = path
                .extension()
                .is_some_and(|ext| self.extensions().contains(&ext.to_string_lossy().as_ref()));
            if !is_php {
                continue;
            }

            if let Some(mut file) = self.parse_file(path) {
                file.class_name = path_to_class_name(path, root, config.namespace());
                files.push(file);
            }
        }

        let controllers = to_ir::to_ir(&files, config);
        tracing::debug!(
            files = files.len(),
            controllers = controllers.len(),
            "discovered controllers"
        );
        Ok(controllers)
    }
}

/// Maps a controller file to the class it must declare.
///
/// `<root>/Admin/UserController.php` with namespace `App\Http\Controllers`
/// maps to `App\Http\Controllers\Admin\UserController`. Returns `None` for
/// files that are not named `*Controller.php`.
pub fn path_to_class_name(path: &Path, root: &Path, namespace: &str) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if !file_name.ends_with(CONTROLLER_SUFFIX) {
        return None;
    }

    let relative = pathdiff::diff_paths(path, root)?;
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let last = segments.pop()?;
    segments.push(last.strip_suffix(".php")?.to_string());

    let namespace = namespace.trim_matches('\\');
    if namespace.is_empty() {
        Some(segments.join("\\"))
    } else {
        Some(format!("{}\\{}", namespace, segments.join("\\")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_path_to_class_name() {
        let root = Path::new("/app/Http/Controllers");
        assert_eq!(
            path_to_class_name(&root.join("Admin/UserController.php"), root, "App\\Http\\Controllers"),
            Some("App\\Http\\Controllers\\Admin\\UserController".to_string())
        );
        assert_eq!(
            path_to_class_name(&root.join("HomeController.php"), root, "\\App\\Http\\Controllers\\"),
            Some("App\\Http\\Controllers\\HomeController".to_string())
        );
        assert_eq!(path_to_class_name(&root.join("Helpers.php"), root, "App"), None);
    }

    #[test]
    fn missing_directory_yields_no_controllers() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::default();
        config.controller_dir = dir.path().join("missing");

        let mut frontend = PhpFrontend::new().unwrap();
        assert!(frontend.discover(&config).unwrap().is_empty());
    }

    #[test]
    fn discovers_controllers_in_file_name_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Admin")).unwrap();
        fs::write(
            dir.path().join("ZetaController.php"),
            "<?php\nnamespace App\\Http\\Controllers;\nclass ZetaController {}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("AlphaController.php"),
            "<?php\nnamespace App\\Http\\Controllers;\nclass AlphaController {}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Admin/DashboardController.php"),
            "<?php\nnamespace App\\Http\\Controllers\\Admin;\nclass DashboardController {}\n",
        )
        .unwrap();
        fs::write(dir.path().join("helpers.php"), "<?php\nfunction helper() {}\n").unwrap();

        let mut config = GeneratorConfig::default();
        config.controller_dir = dir.path().to_path_buf();

        let mut frontend = PhpFrontend::new().unwrap();
        let names: Vec<String> = frontend
            .discover(&config)
            .unwrap()
            .into_iter()
            .map(|c| c.class_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "App\\Http\\Controllers\\Admin\\DashboardController",
                "App\\Http\\Controllers\\AlphaController",
                "App\\Http\\Controllers\\ZetaController",
            ]
        );
    }
}
