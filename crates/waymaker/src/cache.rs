//! Read-through cache of rendered route definitions.
//!
//! Only consulted in the production environment. An entry is valid while its
//! fingerprint matches the current controller sources and its TTL has not
//! elapsed. Anything else, including an unreadable file, is a miss.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;
use xxhash_rust::xxh3::Xxh3;

use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;
use crate::RenderedRoutes;

/// Cache file format version.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// On-disk cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: u32,

    /// Fingerprint of the inputs that produced `routes`.
    pub fingerprint: String,

    /// Seconds since the Unix epoch.
    #[serde(rename = "createdAt")]
    pub created_at: u64,

    pub routes: RenderedRoutes,
}

/// Route cache bound to one file.
#[derive(Debug, Clone)]
pub struct RouteCache {
    path: PathBuf,
    ttl: Duration,
}

impl RouteCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    /// Cache described by the generator configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            config.cache.path.clone(),
            Duration::from_secs(config.cache.ttl_minutes.saturating_mul(60)),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached routes when the entry is fresh and matches `fingerprint`.
    pub fn load(&self, fingerprint: &str) -> Option<RenderedRoutes> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!(path = %self.path.display(), "route cache miss: no cache file");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt route cache");
                return None;
            }
        };

        if entry.version != CACHE_FORMAT_VERSION || entry.fingerprint != fingerprint {
            tracing::debug!("route cache miss: sources changed");
            return None;
        }

        let age = now_secs().saturating_sub(entry.created_at);
        if age >= self.ttl.as_secs() {
            tracing::debug!(age_secs = age, "route cache miss: entry expired");
            return None;
        }

        tracing::debug!(path = %self.path.display(), "route cache hit");
        Some(entry.routes)
    }

    /// Writes a fresh entry for `fingerprint`.
    pub fn store(&self, fingerprint: &str, routes: &RenderedRoutes) -> Result<(), GeneratorError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e.to_string()))?;
        }

        let entry = CacheEntry {
            version: CACHE_FORMAT_VERSION,
            fingerprint: fingerprint.to_string(),
            created_at: now_secs(),
            routes: routes.clone(),
        };
        let content = serde_json::to_string_pretty(&entry)
            .map_err(|e| GeneratorError::io(&self.path, format!("Failed to serialize route cache: {}", e)))?;

        fs::write(&self.path, content).map_err(|e| GeneratorError::io(&self.path, e.to_string()))
    }

    /// Removes the cache file. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, GeneratorError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(GeneratorError::io(&self.path, e.to_string())),
        }
    }
}

/// Fingerprints every PHP file under the controller directory together with
/// the settings that influence generation.
pub fn fingerprint(config: &GeneratorConfig) -> Result<String, GeneratorError> {
    let mut hasher = Xxh3::new();
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    hasher.update(b"\0");
    hasher.update(config.namespace().as_bytes());
    hasher.update(b"\0");
    hasher.update(config.attribute_namespace().as_bytes());
    hasher.update(b"\0");

    let root = &config.controller_dir;
    if root.is_dir() {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "php") {
                continue;
            }

            let content = fs::read(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;
            let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
            hasher.update(relative.to_string_lossy().as_bytes());
            hasher.update(b"\0");
            hasher.update(&content);
            hasher.update(b"\0");
        }
    }

    Ok(format!("{:032x}", hasher.digest128()))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
