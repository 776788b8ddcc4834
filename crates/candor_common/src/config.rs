//! Two-tier configuration resolution with short-lived caching.
//!
//! Settings come from a project-local file and a user-global file; the
//! local one shadows the global field by field, and built-in defaults
//! fill whatever is left. The resolver is an explicit value object
//! built per invocation from the two paths and a TTL - no ambient
//! singleton. Malformed or missing files are treated as absent, never
//! as errors: config can be rewritten by the admin path while an
//! evaluation is in flight, and a torn read just falls back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::paths;

/// Default threshold when no file provides one
pub const DEFAULT_MIN_CONFIDENCE: u8 = 50;

/// Default verbosity when no file provides one
pub const DEFAULT_VERBOSE: bool = true;

/// How long a resolved config stays cached. Hook events arrive in
/// bursts; tens of seconds keeps re-reads out of the hot path while an
/// admin edit still lands quickly.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// On-disk config shape. All fields optional: a file that only sets
/// `minConfidence` still inherits `verbose` from the tier below it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    /// Advisory only; set on every administrative write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl ConfigFile {
    /// Read a config file, treating malformed content as absent
    pub fn load(path: &Path) -> Option<Self> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(file) => Some(file),
            Err(err) => {
                debug!(path = %path.display(), %err, "malformed config treated as absent");
                None
            }
        }
    }

    /// Write the file, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Effective settings the pipeline runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub min_confidence: u8,
    pub verbose: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            verbose: DEFAULT_VERBOSE,
        }
    }
}

struct CacheEntry {
    resolved: ResolvedConfig,
    read_at: Instant,
}

/// Resolves effective settings with local-over-global precedence and a
/// short-lived process-local cache.
pub struct ConfigResolver {
    local_path: PathBuf,
    global_path: Option<PathBuf>,
    ttl: Duration,
    cache: Mutex<Option<CacheEntry>>,
}

impl ConfigResolver {
    pub fn new(local_path: PathBuf, global_path: Option<PathBuf>, ttl: Duration) -> Self {
        Self {
            local_path,
            global_path,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Resolver for a working directory, with the standard file
    /// locations and default TTL
    pub fn for_cwd(cwd: &Path) -> Self {
        Self::new(
            paths::local_config_path(cwd),
            paths::global_config_path(),
            DEFAULT_CACHE_TTL,
        )
    }

    /// Resolve, serving from cache within the TTL window
    pub fn resolve(&self) -> ResolvedConfig {
        if let Ok(guard) = self.cache.lock() {
            if let Some(entry) = guard.as_ref() {
                if entry.read_at.elapsed() < self.ttl {
                    return entry.resolved;
                }
            }
        }
        self.resolve_fresh()
    }

    /// Bypass the cache, re-read both files, and refresh the cache.
    /// Administrative writes use this so they take effect without
    /// waiting out the TTL.
    pub fn resolve_fresh(&self) -> ResolvedConfig {
        let local = ConfigFile::load(&self.local_path);
        let global = self
            .global_path
            .as_deref()
            .and_then(ConfigFile::load);
        let resolved = merge(local, global);

        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(CacheEntry {
                resolved,
                read_at: Instant::now(),
            });
        }
        resolved
    }

    /// Drop the cached result; the next resolve re-reads the files
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.lock() {
            *guard = None;
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }
}

/// Field-level merge: local over global over defaults. Thresholds above
/// 100 in a file are capped at 100.
fn merge(local: Option<ConfigFile>, global: Option<ConfigFile>) -> ResolvedConfig {
    let local = local.unwrap_or_default();
    let global = global.unwrap_or_default();
    ResolvedConfig {
        min_confidence: local
            .min_confidence
            .or(global.min_confidence)
            .unwrap_or(DEFAULT_MIN_CONFIDENCE)
            .min(100),
        verbose: local
            .verbose
            .or(global.verbose)
            .unwrap_or(DEFAULT_VERBOSE),
    }
}
