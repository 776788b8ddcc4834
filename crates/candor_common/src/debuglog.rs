//! Append-only debug log for post-hoc diagnosis.
//!
//! One timestamped line per significant pipeline step. This sink must
//! never get in the way: failures to open or write are swallowed. Not a
//! replacement for `tracing` - this is the on-disk trail an operator
//! reads after a hook misbehaved, surviving across the short-lived hook
//! processes.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::paths;

/// Handle to the debug log file, tagged per trigger point
pub struct DebugLog {
    path: Option<PathBuf>,
    tag: &'static str,
}

impl DebugLog {
    pub fn new(path: Option<PathBuf>, tag: &'static str) -> Self {
        Self { path, tag }
    }

    /// Log sited for the given working directory (project-local when
    /// inside a project, global otherwise)
    pub fn for_cwd(cwd: &Path, tag: &'static str) -> Self {
        Self::new(paths::debug_log_path(cwd), tag)
    }

    /// A log that writes nowhere
    pub fn disabled() -> Self {
        Self::new(None, "")
    }

    /// Append one line; all failures are ignored
    pub fn line(&self, message: &str) {
        let Some(path) = &self.path else { return };
        let Some(parent) = path.parent() else { return };
        let _ = std::fs::create_dir_all(parent);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(
                file,
                "[{} {}] {}",
                self.tag,
                Utc::now().to_rfc3339(),
                message
            );
        }
    }
}
