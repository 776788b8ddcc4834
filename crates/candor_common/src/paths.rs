//! File locations for config, notes, and debug logs.
//!
//! Everything lives under a `.claude` directory: project-scoped files
//! under the current working directory, user-scoped files under the
//! home directory.

use std::path::{Path, PathBuf};

/// Directory name holding all candor files, both locally and globally
pub const CLAUDE_DIR: &str = ".claude";

/// Config file name (same for the local and global instance)
pub const CONFIG_FILE: &str = "candor-config.json";

/// Notes log file name (global only)
pub const NOTES_FILE: &str = "candor-notes.json";

/// Debug log file name
pub const DEBUG_LOG_FILE: &str = "candor-debug.log";

/// Project-scoped config path for a working directory
pub fn local_config_path(cwd: &Path) -> PathBuf {
    cwd.join(CLAUDE_DIR).join(CONFIG_FILE)
}

/// User-scoped `.claude` directory, if a home directory can be resolved
pub fn global_claude_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CLAUDE_DIR))
}

/// User-scoped config path
pub fn global_config_path() -> Option<PathBuf> {
    global_claude_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Notes log path (always user-scoped)
pub fn notes_path() -> Option<PathBuf> {
    global_claude_dir().map(|dir| dir.join(NOTES_FILE))
}

/// A directory counts as a project when it carries its own `.claude`
/// directory or a recognizable build manifest.
pub fn is_project_dir(cwd: &Path) -> bool {
    cwd.join(CLAUDE_DIR).is_dir()
        || cwd.join("package.json").is_file()
        || cwd.join("Cargo.toml").is_file()
}

/// Debug log path: project-local when inside a project, global otherwise
pub fn debug_log_path(cwd: &Path) -> Option<PathBuf> {
    if is_project_dir(cwd) {
        Some(cwd.join(CLAUDE_DIR).join(DEBUG_LOG_FILE))
    } else {
        global_claude_dir().map(|dir| dir.join(DEBUG_LOG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_under_claude_dir() {
        let path = local_config_path(Path::new("/work/repo"));
        assert_eq!(path, PathBuf::from("/work/repo/.claude/candor-config.json"));
    }

    #[test]
    fn test_project_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_project_dir(dir.path()));

        std::fs::create_dir(dir.path().join(CLAUDE_DIR)).unwrap();
        assert!(is_project_dir(dir.path()));
    }

    #[test]
    fn test_debug_log_prefers_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CLAUDE_DIR)).unwrap();

        let path = debug_log_path(dir.path()).unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with(DEBUG_LOG_FILE));
    }
}
