//! Path utilities: locate the executable directory and its siblings.

use std::path::{Path, PathBuf};

/// Directory holding the running executable, or the current directory.
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Sibling directory `name` next to `base` (`<base>/../<name>`).
pub fn parallel_dir(base: &Path, name: &str) -> Option<PathBuf> {
    base.parent().map(|p| p.join(name))
}
