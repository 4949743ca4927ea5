// Utility functions and helpers

pub mod crypto;
pub mod scval;

use std::path::{Path, PathBuf};

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}
