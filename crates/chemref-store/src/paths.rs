//! Data directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the data directory.
pub const DATA_ENV_VAR: &str = "CHEMREF_DATA_DIR";

/// Get the data root directory.
///
/// Resolution order:
/// 1. `CHEMREF_DATA_DIR` environment variable
/// 2. `data/` directory relative to the workspace root
pub fn data_root() -> PathBuf {
    if let Ok(root) = std::env::var(DATA_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}
