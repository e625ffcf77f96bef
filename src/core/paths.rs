//=========================================================================
// Resource Paths
//=========================================================================
//
// Locates the directory that holds game resources (config, assets).
//
// Lookup order:
//   1. $BEACON_RESOURCE_DIR
//   2. <executable dir>/resources, if it exists
//   3. ./resources
//
//=========================================================================

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the resource directory.
pub const RESOURCE_DIR_ENV: &str = "BEACON_RESOURCE_DIR";

const RESOURCE_DIR_NAME: &str = "resources";

/// Returns the resource directory for this process.
pub fn resource_dir() -> PathBuf {
    if let Some(dir) = env::var_os(RESOURCE_DIR_ENV) {
        return PathBuf::from(dir);
    }

    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(RESOURCE_DIR_NAME)));

    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(RESOURCE_DIR_NAME),
    }
}

/// Path of the JSON document `name` inside `dir` (`<dir>/<name>.json`).
pub fn json_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}
