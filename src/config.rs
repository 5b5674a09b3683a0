//! Runtime configuration
//!
//! Settings come from the environment; there is no config file.

use std::path::{Path, PathBuf};

/// Overrides the SQLite file location
pub const DATABASE_PATH_ENV: &str = "PETPLATE_DATABASE_PATH";

/// Log filter directive used when `RUST_LOG` does not mention this crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "petplate=info";

/// Database path from `PETPLATE_DATABASE_PATH`, or `<project root>/data/petplate.db`
pub fn database_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    resolve_database_path(std::env::var(DATABASE_PATH_ENV).ok(), exe_dir)
}

fn resolve_database_path(override_path: Option<String>, exe_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    let mut root = exe_dir.unwrap_or_else(|| PathBuf::from("."));

    // target/{debug,release} -> project root
    if root.ends_with("release") || root.ends_with("debug") {
        if let Some(project) = root.parent().and_then(Path::parent) {
            root = project.to_path_buf();
        }
    }

    root.join("data").join("petplate.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let path = resolve_database_path(Some("/tmp/pets.db".to_string()), Some(PathBuf::from("/opt/bin")));
        assert_eq!(path, PathBuf::from("/tmp/pets.db"));
    }

    #[test]
    fn test_blank_override_ignored() {
        let path = resolve_database_path(Some("  ".to_string()), Some(PathBuf::from("/opt/bin")));
        assert_eq!(path, PathBuf::from("/opt/bin/data/petplate.db"));
    }

    #[test]
    fn test_target_dir_maps_to_project_root() {
        let path = resolve_database_path(None, Some(PathBuf::from("/src/petplate/target/release")));
        assert_eq!(path, PathBuf::from("/src/petplate/data/petplate.db"));
    }
}
