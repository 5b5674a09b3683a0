//! Build information module
//!
//! Build metadata stamped in by build.rs, reported by the status tool and the
//! startup banner.

use serde::Serialize;

/// Build number as emitted by build.rs; always decimal there
const BUILD_NUMBER_RAW: Option<&str> = option_env!("PETPLATE_BUILD_NUMBER");

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("PETPLATE_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Cargo profile the binary was built with (debug / release)
pub const BUILD_PROFILE: &str = match option_env!("PETPLATE_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Package description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 0 when the crate was built without build.rs metadata
fn build_number(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

/// Build information structure for serialization
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub profile: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    /// Get the current build info
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: build_number(BUILD_NUMBER_RAW),
            build_timestamp: BUILD_TIMESTAMP,
            profile: BUILD_PROFILE,
            description: DESCRIPTION,
        }
    }

    /// One-line identification, e.g. `PetPlate v0.1.0 (build 12, release)`
    pub fn label(&self) -> String {
        format!("PetPlate v{} (build {}, {})", self.version, self.build_number, self.profile)
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("-----------------------------------------------");
    eprintln!("  {}", info.label());
    eprintln!("  {}", info.description);
    eprintln!("  Built at {}", info.build_timestamp);
    eprintln!("-----------------------------------------------");
}
