//! Version information.

/// Crate version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version string logged at startup.
#[must_use]
pub fn full_version() -> String {
    format!("sumsq {} ({} {})", version(), std::env::consts::OS, std::env::consts::ARCH)
}
