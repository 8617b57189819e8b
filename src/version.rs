// Service identity reported by /health and /version, fixed at build time.

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name; also the `service` field of the health check.
pub const NAME: &str = env!("CARGO_PKG_NAME");
