//! Process-wide logging setup shared by storefront binaries.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing with the format chosen by `STOREFRONT_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init_from_env();
}
