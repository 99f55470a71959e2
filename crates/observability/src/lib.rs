//! Process-wide tracing setup shared by the console binary and tools.

/// Tracing configuration (filters, formatters).
pub mod tracing;

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
