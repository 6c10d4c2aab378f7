//! Process-wide logging setup shared by the bulk-products binaries.

/// Structured logging setup (filters, formatter).
pub mod tracing;

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
