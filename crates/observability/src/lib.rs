//! Process-wide logging setup shared by every gearbook binary.

/// Initialize process-wide tracing.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filter, format, writer).
pub mod tracing;
