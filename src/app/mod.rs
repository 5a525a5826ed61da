//! Process-level helpers used by [`run_server`](crate::run_server).

pub mod shutdown;

// Re-export public API
pub use shutdown::shutdown_on_ctrl_c;
