//! Service layer
//!
//! The two seams of the poll loop: how an attempt is made and how progress
//! is shown. Both are traits so the loop can be driven without a network or
//! a terminal.

mod probe;
mod reporter;

// Re-export traits
pub use probe::ReadinessProbe;
pub use reporter::ProgressReporter;

// Re-export implementations
pub use probe::RpcProbe;
pub use reporter::ConsoleReporter;
