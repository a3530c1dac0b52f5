//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analysis;
pub mod bills;
pub mod dashboard;
pub mod notifications;
pub mod transactions;

// Re-export all handlers for use in router
pub use analysis::*;
pub use bills::*;
pub use dashboard::*;
pub use notifications::*;
pub use transactions::*;
