//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ai;
pub mod health;
pub mod recipes;

// Re-export all handlers for use in router
pub use ai::*;
pub use health::*;
pub use recipes::*;
