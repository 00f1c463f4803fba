//! Shared types for the gala event platform
//!
//! Common types used by the server and any future clients: error codes,
//! model types, monetary amounts, and small utilities.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use money::Money;
