//! Unified error system for the gala event platform
//!
//! - [`ErrorCode`]: standardized error codes, stable across clients
//! - [`AppError`]: error type carrying a code plus a human-readable message
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 9xxx: System errors

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
