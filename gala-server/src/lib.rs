//! gala-server: annual gala invitation, RSVP and food pre-order service
//!
//! Long-running HTTP service that:
//! - Sends single-use magic-link invitations (email login, no passwords)
//! - Collects RSVPs with plus-one details
//! - Takes food pre-orders against the event menu
//! - Serves organizer and kitchen dashboards

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
