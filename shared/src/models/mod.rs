//! Model types mirroring the database schema
//!
//! All timestamps are epoch milliseconds (UTC). JSON field names are
//! camelCase to match the web client.

mod invitation;
mod menu;
mod notification;
mod order;
mod rsvp;
mod user;

pub use invitation::Invitation;
pub use menu::MenuItem;
pub use notification::Notification;
pub use order::{Order, OrderItem, OrderStatus};
pub use rsvp::{Rsvp, RsvpStatus};
pub use user::User;
