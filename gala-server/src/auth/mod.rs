//! Session cookies, extractors, and access control

mod extractor;
mod principal;
mod session;

pub use extractor::{CurrentSession, MaybeSession};
pub use principal::{Capability, Principal};
pub use session::{
    SESSION_COOKIE, SessionClaims, SessionService, clear_session_cookie, session_cookie,
    token_from_cookie_header,
};
