//! Who is acting, and what they may do
//!
//! Order management can be reached two ways: an organizer session, or the
//! kitchen staff access key (a shared secret handed to restaurant staff,
//! passed as a query parameter or body field). Both collapse into a
//! [`Principal`] so handlers ask one question: does this principal hold
//! the capability?

use super::session::SessionClaims;

/// A discrete permission a handler can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// View all orders and change order status
    ManageOrders,
    /// Add/update guests and send invitations
    ManageGuests,
    /// Create and edit menu items
    ManageMenu,
    /// Grant and revoke organizer access
    ManageOrganizers,
}

/// The authenticated actor behind a request
#[derive(Debug, Clone)]
pub enum Principal {
    /// A logged-in user (guest or organizer)
    Session(SessionClaims),
    /// Kitchen staff presenting the access key
    StaffKey,
}

impl Principal {
    /// Resolve a principal from an optional session and an optional staff
    /// key attempt. A correct staff key wins over a session; an incorrect
    /// one is ignored rather than rejected so a logged-in user with a stale
    /// key still gets their own view.
    pub fn resolve(
        session: Option<SessionClaims>,
        staff_key: Option<&str>,
        expected_key: &str,
    ) -> Option<Principal> {
        if let Some(key) = staff_key {
            if !expected_key.is_empty() && key == expected_key {
                return Some(Principal::StaffKey);
            }
        }
        session.map(Principal::Session)
    }

    pub fn allows(&self, cap: Capability) -> bool {
        match self {
            // The staff key only unlocks the kitchen view
            Principal::StaffKey => matches!(cap, Capability::ManageOrders),
            // Organizers hold every capability; plain guests hold none
            Principal::Session(claims) => claims.is_organizer,
        }
    }

    pub fn session(&self) -> Option<&SessionClaims> {
        match self {
            Principal::Session(claims) => Some(claims),
            Principal::StaffKey => None,
        }
    }
}
