//! HTTP API surface

pub mod auth;
pub mod extract;
pub mod health;
pub mod menu;
pub mod orders;
pub mod organizer;
pub mod rsvp;
pub mod wechat;

use axum::Router;
use axum::routing::{get, post, put};
use shared::AppError;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::SessionClaims;
use crate::error::ServiceError;
use crate::state::AppState;

/// Standard handler result: JSON body or a structured error
pub type ApiResult<T> = Result<extract::Json<T>, ServiceError>;

/// Organizer-only endpoints answer 401 to everyone else, the same as to
/// anonymous callers, so they do not reveal which routes exist.
pub(crate) fn require_organizer(claims: &SessionClaims) -> Result<(), AppError> {
    if claims.is_organizer {
        Ok(())
    } else {
        Err(AppError::unauthorized())
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        // RSVP
        .route("/api/rsvp", post(rsvp::upsert))
        .route("/api/wechat/join", post(wechat::join))
        // Menu
        .route("/api/menu", get(menu::list).post(menu::create).put(menu::update))
        // Orders
        .route(
            "/api/orders",
            get(orders::list).post(orders::create).put(orders::update_status),
        )
        .route(
            "/api/orders/{order_id}/items/{item_id}",
            put(orders::update_item).delete(orders::delete_item),
        )
        // Organizer dashboard
        .route("/api/organizer/verify", get(auth::organizer_verify))
        .route("/api/organizer/guests", get(organizer::guests))
        .route("/api/organizer/stats", get(organizer::stats))
        .route("/api/organizer/add-guest", post(organizer::add_guest))
        .route("/api/organizer/update-guest", post(organizer::update_guest))
        .route("/api/organizer/send-invite", post(organizer::send_invite))
        .route("/api/organizer/send-all-invites", post(organizer::send_all_invites))
        .route(
            "/api/organizer/send-pending-invites",
            post(organizer::send_pending_invites),
        )
        .route("/api/organizer/send-menu-emails", post(organizer::send_menu_emails))
        .route("/api/organizer/generate-link", post(organizer::generate_link))
        .route(
            "/api/organizer/manage",
            get(organizer::list_organizers)
                .post(organizer::add_organizer)
                .patch(organizer::rename_organizer)
                .delete(organizer::remove_organizer),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
