//! Organizer dashboard: guest management, invitations, organizer roster

mod common;

use common::*;
use http::StatusCode;
use serde_json::json;
use shared::models::RsvpStatus;
use shared::util::now_millis;

#[tokio::test]
async fn organizer_routes_reject_guests_and_anonymous() {
    let (app, state) = test_app().await;
    let guest = seed_user(&state, "g@example.com", "G", false).await;
    let cookie = login(&state, &guest);

    for (method, uri) in [
        ("GET", "/api/organizer/guests"),
        ("GET", "/api/organizer/stats"),
        ("GET", "/api/organizer/manage"),
    ] {
        let (status, _) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} anonymous");

        let (status, _) = send(&app, method, uri, Some(&cookie), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} as guest");
    }
}

#[tokio::test]
async fn guest_list_defaults_before_any_rsvp() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    seed_user(&state, "quiet@example.com", "Quiet", false).await;
    let cookie = login(&state, &organizer);

    let (status, body) = send(&app, "GET", "/api/organizer/guests", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    let guests = body.as_array().unwrap();
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0]["name"], "Quiet");
    assert_eq!(guests[0]["status"], "pending");
    assert_eq!(guests[0]["plusOne"], false);
    assert_eq!(guests[0]["joinedWechat"], false);
}

#[tokio::test]
async fn add_guest_sends_invitation_and_rejects_duplicates() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let cookie = login(&state, &organizer);

    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/add-guest",
        Some(&cookie),
        Some(json!({"name": "Ana", "email": "Ana@Example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(
        body["magicLinkUrl"]
            .as_str()
            .unwrap()
            .contains("/invitation/verify?token=")
    );
    // marked as invited only once the invitation has gone out
    assert_eq!(body["user"]["emailSent"], true);
    let stored = gala_server::db::users::find_by_id(
        &state.pool,
        body["user"]["id"].as_i64().unwrap(),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(stored.email_sent);

    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/add-guest",
        Some(&cookie),
        Some(json!({"name": "Ana again", "email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A guest with this email already exists");
}

#[tokio::test]
async fn add_guest_without_email_uses_placeholder() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let cookie = login(&state, &organizer);

    // no email and no noEmail flag is an error
    let (status, _) = send(
        &app,
        "POST",
        "/api/organizer/add-guest",
        Some(&cookie),
        Some(json!({"name": "Nameless"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/add-guest",
        Some(&cookie),
        Some(json!({"name": "Walk-in", "noEmail": true, "wechatId": "walkin99"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let email = body["user"]["email"].as_str().unwrap();
    assert!(email.starts_with("no-email-"));
    assert!(email.ends_with("@guests.local"));
    assert_eq!(body["user"]["emailSent"], false);
    assert!(body["magicLinkUrl"].is_null());

    // resending to a placeholder guest is refused
    let guest_id = body["user"]["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/send-invite",
        Some(&cookie),
        Some(json!({"guestId": guest_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Guest has no email address");
}

#[tokio::test]
async fn update_guest_checks_email_uniqueness() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let ana = seed_user(&state, "ana@example.com", "Ana", false).await;
    seed_user(&state, "bo@example.com", "Bo", false).await;
    let cookie = login(&state, &organizer);

    let (status, _) = send(
        &app,
        "POST",
        "/api/organizer/update-guest",
        Some(&cookie),
        Some(json!({"userId": ana.id, "email": "bo@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/organizer/update-guest",
        Some(&cookie),
        Some(json!({"userId": ana.id, "name": "Ana Maria", "wechatId": "anam"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = gala_server::db::users::find_by_id(&state.pool, ana.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.wechat_id.as_deref(), Some("anam"));
    assert_eq!(updated.email, "ana@example.com");

    let (status, _) = send(
        &app,
        "POST",
        "/api/organizer/update-guest",
        Some(&cookie),
        Some(json!({"userId": 999, "name": "Ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn send_invite_marks_guest_as_invited() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let guest = seed_user(&state, "g@example.com", "G", false).await;
    let cookie = login(&state, &organizer);

    assert!(!guest.email_sent);
    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/send-invite",
        Some(&cookie),
        Some(json!({"guestId": guest.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["magicLinkUrl"].as_str().unwrap().contains("token="));

    let refreshed = gala_server::db::users::find_by_id(&state.pool, guest.id)
        .await
        .unwrap()
        .unwrap();
    assert!(refreshed.email_sent);
}

#[tokio::test]
async fn generate_link_does_not_send_anything() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let guest = seed_user(&state, "g@example.com", "G", false).await;
    let cookie = login(&state, &organizer);

    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/generate-link",
        Some(&cookie),
        Some(json!({"guestId": guest.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["inviteLink"]
            .as_str()
            .unwrap()
            .contains("/invitation/verify?token=")
    );

    let refreshed = gala_server::db::users::find_by_id(&state.pool, guest.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!refreshed.email_sent);
}

#[tokio::test]
async fn bulk_sends_skip_placeholder_and_responded_guests() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let answered = seed_user(&state, "done@example.com", "Done", false).await;
    seed_user(&state, "silent@example.com", "Silent", false).await;
    seed_user(&state, "no-email-x@guests.local", "Walk-in", false).await;
    gala_server::db::rsvps::upsert(
        &state.pool,
        answered.id,
        RsvpStatus::Attending,
        false,
        None,
        now_millis(),
    )
    .await
    .unwrap();
    let cookie = login(&state, &organizer);

    // every real-email guest, responded or not
    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/send-all-invites",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    // only the guest who has not answered
    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/send-pending-invites",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    // menu emails go to attending guests only
    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/send-menu-emails",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn stats_count_attendance_and_plus_ones() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let yes = seed_user(&state, "yes@example.com", "Yes", false).await;
    let no = seed_user(&state, "no@example.com", "No", false).await;
    seed_user(&state, "maybe@example.com", "Maybe", false).await;
    gala_server::db::rsvps::upsert(
        &state.pool,
        yes.id,
        RsvpStatus::Attending,
        true,
        Some("Plus"),
        now_millis(),
    )
    .await
    .unwrap();
    gala_server::db::rsvps::upsert(
        &state.pool,
        no.id,
        RsvpStatus::NotAttending,
        false,
        None,
        now_millis(),
    )
    .await
    .unwrap();
    let cookie = login(&state, &organizer);

    let (status, body) = send(&app, "GET", "/api/organizer/stats", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalGuests"], 3);
    assert_eq!(body["attending"], 1);
    assert_eq!(body["notAttending"], 1);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["plusOnes"], 1);
}

#[tokio::test]
async fn organizer_roster_add_rename_remove() {
    let (app, state) = test_app().await;
    let organizer = seed_user(&state, "org@example.com", "Org", true).await;
    let guest = seed_user(&state, "g@example.com", "G", false).await;
    let cookie = login(&state, &organizer);

    // unknown email cannot be promoted
    let (status, body) = send(
        &app,
        "POST",
        "/api/organizer/manage",
        Some(&cookie),
        Some(json!({"email": "stranger@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User does not exist. Add them as a guest first.");

    let (status, _) = send(
        &app,
        "POST",
        "/api/organizer/manage",
        Some(&cookie),
        Some(json!({"email": "g@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/organizer/manage", Some(&cookie), None).await;
    let roster = body["organizers"].as_array().unwrap();
    assert_eq!(roster.len(), 2);
    assert!(roster.iter().any(|o| o["email"] == "g@example.com"));

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/organizer/manage",
        Some(&cookie),
        Some(json!({"organizerId": guest.id, "name": "Gabriela"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let renamed = gala_server::db::users::find_by_id(&state.pool, guest.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Gabriela");

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/organizer/manage",
        Some(&cookie),
        Some(json!({"organizerId": guest.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/api/organizer/manage", Some(&cookie), None).await;
    assert_eq!(body["organizers"].as_array().unwrap().len(), 1);

    // removing a plain guest is a 404, not a silent no-op
    let (status, body) = send(
        &app,
        "DELETE",
        "/api/organizer/manage",
        Some(&cookie),
        Some(json!({"organizerId": guest.id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Organizer not found");
}
