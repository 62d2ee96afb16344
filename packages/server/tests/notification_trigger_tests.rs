//! Document events delivered to `POST /events` and the notifications they produce.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat};
use serde_json::json;
use spark_core::domains::notifications::NotificationType;
use spark_core::kernel::test_dependencies::{MemoryDocumentStore, MockPushService};
use test_context::test_context;

use crate::common::*;

// =============================================================================
// New opportunity
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn new_opportunity_reaches_every_follower(ctx: &TestHarness) {
    ctx.deliver(created(
        "opportunities/opp-new",
        json!({ "companyId": ACME, "role": "Platform Engineer" }),
    ))
    .await;

    let multicasts = ctx.deps.push.multicasts();
    assert_eq!(multicasts.len(), 1);
    let (tokens, message) = &multicasts[0];
    assert_eq!(tokens, &vec!["tok-ana".to_string(), "tok-ben".to_string()]);
    assert_eq!(message.title, "Acme Corp posted a new opportunity!");
    assert_eq!(message.body, "Check out the Platform Engineer position.");
    assert_eq!(message.data["type"], "new_opportunity");
    assert_eq!(message.data["opportunityId"], "opp-new");

    // cleo has no device but still gets the in-app record, dev follows someone else
    for student in ["ana", "ben", "cleo"] {
        let records = ctx.deps.store.notifications_for(student);
        assert_eq!(records.len(), 1, "record for {}", student);
        assert_eq!(records[0].notification_type, NotificationType::NewOpportunity);
        assert_eq!(records[0].extra["companyName"], "Acme Corp");
        assert!(!records[0].data.contains_key("type"));
    }
    assert!(ctx.deps.store.notifications_for("dev").is_empty());
}

#[tokio::test]
async fn rejected_follower_token_is_cleared() {
    let now = chrono::Utc::now();
    let mut ctx = TestHarness::with_store(seed_world(MemoryDocumentStore::new(), now), now);
    ctx.deps = ctx.deps.with_push(
        MockPushService::new().with_failure("tok-ben", "messaging/registration-token-not-registered"),
    );

    ctx.deliver(created(
        "opportunities/opp-new",
        json!({ "companyId": ACME, "role": "Platform Engineer" }),
    ))
    .await;

    assert!(ctx.deps.store.student("ben").unwrap().fcm_token.is_none());
    assert_eq!(
        ctx.deps.store.student("ana").unwrap().fcm_token.as_deref(),
        Some("tok-ana")
    );
    assert_eq!(ctx.deps.store.notifications_for("ben").len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn opportunity_from_unfollowed_company_notifies_nobody(ctx: &TestHarness) {
    ctx.deliver(created(
        "opportunities/opp-x",
        json!({ "companyId": "initech", "role": "Analyst" }),
    ))
    .await;

    assert!(ctx.deps.push.multicasts().is_empty());
    assert!(ctx.deps.store.notifications().is_empty());
}

// =============================================================================
// Reviews
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn student_reply_notifies_review_author(ctx: &TestHarness) {
    ctx.deliver(created(
        "reviews/rev-2",
        json!({ "studentId": "ben", "parentId": "rev-1", "companyId": ACME }),
    ))
    .await;

    let sent = ctx.deps.push.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "tok-ana");
    assert_eq!(sent[0].1.title, "New Reply to Your Review");
    assert_eq!(sent[0].1.body, "Someone replied to your review about Acme Corp");

    let records = ctx.deps.store.notifications_for("ana");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].notification_type, NotificationType::ReviewReply);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reply_to_own_review_is_silent(ctx: &TestHarness) {
    ctx.deliver(created(
        "reviews/rev-2",
        json!({ "studentId": "ana", "parentId": "rev-1", "companyId": ACME }),
    ))
    .await;

    assert!(ctx.deps.push.sent().is_empty());
    assert!(ctx.deps.store.notifications().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn top_level_review_is_silent(ctx: &TestHarness) {
    ctx.deliver(created(
        "reviews/rev-3",
        json!({ "studentId": "ben", "companyId": ACME, "reviewText": "Solid" }),
    ))
    .await;

    assert!(ctx.deps.store.notifications().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn company_reply_notifies_review_author(ctx: &TestHarness) {
    ctx.deliver(created(
        "reviews/rev-1/replies/reply-1",
        json!({ "companyId": ACME, "companyName": "Acme Corp" }),
    ))
    .await;

    let records = ctx.deps.store.notifications_for("ana");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Acme Corp replied to your review");
    assert_eq!(records[0].data["reviewId"], "rev-1");
}

// =============================================================================
// Applications
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn interview_invitation_is_pushed(ctx: &TestHarness) {
    let before = json!({
        "studentId": "ana",
        "opportunityId": CLOSING_TOMORROW,
        "status": "Pending",
    });
    let mut after = before.clone();
    after["status"] = json!("Interviewing");

    ctx.deliver(updated("applications/app-1", before, after)).await;

    let sent = ctx.deps.push.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.title, "Interview Invitation");
    assert_eq!(
        sent[0].1.body,
        "Acme Corp has invited you for an interview for Backend Intern"
    );
    assert_eq!(sent[0].1.data["status"], "Interviewing");

    let records = ctx.deps.store.notifications_for("ana");
    assert_eq!(records[0].notification_type, NotificationType::ApplicationStatusUpdate);
    assert_eq!(records[0].extra["oldStatus"], "Pending");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_without_status_change_is_silent(ctx: &TestHarness) {
    let doc = json!({ "studentId": "ana", "opportunityId": CLOSING_TOMORROW, "status": "Reviewed" });
    let mut after = doc.clone();
    after["updatedBy"] = json!("recruiter-7");

    ctx.deliver(updated("applications/app-1", doc, after)).await;

    assert!(ctx.deps.push.sent().is_empty());
    assert!(ctx.deps.store.notifications().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn new_application_gets_deadline_notice(ctx: &TestHarness) {
    ctx.deliver(created(
        "applications/app-1",
        json!({ "studentId": "ana", "opportunityId": CLOSING_TOMORROW, "status": "Pending" }),
    ))
    .await;

    let records = ctx.deps.store.notifications_for("ana");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].notification_type, NotificationType::DeadlineInfo);
    assert_eq!(records[0].title, "📅 Application Deadline");
    // 24.5 hours out rounds up to two days
    assert_eq!(
        records[0].body,
        "The deadline for Backend Intern at Acme Corp is in 2 days"
    );
}

// =============================================================================
// Bookmarks
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn bookmark_gets_deadline_notice(ctx: &TestHarness) {
    ctx.deliver(created(
        "bookmarks/bm-1",
        json!({ "studentId": "dev", "opportunityId": CLOSING_NEXT_WEEK }),
    ))
    .await;

    let records = ctx.deps.store.notifications_for("dev");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "📌 Bookmark Reminder");
    assert_eq!(
        records[0].body,
        "The deadline for Data Analyst at Globex is in 7 days"
    );
    let deadline = (ctx.now + Duration::days(7)).to_rfc3339_opts(SecondsFormat::Millis, true);
    assert_eq!(records[0].extra["deadline"], deadline);
}

#[tokio::test]
async fn bookmark_past_deadline_is_silent() {
    let now = chrono::Utc::now();
    let store = MemoryDocumentStore::new()
        .with_company(ACME, "Acme Corp")
        .with_student("ana", Some("tok-ana"), &[])
        .with_opportunity(opportunity(
            "opp-closed",
            ACME,
            "Backend Intern",
            Some(now - Duration::hours(1)),
        ));
    let ctx = TestHarness::with_store(store, now);

    ctx.deliver(created(
        "bookmarks/bm-1",
        json!({ "studentId": "ana", "opportunityId": "opp-closed" }),
    ))
    .await;

    assert!(ctx.deps.store.notifications().is_empty());
}

// =============================================================================
// Envelope handling
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn unsupported_documents_are_acknowledged(ctx: &TestHarness) {
    ctx.deliver(created("companies/acme", json!({ "companyName": "Acme" })))
        .await;
    ctx.deliver(updated("bookmarks/bm-1", json!({}), json!({ "studentId": "ana" })))
        .await;

    assert!(ctx.deps.store.notifications().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn malformed_envelope_is_rejected(ctx: &TestHarness) {
    let (status, body) = ctx
        .post("/events", json!({ "type": "document.deleted", "document": "reviews/r1" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid event"));
}
