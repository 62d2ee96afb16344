//! `PostgresDocumentStore` against a real database.
//!
//! Needs Docker; run with `cargo test --test postgres_store_tests -- --ignored`.

mod common;

use chrono::{Duration, Utc};
use spark_core::common::data_map;
use spark_core::domains::auth::models::PasswordResetTicket;
use spark_core::domains::notifications::{NewNotification, NotificationType};
use spark_core::kernel::{BaseDocumentStore, PostgresDocumentStore};
use sqlx::PgPool;
use test_context::test_context;

use crate::common::*;

async fn seed(pool: &PgPool, prefix: &str) {
    let company = format!("{}-co", prefix);
    sqlx::query("INSERT INTO companies (id, company_name) VALUES ($1, 'Initech')")
        .bind(&company)
        .execute(pool)
        .await
        .unwrap();
    for (student, token) in [("a", Some("tok-a")), ("b", None)] {
        sqlx::query(
            "INSERT INTO students (id, fcm_token, followed_companies) VALUES ($1, $2, ARRAY[$3])",
        )
        .bind(format!("{}-{}", prefix, student))
        .bind(token)
        .bind(&company)
        .execute(pool)
        .await
        .unwrap();
    }
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn followers_and_token_pruning(ctx: &PostgresHarness) {
    seed(&ctx.db_pool, "fol").await;
    let store = PostgresDocumentStore::new(ctx.db_pool.clone());

    let followers = store.find_followers("fol-co").await.unwrap();
    let ids: Vec<&str> = followers.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["fol-a", "fol-b"]);

    store.clear_fcm_token("fol-a").await.unwrap();
    let student = store.find_student("fol-a").await.unwrap().unwrap();
    assert!(student.fcm_token.is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn reminder_window_and_duplicate_check(ctx: &PostgresHarness) {
    seed(&ctx.db_pool, "win").await;
    let now = Utc::now();
    for (id, offset, active) in [
        ("win-in", Duration::minutes(24 * 60 + 30), true),
        ("win-late", Duration::hours(25), true),
        ("win-inactive", Duration::minutes(24 * 60 + 30), false),
    ] {
        sqlx::query(
            "INSERT INTO opportunities (id, company_id, role, application_deadline, is_active)
             VALUES ($1, 'win-co', 'Analyst', $2, $3)",
        )
        .bind(id)
        .bind(now + offset)
        .bind(active)
        .execute(&ctx.db_pool)
        .await
        .unwrap();
    }
    let store = PostgresDocumentStore::new(ctx.db_pool.clone());

    let due = store
        .find_opportunities_with_deadline_between(now + Duration::hours(24), now + Duration::hours(25))
        .await
        .unwrap();
    let ids: Vec<&str> = due.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, ["win-in"]);

    assert!(!store
        .notification_exists("win-a", NotificationType::DeadlineReminder, "win-in")
        .await
        .unwrap());
    store
        .add_notifications(vec![NewNotification {
            user_id: "win-a".to_string(),
            notification_type: NotificationType::DeadlineReminder,
            title: "⏰ Deadline Reminder".to_string(),
            body: "Reminder".to_string(),
            data: data_map([("opportunityId", "win-in")]),
            extra: serde_json::json!({}),
        }])
        .await
        .unwrap();
    assert!(store
        .notification_exists("win-a", NotificationType::DeadlineReminder, "win-in")
        .await
        .unwrap());
    assert!(!store
        .notification_exists("win-a", NotificationType::DeadlineInfo, "win-in")
        .await
        .unwrap());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn reset_ticket_lifecycle(ctx: &PostgresHarness) {
    sqlx::query(
        "INSERT INTO accounts (uid, email, password_hash) VALUES ('tkt-user', 'tkt@example.com', 'x')",
    )
    .execute(&ctx.db_pool)
    .await
    .unwrap();
    let store = PostgresDocumentStore::new(ctx.db_pool.clone());
    let ticket = PasswordResetTicket {
        user_id: "tkt-user".to_string(),
        email: "tkt@example.com".to_string(),
        hash: "salt$hash".to_string(),
        expires_at: Utc::now() + Duration::minutes(10),
        attempts: 0,
    };

    store.save_reset_ticket(ticket.clone()).await.unwrap();
    store.record_failed_attempt("tkt-user").await.unwrap();
    assert_eq!(store.find_reset_ticket("tkt-user").await.unwrap().unwrap().attempts, 1);

    // a new code resets the counter
    store
        .save_reset_ticket(PasswordResetTicket {
            hash: "salt$other".to_string(),
            ..ticket
        })
        .await
        .unwrap();
    let saved = store.find_reset_ticket("tkt-user").await.unwrap().unwrap();
    assert_eq!((saved.hash.as_str(), saved.attempts), ("salt$other", 0));

    store.delete_reset_ticket("tkt-user").await.unwrap();
    assert!(store.find_reset_ticket("tkt-user").await.unwrap().is_none());
}
