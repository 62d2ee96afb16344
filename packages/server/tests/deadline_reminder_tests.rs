//! Hourly deadline scan.

mod common;

use chrono::{Duration, Utc};
use spark_core::domains::applications::models::ApplicationStatus;
use spark_core::domains::deadlines::send_deadline_reminders;
use spark_core::domains::notifications::NotificationType;
use spark_core::kernel::test_dependencies::MemoryDocumentStore;
use spark_core::kernel::TestDependencies;

use crate::common::*;

fn reminders(test: &TestDependencies) -> Vec<(String, String)> {
    let mut sent: Vec<(String, String)> = test
        .store
        .notifications()
        .into_iter()
        .filter(|n| n.notification_type == NotificationType::DeadlineReminder)
        .map(|n| (n.user_id, n.data["opportunityId"].clone()))
        .collect();
    sent.sort();
    sent
}

#[tokio::test]
async fn bookmarkers_and_pending_applicants_are_reminded_once() {
    let now = Utc::now();
    let store = seed_world(MemoryDocumentStore::new(), now)
        .with_bookmark("ana", CLOSING_TOMORROW)
        .with_bookmark("ben", CLOSING_TOMORROW)
        // ben both bookmarked and applied; still one reminder
        .with_application("ben", CLOSING_TOMORROW, ApplicationStatus::Pending)
        .with_application("cleo", CLOSING_TOMORROW, ApplicationStatus::Pending)
        .with_application("dev", CLOSING_TOMORROW, ApplicationStatus::Rejected)
        .with_bookmark("dev", CLOSING_NEXT_WEEK);
    let test = TestDependencies::new().with_store(store);

    let sent = send_deadline_reminders(now, &test.server_deps()).await.unwrap();
    assert_eq!(sent, 3);
    assert_eq!(
        reminders(&test),
        vec![
            ("ana".to_string(), CLOSING_TOMORROW.to_string()),
            ("ben".to_string(), CLOSING_TOMORROW.to_string()),
            ("cleo".to_string(), CLOSING_TOMORROW.to_string()),
        ]
    );

    let record = &test.store.notifications_for("ana")[0];
    assert_eq!(record.title, "⏰ Deadline Reminder");
    assert_eq!(record.body, "Reminder: Backend Intern at Acme Corp deadline is tomorrow!");
}

#[tokio::test]
async fn second_scan_in_the_window_sends_nothing_new() {
    let now = Utc::now();
    let store = seed_world(MemoryDocumentStore::new(), now)
        .with_bookmark("ana", CLOSING_TOMORROW)
        .with_application("ben", CLOSING_TOMORROW, ApplicationStatus::Pending);
    let test = TestDependencies::new().with_store(store);
    let deps = test.server_deps();

    assert_eq!(send_deadline_reminders(now, &deps).await.unwrap(), 2);
    // Deadline is 24.5h out: both scans see it in [24h, 25h)
    let later = now + Duration::minutes(20);
    assert_eq!(send_deadline_reminders(later, &deps).await.unwrap(), 0);

    assert_eq!(reminders(&test).len(), 2);
    assert_eq!(test.push.sent().len(), 2);
}

#[tokio::test]
async fn window_includes_start_and_excludes_end() {
    let now = Utc::now();
    let store = MemoryDocumentStore::new()
        .with_company(ACME, "Acme Corp")
        .with_student("ana", Some("tok-ana"), &[])
        .with_opportunity(opportunity("at-24h", ACME, "A", Some(now + Duration::hours(24))))
        .with_opportunity(opportunity("at-25h", ACME, "B", Some(now + Duration::hours(25))))
        .with_opportunity(opportunity(
            "just-before-24h",
            ACME,
            "C",
            Some(now + Duration::hours(24) - Duration::seconds(1)),
        ))
        .with_bookmark("ana", "at-24h")
        .with_bookmark("ana", "at-25h")
        .with_bookmark("ana", "just-before-24h");
    let test = TestDependencies::new().with_store(store);

    send_deadline_reminders(now, &test.server_deps()).await.unwrap();

    assert_eq!(
        reminders(&test),
        vec![("ana".to_string(), "at-24h".to_string())]
    );
}

#[tokio::test]
async fn inactive_opportunities_are_skipped() {
    let now = Utc::now();
    let mut closed = opportunity(
        "opp-closed",
        ACME,
        "Backend Intern",
        Some(now + Duration::minutes(24 * 60 + 10)),
    );
    closed.is_active = false;
    let store = MemoryDocumentStore::new()
        .with_company(ACME, "Acme Corp")
        .with_student("ana", Some("tok-ana"), &[])
        .with_opportunity(closed)
        .with_bookmark("ana", "opp-closed");
    let test = TestDependencies::new().with_store(store);

    assert_eq!(send_deadline_reminders(now, &test.server_deps()).await.unwrap(), 0);
    assert!(test.store.notifications().is_empty());
}

#[tokio::test]
async fn missing_company_falls_back_to_placeholder() {
    let now = Utc::now();
    let store = MemoryDocumentStore::new()
        .with_student("ana", None, &[])
        .with_opportunity(opportunity(
            "opp-orphan",
            "gone",
            "Designer",
            Some(now + Duration::minutes(24 * 60 + 5)),
        ))
        .with_bookmark("ana", "opp-orphan");
    let test = TestDependencies::new().with_store(store);

    assert_eq!(send_deadline_reminders(now, &test.server_deps()).await.unwrap(), 1);

    // no token: nothing pushed, record still written
    assert!(test.push.sent().is_empty());
    let records = test.store.notifications_for("ana");
    assert_eq!(records[0].body, "Reminder: Designer at Company deadline is tomorrow!");
}
