//! Seed data shared by the integration tests.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use spark_core::domains::opportunities::models::Opportunity;
use spark_core::domains::reviews::models::Review;
use spark_core::kernel::test_dependencies::MemoryDocumentStore;

pub const ACME: &str = "acme";
pub const GLOBEX: &str = "globex";

/// Opportunity closing a little over a day from `now`, inside the reminder window
pub const CLOSING_TOMORROW: &str = "opp-tomorrow";
/// Opportunity closing in a week, outside the reminder window
pub const CLOSING_NEXT_WEEK: &str = "opp-next-week";

pub fn opportunity(id: &str, company_id: &str, role: &str, deadline: Option<DateTime<Utc>>) -> Opportunity {
    Opportunity {
        id: id.to_string(),
        company_id: Some(company_id.to_string()),
        role: Some(role.to_string()),
        application_deadline: deadline,
        is_active: true,
    }
}

/// Two companies, four students and a pair of open opportunities.
///
/// - `ana` and `ben` follow Acme and have push tokens
/// - `cleo` follows Acme but never registered a device
/// - `dev` follows Globex only
pub fn seed_world(store: MemoryDocumentStore, now: DateTime<Utc>) -> MemoryDocumentStore {
    store
        .with_company(ACME, "Acme Corp")
        .with_company(GLOBEX, "Globex")
        .with_student("ana", Some("tok-ana"), &[ACME])
        .with_student("ben", Some("tok-ben"), &[ACME, GLOBEX])
        .with_student("cleo", None, &[ACME])
        .with_student("dev", Some("tok-dev"), &[GLOBEX])
        .with_opportunity(opportunity(
            CLOSING_TOMORROW,
            ACME,
            "Backend Intern",
            Some(now + Duration::minutes(24 * 60 + 30)),
        ))
        .with_opportunity(opportunity(
            CLOSING_NEXT_WEEK,
            GLOBEX,
            "Data Analyst",
            Some(now + Duration::days(7)),
        ))
        .with_review(Review {
            id: "rev-1".to_string(),
            student_id: Some("ana".to_string()),
            company_id: Some(ACME.to_string()),
            review_text: Some("Great mentorship and a friendly team.".to_string()),
            ..Default::default()
        })
}

pub fn created(document: &str, value: Value) -> Value {
    json!({ "type": "document.created", "document": document, "value": value })
}

pub fn updated(document: &str, old_value: Value, value: Value) -> Value {
    json!({
        "type": "document.updated",
        "document": document,
        "oldValue": old_value,
        "value": value,
    })
}
