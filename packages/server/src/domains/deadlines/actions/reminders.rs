//! Hourly scan for opportunities closing in about a day.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use crate::common::data_map;
use crate::domains::notifications::{notify_student, DispatchRequest, NotificationType};
use crate::domains::opportunities::models::Opportunity;
use crate::kernel::ServerDeps;

/// Remind bookmarkers and pending applicants of opportunities whose
/// deadline falls in `[now + 24h, now + 25h)`.
///
/// A student who already has a `deadline_reminder` for the opportunity is
/// skipped, so overlapping runs do not repeat themselves. Returns the
/// number of reminders dispatched.
pub async fn send_deadline_reminders(now: DateTime<Utc>, deps: &ServerDeps) -> Result<usize> {
    info!("Checking for deadline reminders");

    let from = now + Duration::hours(24);
    let to = now + Duration::hours(25);
    let opportunities = deps
        .store
        .find_opportunities_with_deadline_between(from, to)
        .await?;

    if opportunities.is_empty() {
        info!("No upcoming deadlines found");
        return Ok(0);
    }
    info!(count = opportunities.len(), "Found opportunities with upcoming deadlines");

    let mut sent = 0;
    for opportunity in &opportunities {
        match remind_for_opportunity(opportunity, deps).await {
            Ok(n) => sent += n,
            Err(e) => error!(opportunity_id = %opportunity.id, error = %e, "Deadline reminders failed"),
        }
    }
    Ok(sent)
}

async fn remind_for_opportunity(opportunity: &Opportunity, deps: &ServerDeps) -> Result<usize> {
    let opportunity_id = opportunity.id.as_str();

    let mut student_ids: BTreeSet<String> = deps
        .store
        .find_bookmarker_ids(opportunity_id)
        .await?
        .into_iter()
        .collect();
    student_ids.extend(deps.store.find_pending_applicant_ids(opportunity_id).await?);
    student_ids.retain(|id| !id.is_empty());

    if student_ids.is_empty() {
        return Ok(0);
    }

    let company_id = opportunity.company_id.as_deref().unwrap_or("");
    let company_name = match company_id {
        "" => None,
        id => deps.store.find_company(id).await?,
    }
    .and_then(|c| c.company_name)
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| "Company".to_string());
    let role = opportunity.role_or("Position");

    let mut sent = 0;
    for student_id in &student_ids {
        if deps
            .store
            .notification_exists(student_id, NotificationType::DeadlineReminder, opportunity_id)
            .await?
        {
            continue;
        }

        let request = DispatchRequest::new(
            student_id.as_str(),
            NotificationType::DeadlineReminder,
            "⏰ Deadline Reminder",
            format!("Reminder: {} at {} deadline is tomorrow!", role, company_name),
        )
        .with_data(data_map([
            ("route", "/opportunities"),
            ("opportunityId", opportunity_id),
            ("companyId", company_id),
        ]))
        .with_extra("opportunityId", opportunity_id)
        .with_extra("opportunityRole", role)
        .with_extra("companyName", company_name.as_str())
        .with_extra("companyId", company_id);

        if notify_student(request, deps).await {
            sent += 1;
        }
    }

    info!(
        role = %role,
        students = student_ids.len(),
        sent,
        "Sent deadline reminders"
    );
    Ok(sent)
}
