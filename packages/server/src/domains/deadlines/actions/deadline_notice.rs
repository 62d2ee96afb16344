//! Deadline notice sent right after a student applies or bookmarks.

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info};

use crate::common::data_map;
use crate::domains::applications::models::Application;
use crate::domains::deadlines::DeadlineProximity;
use crate::domains::notifications::{notify_student, DispatchRequest, NotificationType};
use crate::domains::opportunities::models::Bookmark;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Apply,
    Bookmark,
}

impl Trigger {
    fn title(self) -> &'static str {
        match self {
            Self::Apply => "📅 Application Deadline",
            Self::Bookmark => "📌 Bookmark Reminder",
        }
    }
}

pub async fn notify_deadline_on_apply(
    application_id: &str,
    application: &Application,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<bool> {
    info!(application_id = %application_id, "New application created");
    send_deadline_notice(
        Trigger::Apply,
        application.student_id.as_deref(),
        application.opportunity_id.as_deref(),
        now,
        deps,
    )
    .await
}

pub async fn notify_deadline_on_bookmark(
    bookmark_id: &str,
    bookmark: &Bookmark,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<bool> {
    info!(bookmark_id = %bookmark_id, "New bookmark created");
    send_deadline_notice(
        Trigger::Bookmark,
        bookmark.student_id.as_deref(),
        bookmark.opportunity_id.as_deref(),
        now,
        deps,
    )
    .await
}

async fn send_deadline_notice(
    trigger: Trigger,
    student_id: Option<&str>,
    opportunity_id: Option<&str>,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<bool> {
    let (Some(student_id), Some(opportunity_id)) = (
        student_id.filter(|s| !s.is_empty()),
        opportunity_id.filter(|o| !o.is_empty()),
    ) else {
        error!("Missing studentId or opportunityId");
        return Ok(false);
    };

    let Some(opportunity) = deps.store.find_opportunity(opportunity_id).await? else {
        error!(opportunity_id = %opportunity_id, "Opportunity not found");
        return Ok(false);
    };
    let Some(deadline) = opportunity.application_deadline else {
        info!(opportunity_id = %opportunity_id, "Opportunity has no deadline");
        return Ok(false);
    };
    let Some(proximity) = DeadlineProximity::between(now, deadline) else {
        info!(opportunity_id = %opportunity_id, "Deadline already passed");
        return Ok(false);
    };

    let company_id = opportunity.company_id.as_deref().unwrap_or("");
    let company_name = match company_id {
        "" => None,
        id => deps.store.find_company(id).await?,
    }
    .and_then(|c| c.company_name)
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| "Company".to_string());
    let role = opportunity.role_or("Position");

    let request = DispatchRequest::new(
        student_id,
        NotificationType::DeadlineInfo,
        trigger.title(),
        format!(
            "The deadline for {} at {} is {}",
            role, company_name, proximity
        ),
    )
    .with_data(data_map([
        ("route", "/opportunities"),
        ("opportunityId", opportunity_id),
        ("companyId", company_id),
    ]))
    .with_extra("opportunityId", opportunity_id)
    .with_extra("opportunityRole", role)
    .with_extra("companyName", company_name.as_str())
    .with_extra("companyId", company_id)
    .with_extra(
        "deadline",
        deadline.to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    Ok(notify_student(request, deps).await)
}
