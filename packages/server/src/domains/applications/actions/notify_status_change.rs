use anyhow::Result;
use tracing::{error, info};

use crate::common::data_map;
use crate::domains::applications::models::{Application, ApplicationStatus};
use crate::domains::notifications::{notify_student, DispatchRequest, NotificationType};
use crate::kernel::ServerDeps;

/// Title and body for a status change
pub fn status_copy(status: &ApplicationStatus, title: &str, company: &str) -> (String, String) {
    match status {
        ApplicationStatus::Reviewed => (
            "Application Reviewed".to_string(),
            format!("Your application for {} at {} has been reviewed", title, company),
        ),
        ApplicationStatus::Rejected => (
            "Application Update".to_string(),
            format!("Thank you for your interest in {} at {}", title, company),
        ),
        ApplicationStatus::Hired => (
            "Congratulations!".to_string(),
            format!("You've been selected for {} at {}!", title, company),
        ),
        ApplicationStatus::Interviewing => (
            "Interview Invitation".to_string(),
            format!("{} has invited you for an interview for {}", company, title),
        ),
        other => (
            "Application Status Updated".to_string(),
            format!("Your application status has been updated to: {}", other),
        ),
    }
}

/// Notify the applicant when an application's status changes.
///
/// Returns whether a dispatch was attempted and completed; unchanged
/// status is not a change.
pub async fn notify_status_change(
    application_id: &str,
    before: &Application,
    after: &Application,
    deps: &ServerDeps,
) -> Result<bool> {
    if before.status == after.status {
        info!(application_id = %application_id, "No status change, skipping notification");
        return Ok(false);
    }
    let Some(new_status) = after.status.as_ref() else {
        info!(application_id = %application_id, "Status removed, skipping notification");
        return Ok(false);
    };

    info!(
        application_id = %application_id,
        old_status = ?before.status,
        new_status = %new_status,
        "Application status changed"
    );

    let Some(student_id) = after.student_id.as_deref().filter(|s| !s.is_empty()) else {
        error!(application_id = %application_id, "Application missing studentId");
        return Ok(false);
    };

    let opportunity_id = after.opportunity_id.as_deref().unwrap_or("");
    let mut opportunity_title = "an opportunity".to_string();
    let mut company_name = "a company".to_string();

    if !opportunity_id.is_empty() {
        if let Some(opportunity) = deps.store.find_opportunity(opportunity_id).await? {
            opportunity_title = opportunity.role_or(&opportunity_title).to_string();
            if let Some(company_id) = opportunity.company_id.as_deref().filter(|c| !c.is_empty()) {
                if let Some(company) = deps.store.find_company(company_id).await? {
                    company_name = company.name_or(&company_name).to_string();
                }
            }
        }
    }

    let (title, body) = status_copy(new_status, &opportunity_title, &company_name);
    let old_status = before
        .status
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_default();

    let request = DispatchRequest::new(
        student_id,
        NotificationType::ApplicationStatusUpdate,
        title,
        body,
    )
    .with_data(data_map([
        ("route", "/opportunities"),
        ("applicationId", application_id),
        ("opportunityId", opportunity_id),
        ("status", new_status.as_str()),
    ]))
    .with_extra("companyName", company_name.as_str())
    .with_extra("opportunityTitle", opportunity_title.as_str())
    .with_extra("opportunityId", opportunity_id)
    .with_extra("applicationId", application_id)
    .with_extra("status", new_status.as_str())
    .with_extra("oldStatus", old_status);

    Ok(notify_student(request, deps).await)
}
