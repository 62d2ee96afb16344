//! Fan-out push when a company posts a new opportunity.

use anyhow::Result;
use serde_json::json;
use tracing::{error, info, warn};

use crate::common::data_map;
use crate::domains::notifications::models::{NewNotification, NotificationType};
use crate::domains::opportunities::models::Opportunity;
use crate::kernel::{PushMessage, ServerDeps};

/// Notify every student following the opportunity's company.
///
/// One multicast goes to all followers that have a token; tokens the
/// provider rejects permanently are cleared; then one record is written per
/// follower, token or not. Returns the number of records written.
pub async fn notify_followers(
    opportunity_id: &str,
    opportunity: &Opportunity,
    deps: &ServerDeps,
) -> Result<usize> {
    let Some(company_id) = opportunity.company_id.as_deref().filter(|c| !c.is_empty()) else {
        error!(opportunity_id = %opportunity_id, "Missing companyId in opportunity");
        return Ok(0);
    };

    let Some(company) = deps.store.find_company(company_id).await? else {
        error!(company_id = %company_id, "Company not found");
        return Ok(0);
    };
    let company_name = company.name_or("A company");
    let role = opportunity.role_or("new opportunity");

    let followers = deps.store.find_followers(company_id).await?;
    if followers.is_empty() {
        info!(company = %company_name, "No followers found");
        return Ok(0);
    }

    let title = format!("{} posted a new opportunity!", company_name);
    let body = format!("Check out the {} position.", role);
    let data = data_map([
        ("route", "/opportunities"),
        ("companyId", company_id),
        ("opportunityId", opportunity_id),
    ]);

    let targets: Vec<(&str, String)> = followers
        .iter()
        .filter_map(|s| s.push_token().map(|t| (s.id.as_str(), t.to_string())))
        .collect();

    if targets.is_empty() {
        info!(company = %company_name, "No valid push tokens among followers");
    } else {
        let tokens: Vec<String> = targets.iter().map(|(_, t)| t.clone()).collect();
        let mut push_data = data.clone();
        push_data.insert(
            "type".to_string(),
            NotificationType::NewOpportunity.as_str().to_string(),
        );
        let message = PushMessage {
            title: title.clone(),
            body: body.clone(),
            data: push_data,
        };

        match deps.push_service.send_multicast(&tokens, &message).await {
            Ok(report) => {
                info!(
                    sent = report.success_count(),
                    failed = report.failure_count(),
                    "Sent new opportunity notifications"
                );
                for token in report.invalid_tokens() {
                    if let Some((student_id, _)) = targets.iter().find(|(_, t)| t == token) {
                        info!(student_id = %student_id, "Removing invalid push token");
                        deps.store.clear_fcm_token(student_id).await?;
                    }
                }
            }
            Err(e) => warn!(error = %e, "Multicast failed, recording notifications anyway"),
        }
    }

    let records: Vec<NewNotification> = followers
        .iter()
        .map(|student| NewNotification {
            user_id: student.id.clone(),
            notification_type: NotificationType::NewOpportunity,
            title: title.clone(),
            body: body.clone(),
            data: data.clone(),
            extra: json!({
                "companyId": company_id,
                "companyName": company_name,
                "opportunityId": opportunity_id,
            }),
        })
        .collect();
    let written = records.len();

    deps.store.add_notifications(records).await?;
    info!(count = written, "Notification records saved");

    Ok(written)
}
