use anyhow::Result;
use tracing::{error, info};

use crate::common::{data_map, non_blank};
use crate::domains::notifications::{notify_student, DispatchRequest, NotificationType};
use crate::domains::reviews::models::CompanyReply;
use crate::kernel::ServerDeps;

/// Tell a review's author that the company responded under it.
pub async fn notify_company_reply(
    review_id: &str,
    reply_id: &str,
    reply: &CompanyReply,
    deps: &ServerDeps,
) -> Result<bool> {
    info!(review_id = %review_id, reply_id = %reply_id, "Company reply created");

    let Some(review) = deps.store.find_review(review_id).await? else {
        error!(review_id = %review_id, "Parent review not found");
        return Ok(false);
    };
    let Some(student_id) = review.student_id.as_deref().filter(|s| !s.is_empty()) else {
        error!(review_id = %review_id, "Parent review missing studentId");
        return Ok(false);
    };

    let company_name = non_blank(reply.company_name.as_deref()).unwrap_or("A company");
    let company_id = reply.company_id.as_deref().unwrap_or("");

    let request = DispatchRequest::new(
        student_id,
        NotificationType::ReviewReply,
        format!("{} replied to your review", company_name),
        "Check out the company's response",
    )
    .with_data(data_map([
        ("route", "/my-reviews"),
        ("reviewId", review_id),
        ("replyId", reply_id),
        ("companyId", company_id),
    ]))
    .with_extra("companyName", company_name)
    .with_extra("companyId", company_id)
    .with_extra("reviewId", review_id)
    .with_extra("replyId", reply_id);

    Ok(notify_student(request, deps).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::reviews::models::Review;
    use crate::kernel::test_dependencies::MemoryDocumentStore;
    use crate::kernel::TestDependencies;

    #[tokio::test]
    async fn test_company_reply_reaches_author() {
        let test = TestDependencies::new().with_store(
            MemoryDocumentStore::new()
                .with_student("s1", Some("tok"), &[])
                .with_review(Review {
                    id: "r1".into(),
                    student_id: Some("s1".into()),
                    ..Default::default()
                }),
        );
        let reply = CompanyReply {
            company_id: Some("c1".into()),
            company_name: None,
        };

        assert!(notify_company_reply("r1", "x1", &reply, &test.server_deps()).await.unwrap());

        let sent = test.push.sent();
        assert_eq!(sent[0].1.title, "A company replied to your review");
        assert_eq!(sent[0].1.body, "Check out the company's response");
        assert_eq!(sent[0].1.data["type"], "review_reply");
    }

    #[tokio::test]
    async fn test_missing_review_skips() {
        let test = TestDependencies::new();
        let reply = CompanyReply::default();

        assert!(!notify_company_reply("r1", "x1", &reply, &test.server_deps()).await.unwrap());
        assert!(test.store.notifications().is_empty());
    }
}
