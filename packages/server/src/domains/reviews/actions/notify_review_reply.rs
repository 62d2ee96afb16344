use anyhow::Result;
use tracing::{error, info};

use crate::common::{data_map, snippet};
use crate::domains::notifications::{notify_student, DispatchRequest, NotificationType};
use crate::domains::reviews::models::Review;
use crate::kernel::ServerDeps;

/// Tell the author of a review that another student replied to it.
///
/// Returns whether a dispatch was attempted and completed.
pub async fn notify_review_reply(
    reply_id: &str,
    reply: &Review,
    deps: &ServerDeps,
) -> Result<bool> {
    let Some(parent_id) = reply.parent() else {
        info!(review_id = %reply_id, "Not a reply, skipping notification");
        return Ok(false);
    };

    let Some(parent) = deps.store.find_review(parent_id).await? else {
        error!(parent_id = %parent_id, "Parent review not found");
        return Ok(false);
    };
    let Some(author_id) = parent.student_id.as_deref().filter(|s| !s.is_empty()) else {
        error!(parent_id = %parent_id, "Parent review missing studentId");
        return Ok(false);
    };

    if reply.student_id.as_deref() == Some(author_id) {
        info!(student_id = %author_id, "Student replied to their own review, skipping");
        return Ok(false);
    }

    let company_id = reply.company_id.as_deref().unwrap_or("");
    let company_name = match company_id {
        "" => None,
        id => deps.store.find_company(id).await?,
    }
    .and_then(|c| c.company_name)
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| "a company".to_string());

    let reply_snippet = snippet(reply.review_text.as_deref().unwrap_or(""), 100);

    let request = DispatchRequest::new(
        author_id,
        NotificationType::ReviewReply,
        "New Reply to Your Review",
        format!("Someone replied to your review about {}", company_name),
    )
    .with_data(data_map([
        ("route", "/my-reviews"),
        ("reviewId", parent_id),
        ("replyId", reply_id),
        ("companyId", company_id),
    ]))
    .with_extra("companyName", company_name.as_str())
    .with_extra("companyId", company_id)
    .with_extra("reviewId", parent_id)
    .with_extra("replyId", reply_id)
    .with_extra("replySnippet", reply_snippet);

    Ok(notify_student(request, deps).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MemoryDocumentStore;
    use crate::kernel::TestDependencies;

    fn review(id: &str, student: &str, parent: Option<&str>, text: &str) -> Review {
        Review {
            id: id.into(),
            student_id: Some(student.into()),
            parent_id: parent.map(str::to_string),
            company_id: Some("c1".into()),
            review_text: Some(text.into()),
        }
    }

    fn deps() -> TestDependencies {
        TestDependencies::new().with_store(
            MemoryDocumentStore::new()
                .with_company("c1", "Acme")
                .with_student("author", Some("tok"), &[])
                .with_student("other", Some("tok2"), &[])
                .with_review(review("r1", "author", None, "Good place")),
        )
    }

    #[tokio::test]
    async fn test_reply_notifies_original_author() {
        let test = deps();
        let reply = review("r2", "other", Some(" r1 "), &"x".repeat(150));

        assert!(notify_review_reply("r2", &reply, &test.server_deps()).await.unwrap());

        let records = test.store.notifications_for("author");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "New Reply to Your Review");
        assert_eq!(records[0].body, "Someone replied to your review about Acme");
        assert_eq!(records[0].data["reviewId"], "r1");
        assert_eq!(records[0].data["replyId"], "r2");
        let snippet = records[0].extra["replySnippet"].as_str().unwrap();
        assert_eq!(snippet.chars().count(), 103);
        assert!(snippet.ends_with("..."));
    }

    #[tokio::test]
    async fn test_top_level_review_is_ignored() {
        let test = deps();
        let review = review("r3", "other", Some("   "), "hello");

        assert!(!notify_review_reply("r3", &review, &test.server_deps()).await.unwrap());
        assert!(test.store.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_self_reply_is_ignored() {
        let test = deps();
        let reply = review("r4", "author", Some("r1"), "adding more");

        assert!(!notify_review_reply("r4", &reply, &test.server_deps()).await.unwrap());
        assert!(test.push.sent().is_empty());
        assert!(test.store.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_company_uses_default_name() {
        let test = deps();
        let mut reply = review("r5", "other", Some("r1"), "short");
        reply.company_id = Some("missing".into());

        notify_review_reply("r5", &reply, &test.server_deps()).await.unwrap();

        let records = test.store.notifications_for("author");
        assert_eq!(records[0].body, "Someone replied to your review about a company");
        assert_eq!(records[0].extra["replySnippet"], "short");
    }
}
