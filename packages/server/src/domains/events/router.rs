//! Route document-write events to the notification handler for that document.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::path::DocumentPath;
use crate::domains::applications::models::Application;
use crate::domains::applications::notify_status_change;
use crate::domains::deadlines::{notify_deadline_on_apply, notify_deadline_on_bookmark};
use crate::domains::opportunities::models::{Bookmark, Opportunity};
use crate::domains::opportunities::notify_followers;
use crate::domains::reviews::models::{CompanyReply, Review};
use crate::domains::reviews::{notify_company_reply, notify_review_reply};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventKind {
    #[serde(rename = "document.created")]
    Created,
    #[serde(rename = "document.updated")]
    Updated,
}

/// Body of `POST /events`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub document: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub old_value: Value,
}

/// Which handler, if any, took the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    NewOpportunity,
    ReviewReply,
    CompanyReply,
    ApplicationStatus,
    ApplyDeadline,
    BookmarkDeadline,
    Ignored,
}

fn document<T: DeserializeOwned>(value: &Value, path: &DocumentPath) -> Result<T> {
    serde_json::from_value(value.clone()).with_context(|| format!("malformed document at {}", path))
}

/// Run the handler for `event`. Unsupported documents and kinds are ignored.
pub async fn route_event(event: &DocumentEvent, now: DateTime<Utc>, deps: &ServerDeps) -> Result<Routed> {
    let path = match event.document.parse::<DocumentPath>() {
        Ok(path) => path,
        Err(e) => {
            debug!(error = %e, "Ignoring event");
            return Ok(Routed::Ignored);
        }
    };
    info!(document = %path, kind = ?event.kind, "Document event received");

    let routed = match (event.kind, &path) {
        (EventKind::Created, DocumentPath::Opportunity { id }) => {
            let mut opportunity: Opportunity = document(&event.value, &path)?;
            opportunity.id = id.clone();
            notify_followers(id, &opportunity, deps).await?;
            Routed::NewOpportunity
        }
        (EventKind::Created, DocumentPath::Review { id }) => {
            let mut review: Review = document(&event.value, &path)?;
            review.id = id.clone();
            notify_review_reply(id, &review, deps).await?;
            Routed::ReviewReply
        }
        (EventKind::Created, DocumentPath::ReviewReply { review_id, reply_id }) => {
            let reply: CompanyReply = document(&event.value, &path)?;
            notify_company_reply(review_id, reply_id, &reply, deps).await?;
            Routed::CompanyReply
        }
        (EventKind::Created, DocumentPath::Application { id }) => {
            let application: Application = document(&event.value, &path)?;
            notify_deadline_on_apply(id, &application, now, deps).await?;
            Routed::ApplyDeadline
        }
        (EventKind::Updated, DocumentPath::Application { id }) => {
            let before: Application = document(&event.old_value, &path)?;
            let after: Application = document(&event.value, &path)?;
            notify_status_change(id, &before, &after, deps).await?;
            Routed::ApplicationStatus
        }
        (EventKind::Created, DocumentPath::Bookmark { id }) => {
            let bookmark: Bookmark = document(&event.value, &path)?;
            notify_deadline_on_bookmark(id, &bookmark, now, deps).await?;
            Routed::BookmarkDeadline
        }
        _ => {
            debug!(document = %path, kind = ?event.kind, "No handler for event");
            Routed::Ignored
        }
    };
    Ok(routed)
}
