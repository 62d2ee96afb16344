use std::fmt;
use std::str::FromStr;

/// Document location an event refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPath {
    Opportunity { id: String },
    Review { id: String },
    /// Company reply stored under a review
    ReviewReply { review_id: String, reply_id: String },
    Application { id: String },
    Bookmark { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported document path: {0}")]
pub struct UnsupportedPath(pub String);

impl FromStr for DocumentPath {
    type Err = UnsupportedPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.trim_matches('/').split('/').collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(UnsupportedPath(s.to_string()));
        }

        let path = match segments.as_slice() {
            ["opportunities", id] => Self::Opportunity { id: id.to_string() },
            ["reviews", id] => Self::Review { id: id.to_string() },
            ["reviews", review_id, "replies", reply_id] => Self::ReviewReply {
                review_id: review_id.to_string(),
                reply_id: reply_id.to_string(),
            },
            ["applications", id] => Self::Application { id: id.to_string() },
            ["bookmarks", id] => Self::Bookmark { id: id.to_string() },
            _ => return Err(UnsupportedPath(s.to_string())),
        };
        Ok(path)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opportunity { id } => write!(f, "opportunities/{}", id),
            Self::Review { id } => write!(f, "reviews/{}", id),
            Self::ReviewReply { review_id, reply_id } => {
                write!(f, "reviews/{}/replies/{}", review_id, reply_id)
            }
            Self::Application { id } => write!(f, "applications/{}", id),
            Self::Bookmark { id } => write!(f, "bookmarks/{}", id),
        }
    }
}
