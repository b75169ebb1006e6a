use std::{fmt, str::FromStr};

use async_trait::async_trait;

use crate::{Comment, Error, NewComment};

/// What kind of entity a discussion hangs off
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DiscussionKind {
    Task,
    ServiceRequest,
}

impl DiscussionKind {
    fn prefix(&self) -> &'static str {
        match self {
            DiscussionKind::Task => "task",
            DiscussionKind::ServiceRequest => "service-request",
        }
    }
}

/// Opaque `(kind, id)` pair naming the entity whose comments form a discussion
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct DiscussionRef {
    pub kind: DiscussionKind,
    pub id: String,
}

impl DiscussionRef {
    pub fn task(id: impl Into<String>) -> DiscussionRef {
        DiscussionRef {
            kind: DiscussionKind::Task,
            id: id.into(),
        }
    }

    pub fn service_request(id: impl Into<String>) -> DiscussionRef {
        DiscussionRef {
            kind: DiscussionKind::ServiceRequest,
            id: id.into(),
        }
    }
}

impl fmt::Display for DiscussionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.id)
    }
}

impl FromStr for DiscussionRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<DiscussionRef, Error> {
        let invalid = || Error::InvalidDiscussionRef(s.to_string());
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let kind = match kind {
            "task" => DiscussionKind::Task,
            "service-request" => DiscussionKind::ServiceRequest,
            _ => return Err(invalid()),
        };
        if id.trim().is_empty() {
            return Err(invalid());
        }
        crate::validate_string(id)?;
        Ok(DiscussionRef {
            kind,
            id: id.to_string(),
        })
    }
}

/// The collaborator that fetches discussions and accepts new comments
///
/// The engine never calls this itself: the application fetches, hands the
/// comments over for ordering, and refetches after a submission.
#[async_trait]
pub trait Discussions {
    async fn fetch_comments(&mut self, d: &DiscussionRef) -> Result<Vec<Comment>, Error>;

    /// Returns the comment as stored, with its assigned id and creation time
    async fn submit_comment(&mut self, d: &DiscussionRef, c: NewComment) -> Result<Comment, Error>;
}
