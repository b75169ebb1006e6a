use std::fmt;

use crate::{Attachment, Error, Time};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> CommentId {
        CommentId(s.to_string())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the conversation wrote a comment; only used for styling
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorKind {
    #[default]
    PrimaryParty,
    CounterParty,
}

impl AuthorKind {
    /// Reads a stored author kind, falling back to the default for values
    /// written by other producers
    fn deserialize_lenient<'de, D>(d: D) -> Result<AuthorKind, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RawKind {
            Known(AuthorKind),
            Other(serde::de::IgnoredAny),
        }

        Ok(match <Option<RawKind> as serde::Deserialize>::deserialize(d)? {
            Some(RawKind::Known(k)) => k,
            None | Some(RawKind::Other(_)) => AuthorKind::default(),
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    /// Free-form foreign key populated from client input: it may be empty,
    /// point to a comment missing from the discussion, to the comment itself,
    /// or take part in a cycle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,

    #[serde(default)]
    pub author_name: String,

    #[serde(default, deserialize_with = "AuthorKind::deserialize_lenient")]
    pub author_kind: AuthorKind,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// `None` when the producer sent no timestamp or one that could not be parsed
    #[serde(default, with = "crate::time::lenient")]
    pub created_at: Option<Time>,
}

impl Comment {
    /// The parent this comment points to, blank references counting as none
    pub fn parent(&self) -> Option<&CommentId> {
        self.parent_id
            .as_ref()
            .filter(|p| !p.0.trim().is_empty())
    }

    pub fn is_self_parented(&self) -> bool {
        self.parent() == Some(&self.id)
    }
}

/// A comment as submitted by the composer, before the backend assigned it an
/// id and a creation time
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    pub author_name: String,
    pub author_kind: AuthorKind,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.author_name)?;
        crate::validate_string(&self.body)?;
        if let Some(p) = &self.parent_id {
            crate::validate_string(&p.0)?;
        }
        for a in &self.attachments {
            a.validate()?;
        }
        if self.body.trim().is_empty() && self.attachments.is_empty() {
            return Err(Error::EmptyComment);
        }
        Ok(())
    }
}
