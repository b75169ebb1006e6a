use crate::{CommentId, DiscussionRef};

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid discussion reference {0:?}")]
    InvalidDiscussionRef(String),

    #[error("Comment has neither text nor attachments")]
    EmptyComment,

    #[error("Unknown discussion {0}")]
    UnknownDiscussion(DiscussionRef),

    #[error("Unknown parent comment {0}")]
    UnknownParent(CommentId),
}
