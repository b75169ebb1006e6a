mod attachment;
pub use attachment::Attachment;

mod comment;
pub use comment::{AuthorKind, Comment, CommentId, NewComment};

mod discussion;
pub use discussion::{DiscussionKind, DiscussionRef, Discussions};

mod error;
pub use error::Error;

pub mod time;
pub use time::Time;

pub use uuid::{uuid, Uuid};

// Strings are stored and shown as-is, except that null bytes are refused: the
// surrounding application hands them to backends that truncate at the first one.
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(s.to_string())),
        false => Ok(()),
    }
}
