mod attachment;
pub use attachment::{classify, resolve_locator, AttachmentKind, ResolvedAttachment, Resolver};

mod discussion;
pub use discussion::{Discussion, DiscussionEntry, DiscussionSummary, RenderOptions};

mod draft;
pub use draft::Draft;

pub mod preview;
pub use preview::{OpenableUrl, PreviewHandle, PreviewStore};

mod thread;
pub use thread::{order, CommentView, ParentLink, ThreadIndex};

#[cfg(test)]
mod fuzz;

pub mod api {
    pub use colloquy_api::*;
}
