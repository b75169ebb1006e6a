use crate::{
    api::{Attachment, AuthorKind, Comment, CommentId, DiscussionRef, Discussions, Error, NewComment},
    attachment::{ResolvedAttachment, Resolver},
};

/// A comment being composed, owned by the composer until it is submitted or
/// dropped
///
/// It never shows up in an ordered discussion: once submitted, the
/// discussion is refetched and the stored comment takes its place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    discussion: DiscussionRef,
    parent_id: Option<CommentId>,
    author_name: String,
    author_kind: AuthorKind,
    body: String,
    attachments: Vec<Attachment>,
}

impl Draft {
    pub fn new(discussion: DiscussionRef, author_name: String, author_kind: AuthorKind) -> Draft {
        Draft {
            discussion,
            parent_id: None,
            author_name,
            author_kind,
            body: String::new(),
            attachments: Vec::new(),
        }
    }

    pub fn reply_to(
        discussion: DiscussionRef,
        parent: &Comment,
        author_name: String,
        author_kind: AuthorKind,
    ) -> Draft {
        Draft {
            parent_id: Some(parent.id.clone()),
            ..Draft::new(discussion, author_name, author_kind)
        }
    }

    pub fn discussion(&self) -> &DiscussionRef {
        &self.discussion
    }

    pub fn parent_id(&self) -> Option<&CommentId> {
        self.parent_id.as_ref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: String) {
        self.body = body;
    }

    pub fn attach(&mut self, a: Attachment) {
        self.attachments.push(a);
    }

    pub fn remove_attachment(&mut self, idx: usize) -> Option<Attachment> {
        (idx < self.attachments.len()).then(|| self.attachments.remove(idx))
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Staged attachments as the composer shows them before sending
    pub fn staged(&self, resolver: &Resolver) -> Vec<ResolvedAttachment<'_>> {
        self.attachments.iter().map(|a| resolver.resolve(a)).collect()
    }

    /// Consumes the draft into a validated comment ready for submission
    pub fn submit(self) -> Result<(DiscussionRef, NewComment), Error> {
        let new = NewComment {
            parent_id: self.parent_id,
            author_name: self.author_name,
            author_kind: self.author_kind,
            body: self.body,
            attachments: self.attachments,
        };
        new.validate()?;
        Ok((self.discussion, new))
    }

    /// Submits the draft to `to`, returning the stored comment
    pub async fn send<D>(self, to: &mut D) -> Result<Comment, Error>
    where
        D: Discussions + Send + ?Sized,
    {
        let (discussion, new) = self.submit()?;
        tracing::debug!(%discussion, attachments = new.attachments.len(), "submitting comment");
        to.submit_comment(&discussion, new).await
    }
}
