use std::collections::{btree_map, BTreeMap};

use async_trait::async_trait;
use colloquy_client::api::{
    Comment, CommentId, DiscussionRef, Discussions, Error, NewComment, Uuid,
};
use tokio::sync::mpsc;

/// In-memory stand-in for the backend that stores discussions
pub struct MockServer(BTreeMap<DiscussionRef, DbDiscussion>);

#[derive(Debug, Default)]
struct DbDiscussion {
    comments: Vec<Comment>,
    feeds: Vec<mpsc::UnboundedSender<Comment>>,
}

impl DbDiscussion {
    fn relay_comment(&mut self, c: &Comment) {
        self.feeds.retain_mut(|f| matches!(f.send(c.clone()), Ok(())));
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer(BTreeMap::new())
    }

    /// Makes `d` exist, without any comment
    pub fn open_discussion(&mut self, d: DiscussionRef) {
        self.0.entry(d).or_default();
    }

    /// Appends comments exactly as given, the way legacy records come back
    /// from storage: no validation and no id or time assignment
    pub fn seed(&mut self, d: DiscussionRef, comments: Vec<Comment>) {
        self.0.entry(d).or_default().comments.extend(comments);
    }

    /// Return the current number of comments in `d`
    pub fn test_num_comments(&self, d: &DiscussionRef) -> usize {
        self.0.get(d).map_or(0, |d| d.comments.len())
    }

    /// Subscribes to the comments submitted to `d` from now on
    pub fn comment_feed(
        &mut self,
        d: &DiscussionRef,
    ) -> Result<mpsc::UnboundedReceiver<Comment>, Error> {
        let db = self
            .0
            .get_mut(d)
            .ok_or_else(|| Error::UnknownDiscussion(d.clone()))?;
        let (sender, receiver) = mpsc::unbounded_channel();
        db.feeds.push(sender);
        Ok(receiver)
    }
}

#[async_trait]
impl Discussions for MockServer {
    async fn fetch_comments(&mut self, d: &DiscussionRef) -> Result<Vec<Comment>, Error> {
        self.0
            .get(d)
            .map(|db| db.comments.clone())
            .ok_or_else(|| Error::UnknownDiscussion(d.clone()))
    }

    async fn submit_comment(&mut self, d: &DiscussionRef, c: NewComment) -> Result<Comment, Error> {
        c.validate()?;
        let db = match self.0.entry(d.clone()) {
            btree_map::Entry::Occupied(db) => db.into_mut(),
            btree_map::Entry::Vacant(_) => return Err(Error::UnknownDiscussion(d.clone())),
        };
        if let Some(parent) = c.parent_id.as_ref().filter(|p| !p.0.trim().is_empty()) {
            if !db.comments.iter().any(|other| other.id == *parent) {
                return Err(Error::UnknownParent(parent.clone()));
            }
        }
        let stored = Comment {
            id: CommentId(Uuid::new_v4().to_string()),
            parent_id: c.parent_id,
            author_name: c.author_name,
            author_kind: c.author_kind,
            body: c.body,
            attachments: c.attachments,
            created_at: Some(chrono::Utc::now()),
        };
        tracing::debug!(discussion = %d, id = %stored.id, "stored comment");
        db.comments.push(stored.clone());
        db.relay_comment(&stored);
        Ok(stored)
    }
}
