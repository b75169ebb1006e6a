use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
};

use crate::api::Comment;

/// One row of a discussion laid out for linear rendering
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommentView<'a> {
    pub comment: &'a Comment,

    /// Parent hops from the root this comment was reached from
    pub depth: usize,

    /// Whether the next rows are this comment's replies
    pub has_children: bool,
}

/// How a comment's parent reference resolves within its discussion
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParentLink<'a> {
    /// No parent reference
    Root,
    /// The comment names itself as its parent
    SelfReference,
    /// The parent is not part of the discussion
    Dangling,
    Resolved(&'a Comment),
}

impl<'a> ParentLink<'a> {
    pub fn is_root(&self) -> bool {
        !matches!(self, ParentLink::Resolved(_))
    }
}

/// `id -> comment` lookup over one discussion
///
/// With duplicated ids, the last comment bearing the id wins.
pub struct ThreadIndex<'a> {
    comments: &'a [Comment],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> ThreadIndex<'a> {
    pub fn new(comments: &'a [Comment]) -> ThreadIndex<'a> {
        ThreadIndex {
            comments,
            by_id: comments
                .iter()
                .enumerate()
                .map(|(i, c)| (c.id.as_str(), i))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Comment> {
        self.by_id.get(id).map(|&i| &self.comments[i])
    }

    /// Position in the indexed slice of the comment `c` replies to
    fn parent_position(&self, c: &Comment) -> Option<usize> {
        let p = c.parent()?;
        if *p == c.id {
            return None;
        }
        self.by_id.get(p.as_str()).copied()
    }

    pub fn parent_link(&self, c: &Comment) -> ParentLink<'a> {
        match c.parent() {
            None => ParentLink::Root,
            Some(p) if *p == c.id => ParentLink::SelfReference,
            Some(_) => match self.parent_position(c) {
                Some(i) => ParentLink::Resolved(&self.comments[i]),
                None => ParentLink::Dangling,
            },
        }
    }

    /// Number of parent hops from `c` to its root, computed without ordering
    /// the whole discussion
    ///
    /// A chain that loops back on itself never reaches a root and gets depth
    /// 0, which is also where `order` places such comments.
    pub fn reply_depth(&self, c: &Comment) -> usize {
        let mut seen = HashSet::new();
        let mut hops = 0;
        let mut current = c;
        while let Some(i) = self.parent_position(current) {
            if !seen.insert(i) {
                return 0;
            }
            hops += 1;
            current = &self.comments[i];
        }
        hops
    }
}

/// Lays out a flat discussion root-first and depth-first
///
/// Roots are the comments without a resolvable parent, newest first. Replies
/// follow their parent oldest first, each one immediately followed by its own
/// replies. Comments whose parents form a cycle unreachable from any root are
/// appended at the end as top-level rows, newest first. Every input comment
/// appears exactly once, and ties keep their input order.
pub fn order(comments: &[Comment]) -> Vec<CommentView<'_>> {
    if comments.len() <= 1 {
        return comments
            .iter()
            .map(|comment| CommentView {
                comment,
                depth: 0,
                has_children: false,
            })
            .collect();
    }

    let index = ThreadIndex::new(comments);
    let mut roots = Vec::new();
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, c) in comments.iter().enumerate() {
        match index.parent_position(c) {
            Some(parent) => children.entry(parent).or_default().push(i),
            None => roots.push(i),
        }
    }
    roots.sort_by_key(|&i| Reverse(comments[i].created_at));
    for group in children.values_mut() {
        group.sort_by_key(|&i| comments[i].created_at);
    }

    let mut visited = vec![false; comments.len()];
    let mut res = Vec::with_capacity(comments.len());
    for &root in &roots {
        let mut stack = vec![(root, 0)];
        while let Some((i, depth)) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            res.push(CommentView {
                comment: &comments[i],
                depth,
                has_children: false,
            });
            if let Some(group) = children.get(&i) {
                // reversed so that the oldest reply is popped first
                stack.extend(
                    group
                        .iter()
                        .rev()
                        .filter(|&&c| !visited[c])
                        .map(|&c| (c, depth + 1)),
                );
            }
        }
    }

    if res.len() < comments.len() {
        let mut rest = (0..comments.len())
            .filter(|&i| !visited[i])
            .collect::<Vec<_>>();
        rest.sort_by_key(|&i| Reverse(comments[i].created_at));
        tracing::warn!(
            num_comments = rest.len(),
            "comment parents form a cycle, showing them as top-level comments"
        );
        for i in rest {
            if !visited[i] {
                visited[i] = true;
                res.push(CommentView {
                    comment: &comments[i],
                    depth: 0,
                    has_children: false,
                });
            }
        }
    }

    for i in 1..res.len() {
        if res[i].depth > res[i - 1].depth {
            res[i - 1].has_children = true;
        }
    }
    res
}
