use crate::{
    api::Comment,
    attachment::{ResolvedAttachment, Resolver},
    thread::{order, CommentView, ParentLink, ThreadIndex},
};

/// How deep replies are indented before they stop moving right
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderOptions {
    pub max_depth: usize,
    /// Columns (or margin units) per level of depth
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            max_depth: 6,
            indent_width: 2,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscussionEntry<'a> {
    pub view: CommentView<'a>,
    pub attachments: Vec<ResolvedAttachment<'a>>,
}

impl<'a> DiscussionEntry<'a> {
    pub fn comment(&self) -> &'a Comment {
        self.view.comment
    }

    pub fn indent(&self, opts: &RenderOptions) -> usize {
        self.view.depth.min(opts.max_depth) * opts.indent_width
    }

    /// Whether this entry is deeper than its indentation shows
    pub fn overflows(&self, opts: &RenderOptions) -> bool {
        self.view.depth > opts.max_depth
    }
}

/// How the parent references of a discussion resolved
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DiscussionSummary {
    /// Comments without a parent reference
    pub roots: usize,
    /// Comments attached under a parent that leads back to a root
    pub replies: usize,
    /// Comments whose parent is missing from the discussion
    pub orphans: usize,
    pub self_references: usize,
    /// Comments whose parent chain loops without reaching a root
    pub cycle_bound: usize,
}

/// A discussion ready for rendering: comments in display order, each with
/// its attachments resolved
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Discussion<'a> {
    pub entries: Vec<DiscussionEntry<'a>>,
    pub summary: DiscussionSummary,
}

impl<'a> Discussion<'a> {
    pub fn build(comments: &'a [Comment], resolver: &Resolver) -> Discussion<'a> {
        let index = ThreadIndex::new(comments);
        let views = order(comments);
        let mut summary = DiscussionSummary::default();
        for v in &views {
            match index.parent_link(v.comment) {
                ParentLink::Root => summary.roots += 1,
                ParentLink::SelfReference => summary.self_references += 1,
                ParentLink::Dangling => summary.orphans += 1,
                // only comments whose parent chain never reaches a root are
                // laid out at the top level despite having a parent
                ParentLink::Resolved(_) if v.depth == 0 => summary.cycle_bound += 1,
                ParentLink::Resolved(_) => summary.replies += 1,
            }
        }
        tracing::debug!(
            num_comments = comments.len(),
            roots = summary.roots,
            replies = summary.replies,
            orphans = summary.orphans,
            self_references = summary.self_references,
            cycle_bound = summary.cycle_bound,
            "reconstructed discussion"
        );

        let entries = views
            .into_iter()
            .map(|view| DiscussionEntry {
                attachments: view
                    .comment
                    .attachments
                    .iter()
                    .map(|a| resolver.resolve(a))
                    .collect(),
                view,
            })
            .collect();
        Discussion { entries, summary }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscussionEntry<'a>> {
        self.entries.iter()
    }
}
