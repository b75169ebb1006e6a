use std::{fmt::Write, path::Path};

use anyhow::Context;
use colloquy_client::{
    api::{AuthorKind, Comment},
    Discussion, RenderOptions, Resolver,
};

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DiscussionFile {
    Bare(Vec<Comment>),
    Wrapped { comments: Vec<Comment> },
}

pub fn load_discussion(path: &Path) -> anyhow::Result<Vec<Comment>> {
    let contents =
        std::fs::read(path).with_context(|| format!("reading discussion file {:?}", path))?;
    let file: DiscussionFile = serde_json::from_slice(&contents)
        .with_context(|| format!("parsing discussion file {:?}", path))?;
    Ok(match file {
        DiscussionFile::Bare(comments) => comments,
        DiscussionFile::Wrapped { comments } => comments,
    })
}

pub fn render(comments: &[Comment], resolver: &Resolver, opts: &RenderOptions) -> String {
    let discussion = Discussion::build(comments, resolver);
    let mut out = String::new();
    for e in discussion.iter() {
        let pad = " ".repeat(e.indent(opts));
        let c = e.comment();
        let side = match c.author_kind {
            AuthorKind::PrimaryParty => "",
            AuthorKind::CounterParty => " (client)",
        };
        let author = match c.author_name.trim().is_empty() {
            true => "unknown author",
            false => c.author_name.trim(),
        };
        let date = c
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| String::from("unknown date"));
        let overflow = match e.overflows(opts) {
            true => format!(" [depth {}]", e.view.depth),
            false => String::new(),
        };
        // writing into a String cannot fail
        let _ = writeln!(out, "{pad}{author}{side}, {date}{overflow}");
        for line in c.body.lines() {
            let _ = writeln!(out, "{pad}  {line}");
        }
        for a in &e.attachments {
            let locator: &str = match a.locator.is_empty() {
                true => "no preview",
                false => &a.locator,
            };
            let _ = writeln!(
                out,
                "{pad}  [{}] {} <{}>",
                a.kind.as_str(),
                a.display_name,
                locator
            );
        }
    }
    let s = &discussion.summary;
    if s.orphans + s.self_references + s.cycle_bound > 0 {
        tracing::info!(
            orphans = s.orphans,
            self_references = s.self_references,
            cycle_bound = s.cycle_bound,
            "some comments had broken parent references and are shown at top level"
        );
    }
    out
}
