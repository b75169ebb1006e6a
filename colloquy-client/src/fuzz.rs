#![cfg(test)]

use std::{collections::HashMap, panic::AssertUnwindSafe};

use crate::{
    api::{Attachment, Comment},
    thread::{tests::comment, ParentLink},
    *,
};

/// Turns fuzzer input into a discussion whose parent references often miss,
/// point back to their own comment, or loop
fn build_discussion(raw: &[(u8, Option<u8>, Option<i8>)]) -> Vec<Comment> {
    raw.iter()
        .enumerate()
        .map(|(i, (_, parent, minute))| {
            let parent = parent.map(|p| format!("c{}", p % 24)).unwrap_or_default();
            comment(&format!("c{i}"), &parent, minute.map(i64::from))
        })
        .collect()
}

fn check_layout(comments: &[Comment]) {
    let views = order(comments);
    let index = ThreadIndex::new(comments);

    // every comment exactly once
    let mut seen = views
        .iter()
        .map(|v| v.comment.id.as_str())
        .collect::<Vec<_>>();
    seen.sort_unstable();
    let mut expected = comments.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
    expected.sort_unstable();
    assert_eq!(seen, expected);

    let pos = views
        .iter()
        .enumerate()
        .map(|(i, v)| (v.comment.id.as_str(), i))
        .collect::<HashMap<_, _>>();

    // roots newest first
    let roots = comments
        .iter()
        .filter(|c| index.parent_link(c).is_root())
        .collect::<Vec<_>>();
    for a in &roots {
        for b in &roots {
            if a.created_at > b.created_at {
                assert!(pos[a.id.as_str()] < pos[b.id.as_str()]);
            }
        }
    }

    for (i, v) in views.iter().enumerate() {
        // depth agrees with the standalone walk
        assert_eq!(v.depth, index.reply_depth(v.comment));
        assert_eq!(
            v.has_children,
            views.get(i + 1).map_or(false, |n| n.depth > v.depth)
        );
        if v.depth == 0 {
            continue;
        }

        // a reply sits right inside its parent's subtree: the closest
        // shallower row above it is its parent, one level up
        let parent = match index.parent_link(v.comment) {
            ParentLink::Resolved(p) => p,
            l => panic!("reply {:?} has parent link {l:?}", v.comment.id),
        };
        let above = views[..i]
            .iter()
            .rev()
            .find(|u| u.depth < v.depth)
            .expect("reply without a row above it");
        assert_eq!(above.comment.id, parent.id);
        assert_eq!(above.depth + 1, v.depth);

        // and older siblings come first
        let previous_sibling = views[..i]
            .iter()
            .rev()
            .take_while(|u| u.depth >= v.depth)
            .filter(|u| u.depth == v.depth)
            .next();
        if let Some(s) = previous_sibling {
            assert!(s.comment.created_at <= v.comment.created_at);
        }
    }
}

#[test]
fn order_properties() {
    bolero::check!()
        .with_type::<Vec<(u8, Option<u8>, Option<i8>)>>()
        .for_each(|raw| check_layout(&build_discussion(raw)));
}

#[test]
fn classify_is_deterministic() {
    bolero::check!()
        .with_type::<(Option<String>, String, String, String)>()
        .for_each(|(content_type, name, preview, key)| {
            let first = classify(content_type.as_deref(), name, preview, key);
            let second = classify(content_type.as_deref(), name, preview, key);
            assert_eq!(first, second);
        });
}

#[test]
fn resolved_locators_open() {
    let store = AssertUnwindSafe(PreviewStore::new());
    bolero::check!()
        .with_type::<(String, String, bool)>()
        .for_each(|(preview, key, as_data_url)| {
            let key = match as_data_url {
                true => format!("data:{key}"),
                false => key.clone(),
            };
            let locator = resolve_locator(preview, &key);
            if locator.is_empty() {
                return;
            }
            let url = store.to_openable_url(&locator);
            assert!(!url.as_str().is_empty());
            url.close();
            assert_eq!(store.live(), 0);
        });
}

#[test]
fn resolve_never_panics() {
    let resolver = Resolver::new("/assets");
    bolero::check!()
        .with_type::<(String, String, Option<String>, Option<String>)>()
        .cloned()
        .for_each(|(file_name, storage_key, content_type, preview)| {
            let a = Attachment {
                file_name,
                storage_key,
                declared_content_type: content_type,
                inline_preview: preview,
            };
            let r = resolver.resolve(&a);
            assert!(!r.display_name.is_empty());
        });
}
