use chrono::{Duration, TimeZone, Utc};
use colloquy_api::{Attachment, AuthorKind, Comment, CommentId};
use rand::{rngs::StdRng, Rng, SeedableRng};

const COMMENT_WORD_COUNT: usize = 12;
const MAX_ATTACHMENTS: usize = 3;
const SPAN_MINUTES: i64 = 60 * 24 * 30;
const AUTHORS: &[(&str, AuthorKind)] = &[
    ("Support", AuthorKind::PrimaryParty),
    ("Account manager", AuthorKind::PrimaryParty),
    ("Client", AuthorKind::CounterParty),
    ("Client accountant", AuthorKind::CounterParty),
];
const BROKEN_TIMESTAMPS: &[&str] = &["", "yesterday", "2023-02-30", "NaN"];

#[derive(structopt::StructOpt)]
struct Opt {
    /// Number of comments to generate, on top of a two-comment parent cycle
    #[structopt(long, default_value = "40")]
    comments: usize,

    #[structopt(long, default_value = "0")]
    seed: u64,
}

fn words(rng: &mut StdRng, n: usize) -> String {
    lipsum::lipsum_words_from_seed(n, rng.gen())
}

fn gen_attachment(rng: &mut StdRng, i: usize) -> Attachment {
    let name = words(rng, 1).to_lowercase();
    let name = name.trim_end_matches(|c: char| !c.is_alphanumeric());
    match rng.gen_range(0..7) {
        // stored screenshot
        0 => Attachment::stored(
            format!("{name}.png"),
            format!("uploads/{i}/{name}.png"),
            Some(String::from("image/png")),
        ),
        // pdf recognizable only by its name
        1 => Attachment::stored(format!("{name}.PDF"), format!("uploads/{i}/{name}"), None),
        // freshly staged upload
        2 => Attachment::staged(
            format!("{name}.gif"),
            Some(String::from("image/gif")),
            String::from("data:image/gif;base64,R0lGODlhAQABAAAAACw="),
        ),
        // legacy record storing the payload itself
        3 => Attachment::stored(
            String::new(),
            String::from("data:application/pdf;base64,JVBERi0xLjQK"),
            None,
        ),
        4 => Attachment::stored(
            String::new(),
            format!("https://files.example.com/{name}.webp?sig=abc#preview"),
            Some(String::from("application/octet-stream")),
        ),
        5 => Attachment::stored(format!("{name}.xlsx"), format!("uploads/{i}/{name}"), None),
        _ => Attachment::stored(String::new(), format!("{name}-{i}"), None),
    }
}

fn gen_parent(rng: &mut StdRng, i: usize, num_comments: usize) -> String {
    match rng.gen_range(0..100) {
        0..=29 => String::new(),
        30..=79 if i > 0 => format!("c{}", rng.gen_range(0..i)),
        80..=87 => format!("deleted-{}", rng.gen_range(0..1000)),
        88..=92 => format!("c{i}"),
        _ => format!("c{}", rng.gen_range(0..num_comments)),
    }
}

fn gen_discussion(num_comments: usize, seed: u64) -> Vec<serde_json::Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc
        .with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
        .single()
        .expect("start date is valid");

    let mut comments = (0..num_comments)
        .map(|i| {
            let (author, kind) = AUTHORS[rng.gen_range(0..AUTHORS.len())];
            let num_attachments = rng.gen_range(0..=MAX_ATTACHMENTS);
            Comment {
                id: CommentId(format!("c{i}")),
                parent_id: Some(CommentId(gen_parent(&mut rng, i, num_comments))),
                author_name: String::from(author),
                author_kind: kind,
                body: words(&mut rng, COMMENT_WORD_COUNT),
                attachments: (0..num_attachments)
                    .map(|_| gen_attachment(&mut rng, i))
                    .collect(),
                created_at: Some(start + Duration::minutes(rng.gen_range(0..SPAN_MINUTES))),
            }
        })
        .collect::<Vec<_>>();

    // a reply loop no root leads to
    for (id, parent) in [("loop-a", "loop-b"), ("loop-b", "loop-a")] {
        comments.push(Comment {
            id: CommentId::from(id),
            parent_id: Some(CommentId::from(parent)),
            author_name: String::from("Client"),
            author_kind: AuthorKind::CounterParty,
            body: words(&mut rng, COMMENT_WORD_COUNT),
            attachments: Vec::new(),
            created_at: Some(start),
        });
    }

    let mut values = comments
        .iter()
        .map(|c| serde_json::to_value(c).expect("serializing comment"))
        .collect::<Vec<_>>();
    for v in values.iter_mut() {
        if rng.gen_range(0..10) == 0 {
            let broken = BROKEN_TIMESTAMPS[rng.gen_range(0..BROKEN_TIMESTAMPS.len())];
            v["createdAt"] = serde_json::Value::from(broken);
        }
    }

    values
}

fn main() {
    let opt = <Opt as structopt::StructOpt>::from_args();
    let values = gen_discussion(opt.comments, opt.seed);
    println!(
        "{}",
        serde_json::to_string_pretty(&values).expect("serializing discussion")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_discussion_loads_back() {
        let values = gen_discussion(200, 7);
        assert_eq!(values, gen_discussion(200, 7));

        let comments: Vec<Comment> =
            serde_json::from_value(serde_json::Value::from(values)).unwrap();
        assert_eq!(comments.len(), 202);
        assert!(comments.iter().all(|c| !c.body.trim().is_empty()));
        assert!(comments.iter().any(|c| c.created_at.is_none()));
        assert!(comments.iter().any(|c| c.is_self_parented()));
        assert!(comments
            .iter()
            .any(|c| c.parent().map_or(false, |p| p.as_str().starts_with("deleted-"))));
        assert_eq!(
            comments
                .iter()
                .filter(|c| c.id.as_str().starts_with("loop-"))
                .count(),
            2
        );
    }
}
