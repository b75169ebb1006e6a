use std::path::PathBuf;

use anyhow::Context;
use colloquy_client::{classify, PreviewStore, RenderOptions, Resolver};

mod render;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Prefix for storage keys that are relative asset paths
    #[structopt(long, env = "COLLOQUY_ASSET_ROOT", default_value = "/")]
    asset_root: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print a discussion file as an indented thread
    Render {
        /// JSON file holding a list of comments, or an object with a `comments` list
        file: PathBuf,

        /// Replies deeper than this are not indented any further
        #[structopt(long, env = "COLLOQUY_MAX_DEPTH", default_value = "6")]
        max_depth: usize,

        /// Spaces per level of depth
        #[structopt(long, default_value = "2")]
        indent: usize,
    },

    /// Show how an attachment would be rendered
    Classify {
        #[structopt(long)]
        content_type: Option<String>,

        #[structopt(long, default_value = "")]
        file_name: String,

        #[structopt(long, default_value = "")]
        preview: String,

        #[structopt(long, default_value = "")]
        storage_key: String,
    },

    /// Decode an inline preview payload into a file
    Open {
        /// The `data:` locator
        locator: String,

        #[structopt(short, long)]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let resolver = Resolver::new(&opt.asset_root);

    match opt.cmd {
        Command::Render {
            file,
            max_depth,
            indent,
        } => {
            let comments = render::load_discussion(&file)?;
            let opts = RenderOptions {
                max_depth,
                indent_width: indent,
            };
            print!("{}", render::render(&comments, &resolver, &opts));
        }
        Command::Classify {
            content_type,
            file_name,
            preview,
            storage_key,
        } => {
            let kind = classify(content_type.as_deref(), &file_name, &preview, &storage_key);
            let locator = resolver.resolve_locator(&preview, &storage_key);
            println!("kind: {}", kind.as_str());
            match locator.is_empty() {
                true => println!("locator: (none)"),
                false => println!("locator: {locator}"),
            }
        }
        Command::Open { locator, out } => {
            let store = PreviewStore::new();
            let handle = store
                .open(&locator)
                .context("decoding inline preview payload")?;
            let payload = handle
                .payload()
                .context("preview handle released before use")?;
            std::fs::write(&out, &payload.data)
                .with_context(|| format!("writing preview to {:?}", out))?;
            println!("{} ({} bytes) -> {}", payload.media_type, payload.data.len(), out.display());
            handle.close();
        }
    }

    Ok(())
}
