//! Confab - Conversational Agent Core
//!
//! Main entry point for the CLI application.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use confab::tools::InMemoryIndex;
use confab::{Agent, Config, Repl};

/// Confab - conversational agent with retrieval and web search
#[derive(Parser, Debug)]
#[command(name = "confab")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chat model identifier
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Directory of plain-text corpus files to index
    #[arg(long, short = 'c')]
    corpus: Option<std::path::PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.model.name = model.clone();
    }

    if let Some(ref corpus) = args.corpus {
        config.retrieval.corpus_dir = corpus.clone();
    }

    if args.debug {
        config.agent.debug = true;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if config.agent.debug { "confab=debug" } else { "confab=info" })
        }))
        .with_writer(std::io::stderr)
        .init();

    let index = load_corpus(&config)?;
    let agent = Arc::new(Agent::new(config, Arc::new(index))?);

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let conversation_id = uuid::Uuid::new_v4().to_string();
        let answer = agent.submit_turn(&conversation_id, &prompt).await?;
        println!("{}", answer);
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::new(agent);
    repl.run().await?;

    Ok(())
}

/// Load plain-text corpus files into the in-memory index
fn load_corpus(config: &Config) -> anyhow::Result<InMemoryIndex> {
    let mut index = InMemoryIndex::new();
    let dir = &config.retrieval.corpus_dir;

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "corpus directory not found, retrieval will be empty");
        return Ok(index);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_text = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("md")
        );
        if path.is_file() && is_text {
            let text = fs::read_to_string(&path)?;
            index.add_document(path.display().to_string(), text);
        }
    }

    info!(documents = index.len(), "corpus indexed");
    Ok(index)
}
