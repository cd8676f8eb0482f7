use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use repodoc_core::config::{Config, Settings};
use repodoc_core::source::DirectorySource;
use repodoc_core::SearchHit;
use repodoc_embed::get_default_embedder;
use repodoc_hybrid::{HybridSearchEngine, SearchTools, SectionRecord};

#[derive(Parser, Debug)]
#[command(name = "repodoc", about = "Hybrid lexical + semantic search over a course repository")]
struct Cli {
    /// Repository checkout to index (overrides `corpus.root`)
    #[arg(long, env = "REPODOC_ROOT")]
    root: Option<PathBuf>,

    /// Results requested from each index (overrides `retrieval.k`)
    #[arg(long)]
    k: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one query and print the fused sections
    Search {
        query: String,
        /// Print the records an agent tool call would receive
        #[arg(long)]
        json: bool,
    },
    /// Ask questions interactively; type `stop` to exit
    Chat,
    /// Print document and chunk counts
    Stats,
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let engine = build_engine(&settings)?;

    match cli.command {
        Command::Search { query, json } => {
            let hits = engine.search(&query)?;
            if json {
                let records: Vec<SectionRecord> = hits.iter().map(SectionRecord::from).collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_hits(&hits);
            }
        }
        Command::Chat => chat(&engine)?,
        Command::Stats => {
            let stats = engine.stats();
            println!("documents:   {}", stats.documents);
            println!("chunks:      {}", stats.chunks);
            println!("  learning:   {}", stats.learning);
            println!("  assignment: {}", stats.assignment);
            println!("embedder:    {}", engine.embedder().id());
        }
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let config = Config::load().context("loading configuration")?;
    let mut settings = config.settings().context("invalid configuration")?;
    if let Some(root) = &cli.root {
        settings.corpus.root = root.to_string_lossy().into_owned();
    }
    if let Some(k) = cli.k {
        settings.retrieval.k = k;
    }
    settings.validate()?;
    Ok(settings)
}

fn build_engine(settings: &Settings) -> anyhow::Result<HybridSearchEngine> {
    let source = DirectorySource::from_config(&settings.corpus);
    let documents = source.load().with_context(|| format!("reading corpus under {}", source.root().display()))?;
    info!(root = %source.root().display(), documents = documents.len(), "corpus loaded");

    let embedder = get_default_embedder(&settings.embedding)?;
    let progress = ProgressBar::new(0);
    progress.set_style(ProgressStyle::with_template("{spinner} embedding [{bar:40}] {pos}/{len} chunks ({eta})")?.progress_chars("=> "));
    let engine = HybridSearchEngine::build_with_progress(&documents, embedder, settings, &progress).context("building indexes")?;
    Ok(engine)
}

fn chat(engine: &HybridSearchEngine) -> anyhow::Result<()> {
    let tools = SearchTools::new(engine);
    println!("Type 'stop' to exit the program.\n");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Your question: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let question = line?;
        let question = question.trim();
        if question.eq_ignore_ascii_case("stop") {
            println!("Goodbye!");
            break;
        }
        if question.is_empty() {
            continue;
        }
        let records = tools.hybrid_search(question)?;
        if records.is_empty() {
            println!("No matching sections.\n");
            continue;
        }
        for (i, r) in records.iter().enumerate() {
            println!("[{}] {} :: {} ({})", i + 1, r.filename, r.title, r.content_type);
            println!("{}\n", r.section);
        }
    }
    Ok(())
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No results.");
        return;
    }
    for (i, h) in hits.iter().enumerate() {
        println!("{:>2}. [{} {:.3}] {} :: {}", i + 1, h.source, h.score, h.chunk.filename(), h.chunk.title());
    }
}
