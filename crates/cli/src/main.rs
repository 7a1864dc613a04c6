//! semindex CLI - index a workspace and search it from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daemon::Indexer;
use embedding::EmbeddingProvider;
use semindex_core::ConfigSnapshot;
use std::path::PathBuf;

mod config;
mod logging;

#[derive(Parser)]
#[command(name = "semindex")]
#[command(about = "Semantic code index: scan, embed, and search a workspace")]
struct Cli {
  /// Workspace root to operate on (default: current directory)
  #[arg(short, long, global = true)]
  project: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a full scan and index the workspace once
  Index,
  /// Index the workspace, then watch for changes and keep the index fresh
  Watch,
  /// Search the index
  Search {
    query: String,
    #[arg(short, long, default_value = "10")]
    limit: usize,
  },
  /// Show the indexer's current lifecycle state and progress
  Status,
  /// List the definitions (functions, classes, headings) found in a file
  Definitions {
    /// Path to the file, relative to the project or absolute
    path: PathBuf,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  logging::init_cli_logging();
  let cli = Cli::parse();

  let project = cli.project.unwrap_or(std::env::current_dir()?).canonicalize()?;
  let config = config::load_for_project(&project)?;
  let cache_dir = config::cache_dir_for(&project);
  std::fs::create_dir_all(&cache_dir)?;

  let mut indexer = Indexer::initialize(project.clone(), cache_dir, config.clone()).context("failed to initialize indexer")?;

  match cli.command {
    Commands::Index => {
      let outcome = indexer.start_indexing().await?;
      println!(
        "chunked {} files, upserted {}, deleted {}, dropped {} batches",
        outcome.files_chunked, outcome.files_upserted, outcome.files_deleted, outcome.batches_dropped
      );
    }
    Commands::Watch => {
      let outcome = indexer.start_indexing().await?;
      println!("initial scan: {} files upserted", outcome.files_upserted);
      println!("watching for changes (ctrl-c to stop)");
      let mut active_config = config;
      loop {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        let reloaded = config::load_for_project(&project)?;
        if reloaded != active_config {
          active_config = reloaded;
          if indexer.apply_config(active_config.clone()).await? {
            println!("config changed: restarted and reindexed");
            continue;
          }
        }

        if let Some(outcome) = indexer.drain_pending().await? {
          println!(
            "delta: {} upserted, {} deleted, {} batches dropped",
            outcome.files_upserted, outcome.files_deleted, outcome.batches_dropped
          );
        }
      }
    }
    Commands::Search { query, limit } => {
      let vector = embed_query(&config, &query).await?;
      let results = indexer.search_index(&vector, limit).await?;
      for hit in results {
        println!("{:.3}  {}:{}-{}", hit.score, hit.payload.file_path, hit.payload.start_line, hit.payload.end_line);
      }
    }
    Commands::Status => {
      let status = indexer.current_status();
      println!("state: {:?}  processed: {}/{}", status.state, status.processed_items, status.total_items);
    }
    Commands::Definitions { path } => {
      let abs_path = if path.is_absolute() { path } else { std::env::current_dir()?.join(path) };
      print!("{}", indexer.definitions_for_file(&abs_path)?);
    }
  }

  indexer.dispose();
  Ok(())
}

/// Embeds a single search query through the same provider the indexer runs,
/// built fresh here since `Indexer` only exposes the vector-store search leg.
async fn embed_query(config: &ConfigSnapshot, query: &str) -> Result<Vec<f32>> {
  let provider = embedding::create_provider(config)?;
  let response = provider.embed_batch(std::slice::from_ref(&query.to_string())).await?;
  response.vectors.into_iter().next().context("embedder returned no vector for query")
}
