use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use driftnet::config::Config;
use driftnet::db::models::ImportFile;
use driftnet::db::Database;
use driftnet::engine::{
    FarmGraph, RecomputeParams, DEFAULT_GRAPH_LIMIT, DEFAULT_LIMIT_PAIRS, DEFAULT_MIN_SCORE,
    DEFAULT_MIN_SHARED_SUSPECTS,
};
use driftnet::scoring::DefaultScoring;

/// Driftnet: follower-farm overlap detection.
///
/// Finds influencer accounts that share an unusually large set of
/// flagged-inauthentic followers and materializes the result as a weighted
/// similarity graph.
#[derive(Parser)]
#[command(name = "driftnet", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Import actor-follower relations and follower flags from a JSON file
    Import {
        /// Path to a JSON file with `relations` and `flags` arrays
        file: String,
    },

    /// Recompute the overlap graph for a set of actors
    Recompute {
        /// Actor ids to pair (must be unique). Omit to use every actor in
        /// the relation table.
        actor_ids: Vec<String>,

        /// Discard pairs sharing fewer suspects than this
        #[arg(long, default_value_t = DEFAULT_MIN_SHARED_SUSPECTS)]
        min_shared: u32,

        /// Keep at most this many top-ranked pairs
        #[arg(long, default_value_t = DEFAULT_LIMIT_PAIRS)]
        limit_pairs: usize,
    },

    /// Show the overlap graph above a score threshold
    Graph {
        /// Only include edges at or above this overlap score
        #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
        min_score: f64,

        /// Maximum number of edges to return
        #[arg(long, default_value_t = DEFAULT_GRAPH_LIMIT)]
        limit: u32,

        /// Emit the {nodes, edges} payload as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show database stats and the last recompute time
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("driftnet=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing Driftnet database...");
            let db = driftnet::db::initialize(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: load input data with `driftnet import <file.json>`");
        }

        Commands::Import { file } => {
            let db = driftnet::db::open(&config.db_path)?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file: {file}"))?;
            let input: ImportFile = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse import file: {file}"))?;

            println!(
                "Importing {} relations and {} flags...",
                input.relations.len(),
                input.flags.len()
            );

            for relation in &input.relations {
                db.insert_relation(&relation.actor_id, &relation.follower_id)
                    .await?;
            }
            for flag in &input.flags {
                db.set_flag(&flag.follower_id, flag.is_suspect).await?;
            }

            println!("{}", "Import complete.".bold());
        }

        Commands::Recompute {
            actor_ids,
            min_shared,
            limit_pairs,
        } => {
            let db = driftnet::db::open(&config.db_path)?;

            let actor_ids = if actor_ids.is_empty() {
                let all = db.list_actor_ids().await?;
                println!("No actor ids given — pairing all {} actors.", all.len());
                all
            } else {
                actor_ids
            };

            let engine = FarmGraph::new(db, Arc::new(DefaultScoring::default()));
            let mut params = RecomputeParams::new(actor_ids);
            params.min_shared_suspects = min_shared;
            params.limit_pairs = limit_pairs;
            params.concurrency = config.concurrency;
            params.max_actors = config.max_actors;
            params.deadline = Duration::from_secs(config.deadline_secs);

            let summary = engine.recompute(params).await?;

            println!("\n{}", "Recompute complete.".bold());
            println!("  Edges written: {}", summary.edge_count);
            println!("  Updated at:    {}", summary.updated_at);
        }

        Commands::Graph {
            min_score,
            limit,
            json,
        } => {
            let db = driftnet::db::open(&config.db_path)?;
            let engine = FarmGraph::new(db, Arc::new(DefaultScoring::default()));

            let graph = engine.get_graph(min_score, limit).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&graph)?);
            } else {
                driftnet::output::terminal::display_graph(&graph, min_score);
            }
        }

        Commands::Status => {
            let db = driftnet::db::open(&config.db_path)?;
            let relations = db.count_relations().await?;
            let flagged = db.count_flagged().await?;
            let edges = db.count_edges().await?;
            let last = db.last_recompute_at().await?;
            driftnet::output::terminal::display_status(
                &config.db_path,
                relations,
                flagged,
                edges,
                last.as_deref(),
            );
        }
    }

    Ok(())
}
