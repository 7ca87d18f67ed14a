// Colored terminal output for the overlap graph and status display.
//
// This module handles all terminal-specific formatting: colors, tables,
// summary lines. The main.rs display calls delegate here.

use colored::Colorize;

use crate::db::models::FarmGraphData;
use crate::output::truncate_chars;

/// Display the farm overlap graph as an edge table plus a node summary.
pub fn display_graph(graph: &FarmGraphData, min_score: f64) {
    if graph.edges.is_empty() {
        println!("No edges at or above score {min_score:.2}. Run `driftnet recompute` first.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Farm Overlap Graph ({} actors, {} edges) ===",
            graph.nodes.len(),
            graph.edges.len()
        )
        .bold()
    );
    println!();

    // Header
    println!(
        "  {:>4}  {:<24} {:<24} {:>7} {:>8} {:>7}",
        "Rank".dimmed(),
        "Actor A".dimmed(),
        "Actor B".dimmed(),
        "Shared".dimmed(),
        "Jaccard".dimmed(),
        "Score".dimmed(),
    );
    println!("  {}", "-".repeat(80).dimmed());

    for (i, edge) in graph.edges.iter().enumerate() {
        let score_str = format!("{:>7.4}", edge.overlap_score);
        let score_colored = if edge.overlap_score >= 0.7 {
            score_str.red().bold().to_string()
        } else if edge.overlap_score >= 0.5 {
            score_str.yellow().to_string()
        } else {
            score_str.normal().to_string()
        };

        println!(
            "  {:>4}. {:<24} {:<24} {:>7} {:>8.4} {}",
            i + 1,
            truncate_chars(&edge.actor_a, 24),
            truncate_chars(&edge.actor_b, 24),
            edge.shared_suspects,
            edge.jaccard,
            score_colored,
        );
    }

    println!();
    let strong = graph
        .edges
        .iter()
        .filter(|e| e.overlap_score >= 0.7)
        .count();
    if strong > 0 {
        println!(
            "  {} {} edge(s) with overlap score ≥ 0.70 — likely shared farms",
            "!!".red().bold(),
            strong
        );
    }
}

/// Display database counters and the last recompute time.
pub fn display_status(
    db_path: &str,
    relations: i64,
    flagged: i64,
    edges: i64,
    last_recompute: Option<&str>,
) {
    println!("\n{}", "=== Driftnet Status ===".bold());
    println!("  Database:          {db_path}");
    println!("  Follower relations: {relations}");
    println!("  Flagged followers:  {flagged}");
    println!("  Overlap edges:      {edges}");
    match last_recompute {
        Some(ts) => println!("  Last recompute:     {ts}"),
        None => println!("  Last recompute:     {}", "never".dimmed()),
    }
}
