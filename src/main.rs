// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PlantVision CLI
//!
//! Analyze plant photos and manage the local analysis history.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use plantvision::analysis::{Analysis, CareTip, TipSeverity};
use plantvision::catalog::PlantCategory;
use plantvision::history::{HistoryStats, HistoryStore};
use plantvision::{AppConfig, PlantVision, PlantVisionError, Result};

/// PlantVision CLI - plant identification and health check
#[derive(Parser, Debug)]
#[command(name = "plantvision")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Identify plants from photos and keep a local analysis history", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "plantvision.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a plant photo
    Analyze {
        /// Image file to analyze
        image: PathBuf,

        /// Record the result in history
        #[arg(long)]
        save: bool,

        /// Skip the simulated inference delay
        #[arg(long)]
        instant: bool,
    },

    /// History operations
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// List plants in the catalog
    Catalog {
        /// Only show this category
        #[arg(short = 'k', long)]
        category: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent analyses
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Show one analysis in full
    Show {
        id: String,
    },

    /// Delete one analysis
    Delete {
        id: String,
    },

    /// Clear all history
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Export history as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace history with a previously exported file
    Import {
        input: PathBuf,
    },

    /// Show history statistics
    Stats,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "plantvision.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Analyze { image, save, instant } => {
            run_analyze(config, &image, save, instant, json).await
        }
        Commands::History { action } => run_history_command(config, action, json),
        Commands::Catalog { category } => run_catalog(config, category.as_deref(), json),
        Commands::Config { action } => run_config_command(config, action, &cli.config),
    }
}

/// Analyze a single photo
async fn run_analyze(
    mut config: AppConfig,
    image: &Path,
    save: bool,
    instant: bool,
    json: bool,
) -> Result<()> {
    if instant {
        config.classifier.min_delay_ms = 0;
        config.classifier.jitter_ms = 0;
    }
    let app = PlantVision::from_config(config)?;

    let data = std::fs::read(image)?;
    info!("Analyzing {:?} ({} bytes)", image, data.len());
    let analysis = app.analyze(&data, save).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_analysis(&analysis));
        if save {
            println!("\nSaved to history as {}", analysis.id);
        }
    }
    Ok(())
}

/// Run history commands
fn run_history_command(config: AppConfig, action: HistoryCommands, json: bool) -> Result<()> {
    let app = PlantVision::from_config(config)?;
    let history = &app.history;

    match action {
        HistoryCommands::List { count } => {
            let entries: Vec<Analysis> = history.list().into_iter().take(count).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("Recent analyses ({} shown):", entries.len());
                for entry in entries {
                    println!(
                        "  {}  {}  {} ({}) {:.0}%  [{}]",
                        entry.timestamp.format("%Y-%m-%d %H:%M"),
                        entry.id,
                        entry.common_name,
                        entry.scientific_name,
                        entry.confidence * 100.0,
                        entry.health_status,
                    );
                }
            }
        }
        HistoryCommands::Show { id } => {
            let entry = find_entry(history, &id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                print!("{}", render_analysis(&entry));
            }
        }
        HistoryCommands::Delete { id } => {
            history.delete(&id)?;
            println!("Deleted {}", id);
        }
        HistoryCommands::Clear { force } => {
            if !force {
                eprintln!("Use --force to confirm clearing history");
                return Ok(());
            }
            history.clear()?;
            println!("History cleared");
        }
        HistoryCommands::Export { output } => {
            let text = history.export_as_text()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    println!("Exported history to {:?}", path);
                }
                None => println!("{}", text),
            }
        }
        HistoryCommands::Import { input } => {
            let text = std::fs::read_to_string(&input)?;
            let count = history.try_import(&text)?;
            println!("Imported {} analyses from {:?}", count, input);
        }
        HistoryCommands::Stats => {
            let stats = history.statistics();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_stats(&stats));
            }
        }
    }

    Ok(())
}

/// Unknown ids are an error so the exit status reports the miss
fn find_entry(history: &HistoryStore, id: &str) -> Result<Analysis> {
    history
        .get(id)
        .ok_or_else(|| PlantVisionError::Validation(format!("No analysis with id {}", id)))
}

/// List catalog entries
fn run_catalog(config: AppConfig, category: Option<&str>, json: bool) -> Result<()> {
    let filter = category.map(str::parse::<PlantCategory>).transpose()?;
    let app = PlantVision::from_config(config)?;

    let records: Vec<_> = app
        .catalog
        .records()
        .iter()
        .filter(|r| filter.map_or(true, |c| r.category == c))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("Catalog ({} plants):", records.len());
        for r in records {
            println!(
                "  {:<24} {:<30} {:<12} {}",
                r.common_name, r.scientific_name, r.category, r.leaf_shape
            );
        }
    }
    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Generate { output } => {
            if output.exists() {
                return Err(PlantVisionError::Config(format!(
                    "{:?} already exists",
                    output
                )));
            }
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            let app = PlantVision::from_config(config)?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Storage: {:?} at {}", app.config.storage.backend, app.config.storage.path);
            println!("  Catalog: {} plants", app.catalog.len());
            println!(
                "  Latency: {}ms + up to {}ms",
                app.config.classifier.min_delay_ms, app.config.classifier.jitter_ms
            );
        }
    }

    Ok(())
}

fn severity_marker(severity: TipSeverity) -> &'static str {
    match severity {
        TipSeverity::Normal => "",
        TipSeverity::Warning => "⚠️ ",
        TipSeverity::Urgent => "🚨 ",
    }
}

fn render_tip(tip: &CareTip) -> String {
    match &tip.advisory {
        Some(advisory) => format!("{}{} {}", severity_marker(tip.severity), tip.text, advisory),
        None => format!("{}{}", severity_marker(tip.severity), tip.text),
    }
}

fn render_analysis(analysis: &Analysis) -> String {
    let mut out = format!(
        "{} ({})\n  {}\n  Health: {}   Confidence: {:.0}%\n",
        analysis.common_name,
        analysis.scientific_name,
        analysis.description,
        analysis.health_status,
        analysis.confidence * 100.0,
    );
    for issue in &analysis.issues {
        out.push_str(&format!("  - {}\n", issue));
    }
    out.push_str("  Care:\n");
    for (label, tip) in analysis.care_tips.iter() {
        out.push_str(&format!("    {:<12} {}\n", label, render_tip(tip)));
    }
    out
}

fn render_stats(stats: &HistoryStats) -> String {
    let most_recent = stats
        .most_recent_timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "History statistics:\n  Analyses: {}\n  Healthy: {}\n  Attention: {}\n  Critical: {}\n  \
         Average confidence: {:.0}%\n  Unique species: {}\n  Most recent: {}\n",
        stats.total,
        stats.healthy_count,
        stats.attention_count,
        stats.critical_count,
        stats.average_confidence * 100.0,
        stats.unique_species_count,
        most_recent,
    )
}
