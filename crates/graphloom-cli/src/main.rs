//! Graphloom CLI - turn text documents into a knowledge graph

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use graphloom_core::config::Config;
use graphloom_core::graph::{TripleGraph, turtle};
use graphloom_core::llm::LlmClient;
use graphloom_core::pipeline::Pipeline;
use graphloom_core::store::GraphStore;
use graphloom_core::visualization::{DEFAULT_SAMPLE_SIZE, sample};

#[derive(Parser)]
#[command(name = "graphloom")]
#[command(author, version, about = "Turn text documents into a knowledge graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a text document and merge it into the knowledge base
    Convert {
        /// Path of the input text document
        input: PathBuf,
        /// Knowledge-base file (defaults to the configured store)
        #[arg(short, long)]
        knowledge_base: Option<PathBuf>,
        /// Where to write the node/edge presentation document
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Refinement iteration budget (defaults to the configured value)
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Abort the whole run after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Show statistics for the knowledge base
    Stats {
        /// Knowledge-base file (defaults to the configured store)
        #[arg(short, long)]
        knowledge_base: Option<PathBuf>,
    },

    /// Print a random subject sample of the knowledge base as Turtle
    Sample {
        /// Knowledge-base file (defaults to the configured store)
        #[arg(long)]
        knowledge_base: Option<PathBuf>,
        /// Number of subjects to draw
        #[arg(short = 'k', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        subjects: usize,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check a Turtle file for syntax errors
    Validate {
        /// Path of the Turtle file
        file: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("graphloom=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            knowledge_base,
            out,
            max_iterations,
            timeout_secs,
        } => {
            cmd_convert(
                &input,
                knowledge_base,
                out,
                max_iterations,
                timeout_secs,
                cli.quiet,
                cli.format,
            )
            .await
        }

        Commands::Stats { knowledge_base } => cmd_stats(knowledge_base, cli.quiet, cli.format),

        Commands::Sample {
            knowledge_base,
            subjects,
            seed,
        } => cmd_sample(knowledge_base, subjects, seed, cli.quiet),

        Commands::Validate { file } => cmd_validate(&file, cli.quiet, cli.format),

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_convert(
    input: &Path,
    knowledge_base: Option<PathBuf>,
    out: Option<PathBuf>,
    max_iterations: Option<usize>,
    timeout_secs: Option<u64>,
    quiet: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    if !input.exists() {
        return Err(graphloom_core::Error::FileNotFound(input.display().to_string()).into());
    }
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let api_key = config.llm.resolved_api_key()?.ok_or_else(|| {
        anyhow!("No API key found. Set the GRAPHLOOM_API_KEY or OPENROUTER_API_KEY environment variable.")
    })?;
    let client = Arc::new(LlmClient::new(config.llm.clone(), api_key)?);

    let pipeline = Pipeline::new(client)
        .with_max_iterations(max_iterations.unwrap_or(config.pipeline.max_iterations))
        .with_preview_chars(config.pipeline.text_preview_chars);

    let store = GraphStore::open(resolve_store_path(&config, knowledge_base)?);

    if !quiet {
        println!("Converting '{}'...", input.display());
    }

    let report = match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), pipeline.run(&text, &store))
            .await
            .map_err(|_| anyhow!("Pipeline timed out after {} seconds", secs))??,
        None => pipeline.run(&text, &store).await?,
    };

    let out_path = out.unwrap_or_else(|| default_visual_path(input));
    let document = serde_json::to_string_pretty(&report.visual)
        .context("Failed to serialize presentation document")?;
    std::fs::write(&out_path, document)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "session_id": report.session_id,
                "state": report.state,
                "iterations": report.iterations,
                "missing_items": report.missing_items,
                "merge": report.merge,
                "nodes": report.visual.nodes.len(),
                "edges": report.visual.edges.len(),
                "knowledge_base": store.path().display().to_string(),
                "visualization": out_path.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("Conversion finished ({})", report.state);
                println!("  Iterations: {}", report.iterations);
                if !report.missing_items.is_empty() {
                    println!("  Still missing:");
                    for item in &report.missing_items {
                        println!("    - {}", item);
                    }
                }
                println!("  Knowledge base: {} ({})", store.path().display(), report.merge);
                println!(
                    "  Visualization: {} ({} nodes, {} edges)",
                    out_path.display(),
                    report.visual.nodes.len(),
                    report.visual.edges.len()
                );
            }
        }
    }

    Ok(())
}

fn cmd_stats(
    knowledge_base: Option<PathBuf>,
    quiet: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = GraphStore::open(resolve_store_path(&config, knowledge_base)?);
    let stats = store.stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("Knowledge base: {}", store.path().display());
            }
            println!("  Triples: {}", stats.triples);
            println!("  Subjects: {}", stats.subjects);
            println!("  Predicates: {}", stats.predicates);
            println!("  Objects: {}", stats.objects);
            println!("  Prefixes: {}", stats.prefixes);
        }
    }
    Ok(())
}

fn cmd_sample(
    knowledge_base: Option<PathBuf>,
    subjects: usize,
    seed: Option<u64>,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = GraphStore::open(resolve_store_path(&config, knowledge_base)?);
    let graph = store.load()?;

    if graph.is_empty() {
        if !quiet {
            println!("Knowledge base is empty.");
        }
        return Ok(());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let triples = sample(&graph, subjects, &mut rng);
    debug!(subjects, triples = triples.len(), "Sampled knowledge base");

    let mut sampled = TripleGraph::from_triples(triples);
    for (prefix, namespace) in graph.prefixes() {
        sampled.bind_prefix(prefix, namespace);
    }
    print!("{}", turtle::serialize(&sampled));
    Ok(())
}

fn cmd_validate(file: &Path, quiet: bool, format: OutputFormat) -> anyhow::Result<()> {
    if !file.exists() {
        return Err(graphloom_core::Error::FileNotFound(file.display().to_string()).into());
    }
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    match turtle::parse(&contents) {
        Ok(graph) => {
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({ "valid": true, "triples": graph.len() })
                    );
                }
                OutputFormat::Text => {
                    if !quiet {
                        println!("{} is valid Turtle ({} triples)", file.display(), graph.len());
                    }
                }
            }
            Ok(())
        }
        Err(err) => {
            if format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::json!({ "valid": false, "error": err.to_string() })
                );
            }
            Err(anyhow!(err).context(format!("{} is not valid Turtle", file.display())))
        }
    }
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_store_path(config: &Config, explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => config.store.resolved_path(),
    }
}

/// Default presentation document path: interactive_<stem>_graph.json
/// next to the current directory
fn default_visual_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "knowledge".to_string());
    PathBuf::from(format!("interactive_{}_graph.json", stem))
}
