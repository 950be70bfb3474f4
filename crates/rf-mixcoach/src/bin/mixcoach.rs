//! Mix Coach command line
//!
//! Usage:
//!   mixcoach evaluate --challenges pack.json --id eq-warmth --params mix.json
//!   mixcoach list --challenges pack.json
//!   mixcoach reduce --params parametric.json
//!
//! `evaluate` exits with status 1 when the submission does not pass.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rf_mixcoach::{ChallengeEvaluator, ChallengeSet, MixInput, ParametricEqParams, ScoringConfig, reduce_parametric_eq};

#[derive(Parser)]
#[command(name = "mixcoach", about = "ReelForge mixing challenge evaluator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission against one challenge
    Evaluate {
        /// Challenge pack (JSON array)
        #[arg(short, long)]
        challenges: PathBuf,
        /// Challenge id
        #[arg(short, long)]
        id: String,
        /// Learner parameters (JSON)
        #[arg(short, long)]
        params: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Scoring config (JSON); defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List challenges in a pack
    List {
        /// Challenge pack (JSON array)
        #[arg(short, long)]
        challenges: PathBuf,
    },
    /// Reduce a parametric EQ to low/mid/high
    Reduce {
        /// Parametric EQ (JSON)
        #[arg(short, long)]
        params: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            challenges,
            id,
            params,
            format,
            config,
        } => {
            let passed = evaluate(&challenges, &id, &params, format, config.as_deref())?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::List { challenges } => list(&challenges),
        Commands::Reduce { params } => reduce(&params),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_pack(path: &Path) -> Result<ChallengeSet> {
    ChallengeSet::from_file(path).with_context(|| format!("Failed to load challenges from {}", path.display()))
}

fn evaluate(
    challenges: &Path,
    id: &str,
    params: &Path,
    format: OutputFormat,
    config: Option<&Path>,
) -> Result<bool> {
    let set = load_pack(challenges)?;
    let challenge = set.require(id)?;

    let config = match config {
        Some(path) => ScoringConfig::from_json(&read(path)?)
            .with_context(|| format!("Invalid scoring config {}", path.display()))?,
        None => ScoringConfig::default(),
    };

    let input = MixInput::from_json(&read(params)?)
        .with_context(|| format!("Invalid parameters in {}", params.display()))?;

    log::info!("Evaluating '{}' ({})", challenge.title, challenge.target.kind());
    let result = ChallengeEvaluator::new(config).evaluate(challenge, &input);

    match format {
        OutputFormat::Text => print!("{}", result.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Markdown => print!("{}", result.to_markdown()),
    }

    Ok(result.passed)
}

fn list(challenges: &Path) -> Result<()> {
    let set = load_pack(challenges)?;

    for challenge in set.iter() {
        println!(
            "{:<24} {:<14} {:<13} {}",
            challenge.id,
            challenge.target.kind(),
            challenge.difficulty.label(),
            challenge.title
        );
    }
    println!("\n{} challenges", set.len());
    Ok(())
}

fn reduce(params: &Path) -> Result<()> {
    let parametric: ParametricEqParams = serde_json::from_str(&read(params)?)
        .with_context(|| format!("Invalid parametric EQ in {}", params.display()))?;
    let reduced = reduce_parametric_eq(&parametric);
    println!("{}", serde_json::to_string_pretty(&reduced)?);
    Ok(())
}
