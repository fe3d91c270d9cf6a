//! CLI frontend for the percentile rules engine.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rt",
    about = "Percentile tests, grant formulas, and grant previews",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a percentile test against a target number
    Test {
        /// Target number before modifiers
        #[arg(short, long, allow_negative_numbers = true)]
        target: i32,

        /// Named modifier added to the target, e.g. aim=10 (repeatable)
        #[arg(short, long = "modifier", value_name = "NAME=VALUE")]
        modifiers: Vec<String>,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Evaluate a wounds formula such as 2xTB+1d5+2
    Wounds {
        /// The formula
        formula: String,

        /// Characteristic bonus, e.g. TB=4 (repeatable)
        #[arg(short, long = "bonus", value_name = "TOKEN=VALUE")]
        bonuses: Vec<String>,

        /// RNG seed for reproducible dice
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Evaluate a fate table such as "(1-5|=2),(6-10|=3)"
    Fate {
        /// The fate table
        formula: String,

        /// RNG seed for a reproducible d10
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List the skill table
    Skills {
        /// Only show specialist skills
        #[arg(long)]
        specialist: bool,
    },

    /// Check an item's grant block for content problems
    Check {
        /// The item as JSON
        item: String,
    },

    /// Show what an item would grant, without saving anything
    Preview {
        /// The item as JSON
        item: String,

        /// The receiving actor as JSON (default: an empty actor)
        #[arg(short, long)]
        actor: Option<String>,

        /// Engine configuration as JSON, e.g. {"maxDepth": 2}
        #[arg(short, long)]
        config: Option<String>,

        /// RNG seed for reproducible formulas
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "rt_mechanics=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Test {
            target,
            modifiers,
            seed,
        } => commands::test::run(target, &modifiers, seed),
        Commands::Wounds {
            formula,
            bonuses,
            seed,
        } => commands::wounds::run(&formula, &bonuses, seed),
        Commands::Fate { formula, seed } => commands::fate::run(&formula, seed),
        Commands::Skills { specialist } => commands::skills::run(specialist),
        Commands::Check { item } => commands::check::run(&item),
        Commands::Preview {
            item,
            actor,
            config,
            seed,
        } => commands::preview::run(&item, actor.as_deref(), config.as_deref(), seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
