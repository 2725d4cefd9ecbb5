//! CLI frontend for the Schicksal covert roll director.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "sk",
    about = "Schicksal: show the percentile result you choose",
    version,
    propagate_version = true
)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed for reproducible output (overrides the config)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a believable d100 value for an outcome
    Plan {
        /// Outcome: critical-success, success, failure, critical-failure
        outcome: String,

        /// Effective skill value
        #[arg(short = 'k', long, default_value = "45")]
        skill: i64,

        /// Number of values to plan
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },

    /// Compute the success level of a result against a skill
    Sl {
        /// The d100 result
        result: i64,

        /// Effective skill value
        skill: i64,
    },

    /// Roll a formula and rewrite its dice to a total
    Force {
        /// Dice formula, e.g. 1d100 or 2d10+5
        formula: String,

        /// Total the roll must show
        total: i64,
    },

    /// List the test subjects offered for an actor
    Subjects {
        /// Actor JSON file
        actor: PathBuf,

        /// Targeted actor JSON file, for the opposed comparison
        #[arg(short, long)]
        target: Option<PathBuf>,
    },

    /// Perform a forced roll for an actor
    Roll {
        /// Actor JSON file
        actor: PathBuf,

        /// Test subject, e.g. "Melee (Basic)", WS or a weapon name
        #[arg(long)]
        subject: Option<String>,

        /// Outcome name or an exact value
        #[arg(short, long, default_value = "success")]
        result: String,

        /// Flavor text shown to players
        #[arg(short, long)]
        flavor: Option<String>,

        /// Private note, logged only
        #[arg(long)]
        gm_note: Option<String>,

        /// Roll mode: public, gm, blind, self
        #[arg(short, long)]
        mode: Option<String>,

        /// Extended test id to receive the success levels
        #[arg(short, long)]
        extended: Option<String>,

        /// Targeted actor JSON file
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Write the updated actor back to its file
        #[arg(short, long)]
        write: bool,
    },
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = commands::load_config(cli.config.as_deref(), cli.seed).and_then(|config| {
        match cli.command {
            Commands::Plan {
                outcome,
                skill,
                count,
            } => commands::plan::run(&config, &outcome, skill, count),
            Commands::Sl { result, skill } => commands::sl::run(result, skill),
            Commands::Force { formula, total } => commands::force::run(&config, &formula, total),
            Commands::Subjects { actor, target } => {
                commands::subjects::run(&actor, target.as_deref())
            }
            Commands::Roll {
                actor,
                subject,
                result,
                flavor,
                gm_note,
                mode,
                extended,
                target,
                write,
            } => commands::roll::run(
                config,
                commands::roll::RollArgs {
                    actor: &actor,
                    target: target.as_deref(),
                    subject: subject.as_deref(),
                    result: &result,
                    flavor: flavor.as_deref(),
                    gm_note: gm_note.as_deref(),
                    mode: mode.as_deref(),
                    extended: extended.as_deref(),
                    write,
                },
            ),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
