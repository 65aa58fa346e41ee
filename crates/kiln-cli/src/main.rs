//! Kiln CLI - Load, run and inspect scene descriptions headlessly

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, run, validate};

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Headless runner for Kiln scene descriptions", long_about = None)]
#[command(version)]
struct Cli {
    /// Log frame boundaries and scheduling changes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advance a scene for a number of frames and print the final transforms
    Run {
        /// Path to scene file
        scene: String,

        /// Number of frames to simulate
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Fixed frame rate of the simulation clock
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Directory of .anim.toml clip files to add to the scene
        #[arg(long)]
        clips: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a scene file without running it
    Validate {
        /// Path to scene file
        scene: String,
    },

    /// List a scene's entities by priority, and its animation clips
    Inspect {
        /// Path to scene file
        scene: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Run {
            scene,
            frames,
            fps,
            clips,
            format,
        } => run::run(run::RunArgs {
            scene,
            frames,
            fps,
            clips,
            format,
        }),
        Commands::Validate { scene } => validate::run(&scene),
        Commands::Inspect { scene, format } => inspect::run(&scene, &format),
    }
}
