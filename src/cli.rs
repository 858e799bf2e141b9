use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "reflex-arena competitive core")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Build skill profiles from a stats snapshot and print balanced matchups
    Matchmake {
        /// Path to the player statistics snapshot (JSON array)
        #[arg(short, long)]
        stats: PathBuf,
        /// Players per group (2 = 1v1 pairing, 3 = team groups)
        #[arg(short, long)]
        group_size: Option<usize>,
    },
    /// Seed a tournament from the snapshot and play it out deterministically
    Simulate {
        /// Path to the player statistics snapshot (JSON array)
        #[arg(short, long)]
        stats: PathBuf,
        /// Tournament display name
        #[arg(short, long, default_value = "Reflex Arena Cup")]
        name: String,
        /// easy|medium|hard|insane (defaults to the field average)
        #[arg(short, long)]
        difficulty: Option<String>,
    },
    /// Predict the outcome between two players (addressed by id or name)
    Predict {
        /// Path to the player statistics snapshot (JSON array)
        #[arg(short, long)]
        stats: PathBuf,
        player_a: String,
        player_b: String,
    },
}
