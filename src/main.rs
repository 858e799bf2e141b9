use anyhow::Result;

use reflex_arena::cli::Command;
use reflex_arena::{handle_matchmake, handle_predict, handle_simulate, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Matchmake { stats, group_size } => handle_matchmake(stats, *group_size),
        Command::Simulate {
            stats,
            name,
            difficulty,
        } => handle_simulate(stats, name, difficulty.as_deref()),
        Command::Predict {
            stats,
            player_a,
            player_b,
        } => handle_predict(stats, player_a, player_b),
    }
}
