pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod matchmaking;
pub mod services;
pub mod skill;
pub mod stats;
pub mod suggestion;
pub mod tournament;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::path::Path;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::matchmaking::MatchmakingService;
use crate::services::simulation::SimulationService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_matchmake(stats: &Path, group_size: Option<usize>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = MatchmakingService::new(config);
        service.run(stats, group_size).await
    })
}

pub fn handle_simulate(stats: &Path, name: &str, difficulty: Option<&str>) -> Result<()> {
    let config = AppConfig::new();
    let service = SimulationService::new(config);
    service.run(stats, name, difficulty)
}

pub fn handle_predict(stats: &Path, player_a: &str, player_b: &str) -> Result<()> {
    let config = AppConfig::new();
    let service = MatchmakingService::new(config);
    service.predict(stats, player_a, player_b)
}
