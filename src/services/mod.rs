pub mod matchmaking;
pub mod simulation;

pub use matchmaking::MatchmakingService;
pub use simulation::SimulationService;
