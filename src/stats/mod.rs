use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::{PlayerId, PlayerStats};

/// Read-only snapshot of per-player aggregate statistics, loaded wholesale
/// from a JSON file (an array of player records). This core never writes
/// back to the store.
pub struct StatsStore {
    players: HashMap<PlayerId, PlayerStats>,
}

impl StatsStore {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats snapshot {}", path.display()))?;
        let records: Vec<PlayerStats> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stats snapshot {}", path.display()))?;

        info!(
            "Loaded {} player records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<PlayerStats>) -> Self {
        Self {
            players: records.into_iter().map(|p| (p.player_id, p)).collect(),
        }
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerStats> {
        self.players.get(&player_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&PlayerStats> {
        self.players
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// All records, ordered by player id so callers get a stable listing.
    pub fn all(&self) -> Vec<&PlayerStats> {
        let mut records: Vec<&PlayerStats> = self.players.values().collect();
        records.sort_by_key(|p| p.player_id);
        records
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
