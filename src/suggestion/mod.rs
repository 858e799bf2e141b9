pub mod client;

pub use client::SuggestionClient;

use anyhow::Result;

use crate::domain::{PlayerId, PlayerSkillProfile};

/// Source of balanced-grouping suggestions, typically backed by a remote
/// language-model service. Treated as unreliable: callers attempt it once
/// and fall back to deterministic pairing on any error.
pub trait SuggestionProvider {
    /// Propose groups of `group_size` player ids covering all `profiles`.
    fn suggest_groups(
        &self,
        profiles: &[PlayerSkillProfile],
        group_size: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Vec<PlayerId>>>> + Send;
}
