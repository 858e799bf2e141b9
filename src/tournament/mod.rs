pub mod bracket;
pub mod team;

pub use bracket::{MAX_PLAYERS, MIN_PLAYERS};
pub use team::{MAX_TEAM_MEMBERS, MIN_TEAM_MEMBERS};

/// Rounds needed for a single-elimination bracket: ceil(log2(entrants)).
pub(crate) fn round_count(entrants: usize) -> u32 {
    entrants.next_power_of_two().trailing_zeros()
}
