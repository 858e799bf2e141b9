pub mod profile;

pub use profile::{build_profile, calculate_skill_rating, consistency_score};
