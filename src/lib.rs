//! Canje Engine - matching and opportunity scoring for the Canje broker exchange
//!
//! Given a property and a broker requirement, the engine decides whether they
//! match and how strongly, derives a privacy-preserving public location, and
//! flags properties priced well below their zone's market rate.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    calculate_match_score, get_fuzzy_location, normalize, DistressedAnalyzer, LocationMatcher,
    MatchScorer, MatchingEngine,
};
pub use crate::models::{DistressedAnalysis, FuzzyLocation, Match, Property, Requirement};
pub use crate::services::{InMemoryStore, MatchStore, PostgresStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(normalize("Ñuñoa"), "nunoa");
    }
}
