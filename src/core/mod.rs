// Core engine exports
pub mod distressed;
pub mod fuzzy;
pub mod location;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use distressed::{DistressedAnalyzer, MarketRate, MarketRateTable};
pub use fuzzy::{get_fuzzy_location, get_fuzzy_location_with};
pub use location::{LocationMatcher, SubstringLocationMatcher};
pub use matcher::{MatchingEngine, MatchingThresholds, ProcessReport};
pub use normalize::normalize;
pub use scoring::{calculate_match_score, MatchScorer};
