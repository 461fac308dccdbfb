// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DistressedAnalysis, FuzzyLocation, Match, MatchStatus, NewMatch, Property, PropertyStatus,
    PropertyType, PropertyUpdate, Requirement, RequirementPriority, ScoreBreakdown, ScoringWeights,
    UnknownVariant,
};
pub use requests::{OwnerMatchesQuery, ScoreRequest};
pub use responses::{
    DistressedResponse, ErrorResponse, FindMatchesResponse, HealthResponse, OwnerMatchesResponse,
    ProcessPropertyResponse, ScoreResponse,
};
