use serde::{Deserialize, Serialize};
use crate::models::domain::{DistressedAnalysis, Match, ScoreBreakdown};

/// Response for the score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Response for the match search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub created: u64,
}

/// Response for the distressed update endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistressedResponse {
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub analysis: Option<DistressedAnalysis>,
}

/// Response for the full post-upload run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPropertyResponse {
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub analysis: Option<DistressedAnalysis>,
    #[serde(rename = "matchesCreated")]
    pub matches_created: u64,
}

/// Response listing matches on a broker's properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerMatchesResponse {
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub matches: Vec<Match>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
