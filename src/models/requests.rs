use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Property, Requirement};

/// Request to score a single property against a single requirement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(nested)]
    pub property: Property,
    #[validate(nested)]
    pub requirement: Requirement,
}

/// Query for the owner's match dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OwnerMatchesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "owner_id", rename = "ownerId")]
    pub owner_id: String,
}
