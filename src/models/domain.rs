use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Kind of real-estate asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    House,
    Apartment,
    Land,
    Agricultural,
    Parcel,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "HOUSE",
            PropertyType::Apartment => "APARTMENT",
            PropertyType::Land => "LAND",
            PropertyType::Agricultural => "AGRICULTURAL",
            PropertyType::Parcel => "PARCEL",
        }
    }
}

impl FromStr for PropertyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOUSE" => Ok(PropertyType::House),
            "APARTMENT" => Ok(PropertyType::Apartment),
            "LAND" => Ok(PropertyType::Land),
            "AGRICULTURAL" => Ok(PropertyType::Agricultural),
            "PARCEL" => Ok(PropertyType::Parcel),
            other => Err(UnknownVariant::new("property_type", other)),
        }
    }
}

/// Listing status of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    #[default]
    Active,
    Paused,
    Sold,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Active => "ACTIVE",
            PropertyStatus::Paused => "PAUSED",
            PropertyStatus::Sold => "SOLD",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(PropertyStatus::Active),
            "PAUSED" => Ok(PropertyStatus::Paused),
            "SOLD" => Ok(PropertyStatus::Sold),
            other => Err(UnknownVariant::new("property_status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl RequirementPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementPriority::Low => "LOW",
            RequirementPriority::Medium => "MEDIUM",
            RequirementPriority::High => "HIGH",
            RequirementPriority::Urgent => "URGENT",
        }
    }
}

impl FromStr for RequirementPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(RequirementPriority::Low),
            "MEDIUM" => Ok(RequirementPriority::Medium),
            "HIGH" => Ok(RequirementPriority::High),
            "URGENT" => Ok(RequirementPriority::Urgent),
            other => Err(UnknownVariant::new("requirement_priority", other)),
        }
    }
}

/// Lifecycle of a property/requirement match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Closed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::Accepted => "ACCEPTED",
            MatchStatus::Rejected => "REJECTED",
            MatchStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(MatchStatus::Pending),
            "ACCEPTED" => Ok(MatchStatus::Accepted),
            "REJECTED" => Ok(MatchStatus::Rejected),
            "CLOSED" => Ok(MatchStatus::Closed),
            other => Err(UnknownVariant::new("match_status", other)),
        }
    }
}

/// A stored enum value that does not map to any known variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// A listing offered by a broker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Property {
    pub id: String,
    #[serde(rename = "ownerId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Asking price in `currency`; absent prices read as zero
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub location: String,
    #[serde(rename = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "lng", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(rename = "squareMeters", default)]
    pub square_meters: Option<i32>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(rename = "isDistressed", default)]
    pub is_distressed: bool,
    #[serde(rename = "opportunityScore", default)]
    pub opportunity_score: Option<i32>,
    #[serde(rename = "internalNotes", default)]
    pub internal_notes: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_currency() -> String {
    "CLP".to_string()
}

/// A client need published by a broker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Requirement {
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    /// Upper budget bound; absent budgets read as zero
    #[serde(rename = "budgetMax", default)]
    pub budget_max: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Accepted zones in broker order; empty means anywhere
    #[serde(rename = "zoneInterest", default)]
    pub zone_interest: Vec<String>,
    #[serde(rename = "propertyTypes", default)]
    pub property_types: Vec<PropertyType>,
    #[validate(range(min = 0))]
    #[serde(rename = "minBedrooms", default)]
    pub min_bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(rename = "minBathrooms", default)]
    pub min_bathrooms: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(rename = "minSquareMeters", default)]
    pub min_square_meters: Option<i32>,
    #[serde(default)]
    pub priority: RequirementPriority,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "exchangeNotes", default)]
    pub exchange_notes: Option<String>,
}

fn default_true() -> bool { true }

/// A persisted pairing between a property and a requirement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: uuid::Uuid,
    #[serde(rename = "propertyId")]
    pub property_id: String,
    #[serde(rename = "requirementId")]
    pub requirement_id: String,
    #[serde(rename = "matchScore")]
    pub match_score: i32,
    pub status: MatchStatus,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A match row waiting to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub property_id: String,
    pub requirement_id: String,
    pub match_score: i32,
    pub status: MatchStatus,
}

impl NewMatch {
    pub fn pending(property_id: &str, requirement_id: &str, score: u8) -> Self {
        Self {
            property_id: property_id.to_string(),
            requirement_id: requirement_id.to_string(),
            match_score: i32::from(score),
            status: MatchStatus::Pending,
        }
    }
}

/// Partial update of the derived property fields.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyUpdate {
    pub is_distressed: Option<bool>,
    pub opportunity_score: Option<i32>,
    pub internal_notes: Option<String>,
}

/// Approximate location safe to show before a deal is brokered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyLocation {
    pub display: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "isExact")]
    pub is_exact: bool,
}

/// Outcome of comparing a property against its zone's market rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistressedAnalysis {
    #[serde(rename = "isDistressed")]
    pub is_distressed: bool,
    /// Percent below market, rounded; negative when priced above market
    #[serde(rename = "estimatedDiscount")]
    pub estimated_discount: i32,
    #[serde(rename = "marketValue")]
    pub market_value: Decimal,
    #[serde(rename = "marketRate")]
    pub market_rate: Decimal,
    #[serde(rename = "propertyRate")]
    pub property_rate: Decimal,
}

/// Points awarded by each scoring stage.
///
/// The current stages top out at 90. A bonus stage (for example a distressed
/// listing bonus) is added here as another field and summed in
/// [`ScoreBreakdown::total`], which keeps the result within 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub location: u8,
    pub price: u8,
    pub bedrooms: u8,
    pub bathrooms: u8,
}

impl ScoreBreakdown {
    /// Sum of all stages, capped at 100
    pub fn total(&self) -> u8 {
        let sum = u16::from(self.location)
            + u16::from(self.price)
            + u16::from(self.bedrooms)
            + u16::from(self.bathrooms);
        sum.min(100) as u8
    }
}

/// Scoring weights, in points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub location: u8,
    pub open_location: u8,
    pub price: u8,
    pub negotiable_price: u8,
    pub bedrooms: u8,
    pub bathrooms: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            location: 40,
            open_location: 10,
            price: 30,
            negotiable_price: 15,
            bedrooms: 10,
            bathrooms: 10,
        }
    }
}
