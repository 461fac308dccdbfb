use rust_decimal::Decimal;
use std::sync::Arc;
use crate::core::location::{LocationMatcher, SubstringLocationMatcher};
use crate::models::{Property, Requirement, ScoreBreakdown, ScoringWeights};

/// Default price tolerance above budget that still earns partial credit
pub const DEFAULT_NEGOTIATION_TOLERANCE_PCT: u32 = 10;

/// Calculate a match score (0-100) for a property against a requirement
/// using the default weights and substring zone matching.
///
/// Scoring stages, in order:
/// 1. Location gate: 40 when a zone matches, 0 (hard reject) when none does,
///    a flat 10 when the requirement accepts any zone
/// 2. Price: 30 within budget, 15 within the negotiation tolerance
/// 3. Bedrooms: 10 when the minimum is met
/// 4. Bathrooms: 10 when the minimum is met
pub fn calculate_match_score(property: &Property, requirement: &Requirement) -> u8 {
    MatchScorer::default().score(property, requirement)
}

/// Weighted property/requirement scorer
#[derive(Debug, Clone)]
pub struct MatchScorer {
    weights: ScoringWeights,
    /// Budget multiplier for the negotiable band, e.g. 1.10
    negotiation_ceiling: Decimal,
    location_matcher: Arc<dyn LocationMatcher>,
}

impl MatchScorer {
    pub fn new(
        weights: ScoringWeights,
        negotiation_tolerance_pct: u32,
        location_matcher: Arc<dyn LocationMatcher>,
    ) -> Self {
        Self {
            weights,
            negotiation_ceiling: Decimal::new(100 + i64::from(negotiation_tolerance_pct), 2),
            location_matcher,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(
            ScoringWeights::default(),
            DEFAULT_NEGOTIATION_TOLERANCE_PCT,
            Arc::new(SubstringLocationMatcher),
        )
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Total score, see [`calculate_match_score`]
    pub fn score(&self, property: &Property, requirement: &Requirement) -> u8 {
        self.breakdown(property, requirement).total()
    }

    /// Points per stage. A failed location gate yields an all-zero breakdown.
    pub fn breakdown(&self, property: &Property, requirement: &Requirement) -> ScoreBreakdown {
        let location = if requirement.zone_interest.is_empty() {
            self.weights.open_location
        } else if self
            .location_matcher
            .matches(&property.location, &requirement.zone_interest)
        {
            self.weights.location
        } else {
            return ScoreBreakdown::default();
        };

        ScoreBreakdown {
            location,
            price: self.price_points(property.price, requirement.budget_max),
            bedrooms: points_if(
                meets_minimum(property.bedrooms, requirement.min_bedrooms),
                self.weights.bedrooms,
            ),
            bathrooms: points_if(
                meets_minimum(property.bathrooms, requirement.min_bathrooms),
                self.weights.bathrooms,
            ),
        }
    }

    #[inline]
    fn price_points(&self, price: Decimal, budget: Decimal) -> u8 {
        if price <= budget {
            return self.weights.price;
        }

        // A budget too large to scale still covers every representable price
        let negotiable = budget
            .checked_mul(self.negotiation_ceiling)
            .map_or(true, |ceiling| price <= ceiling);

        if negotiable {
            self.weights.negotiable_price
        } else {
            0
        }
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[inline]
fn points_if(condition: bool, points: u8) -> u8 {
    if condition { points } else { 0 }
}

#[inline]
fn meets_minimum(actual: Option<i32>, minimum: Option<i32>) -> bool {
    actual.unwrap_or(0) >= minimum.unwrap_or(0)
}
