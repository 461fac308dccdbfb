use rust_decimal::Decimal;
use std::sync::Arc;
use crate::core::distressed::DistressedAnalyzer;
use crate::core::scoring::MatchScorer;
use crate::models::{DistressedAnalysis, NewMatch, PropertyUpdate};
use crate::services::storage::{MatchStore, StoreError};

/// Cut-offs applied by the matching run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingThresholds {
    /// Minimum score for a pair to be persisted
    pub min_score: u8,
    /// Fraction of the asking price a budget must reach to be a candidate
    pub prefilter_ratio: Decimal,
}

impl MatchingThresholds {
    pub fn new(min_score: u8, prefilter_discount_pct: u32) -> Self {
        let discount = i64::from(prefilter_discount_pct.min(100));
        Self {
            min_score,
            prefilter_ratio: Decimal::new(100 - discount, 2),
        }
    }
}

impl Default for MatchingThresholds {
    fn default() -> Self {
        Self::new(40, 10)
    }
}

/// Result of the post-upload run for one property
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub analysis: Option<DistressedAnalysis>,
    pub matches_created: u64,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Load the property from storage
/// 2. Coarse budget prefilter in storage
/// 3. Scoring against each candidate requirement
/// 4. Bulk insert of the matches above threshold, skipping existing pairs
///
/// Storage is injected; the orchestrator holds no other mutable state.
#[derive(Clone)]
pub struct MatchingEngine {
    store: Arc<dyn MatchStore>,
    scorer: MatchScorer,
    analyzer: DistressedAnalyzer,
    thresholds: MatchingThresholds,
}

impl MatchingEngine {
    pub fn new(
        store: Arc<dyn MatchStore>,
        scorer: MatchScorer,
        analyzer: DistressedAnalyzer,
        thresholds: MatchingThresholds,
    ) -> Self {
        Self {
            store,
            scorer,
            analyzer,
            thresholds,
        }
    }

    pub fn with_defaults(store: Arc<dyn MatchStore>) -> Self {
        Self::new(
            store,
            MatchScorer::default(),
            DistressedAnalyzer::default(),
            MatchingThresholds::default(),
        )
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn analyzer(&self) -> &DistressedAnalyzer {
        &self.analyzer
    }

    /// Find requirements compatible with a property and persist them as
    /// PENDING matches.
    ///
    /// # Returns
    /// Number of newly inserted matches. Pairs matched by an earlier run are
    /// not counted, and a missing property yields 0.
    pub async fn find_matches_for_property(&self, property_id: &str) -> Result<u64, StoreError> {
        tracing::info!("Starting match search for property {}", property_id);

        let property = match self.store.get_property(property_id).await? {
            Some(property) => property,
            None => {
                tracing::error!("Property {} not found, skipping match search", property_id);
                return Ok(0);
            }
        };

        // Budgets slightly under the asking price are kept for negotiation
        let min_budget = property
            .price
            .checked_mul(self.thresholds.prefilter_ratio)
            .unwrap_or(property.price);
        let candidates = self.store.find_active_requirements(min_budget).await?;

        tracing::debug!(
            "Found {} candidate requirements for property {} (budget >= {})",
            candidates.len(),
            property_id,
            min_budget
        );

        let matches: Vec<NewMatch> = candidates
            .iter()
            .filter_map(|requirement| {
                let score = self.scorer.score(&property, requirement);
                tracing::debug!("Requirement {} scored {}", requirement.id, score);

                (score >= self.thresholds.min_score)
                    .then(|| NewMatch::pending(&property.id, &requirement.id, score))
            })
            .collect();

        if matches.is_empty() {
            tracing::info!("No requirement reached the match threshold for property {}", property_id);
            return Ok(0);
        }

        let created = self.store.insert_matches_ignoring_duplicates(&matches).await?;

        // TODO: notify the requirement owners of new matches once a realtime channel exists
        tracing::info!(
            "Created {} new matches for property {} ({} above threshold)",
            created,
            property_id,
            matches.len()
        );

        Ok(created)
    }

    /// Run the distressed analysis and flag the property when it is priced
    /// well below market.
    ///
    /// The flag is sticky: a property that is no longer distressed is left
    /// untouched rather than cleared. Returns `None` when the property does
    /// not exist.
    pub async fn update_distressed_status(
        &self,
        property_id: &str,
    ) -> Result<Option<DistressedAnalysis>, StoreError> {
        let property = match self.store.get_property(property_id).await? {
            Some(property) => property,
            None => {
                tracing::error!("Property {} not found, skipping distressed analysis", property_id);
                return Ok(None);
            }
        };

        let analysis = self.analyzer.analyze(&property);

        if analysis.is_distressed {
            let update = PropertyUpdate {
                is_distressed: Some(true),
                opportunity_score: Some(analysis.estimated_discount),
                internal_notes: Some(format!(
                    "Detected automatically. Est. Discount: {}% below market.",
                    analysis.estimated_discount
                )),
            };
            self.store.update_property(property_id, &update).await?;

            tracing::info!(
                "Property {} marked as distressed ({}% below market)",
                property_id,
                analysis.estimated_discount
            );
        } else {
            tracing::debug!(
                "Property {} not distressed (estimated discount {}%)",
                property_id,
                analysis.estimated_discount
            );
        }

        Ok(Some(analysis))
    }

    /// Post-upload sequence: distressed update, then match search
    pub async fn process_new_property(&self, property_id: &str) -> Result<ProcessReport, StoreError> {
        let analysis = self.update_distressed_status(property_id).await?;
        let matches_created = self.find_matches_for_property(property_id).await?;

        Ok(ProcessReport {
            analysis,
            matches_created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Property, PropertyStatus, PropertyType, Requirement, RequirementPriority};
    use crate::services::memory::InMemoryStore;

    fn create_property(id: &str, price: i64, currency: &str, sqm: i32) -> Property {
        Property {
            id: id.to_string(),
            owner_id: "broker_a".to_string(),
            title: "Casa en Las Condes".to_string(),
            description: None,
            price: Decimal::from(price),
            currency: currency.to_string(),
            location: "Av. Apoquindo 3000, Las Condes".to_string(),
            latitude: Some(-33.4150),
            longitude: Some(-70.5830),
            property_type: PropertyType::House,
            bedrooms: Some(3),
            bathrooms: Some(2),
            square_meters: Some(sqm),
            status: PropertyStatus::Active,
            is_distressed: false,
            opportunity_score: None,
            internal_notes: None,
            created_at: None,
        }
    }

    fn create_requirement(id: &str, budget: i64, zones: &[&str]) -> Requirement {
        Requirement {
            id: id.to_string(),
            user_id: "broker_b".to_string(),
            budget_max: Decimal::from(budget),
            currency: "CLP".to_string(),
            zone_interest: zones.iter().map(|z| z.to_string()).collect(),
            property_types: vec![PropertyType::House],
            min_bedrooms: Some(3),
            min_bathrooms: Some(2),
            min_square_meters: None,
            priority: RequirementPriority::Medium,
            is_active: true,
            exchange_notes: None,
        }
    }

    #[test]
    fn test_thresholds() {
        let thresholds = MatchingThresholds::default();
        assert_eq!(thresholds.min_score, 40);
        assert_eq!(thresholds.prefilter_ratio, Decimal::new(90, 2));
        assert_eq!(MatchingThresholds::new(40, 250).prefilter_ratio, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_below_threshold_is_not_persisted() {
        let store = Arc::new(InMemoryStore::new());
        store.put_property(create_property("p1", 100_000_000, "CLP", 100)).await;
        // Open zones (10) + price (30) only: 40 passes. Failing rooms too: below.
        let mut weak = create_requirement("r1", 100_000_000, &[]);
        weak.min_bedrooms = Some(9);
        weak.min_bathrooms = Some(9);
        store.put_requirement(weak).await;

        let engine = MatchingEngine::with_defaults(store.clone());
        assert_eq!(engine.find_matches_for_property("p1").await.unwrap(), 1);
        assert_eq!(store.get_match("p1", "r1").await.unwrap().match_score, 40);

        store.put_property(create_property("p2", 101_000_000, "CLP", 100)).await;
        assert_eq!(engine.find_matches_for_property("p2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_inactive_requirements_are_ignored() {
        let store = Arc::new(InMemoryStore::new());
        store.put_property(create_property("p1", 100_000_000, "CLP", 100)).await;
        let mut inactive = create_requirement("r1", 100_000_000, &["Las Condes"]);
        inactive.is_active = false;
        store.put_requirement(inactive).await;

        let engine = MatchingEngine::with_defaults(store.clone());
        assert_eq!(engine.find_matches_for_property("p1").await.unwrap(), 0);
        assert_eq!(store.match_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_property_yields_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let engine = MatchingEngine::with_defaults(store);

        assert_eq!(engine.find_matches_for_property("ghost").await.unwrap(), 0);
        assert_eq!(engine.update_distressed_status("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_distressed_flag_is_sticky() {
        let store = Arc::new(InMemoryStore::new());
        // 2,000 UF over 100 m² in Las Condes (95 UF/m²): ~79% off
        store.put_property(create_property("p1", 2_000, "UF", 100)).await;

        let engine = MatchingEngine::with_defaults(store.clone());
        let analysis = engine.update_distressed_status("p1").await.unwrap().unwrap();
        assert!(analysis.is_distressed);
        assert_eq!(analysis.estimated_discount, 79);

        let flagged = store.get_property("p1").await.unwrap().unwrap();
        assert!(flagged.is_distressed);
        assert_eq!(flagged.opportunity_score, Some(79));
        assert_eq!(
            flagged.internal_notes.as_deref(),
            Some("Detected automatically. Est. Discount: 79% below market.")
        );

        // Repriced at market: analysis says no, stored flag stays
        let mut repriced = flagged.clone();
        repriced.price = Decimal::from(9_500);
        store.put_property(repriced).await;

        let analysis = engine.update_distressed_status("p1").await.unwrap().unwrap();
        assert!(!analysis.is_distressed);
        let stored = store.get_property("p1").await.unwrap().unwrap();
        assert!(stored.is_distressed);
        assert_eq!(stored.opportunity_score, Some(79));
    }
}
