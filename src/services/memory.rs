use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::models::{Match, NewMatch, Property, PropertyUpdate, Requirement};
use crate::services::storage::{MatchStore, StoreError};

#[derive(Default)]
struct Tables {
    properties: HashMap<String, Property>,
    /// Insertion order is kept so candidate order is stable
    requirements: Vec<Requirement>,
    matches: HashMap<(String, String), Match>,
}

/// In-process store used for local runs and tests.
///
/// Matches are keyed by (property_id, requirement_id), which gives the same
/// skip-duplicates behavior as the Postgres unique constraint.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property
    pub async fn put_property(&self, property: Property) {
        let mut tables = self.tables.write().await;
        tables.properties.insert(property.id.clone(), property);
    }

    /// Insert or replace a requirement
    pub async fn put_requirement(&self, requirement: Requirement) {
        let mut tables = self.tables.write().await;
        match tables.requirements.iter_mut().find(|r| r.id == requirement.id) {
            Some(existing) => *existing = requirement,
            None => tables.requirements.push(requirement),
        }
    }

    pub async fn match_count(&self) -> usize {
        self.tables.read().await.matches.len()
    }

    pub async fn get_match(&self, property_id: &str, requirement_id: &str) -> Option<Match> {
        self.tables
            .read()
            .await
            .matches
            .get(&(property_id.to_string(), requirement_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn get_property(&self, id: &str) -> Result<Option<Property>, StoreError> {
        Ok(self.tables.read().await.properties.get(id).cloned())
    }

    async fn find_active_requirements(&self, min_budget: Decimal) -> Result<Vec<Requirement>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requirements
            .iter()
            .filter(|r| r.is_active && r.budget_max >= min_budget)
            .cloned()
            .collect())
    }

    async fn insert_matches_ignoring_duplicates(&self, matches: &[NewMatch]) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut inserted = 0;

        for new_match in matches {
            let key = (new_match.property_id.clone(), new_match.requirement_id.clone());
            if tables.matches.contains_key(&key) {
                continue;
            }

            tables.matches.insert(
                key,
                Match {
                    id: uuid::Uuid::new_v4(),
                    property_id: new_match.property_id.clone(),
                    requirement_id: new_match.requirement_id.clone(),
                    match_score: new_match.match_score,
                    status: new_match.status,
                    created_at: chrono::Utc::now(),
                },
            );
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn update_property(&self, id: &str, update: &PropertyUpdate) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let property = tables
            .properties
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("property {}", id)))?;

        if let Some(is_distressed) = update.is_distressed {
            property.is_distressed = is_distressed;
        }
        if let Some(score) = update.opportunity_score {
            property.opportunity_score = Some(score);
        }
        if let Some(notes) = &update.internal_notes {
            property.internal_notes = Some(notes.clone());
        }

        Ok(())
    }

    async fn list_matches_for_owner(&self, owner_id: &str) -> Result<Vec<Match>, StoreError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Match> = tables
            .matches
            .values()
            .filter(|m| {
                tables
                    .properties
                    .get(&m.property_id)
                    .is_some_and(|p| p.owner_id == owner_id)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    #[tokio::test]
    async fn test_duplicate_pairs_are_skipped() {
        let store = InMemoryStore::new();
        let first = NewMatch::pending("p1", "r1", 70);
        let mut rescored = NewMatch::pending("p1", "r1", 90);
        rescored.status = MatchStatus::Accepted;

        assert_eq!(store.insert_matches_ignoring_duplicates(&[first]).await.unwrap(), 1);
        assert_eq!(store.insert_matches_ignoring_duplicates(&[rescored]).await.unwrap(), 0);

        let stored = store.get_match("p1", "r1").await.unwrap();
        assert_eq!(stored.match_score, 70);
        assert_eq!(stored.status, MatchStatus::Pending);
    }

    #[tokio::test]
    async fn test_budget_filter_is_inclusive() {
        let store = InMemoryStore::new();
        let requirement: Requirement =
            serde_json::from_str(r#"{"id": "r1", "budgetMax": 180000000}"#).unwrap();
        store.put_requirement(requirement).await;

        let at_floor = store.find_active_requirements(Decimal::from(180_000_000)).await.unwrap();
        assert_eq!(at_floor.len(), 1);
        let above = store.find_active_requirements(Decimal::from(180_000_001)).await.unwrap();
        assert!(above.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_property_fails() {
        let store = InMemoryStore::new();
        let result = store.update_property("missing", &PropertyUpdate::default()).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
