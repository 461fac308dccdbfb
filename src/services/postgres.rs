use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use crate::models::{Match, NewMatch, Property, PropertyType, PropertyUpdate, Requirement};
use crate::services::storage::{MatchStore, StoreError};

const PROPERTY_COLUMNS: &str = r#"
    id, owner_id, title, description, price, currency, location, latitude, longitude,
    property_type, bedrooms, bathrooms, square_meters, status, is_distressed,
    opportunity_score, internal_notes, created_at
"#;

/// Bind parameters per inserted match row
const BINDS_PER_MATCH: usize = 5;

/// Rows per INSERT statement, well under the 65,535 bind parameter limit
const MATCH_INSERT_CHUNK: usize = 1_000;

const _: () = assert!(MATCH_INSERT_CHUNK * BINDS_PER_MATCH <= u16::MAX as usize);

/// PostgreSQL-backed match store
///
/// Properties and requirements are written by the marketplace application;
/// this client only reads them, inserts matches and updates the derived
/// distressed fields of a property.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn property_from_row(row: &PgRow) -> Result<Property, StoreError> {
    let property_type: String = row.try_get("property_type")?;
    let status: String = row.try_get("status")?;

    Ok(Property {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        currency: row.try_get("currency")?,
        location: row.try_get("location")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        property_type: property_type.parse()?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        square_meters: row.try_get("square_meters")?,
        status: status.parse()?,
        is_distressed: row.try_get("is_distressed")?,
        opportunity_score: row.try_get("opportunity_score")?,
        internal_notes: row.try_get("internal_notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn requirement_from_row(row: &PgRow) -> Result<Requirement, StoreError> {
    let property_types: Vec<String> = row.try_get("property_types")?;
    let priority: String = row.try_get("priority")?;

    Ok(Requirement {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        budget_max: row.try_get("budget_max")?,
        currency: row.try_get("currency")?,
        zone_interest: row.try_get("zone_interest")?,
        property_types: property_types
            .iter()
            .map(|kind| kind.parse::<PropertyType>())
            .collect::<Result<Vec<_>, _>>()?,
        min_bedrooms: row.try_get("min_bedrooms")?,
        min_bathrooms: row.try_get("min_bathrooms")?,
        min_square_meters: row.try_get("min_square_meters")?,
        priority: priority.parse()?,
        is_active: row.try_get("is_active")?,
        exchange_notes: row.try_get("exchange_notes")?,
    })
}

fn match_from_row(row: &PgRow) -> Result<Match, StoreError> {
    let status: String = row.try_get("status")?;

    Ok(Match {
        id: row.try_get("id")?,
        property_id: row.try_get("property_id")?,
        requirement_id: row.try_get("requirement_id")?,
        match_score: row.try_get("match_score")?,
        status: status.parse()?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn get_property(&self, id: &str) -> Result<Option<Property>, StoreError> {
        let query = format!("SELECT {} FROM properties WHERE id = $1", PROPERTY_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(property_from_row).transpose()
    }

    async fn find_active_requirements(&self, min_budget: Decimal) -> Result<Vec<Requirement>, StoreError> {
        let query = r#"
            SELECT id, user_id, budget_max, currency, zone_interest, property_types,
                   min_bedrooms, min_bathrooms, min_square_meters, priority, is_active,
                   exchange_notes
            FROM requirements
            WHERE is_active = TRUE AND budget_max >= $1
            ORDER BY created_at
        "#;

        let rows = sqlx::query(query)
            .bind(min_budget)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} active requirements with budget >= {}", rows.len(), min_budget);

        rows.iter().map(requirement_from_row).collect()
    }

    /// Uses INSERT ... ON CONFLICT DO NOTHING so existing pairs keep their
    /// original score and status. Large batches are split into several
    /// statements.
    async fn insert_matches_ignoring_duplicates(&self, matches: &[NewMatch]) -> Result<u64, StoreError> {
        if matches.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;

        for chunk in matches.chunks(MATCH_INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO matches (id, property_id, requirement_id, match_score, status, created_at) ",
            );
            builder.push_values(chunk, |mut row, m| {
                row.push_bind(uuid::Uuid::new_v4())
                    .push_bind(&m.property_id)
                    .push_bind(&m.requirement_id)
                    .push_bind(m.match_score)
                    .push_bind(m.status.as_str())
                    .push("NOW()");
            });
            builder.push(" ON CONFLICT (property_id, requirement_id) DO NOTHING");

            let result = builder.build().execute(&self.pool).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    async fn update_property(&self, id: &str, update: &PropertyUpdate) -> Result<(), StoreError> {
        let query = r#"
            UPDATE properties SET
                is_distressed = COALESCE($2, is_distressed),
                opportunity_score = COALESCE($3, opportunity_score),
                internal_notes = COALESCE($4, internal_notes),
                updated_at = NOW()
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .bind(update.is_distressed)
            .bind(update.opportunity_score)
            .bind(update.internal_notes.as_deref())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("property {}", id)));
        }

        Ok(())
    }

    async fn list_matches_for_owner(&self, owner_id: &str) -> Result<Vec<Match>, StoreError> {
        let query = r#"
            SELECT m.id, m.property_id, m.requirement_id, m.match_score, m.status, m.created_at
            FROM matches m
            JOIN properties p ON p.id = m.property_id
            WHERE p.owner_id = $1
            ORDER BY m.created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(match_from_row).collect()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
