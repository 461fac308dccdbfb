use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::MatchingEngine;
use crate::services::MatchStore;
use crate::models::{
    ErrorResponse, HealthResponse, OwnerMatchesQuery, OwnerMatchesResponse, ScoreRequest,
    ScoreResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchingEngine,
}

/// Configure scoring and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/score", web::post().to(score))
        .route("/matches", web::get().to(owner_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.engine.store().health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one property against one requirement without persisting anything
///
/// POST /api/v1/score
///
/// Request body:
/// ```json
/// {
///   "property": { "id": "p1", "location": "Av. Apoquindo 3000, Las Condes", "propertyType": "HOUSE", "price": 500000000 },
///   "requirement": { "id": "r1", "zoneInterest": ["Las Condes"], "budgetMax": 500000000 }
/// }
/// ```
async fn score(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let breakdown = state.engine.scorer().breakdown(&req.property, &req.requirement);

    HttpResponse::Ok().json(ScoreResponse {
        score: breakdown.total(),
        breakdown,
    })
}

/// Matches on the properties a broker owns
///
/// GET /api/v1/matches?ownerId={ownerId}
async fn owner_matches(
    state: web::Data<AppState>,
    query: web::Query<OwnerMatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.engine.store().list_matches_for_owner(&query.owner_id).await {
        Ok(matches) => HttpResponse::Ok().json(OwnerMatchesResponse {
            owner_id: query.owner_id.clone(),
            count: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to list matches for owner {}: {}", query.owner_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
