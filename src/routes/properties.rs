use actix_web::{web, HttpResponse, Responder};
use crate::core::get_fuzzy_location;
use crate::models::{
    DistressedResponse, ErrorResponse, FindMatchesResponse, ProcessPropertyResponse,
};
use crate::routes::matches::AppState;
use crate::services::{MatchStore, StoreError};

/// Configure property workflow routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/properties/{id}/process", web::post().to(process_property))
        .route("/properties/{id}/matches", web::post().to(find_matches))
        .route("/properties/{id}/distressed", web::post().to(update_distressed))
        .route("/properties/{id}/location", web::get().to(fuzzy_location));
}

fn storage_error(context: &str, e: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

/// Run the post-upload sequence for a freshly written property
///
/// POST /api/v1/properties/{id}/process
async fn process_property(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let property_id = path.into_inner();

    match state.engine.process_new_property(&property_id).await {
        Ok(report) => HttpResponse::Ok().json(ProcessPropertyResponse {
            property_id,
            analysis: report.analysis,
            matches_created: report.matches_created,
        }),
        Err(e) => storage_error("Failed to process property", e),
    }
}

/// POST /api/v1/properties/{id}/matches
async fn find_matches(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let property_id = path.into_inner();

    match state.engine.find_matches_for_property(&property_id).await {
        Ok(created) => HttpResponse::Ok().json(FindMatchesResponse {
            property_id,
            created,
        }),
        Err(e) => storage_error("Failed to find matches", e),
    }
}

/// POST /api/v1/properties/{id}/distressed
async fn update_distressed(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let property_id = path.into_inner();

    match state.engine.update_distressed_status(&property_id).await {
        Ok(analysis) => HttpResponse::Ok().json(DistressedResponse {
            property_id,
            analysis,
        }),
        Err(e) => storage_error("Failed to update distressed status", e),
    }
}

/// Public location for a property. Never exposes the exact address or
/// coordinates.
///
/// GET /api/v1/properties/{id}/location
async fn fuzzy_location(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let property_id = path.into_inner();

    match state.engine.store().get_property(&property_id).await {
        Ok(Some(property)) => HttpResponse::Ok().json(get_fuzzy_location(&property)),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Property not found".to_string(),
            message: format!("No property with id {}", property_id),
            status_code: 404,
        }),
        Err(e) => storage_error("Failed to fetch property", e),
    }
}
