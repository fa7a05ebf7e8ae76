use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{ProfileAggregator, ProfileError};
use crate::models::{AddressQuery, ErrorResponse, GeoPoint, HealthResponse, ProfileRequest, SchoolsQuery, SchoolsResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: ProfileAggregator,
    pub default_radius_km: f64,
}

/// Configure property routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/property-profile", web::get().to(get_property_profile))
        .route("/property-profile", web::post().to(post_property_profile))
        .route("/geocode", web::get().to(geocode))
        .route("/schools", web::get().to(schools))
        .route("/property", web::get().to(property));
}

/// Health check endpoint; no upstream calls
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not found".to_string(),
        message: message.to_string(),
        status_code: 404,
    })
}

fn upstream_failure(e: &ProfileError) -> HttpResponse {
    HttpResponse::BadGateway().json(ErrorResponse {
        error: "Geocoding failed".to_string(),
        message: e.to_string(),
        status_code: 502,
    })
}

const NOT_GEOCODED: &str = "Address could not be geocoded. Check the address and try again.";

/// Unified property profile
///
/// GET /api/property-profile?address=...&radius_km=2.0
async fn get_property_profile(
    state: web::Data<AppState>,
    query: web::Query<ProfileRequest>,
) -> impl Responder {
    build_profile(&state, query.into_inner()).await
}

/// Unified property profile
///
/// POST /api/property-profile
///
/// Request body:
/// ```json
/// {
///   "address": "string",
///   "radius_km": 2.0
/// }
/// ```
async fn post_property_profile(
    state: web::Data<AppState>,
    req: web::Json<ProfileRequest>,
) -> impl Responder {
    build_profile(&state, req.into_inner()).await
}

async fn build_profile(state: &AppState, req: ProfileRequest) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for property profile request: {:?}", errors);
        return bad_request(errors.to_string());
    }

    let radius_km = req.radius_km.unwrap_or(state.default_radius_km);

    match state.aggregator.build_profile(&req.address, radius_km).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => not_found(NOT_GEOCODED),
        Err(e) => {
            tracing::error!("Failed to build profile for {}: {}", req.address, e);
            upstream_failure(&e)
        }
    }
}

/// Geocode only
///
/// GET /api/geocode?address=...
async fn geocode(state: web::Data<AppState>, query: web::Query<AddressQuery>) -> impl Responder {
    let query = query.into_inner().trimmed();
    if let Err(errors) = query.validate() {
        return bad_request(errors.to_string());
    }

    match state.aggregator.providers().geocoder.geocode(&query.address).await {
        Ok(Some(result)) => HttpResponse::Ok().json(result),
        Ok(None) => not_found("Address could not be geocoded."),
        Err(e) => {
            tracing::error!("Geocoding failed for {}: {}", query.address, e);
            upstream_failure(&ProfileError::from(e))
        }
    }
}

/// Schools near a point
///
/// GET /api/schools?lat=...&lon=...&radius_km=5.0
async fn schools(state: web::Data<AppState>, query: web::Query<SchoolsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request(errors.to_string());
    }

    let schools = state
        .aggregator
        .providers()
        .schools
        .find_schools(GeoPoint::new(query.lat, query.lon), query.radius_km)
        .await;

    HttpResponse::Ok().json(SchoolsResponse { schools })
}

/// Property record by address
///
/// GET /api/property?address=...
async fn property(state: web::Data<AppState>, query: web::Query<AddressQuery>) -> impl Responder {
    let query = query.into_inner().trimmed();
    if let Err(errors) = query.validate() {
        return bad_request(errors.to_string());
    }

    match state.aggregator.providers().property.lookup_property(&query.address).await {
        Some(record) => HttpResponse::Ok().json(record),
        None => not_found(crate::models::NO_PROPERTY_MESSAGE),
    }
}
