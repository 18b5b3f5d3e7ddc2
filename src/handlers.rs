use crate::config::Config;
use crate::enrichment::{email_fingerprint, is_valid_email};
use crate::errors::AppError;
use crate::impact::{Enricher, ImpactService};
use crate::models::{EnrichRequest, EnrichedProfile, ImpactMap, ImpactMapRequest};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The impact map service, wired to the configured enricher.
    pub service: ImpactService<Enricher>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and enrichment mode.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-impact-api",
            "version": env!("CARGO_PKG_VERSION"),
            "enrichmentMode": state.config.enrichment_mode,
        })),
    )
}

fn validated_email(raw: &str) -> Result<&str, AppError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("email is required".to_string()));
    }
    if !is_valid_email(email) {
        return Err(AppError::BadRequest("email is not a valid address".to_string()));
    }
    Ok(email)
}

/// POST /api/v1/impact-map
///
/// Enriches the email and returns the full financial-risk profile.
pub async fn impact_map(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImpactMapRequest>,
) -> Result<Json<ImpactMap>, AppError> {
    let email = validated_email(&request.email)?;
    tracing::info!("POST /impact-map - subject {}", email_fingerprint(email));

    let map = state
        .service
        .produce_impact_map(
            email,
            request.age_range.as_deref(),
            request.marital_status.as_deref(),
        )
        .await?;

    tracing::info!(
        "Impact map ready: score {}, confidence {:?}, {} life event(s)",
        map.decisioning.coverage_confidence_score,
        map.confidence_level,
        map.decisioning.life_events.len()
    );

    Ok(Json(map))
}

/// POST /api/v1/enrich
///
/// Returns the enriched profile without the inference steps.
pub async fn enrich(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichedProfile>, AppError> {
    let email = validated_email(&request.email)?;
    tracing::info!("POST /enrich - subject {}", email_fingerprint(email));

    let profile = state.service.enrich_email(email).await?;
    Ok(Json(profile))
}

/// The rate-limited API routes, without state attached.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/impact-map", post(impact_map))
        .route("/api/v1/enrich", post(enrich))
}

/// Every route with state attached and no transport middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        .with_state(state)
}
