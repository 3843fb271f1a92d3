use crate::dto::ReloadResponse;
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::{error, info, instrument};

#[instrument(skip(state), name = "api_reload_zones")]
pub async fn reload_zones(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    info!("Zone reload requested");

    let summary = state.reload_zones.execute().await.map_err(|e| {
        error!(error = %e, "Zone reload failed, keeping current zones");
        ApiError(e)
    })?;

    Ok(Json(summary.into()))
}
