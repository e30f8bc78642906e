use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{ChartRequest, ChartResult, ChartSelection};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_chart))
}

/// GET /api/chart?ticker=&period=&interval=&style=
///
/// Called by the dashboard page on every control change.
pub async fn get_chart(
    Query(selection): Query<ChartSelection>,
    State(state): State<AppState>,
) -> Result<Json<ChartResult>, AppError> {
    let request = ChartRequest::from_selection(&selection, &state.defaults)
        .map_err(|e| {
            warn!("Rejected chart selection {:?}: {}", selection, e);
            AppError::Validation(e)
        })?;

    info!(
        "GET /api/chart - {} {} {} {}",
        request.ticker, request.period, request.interval, request.style
    );

    let result = state.dashboard.render(&request).await?;
    Ok(Json(result))
}
