use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{normalize_ticker, Interval, Period, PriceBar};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:ticker", get(get_prices))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub period: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceHistoryResponse {
    pub ticker: String,
    pub period: Period,
    pub interval: Interval,
    /// IANA name of the exchange zone, for rendering timestamps.
    pub timezone: String,
    pub bars: Vec<PriceBar>,
}

/// GET /api/prices/:ticker?period=&interval=
pub async fn get_prices(
    Path(ticker): Path<String>,
    Query(params): Query<HistoryParams>,
    State(state): State<AppState>,
) -> Result<Json<PriceHistoryResponse>, AppError> {
    let ticker = normalize_ticker(&ticker)?;
    let period = match params.period.as_deref() {
        Some(raw) => raw.parse::<Period>()?,
        None => state.defaults.period,
    };
    let interval = match params.interval.as_deref() {
        Some(raw) => raw.parse::<Interval>()?,
        None => state.defaults.interval,
    };

    info!("GET /api/prices/{} - {} {}", ticker, period, interval);

    let series = state.dashboard.history(&ticker, period, interval).await
        .map_err(|e| {
            error!("Failed to get price history for {}: {}", ticker, e);
            e
        })?;

    Ok(Json(PriceHistoryResponse {
        ticker,
        period,
        interval,
        timezone: series.timezone().name().to_string(),
        bars: series.bars().to_vec(),
    }))
}
