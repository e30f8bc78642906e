use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::models::{ChartDefaults, ChartStyle, Interval, Period};
use crate::state::AppState;

const DASHBOARD_PAGE: &str = include_str!("../../static/dashboard.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/api/options", get(get_options))
}

#[derive(Debug, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

/// Everything the page needs to populate its controls.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub tickers: Vec<SelectOption>,
    pub periods: Vec<SelectOption>,
    pub intervals: Vec<SelectOption>,
    pub styles: Vec<SelectOption>,
    pub defaults: ChartDefaults,
}

async fn index_page() -> Html<&'static str> {
    info!("GET / - Dashboard page");
    Html(DASHBOARD_PAGE)
}

/// GET /api/options
async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        tickers: state
            .tickers
            .iter()
            .map(|t| SelectOption::new(t.label(), t.symbol.clone()))
            .collect(),
        periods: Period::ALL
            .iter()
            .map(|p| SelectOption::new(p.label(), p.as_str()))
            .collect(),
        intervals: Interval::ALL
            .iter()
            .map(|i| SelectOption::new(i.label(), i.as_str()))
            .collect(),
        styles: ChartStyle::SUPPORTED
            .iter()
            .map(|s| SelectOption::new(s.label(), s.as_str()))
            .collect(),
        defaults: state.defaults.as_ref().clone(),
    })
}
