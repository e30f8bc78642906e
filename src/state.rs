use std::sync::Arc;

use crate::config::TickerOption;
use crate::models::ChartDefaults;
use crate::services::dashboard_service::Dashboard;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub tickers: Arc<Vec<TickerOption>>,
    pub defaults: Arc<ChartDefaults>,
}
