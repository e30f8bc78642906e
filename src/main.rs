use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use stock_dashboard::app;
use stock_dashboard::config::{DashboardConfig, ProviderKind};
use stock_dashboard::external::mock::MockProvider;
use stock_dashboard::external::price_provider::PriceProvider;
use stock_dashboard::external::yahoofinance::YahooFinanceProvider;
use stock_dashboard::logging::{init_logging, LoggingConfig};
use stock_dashboard::services::chart_builder::ChartBuilder;
use stock_dashboard::services::dashboard_service::Dashboard;
use stock_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let settings = DashboardConfig::from_env()
        .validate()
        .context("Invalid dashboard configuration")?;

    let provider: Arc<dyn PriceProvider> = match settings.provider {
        ProviderKind::Yahoo => {
            tracing::info!("📊 Using price provider: Yahoo Finance ({})", settings.yahoo_base_url);
            Arc::new(
                YahooFinanceProvider::new(&settings.yahoo_base_url, settings.http_timeout)
                    .context("Failed to create YahooFinanceProvider")?,
            )
        }
        ProviderKind::Mock => {
            tracing::info!("📊 Using price provider: offline mock data");
            let symbols = settings.tickers.iter().map(|t| t.symbol.clone()).collect();
            Arc::new(MockProvider::new(symbols))
        }
    };

    tracing::info!("Fetch failures are shown as: {:?}", settings.failure_policy);

    let dashboard = Dashboard::new(provider, ChartBuilder::new(settings.session), settings.failure_policy);
    let state = AppState {
        dashboard: Arc::new(dashboard),
        tickers: Arc::new(settings.tickers),
        defaults: Arc::new(settings.defaults),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    tracing::info!("🚀 Stock dashboard running at http://{}/", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
