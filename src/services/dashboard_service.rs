use std::sync::Arc;

use tracing::{info, warn};

use crate::config::FetchFailurePolicy;
use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{ChartRequest, ChartResult, ChartStatus, Interval, Period, PriceSeries};
use crate::services::chart_builder::ChartBuilder;

/// The running dashboard: a market data provider plus the chart builder,
/// wired together once at startup.
pub struct Dashboard {
    provider: Arc<dyn PriceProvider>,
    builder: ChartBuilder,
    failure_policy: FetchFailurePolicy,
}

impl Dashboard {
    pub fn new(provider: Arc<dyn PriceProvider>, builder: ChartBuilder, failure_policy: FetchFailurePolicy) -> Self {
        Self {
            provider,
            builder,
            failure_policy,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Maps one snapshot of the UI controls to the chart to draw.
    ///
    /// Every call fetches fresh data. Only a rate limit under the `error`
    /// policy escapes as an `Err`; every other outcome is an in-chart result.
    pub async fn render(&self, request: &ChartRequest) -> Result<ChartResult, AppError> {
        let series = match self
            .provider
            .fetch_history(&request.ticker, request.period, request.interval)
            .await
        {
            Ok(series) => series,
            Err(PriceProviderError::NotFound) => {
                info!("No history for {} from {}", request.ticker, self.provider.name());
                PriceSeries::empty(request.interval)
            }
            Err(e) => match self.failure_policy {
                FetchFailurePolicy::Empty => {
                    warn!(
                        "Fetch failed for {} ({}, {}): {}. Showing empty chart",
                        request.ticker, request.period, request.interval, e
                    );
                    PriceSeries::empty(request.interval)
                }
                FetchFailurePolicy::Error => {
                    warn!("Fetch failed for {} ({}, {}): {}", request.ticker, request.period, request.interval, e);
                    if let PriceProviderError::RateLimited = e {
                        return Err(AppError::RateLimited);
                    }
                    return Ok(ChartResult::placeholder(
                        ChartStatus::Error,
                        format!("Failed to fetch data for {}: {}", request.ticker, e),
                    ));
                }
            },
        };

        let result = self
            .builder
            .build(&series, &request.style, &request.ticker, request.period);

        info!(
            "Built {:?} chart for {} ({}, {}, {}) from {} bars",
            result.status,
            request.ticker,
            request.period,
            request.interval,
            request.style,
            series.len()
        );

        Ok(result)
    }

    /// Raw series behind a chart. Provider failures surface as errors here.
    pub async fn history(&self, ticker: &str, period: Period, interval: Interval) -> Result<PriceSeries, AppError> {
        self.provider
            .fetch_history(ticker, period, interval)
            .await
            .map_err(|e| {
                warn!("Failed to fetch history for {}: {}", ticker, e);
                AppError::from(e)
            })
    }
}
