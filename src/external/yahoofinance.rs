use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{Interval, Period, PriceBar, PriceSeries};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart API. No API key required.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PriceProviderError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; StockDashboard/0.1)")
            .timeout(timeout)
            .build()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: YahooMeta,
    // Absent when the range holds no bars
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    #[serde(default)]
    exchange_timezone_name: Option<String>,
    #[serde(default)]
    gmtoffset: i32,
}

impl YahooMeta {
    /// Exchange zone by IANA name. Without one, a fixed `Etc/GMT` zone built
    /// from `gmtoffset`, which only holds for whole-hour offsets.
    fn timezone(&self) -> Tz {
        if let Some(name) = self.exchange_timezone_name.as_deref() {
            match name.parse::<Tz>() {
                Ok(tz) => return tz,
                Err(_) => warn!("Unknown exchange timezone {}, using gmtoffset", name),
            }
        }

        if self.gmtoffset % 3600 != 0 {
            return Tz::UTC;
        }
        // Etc/GMT names invert the sign: Etc/GMT+5 is UTC-5
        format!("Etc/GMT{:+}", -self.gmtoffset / 3600)
            .parse()
            .unwrap_or(Tz::UTC)
    }
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn into_series(body: YahooChartResponse, interval: Interval) -> Result<PriceSeries, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.code == "Not Found" || error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or(PriceProviderError::NotFound)?;

    let timezone = result.meta.timezone();

    if result.timestamp.is_empty() {
        return Ok(PriceSeries::empty(interval).with_exchange_timezone(timezone));
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?;

    let n = result.timestamp.len();
    if [quote.open.len(), quote.high.len(), quote.low.len(), quote.close.len()]
        .iter()
        .any(|len| *len != n)
    {
        return Err(PriceProviderError::Parse(
            "Timestamp and price arrays have different lengths".into(),
        ));
    }

    let bars: Vec<PriceBar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // Rows with gaps (halts, holidays) come back as nulls
            let bar = PriceBar::new(
                DateTime::from_timestamp(*ts, 0)?,
                quote.open[i]?,
                quote.high[i]?,
                quote.low[i]?,
                quote.close[i]?,
            );
            bar.is_finite().then_some(bar)
        })
        .collect();

    Ok(PriceSeries::from_unordered(interval, bars).with_exchange_timezone(timezone))
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, PriceProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", period.as_str()),
                ("interval", interval.as_str()),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let series = into_series(body, interval)?;
        debug!("Yahoo returned {} bars for {} ({}, {})", series.len(), ticker, period, interval);
        Ok(series)
    }
}
