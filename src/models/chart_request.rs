use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Interval, Period};

/// Chart representation picked in the UI.
///
/// Parsing never fails: anything other than the two known styles is kept as
/// `Unsupported` so the chart builder can answer with an in-chart message
/// instead of a request error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartStyle {
    Candlestick,
    Line,
    Unsupported(String),
}

impl ChartStyle {
    pub const SUPPORTED: [ChartStyle; 2] = [ChartStyle::Candlestick, ChartStyle::Line];

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("candlestick") {
            ChartStyle::Candlestick
        } else if trimmed.eq_ignore_ascii_case("line") {
            ChartStyle::Line
        } else {
            ChartStyle::Unsupported(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChartStyle::Candlestick => "candlestick",
            ChartStyle::Line => "line",
            ChartStyle::Unsupported(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ChartStyle::Candlestick => "Candlestick",
            ChartStyle::Line => "Line",
            ChartStyle::Unsupported(raw) => raw,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle::Candlestick
    }
}

impl std::fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChartStyle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw control values as sent by the dashboard page. Missing fields fall
/// back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartSelection {
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
    pub style: Option<String>,
}

/// Initial control values, also used for fields missing from a selection.
#[derive(Debug, Clone, Serialize)]
pub struct ChartDefaults {
    pub ticker: String,
    pub period: Period,
    pub interval: Interval,
    pub style: ChartStyle,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            period: Period::default(),
            interval: Interval::default(),
            style: ChartStyle::default(),
        }
    }
}

/// A validated chart request, rebuilt on every UI interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub ticker: String,
    pub period: Period,
    pub interval: Interval,
    pub style: ChartStyle,
}

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9.\-^=]{1,15}$").expect("ticker pattern is valid"))
}

/// Trims and upper-cases a ticker, rejecting anything a provider could not
/// treat as a symbol.
pub fn normalize_ticker(raw: &str) -> Result<String, String> {
    let ticker = raw.trim().to_ascii_uppercase();
    if ticker.is_empty() {
        return Err("Ticker must not be empty".to_string());
    }
    if !ticker_pattern().is_match(&ticker) {
        return Err(format!("Invalid ticker: {}", raw.trim()));
    }
    Ok(ticker)
}

impl ChartRequest {
    pub fn new(ticker: &str, period: Period, interval: Interval, style: ChartStyle) -> Result<Self, String> {
        Ok(Self {
            ticker: normalize_ticker(ticker)?,
            period,
            interval,
            style,
        })
    }

    pub fn from_selection(selection: &ChartSelection, defaults: &ChartDefaults) -> Result<Self, String> {
        let ticker = match selection.ticker.as_deref() {
            Some(raw) => normalize_ticker(raw)?,
            None => defaults.ticker.clone(),
        };

        let period = match selection.period.as_deref() {
            Some(raw) => raw.parse::<Period>()?,
            None => defaults.period,
        };

        let interval = match selection.interval.as_deref() {
            Some(raw) => raw.parse::<Interval>()?,
            None => defaults.interval,
        };

        let style = selection
            .style
            .as_deref()
            .map(ChartStyle::parse)
            .unwrap_or_else(|| defaults.style.clone());

        Ok(Self { ticker, period, interval, style })
    }
}
