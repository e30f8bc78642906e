use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;
use crate::external::yahoofinance;
use crate::models::{normalize_ticker, ChartDefaults, ChartStyle, Interval, Period};
use crate::services::chart_builder::TradingSession;

const DEFAULT_TICKERS: &str = "AAPL:Apple,MSFT:Microsoft,TSLA:Tesla,AMZN:Amazon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(ProviderKind::Yahoo),
            "mock" => Ok(ProviderKind::Mock),
            _ => Err(format!("Invalid PRICE_PROVIDER: {}. Must be 'yahoo' or 'mock'", s)),
        }
    }
}

/// What the dashboard shows when the provider call itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Log the failure and draw the "no data" placeholder.
    #[default]
    Empty,
    /// Draw an error placeholder carrying the failure reason.
    Error,
}

impl std::str::FromStr for FetchFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(FetchFailurePolicy::Empty),
            "error" => Ok(FetchFailurePolicy::Error),
            _ => Err(format!("Invalid FETCH_FAILURE_POLICY: {}. Must be 'empty' or 'error'", s)),
        }
    }
}

/// A dropdown entry, rendered as "Apple (AAPL)".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerOption {
    pub symbol: String,
    pub name: String,
}

impl TickerOption {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// Parses `SYMBOL:Name` pairs separated by commas. A bare symbol is its own name.
pub fn parse_ticker_list(raw: &str) -> Result<Vec<TickerOption>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (symbol, name) = match entry.split_once(':') {
                Some((symbol, name)) => (symbol, name.trim()),
                None => (entry, ""),
            };
            let symbol = normalize_ticker(symbol)?;
            let name = if name.is_empty() { symbol.clone() } else { name.to_string() };
            Ok(TickerOption { symbol, name })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub bind_addr: String,
    pub provider: String,
    pub yahoo_base_url: String,
    pub http_timeout_secs: String,
    pub fetch_failure_policy: String,
    pub tickers: String,
    pub default_ticker: String,
    pub default_period: String,
    pub default_interval: String,
    pub default_style: String,
    pub session_open_hour: String,
    pub session_close_hour: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            provider: "yahoo".to_string(),
            yahoo_base_url: yahoofinance::DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: "10".to_string(),
            fetch_failure_policy: "empty".to_string(),
            tickers: DEFAULT_TICKERS.to_string(),
            default_ticker: "AAPL".to_string(),
            default_period: "1mo".to_string(),
            default_interval: "1h".to_string(),
            default_style: "candlestick".to_string(),
            session_open_hour: "9.5".to_string(),
            session_close_hour: "16".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| std::env::var(key).unwrap_or(fallback);

        Self {
            bind_addr: var("BIND_ADDR", defaults.bind_addr),
            provider: var("PRICE_PROVIDER", defaults.provider),
            yahoo_base_url: var("YAHOO_BASE_URL", defaults.yahoo_base_url),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            fetch_failure_policy: var("FETCH_FAILURE_POLICY", defaults.fetch_failure_policy),
            tickers: var("DASHBOARD_TICKERS", defaults.tickers),
            default_ticker: var("DEFAULT_TICKER", defaults.default_ticker),
            default_period: var("DEFAULT_PERIOD", defaults.default_period),
            default_interval: var("DEFAULT_INTERVAL", defaults.default_interval),
            default_style: var("DEFAULT_STYLE", defaults.default_style),
            session_open_hour: var("SESSION_OPEN_HOUR", defaults.session_open_hour),
            session_close_hour: var("SESSION_CLOSE_HOUR", defaults.session_close_hour),
        }
    }

    /// Checks every field and returns the typed settings used at startup.
    pub fn validate(&self) -> Result<Settings, AppError> {
        let bind_addr: SocketAddr = self
            .bind_addr
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid BIND_ADDR: {}", self.bind_addr)))?;

        let provider: ProviderKind = self.provider.parse().map_err(AppError::Config)?;
        let failure_policy: FetchFailurePolicy =
            self.fetch_failure_policy.parse().map_err(AppError::Config)?;

        let http_timeout_secs = match self.http_timeout_secs.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(AppError::Config(format!(
                    "HTTP_TIMEOUT_SECS must be a positive number of seconds, got {}",
                    self.http_timeout_secs
                )))
            }
        };

        let tickers = parse_ticker_list(&self.tickers)
            .map_err(|e| AppError::Config(format!("Invalid DASHBOARD_TICKERS: {}", e)))?;
        if tickers.is_empty() {
            return Err(AppError::Config("DASHBOARD_TICKERS must list at least one ticker".to_string()));
        }

        let style = ChartStyle::parse(&self.default_style);
        if let ChartStyle::Unsupported(raw) = &style {
            return Err(AppError::Config(format!("Invalid DEFAULT_STYLE: {}", raw)));
        }

        let defaults = ChartDefaults {
            ticker: normalize_ticker(&self.default_ticker)
                .map_err(|e| AppError::Config(format!("Invalid DEFAULT_TICKER: {}", e)))?,
            period: self.default_period.parse::<Period>().map_err(AppError::Config)?,
            interval: self.default_interval.parse::<Interval>().map_err(AppError::Config)?,
            style,
        };

        let session = TradingSession {
            open_hour: parse_hour("SESSION_OPEN_HOUR", &self.session_open_hour)?,
            close_hour: parse_hour("SESSION_CLOSE_HOUR", &self.session_close_hour)?,
        };
        if session.open_hour >= session.close_hour {
            return Err(AppError::Config(format!(
                "SESSION_OPEN_HOUR ({}) must be before SESSION_CLOSE_HOUR ({})",
                session.open_hour, session.close_hour
            )));
        }

        Ok(Settings {
            bind_addr,
            provider,
            yahoo_base_url: self.yahoo_base_url.clone(),
            http_timeout: Duration::from_secs(http_timeout_secs),
            failure_policy,
            tickers,
            defaults,
            session,
        })
    }
}

fn parse_hour(key: &str, raw: &str) -> Result<f64, AppError> {
    match raw.trim().parse::<f64>() {
        Ok(hour) if (0.0..=24.0).contains(&hour) => Ok(hour),
        _ => Err(AppError::Config(format!("{} must be an hour between 0 and 24, got {}", key, raw))),
    }
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub provider: ProviderKind,
    pub yahoo_base_url: String,
    pub http_timeout: Duration,
    pub failure_policy: FetchFailurePolicy,
    pub tickers: Vec<TickerOption>,
    pub defaults: ChartDefaults,
    pub session: TradingSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = DashboardConfig::default().validate().unwrap();

        assert_eq!(settings.bind_addr.port(), 3000);
        assert_eq!(settings.provider, ProviderKind::Yahoo);
        assert_eq!(settings.failure_policy, FetchFailurePolicy::Empty);
        assert_eq!(settings.tickers.len(), 4);
        assert_eq!(settings.tickers[0].label(), "Apple (AAPL)");
        assert_eq!(settings.defaults.ticker, "AAPL");
        assert_eq!(settings.defaults.interval, Interval::OneHour);
        assert_eq!(settings.session, TradingSession::default());
        assert_eq!(settings.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_bad_http_timeout() {
        for raw in ["abc", "0", "-5", ""] {
            let config = DashboardConfig { http_timeout_secs: raw.into(), ..Default::default() };
            assert!(
                matches!(config.validate(), Err(AppError::Config(msg)) if msg.contains("HTTP_TIMEOUT_SECS")),
                "accepted {:?}",
                raw
            );
        }

        let config = DashboardConfig { http_timeout_secs: " 30 ".into(), ..Default::default() };
        assert_eq!(config.validate().unwrap().http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_ticker_list() {
        let tickers = parse_ticker_list(" nvda:NVIDIA , SPY ,, ").unwrap();
        assert_eq!(
            tickers,
            vec![
                TickerOption { symbol: "NVDA".into(), name: "NVIDIA".into() },
                TickerOption { symbol: "SPY".into(), name: "SPY".into() },
            ]
        );
        assert!(parse_ticker_list("A B:Bad").is_err());
    }

    #[test]
    fn test_rejects_unknown_provider_and_policy() {
        let config = DashboardConfig { provider: "twelvedata".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(AppError::Config(msg)) if msg.contains("PRICE_PROVIDER")));

        let config = DashboardConfig { fetch_failure_policy: "retry".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(AppError::Config(msg)) if msg.contains("FETCH_FAILURE_POLICY")));
    }

    #[test]
    fn test_rejects_bad_defaults() {
        let config = DashboardConfig { default_period: "2y".into(), ..Default::default() };
        assert!(config.validate().is_err());

        let config = DashboardConfig { default_style: "bar".into(), ..Default::default() };
        assert!(config.validate().is_err());

        let config = DashboardConfig { tickers: " , ".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_session() {
        let config = DashboardConfig {
            session_open_hour: "16".into(),
            session_close_hour: "9.5".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DashboardConfig { session_close_hour: "25".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_parse_is_case_insensitive() {
        assert_eq!("ERROR".parse::<FetchFailurePolicy>().unwrap(), FetchFailurePolicy::Error);
        assert_eq!("Mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
    }
}
