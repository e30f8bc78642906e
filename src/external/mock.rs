use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{Interval, Period, PriceBar, PriceSeries};

/// Exchange zone for the synthetic session.
const EXCHANGE_TZ: Tz = New_York;
/// Hourly bars start at the session open and stop before the close.
const HOURLY_BARS_PER_SESSION: u32 = 7;
/// Yahoo only serves hourly bars for the last 730 days.
const MAX_INTRADAY_DAYS: i64 = 730;

/// Offline provider producing a deterministic random walk per ticker.
///
/// Only tickers in `symbols` have data; anything else yields an empty series,
/// the same way the real provider answers for a symbol without history.
pub struct MockProvider {
    symbols: Vec<String>,
    clock: Option<DateTime<Utc>>,
}

impl MockProvider {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols, clock: None }
    }

    /// Pins "now" so generated series do not depend on the wall clock.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    fn seed_for(ticker: &str) -> u64 {
        // FNV-1a, stable across runs and toolchains
        ticker.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, b| {
            (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        })
    }

    fn is_weekend(day: NaiveDate) -> bool {
        matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn bar_times(now: DateTime<Utc>, period: Period, interval: Interval) -> Vec<DateTime<Utc>> {
        let Some(session_open) = NaiveTime::from_hms_opt(9, 30, 0) else {
            return Vec::new();
        };

        let mut days = period.approx_days();
        if interval.is_intraday() {
            days = days.min(MAX_INTRADAY_DAYS);
        }

        let end_day = now.with_timezone(&EXCHANGE_TZ).date_naive();
        let mut start_day = end_day - Duration::days(days);

        // A weekend-only window reaches back to the last session
        if start_day.iter_days().take_while(|d| *d <= end_day).all(Self::is_weekend) {
            while Self::is_weekend(start_day) {
                start_day -= Duration::days(1);
            }
        }

        let mut times = Vec::new();
        for day in start_day.iter_days().take_while(|d| *d <= end_day) {
            if Self::is_weekend(day) {
                continue;
            }
            if interval == Interval::OneWeek && day.weekday() != Weekday::Mon {
                continue;
            }

            let Some(open) = EXCHANGE_TZ
                .from_local_datetime(&day.and_time(session_open))
                .single()
            else {
                continue;
            };
            let open = open.with_timezone(&Utc);

            let per_day = if interval.is_intraday() { HOURLY_BARS_PER_SESSION } else { 1 };
            for k in 0..per_day {
                let ts = open + interval.step() * k as i32;
                if ts <= now {
                    times.push(ts);
                }
            }
        }
        times
    }

    pub fn generate(&self, ticker: &str, period: Period, interval: Interval) -> PriceSeries {
        if !self.symbols.iter().any(|s| s.eq_ignore_ascii_case(ticker)) {
            return PriceSeries::empty(interval).with_exchange_timezone(EXCHANGE_TZ);
        }

        let now = self.clock.unwrap_or_else(Utc::now);
        let mut rng = StdRng::seed_from_u64(Self::seed_for(&ticker.to_ascii_uppercase()));
        let mut last_close = 50.0 + rng.random::<f64>() * 450.0;

        let bars = Self::bar_times(now, period, interval)
            .into_iter()
            .map(|ts| {
                let open = last_close;
                let close = open * (1.0 + (rng.random::<f64>() - 0.5) * 0.02);
                let high = open.max(close) * (1.0 + rng.random::<f64>() * 0.005);
                let low = open.min(close) * (1.0 - rng.random::<f64>() * 0.005);
                last_close = close;
                PriceBar::new(ts, open, high, low, close)
            })
            .collect();

        PriceSeries::from_unordered(interval, bars).with_exchange_timezone(EXCHANGE_TZ)
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, PriceProviderError> {
        Ok(self.generate(ticker, period, interval))
    }
}
