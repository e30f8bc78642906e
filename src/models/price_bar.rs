use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Interval;

// One OHLC bar as returned by a market data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { timestamp, open, high, low, close }
    }

    /// A bar is usable only when every price is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bar {index} is not strictly after the previous bar")]
    NotIncreasing { index: usize },
}

/// Time-ordered bars for one ticker at one sampling interval.
///
/// Timestamps are strictly increasing. The series may be empty, which is how
/// providers report "no data for this combination".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    interval: Interval,
    /// Exchange time zone, used when rendering timestamps.
    timezone: Tz,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(interval: Interval, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if let Some(index) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(SeriesError::NotIncreasing { index: index + 1 });
        }

        Ok(Self {
            interval,
            timezone: Tz::UTC,
            bars,
        })
    }

    /// Sorts the bars and drops repeated timestamps, keeping the first one seen.
    pub fn from_unordered(interval: Interval, mut bars: Vec<PriceBar>) -> Self {
        // Stable sort so the first occurrence of a duplicate stays first
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);

        Self {
            interval,
            timezone: Tz::UTC,
            bars,
        }
    }

    pub fn empty(interval: Interval) -> Self {
        Self {
            interval,
            timezone: Tz::UTC,
            bars: Vec::new(),
        }
    }

    pub fn with_exchange_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar_at(hour: u32, close: f64) -> PriceBar {
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, hour, 30, 0).unwrap();
        PriceBar::new(ts, close - 1.0, close + 1.0, close - 2.0, close)
    }

    #[test]
    fn test_new_accepts_increasing_timestamps() {
        let series = PriceSeries::new(Interval::OneHour, vec![bar_at(14, 10.0), bar_at(15, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.interval(), Interval::OneHour);
    }

    #[test]
    fn test_new_rejects_duplicate_timestamp() {
        let err = PriceSeries::new(Interval::OneHour, vec![bar_at(14, 10.0), bar_at(14, 11.0)]).unwrap_err();
        assert_eq!(err, SeriesError::NotIncreasing { index: 1 });
    }

    #[test]
    fn test_new_rejects_descending_order() {
        let err = PriceSeries::new(
            Interval::OneHour,
            vec![bar_at(13, 1.0), bar_at(15, 2.0), bar_at(14, 3.0)],
        )
        .unwrap_err();
        assert_eq!(err, SeriesError::NotIncreasing { index: 2 });
    }

    #[test]
    fn test_from_unordered_sorts_and_dedups() {
        let series = PriceSeries::from_unordered(
            Interval::OneHour,
            vec![bar_at(15, 3.0), bar_at(14, 1.0), bar_at(15, 9.0)],
        );
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 3.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty(Interval::OneDay);
        assert!(series.is_empty());
        assert_eq!(series.timezone(), Tz::UTC);

        let series = series.with_exchange_timezone(chrono_tz::America::New_York);
        assert_eq!(series.timezone().name(), "America/New_York");
    }

    #[test]
    fn test_bar_is_finite() {
        let mut bar = bar_at(14, 10.0);
        assert!(bar.is_finite());
        bar.high = f64::NAN;
        assert!(!bar.is_finite());
    }
}
