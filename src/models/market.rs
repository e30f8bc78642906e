use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Lookback window requested from the market data provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::OneDay => "1 Day",
            Period::FiveDays => "5 Days",
            Period::OneMonth => "1 Month",
            Period::ThreeMonths => "3 Months",
            Period::SixMonths => "6 Months",
            Period::OneYear => "1 Year",
            Period::FiveYears => "5 Years",
            Period::Max => "Max",
        }
    }

    /// Calendar days covered by the window. `Max` is capped at 20 years.
    pub fn approx_days(&self) -> i64 {
        match self {
            Period::OneDay => 1,
            Period::FiveDays => 5,
            Period::OneMonth => 30,
            Period::ThreeMonths => 91,
            Period::SixMonths => 182,
            Period::OneYear => 365,
            Period::FiveYears => 5 * 365,
            Period::Max => 20 * 365,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::OneMonth
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let accepted: Vec<&str> = Period::ALL.iter().map(|p| p.as_str()).collect();
                format!("Invalid period: {} (expected one of {})", s, accepted.join(", "))
            })
    }
}

/// Sampling granularity of the returned bars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::OneHour, Interval::OneDay, Interval::OneWeek];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Interval::OneHour => "1 Hour",
            Interval::OneDay => "1 Day",
            Interval::OneWeek => "1 Week",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(self, Interval::OneHour)
    }

    pub fn step(&self) -> Duration {
        match self {
            Interval::OneHour => Duration::hours(1),
            Interval::OneDay => Duration::days(1),
            Interval::OneWeek => Duration::weeks(1),
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::OneHour
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let accepted: Vec<&str> = Interval::ALL.iter().map(|i| i.as_str()).collect();
                format!("Invalid interval: {} (expected one of {})", s, accepted.join(", "))
            })
    }
}
