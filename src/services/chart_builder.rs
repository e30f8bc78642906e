use crate::models::{
    Axis, ChartResult, ChartStatus, ChartStyle, Figure, Layout, Period, PriceSeries, RangeBreak,
    RangeSlider, Trace, X_AXIS_TITLE,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Regular trading hours in exchange-local fractional hours (9.5 = 09:30).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingSession {
    pub open_hour: f64,
    pub close_hour: f64,
}

impl Default for TradingSession {
    fn default() -> Self {
        Self {
            open_hour: 9.5,
            close_hour: 16.0,
        }
    }
}

/// Turns a fetched price series into a chart description.
///
/// Pure: no I/O and no state across calls.
#[derive(Debug, Clone, Default)]
pub struct ChartBuilder {
    session: TradingSession,
}

impl ChartBuilder {
    pub fn new(session: TradingSession) -> Self {
        Self { session }
    }

    pub fn build(&self, series: &PriceSeries, style: &ChartStyle, ticker: &str, period: Period) -> ChartResult {
        if series.is_empty() {
            return ChartResult::empty();
        }

        let mut layout = Layout::new(&format!("{} Stock Price (Last {})", ticker, period));

        let trace = match style {
            ChartStyle::Candlestick => {
                layout.xaxis = self.candlestick_axis(series);
                let bars = series.bars();
                Trace::Candlestick {
                    name: "Candlestick".to_string(),
                    x: Self::x_values(series),
                    open: bars.iter().map(|b| b.open).collect(),
                    high: bars.iter().map(|b| b.high).collect(),
                    low: bars.iter().map(|b| b.low).collect(),
                    close: bars.iter().map(|b| b.close).collect(),
                }
            }
            ChartStyle::Line => Trace::Scatter {
                name: "Close".to_string(),
                mode: "lines".to_string(),
                x: Self::x_values(series),
                y: series.bars().iter().map(|b| b.close).collect(),
            },
            ChartStyle::Unsupported(_) => return ChartResult::invalid_style(),
        };

        ChartResult {
            status: ChartStatus::Ok,
            message: None,
            figure: Figure {
                data: vec![trace],
                layout,
            },
        }
    }

    fn candlestick_axis(&self, series: &PriceSeries) -> Axis {
        let mut axis = Axis::new(X_AXIS_TITLE);
        axis.rangeslider = Some(RangeSlider { visible: false });
        if series.interval().is_intraday() {
            axis.rangebreaks = vec![
                RangeBreak::weekends(),
                RangeBreak::outside_session(self.session.open_hour, self.session.close_hour),
            ];
        }
        axis
    }

    // Exchange-local wall time per bar, so session breaks line up with
    // trading hours on both sides of a daylight-saving change
    fn x_values(series: &PriceSeries) -> Vec<String> {
        let tz = series.timezone();

        series
            .bars()
            .iter()
            .map(|b| b.timestamp.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, PriceBar, INVALID_STYLE_MESSAGE, NO_DATA_MESSAGE};
    use chrono::{Duration, TimeZone, Utc};
    use chrono_tz::America::New_York;

    fn series(n: usize, interval: Interval) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                PriceBar::new(start + Duration::hours(i as i64), base, base + 2.0, base - 1.5, base + 0.5)
            })
            .collect();
        PriceSeries::new(interval, bars).unwrap()
    }

    fn only_trace(result: &ChartResult) -> &Trace {
        assert_eq!(result.figure.data.len(), 1);
        &result.figure.data[0]
    }

    #[test]
    fn test_empty_series_gives_placeholder_for_every_style() {
        let builder = ChartBuilder::default();
        let empty = PriceSeries::empty(Interval::OneHour);

        for style in [
            ChartStyle::Candlestick,
            ChartStyle::Line,
            ChartStyle::Unsupported("bar".into()),
        ] {
            let result = builder.build(&empty, &style, "AAPL", Period::OneMonth);
            assert_eq!(result.status, ChartStatus::Empty);
            assert_eq!(result.message.as_deref(), Some(NO_DATA_MESSAGE));
            assert!(result.figure.data.is_empty());
            assert_eq!(result.figure.layout.xaxis.title.text, "Date");
            assert_eq!(result.figure.layout.yaxis.title.text, "Price (USD)");
        }
    }

    #[test]
    fn test_line_uses_closes_in_order() {
        let s = series(7, Interval::OneDay);
        let result = ChartBuilder::default().build(&s, &ChartStyle::Line, "MSFT", Period::ThreeMonths);

        assert_eq!(result.status, ChartStatus::Ok);
        match only_trace(&result) {
            Trace::Scatter { y, x, mode, .. } => {
                let closes: Vec<f64> = s.bars().iter().map(|b| b.close).collect();
                assert_eq!(y, &closes);
                assert_eq!(x.len(), s.len());
                assert_eq!(mode, "lines");
            }
            other => panic!("expected line trace, got {:?}", other),
        }
        assert!(result.figure.layout.xaxis.rangeslider.is_none());
    }

    #[test]
    fn test_candlestick_copies_ohlc_per_bar() {
        let s = series(5, Interval::OneDay);
        let result = ChartBuilder::default().build(&s, &ChartStyle::Candlestick, "TSLA", Period::OneYear);

        match only_trace(&result) {
            Trace::Candlestick { name, open, high, low, close, .. } => {
                assert_eq!(name, "Candlestick");
                for (i, bar) in s.bars().iter().enumerate() {
                    assert_eq!(open[i], bar.open);
                    assert_eq!(high[i], bar.high);
                    assert_eq!(low[i], bar.low);
                    assert_eq!(close[i], bar.close);
                }
            }
            other => panic!("expected candlestick trace, got {:?}", other),
        }
    }

    #[test]
    fn test_candlestick_hides_range_slider() {
        let result = ChartBuilder::default().build(
            &series(3, Interval::OneDay),
            &ChartStyle::Candlestick,
            "AAPL",
            Period::OneMonth,
        );
        assert_eq!(result.figure.layout.xaxis.rangeslider, Some(RangeSlider { visible: false }));
        // Daily bars have no session gaps to hide
        assert!(result.figure.layout.xaxis.rangebreaks.is_empty());
    }

    #[test]
    fn test_intraday_candlestick_breaks_weekends_and_off_hours() {
        let builder = ChartBuilder::new(TradingSession { open_hour: 9.5, close_hour: 16.0 });
        let result = builder.build(&series(3, Interval::OneHour), &ChartStyle::Candlestick, "AAPL", Period::FiveDays);

        assert_eq!(
            result.figure.layout.xaxis.rangebreaks,
            vec![RangeBreak::weekends(), RangeBreak::outside_session(9.5, 16.0)]
        );
        // Filter only: every bar is still present
        assert_eq!(only_trace(&result).len(), 3);
    }

    #[test]
    fn test_unsupported_style_is_invalid_placeholder() {
        let result = ChartBuilder::default().build(
            &series(4, Interval::OneDay),
            &ChartStyle::Unsupported("bar".into()),
            "AAPL",
            Period::OneMonth,
        );

        assert_eq!(result.status, ChartStatus::Invalid);
        assert_eq!(result.message.as_deref(), Some(INVALID_STYLE_MESSAGE));
        assert!(result.figure.data.is_empty());
    }

    #[test]
    fn test_aapl_hourly_candlestick_scenario() {
        let result = ChartBuilder::default().build(
            &series(5, Interval::OneHour),
            &ChartStyle::Candlestick,
            "AAPL",
            Period::OneMonth,
        );

        assert_eq!(result.status, ChartStatus::Ok);
        assert!(result.message.is_none());
        assert_eq!(result.figure.layout.title.text, "AAPL Stock Price (Last 1mo)");
        assert_eq!(result.figure.layout.xaxis.title.text, "Date");
        assert_eq!(result.figure.layout.yaxis.title.text, "Price (USD)");
        assert_eq!(only_trace(&result).len(), 5);
    }

    #[test]
    fn test_x_values_use_exchange_local_time() {
        let s = series(1, Interval::OneHour).with_exchange_timezone(New_York);
        let result = ChartBuilder::default().build(&s, &ChartStyle::Line, "AAPL", Period::OneDay);

        match only_trace(&result) {
            Trace::Scatter { x, .. } => assert_eq!(x[0], "2024-03-04 09:30:00"),
            other => panic!("expected line trace, got {:?}", other),
        }
    }

    #[test]
    fn test_last_session_bar_keeps_wall_time_across_dst_change() {
        // 15:30 New York on Friday (EST, UTC-5) and on Monday (EDT, UTC-4)
        let bars = vec![
            PriceBar::new(Utc.with_ymd_and_hms(2024, 3, 8, 20, 30, 0).unwrap(), 170.0, 171.0, 169.5, 170.5),
            PriceBar::new(Utc.with_ymd_and_hms(2024, 3, 11, 19, 30, 0).unwrap(), 172.0, 173.0, 171.5, 172.5),
        ];
        let s = PriceSeries::new(Interval::OneHour, bars)
            .unwrap()
            .with_exchange_timezone(New_York);
        let result = ChartBuilder::default().build(&s, &ChartStyle::Candlestick, "AAPL", Period::ThreeMonths);

        match only_trace(&result) {
            Trace::Candlestick { x, .. } => {
                assert_eq!(x, &vec!["2024-03-08 15:30:00".to_string(), "2024-03-11 15:30:00".to_string()]);
            }
            other => panic!("expected candlestick trace, got {:?}", other),
        }
        // Both bars sit before the 16:00 close, outside the hidden hour range
        assert_eq!(result.figure.layout.xaxis.rangebreaks[1], RangeBreak::outside_session(9.5, 16.0));
    }
}
