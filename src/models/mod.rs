mod chart;
mod chart_request;
mod market;
mod price_bar;

pub use chart::{
    Axis, ChartResult, ChartStatus, Figure, Layout, RangeBreak, RangeSlider, Title, Trace,
    INVALID_STYLE_MESSAGE, NO_DATA_MESSAGE, X_AXIS_TITLE, Y_AXIS_TITLE,
};
pub use chart_request::{normalize_ticker, ChartDefaults, ChartRequest, ChartSelection, ChartStyle};
pub use market::{Interval, Period};
pub use price_bar::{PriceBar, PriceSeries, SeriesError};
