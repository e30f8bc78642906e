use serde::Serialize;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected stock and interval";
pub const INVALID_STYLE_MESSAGE: &str = "Invalid chart type selected";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Price (USD)";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartStatus {
    Ok,
    Empty,
    Invalid,
    Error,
}

/// Chart description returned to the dashboard page. `figure` is shaped so
/// the page can hand it to Plotly unchanged.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartResult {
    pub status: ChartStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub figure: Figure,
}

impl ChartResult {
    /// Placeholder with no series. The message doubles as the chart title.
    pub fn placeholder(status: ChartStatus, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            figure: Figure {
                data: Vec::new(),
                layout: Layout::new(&message),
            },
            message: Some(message),
        }
    }

    pub fn empty() -> Self {
        Self::placeholder(ChartStatus::Empty, NO_DATA_MESSAGE)
    }

    pub fn invalid_style() -> Self {
        Self::placeholder(ChartStatus::Invalid, INVALID_STYLE_MESSAGE)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick {
        name: String,
        x: Vec<String>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Scatter {
        name: String,
        mode: String,
        x: Vec<String>,
        y: Vec<f64>,
    },
}

impl Trace {
    pub fn len(&self) -> usize {
        match self {
            Trace::Candlestick { x, .. } | Trace::Scatter { x, .. } => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

impl Layout {
    /// Layout with the common axis titles.
    pub fn new(title: &str) -> Self {
        Self {
            title: Title::new(title),
            xaxis: Axis::new(X_AXIS_TITLE),
            yaxis: Axis::new(Y_AXIS_TITLE),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rangebreaks: Vec<RangeBreak>,
}

impl Axis {
    pub fn new(title: &str) -> Self {
        Self {
            title: Title::new(title),
            rangeslider: None,
            rangebreaks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RangeSlider {
    pub visible: bool,
}

/// Gap hidden on the x-axis. Weekend breaks use day-name bounds, session
/// breaks use fractional hours with `pattern = "hour"`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RangeBreak {
    Days { bounds: [&'static str; 2] },
    Hours { bounds: [f64; 2], pattern: &'static str },
}

impl RangeBreak {
    pub fn weekends() -> Self {
        RangeBreak::Days { bounds: ["sat", "mon"] }
    }

    pub fn outside_session(open_hour: f64, close_hour: f64) -> Self {
        RangeBreak::Hours {
            bounds: [close_hour, open_hour],
            pattern: "hour",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_placeholder_serializes_with_axis_titles() {
        let value = serde_json::to_value(ChartResult::empty()).unwrap();

        assert_eq!(value["status"], "empty");
        assert_eq!(value["message"], NO_DATA_MESSAGE);
        assert_eq!(value["figure"]["data"], json!([]));
        assert_eq!(value["figure"]["layout"]["title"]["text"], NO_DATA_MESSAGE);
        assert_eq!(value["figure"]["layout"]["xaxis"]["title"]["text"], "Date");
        assert_eq!(value["figure"]["layout"]["yaxis"]["title"]["text"], "Price (USD)");
        assert!(value["figure"]["layout"]["xaxis"].get("rangebreaks").is_none());
    }

    #[test]
    fn test_trace_is_tagged_with_plotly_type() {
        let trace = Trace::Scatter {
            name: "Close".into(),
            mode: "lines".into(),
            x: vec!["2024-01-02 00:00:00".into()],
            y: vec![1.5],
        };
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["type"], "scatter");
        assert_eq!(value["mode"], "lines");
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_range_breaks_shape() {
        assert_eq!(
            serde_json::to_value(RangeBreak::weekends()).unwrap(),
            json!({"bounds": ["sat", "mon"]})
        );
        assert_eq!(
            serde_json::to_value(RangeBreak::outside_session(9.5, 16.0)).unwrap(),
            json!({"bounds": [16.0, 9.5], "pattern": "hour"})
        );
    }
}
