use auctionlab_types::AggregatedSeries;
use serde::{Deserialize, Serialize};

/// Transaction-price scatter over an aggregated series. Points are
/// plotted exactly as aggregated, one marker per trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub marker: String,
    pub color: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ScatterPlot {
    pub fn from_series(title: &str, series: &AggregatedSeries) -> Self {
        ScatterPlot {
            title: title.to_string(),
            x_label: "Time".to_string(),
            y_label: "Price".to_string(),
            marker: "x".to_string(),
            color: "black".to_string(),
            x: series.times(),
            y: series.prices(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auctionlab_types::TapeRecord;

    #[test]
    fn test_points_follow_series_order() {
        let mut series = AggregatedSeries::new();
        series.append_session("demo_0", vec![TapeRecord::new(5.0, 120.0), TapeRecord::new(9.0, 130.0)]);
        series.append_session("demo_1", vec![TapeRecord::new(1.0, 110.0)]);

        let plot = ScatterPlot::from_series("1-Trader Multi-Session Market", &series);
        assert_eq!(plot.x, vec![5.0, 9.0, 1.0]);
        assert_eq!(plot.y, vec![120.0, 130.0, 110.0]);
        assert_eq!(plot.x_label, "Time");
        assert_eq!(plot.y_label, "Price");
        assert_eq!(plot.len(), 3);
    }
}
