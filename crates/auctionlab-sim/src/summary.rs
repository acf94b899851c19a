use auctionlab_types::AggregatedSeries;
use serde::{Deserialize, Serialize};

/// Descriptive statistics over an aggregated series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub total_records: usize,
    pub sessions: usize,
    pub records_per_session: Vec<usize>,
    /// Index of each session's first record in the series
    pub session_offsets: Vec<usize>,

    /// None when the series is empty
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub mean_price: Option<f64>,
    pub min_time: Option<f64>,
    pub max_time: Option<f64>,
}

impl SeriesSummary {
    pub fn from_series(series: &AggregatedSeries) -> Self {
        let records = series.records();
        let n = records.len();

        let mean_price = if n == 0 {
            None
        } else {
            Some(records.iter().map(|r| r.price).sum::<f64>() / n as f64)
        };

        SeriesSummary {
            total_records: n,
            sessions: series.sessions().len(),
            records_per_session: series.sessions().iter().map(|s| s.len).collect(),
            session_offsets: series.sessions().iter().map(|s| s.offset).collect(),
            min_price: records.iter().map(|r| r.price).reduce(f64::min),
            max_price: records.iter().map(|r| r.price).reduce(f64::max),
            mean_price,
            min_time: records.iter().map(|r| r.time).reduce(f64::min),
            max_time: records.iter().map(|r| r.time).reduce(f64::max),
        }
    }
}
