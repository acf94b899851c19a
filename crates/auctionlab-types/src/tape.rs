use serde::{Deserialize, Serialize};

/// One executed trade read back from a tape artifact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapeRecord {
    /// Seconds since the start of the session that produced it
    pub time: f64,
    pub price: f64,
}

impl TapeRecord {
    pub fn new(time: f64, price: f64) -> Self {
        TapeRecord { time, price }
    }
}

/// Where one session's records sit inside an aggregated series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSlice {
    pub trial_id: String,
    pub offset: usize,
    pub len: usize,
}

/// Records from one or more sessions, in session order then file order.
/// Times are per-session and are not shifted onto a common clock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    records: Vec<TapeRecord>,
    sessions: Vec<SessionSlice>,
}

impl AggregatedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_session(&mut self, trial_id: impl Into<String>, records: Vec<TapeRecord>) {
        self.sessions.push(SessionSlice {
            trial_id: trial_id.into(),
            offset: self.records.len(),
            len: records.len(),
        });
        self.records.extend(records);
    }

    pub fn records(&self) -> &[TapeRecord] {
        &self.records
    }

    pub fn sessions(&self) -> &[SessionSlice] {
        &self.sessions
    }

    pub fn session_records(&self, index: usize) -> Option<&[TapeRecord]> {
        let slice = self.sessions.get(index)?;
        self.records.get(slice.offset..slice.offset + slice.len)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.time).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.price).collect()
    }
}
