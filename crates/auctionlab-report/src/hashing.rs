use auctionlab_types::AggregatedSeries;
use sha2::{Digest, Sha256};

/// Hash reference (hex-encoded SHA256)
pub type HashRef = String;

/// SHA256 over the series as `trial_id,time,price` lines, the same rows
/// `FileReporter` writes below its CSV header. Session boundaries count:
/// moving a record to another session changes the hash.
pub fn series_hash(series: &AggregatedSeries) -> HashRef {
    let mut hasher = Sha256::new();
    for (i, slice) in series.sessions().iter().enumerate() {
        for record in series.session_records(i).unwrap_or_default() {
            hasher.update(format!("{},{},{}\n", slice.trial_id, record.time, record.price));
        }
        if slice.len == 0 {
            hasher.update(format!("{},,\n", slice.trial_id));
        }
    }
    hex::encode(hasher.finalize())
}
