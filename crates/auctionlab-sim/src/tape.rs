use auctionlab_engine::ArtifactLayout;
use auctionlab_types::{AggregatedSeries, ArtifactKind, HarnessError, Result, TapeRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use tracing::debug;

const TIME_COLUMN: usize = 1;
const PRICE_COLUMN: usize = 2;

/// Reads per-session tape artifacts and concatenates them
#[derive(Debug, Clone)]
pub struct TapeAggregator {
    layout: ArtifactLayout,
}

impl TapeAggregator {
    pub fn new(layout: ArtifactLayout) -> Self {
        TapeAggregator { layout }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Parse the tape of one session
    pub fn read_tape(&self, trial_id: &str) -> Result<Vec<TapeRecord>> {
        let path = self.layout.artifact_path(trial_id, ArtifactKind::Tape);
        let file = File::open(&path).map_err(|e| HarnessError::ArtifactIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let records = parse_tape(file, &path.display().to_string())?;
        debug!(trial_id, records = records.len(), "tape read");
        Ok(records)
    }

    /// Concatenate tapes in the given session order. Times are left as
    /// written, so every session starts again near zero.
    pub fn aggregate<S: AsRef<str>>(&self, trial_ids: &[S]) -> Result<AggregatedSeries> {
        let mut series = AggregatedSeries::new();
        for trial_id in trial_ids {
            let trial_id = trial_id.as_ref();
            let records = self.read_tape(trial_id)?;
            series.append_session(trial_id, records);
        }
        Ok(series)
    }
}

/// Parse a headerless tape: column 1 is time, column 2 is price, column 0
/// and anything past column 2 are ignored. Any malformed row fails the
/// whole parse.
pub fn parse_tape<R: Read>(reader: R, source_name: &str) -> Result<Vec<TapeRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let row_number = i + 1;
        let row = row.map_err(|e| {
            if e.is_io_error() {
                HarnessError::ArtifactIo {
                    path: source_name.to_string(),
                    reason: e.to_string(),
                }
            } else {
                parse_error(source_name, row_number, e.to_string())
            }
        })?;
        let time = numeric_field(&row, TIME_COLUMN, "time", source_name, row_number)?;
        let price = numeric_field(&row, PRICE_COLUMN, "price", source_name, row_number)?;
        records.push(TapeRecord::new(time, price));
    }
    Ok(records)
}

fn numeric_field(
    row: &csv::StringRecord,
    column: usize,
    name: &str,
    source_name: &str,
    row_number: usize,
) -> Result<f64> {
    let raw = row.get(column).ok_or_else(|| {
        parse_error(
            source_name,
            row_number,
            format!("missing {} column {} (row has {} fields)", name, column, row.len()),
        )
    })?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(parse_error(
            source_name,
            row_number,
            format!("non-numeric {} field {:?}", name, raw),
        )),
    }
}

fn parse_error(source_name: &str, row: usize, reason: String) -> HarnessError {
    HarnessError::Parse {
        source_name: source_name.to_string(),
        row,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_rows() {
        let tape = "Trd, 1.0, 100.5\nTrd, 2.0, 101.0\n";
        let records = parse_tape(tape.as_bytes(), "mem").unwrap();
        assert_eq!(
            records,
            vec![TapeRecord::new(1.0, 100.5), TapeRecord::new(2.0, 101.0)]
        );
    }

    #[test]
    fn test_empty_tape() {
        assert!(parse_tape("".as_bytes(), "mem").unwrap().is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let records = parse_tape("Trd,3.5,120,extra,cols\n".as_bytes(), "mem").unwrap();
        assert_eq!(records, vec![TapeRecord::new(3.5, 120.0)]);
    }

    #[test]
    fn test_non_numeric_price_fails() {
        let tape = "Trd, 1.0, 100.5\nTrd, 2.0, abc\nTrd, 3.0, 99\n";
        let err = parse_tape(tape.as_bytes(), "mem").unwrap_err();
        match err {
            HarnessError::Parse { row, reason, .. } => {
                assert_eq!(row, 2);
                assert!(reason.contains("price"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_fails() {
        let err = parse_tape("Trd, 1.0\n".as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, HarnessError::Parse { row: 1, .. }));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(parse_tape("Trd, NaN, 100\n".as_bytes(), "mem").is_err());
    }
}
