use auctionlab_types::{AggregatedSeries, HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::hashing::{series_hash, HashRef};
use crate::plot::ScatterPlot;

/// Published scenario output with a content hash over the series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario_key: String,
    pub series_hash: HashRef,
    pub record_count: usize,
    pub session_count: usize,
    pub plot: ScatterPlot,
}

/// Reporter trait
pub trait Reporter {
    fn publish(&self, scenario_key: &str, title: &str, series: &AggregatedSeries) -> Result<ScenarioReport>;
}

fn build_report(scenario_key: &str, title: &str, series: &AggregatedSeries) -> ScenarioReport {
    ScenarioReport {
        scenario_key: scenario_key.to_string(),
        series_hash: series_hash(series),
        record_count: series.len(),
        session_count: series.sessions().len(),
        plot: ScatterPlot::from_series(title, series),
    }
}

/// Simple in-memory reporter
pub struct MemoryReporter;

impl MemoryReporter {
    pub fn new() -> Self {
        MemoryReporter
    }
}

impl Default for MemoryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for MemoryReporter {
    fn publish(&self, scenario_key: &str, title: &str, series: &AggregatedSeries) -> Result<ScenarioReport> {
        Ok(build_report(scenario_key, title, series))
    }
}

/// Writes `<key>.json` (the report) and `<key>_series.csv` (one row per
/// record, tagged with its trial id) under `out_dir`
pub struct FileReporter {
    out_dir: PathBuf,
}

impl FileReporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        FileReporter {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn report_path(&self, scenario_key: &str) -> PathBuf {
        self.out_dir.join(format!("{}.json", scenario_key))
    }

    pub fn series_path(&self, scenario_key: &str) -> PathBuf {
        self.out_dir.join(format!("{}_series.csv", scenario_key))
    }

    fn write_series(&self, path: &Path, series: &AggregatedSeries) -> Result<()> {
        let io_err = |e: csv::Error| HarnessError::ArtifactIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut writer = csv::Writer::from_path(path).map_err(io_err)?;
        writer.write_record(["trial_id", "time", "price"]).map_err(io_err)?;
        for (i, slice) in series.sessions().iter().enumerate() {
            for record in series.session_records(i).unwrap_or_default() {
                writer
                    .write_record([
                        slice.trial_id.clone(),
                        record.time.to_string(),
                        record.price.to_string(),
                    ])
                    .map_err(io_err)?;
            }
        }
        writer.flush().map_err(|e| HarnessError::ArtifactIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl Reporter for FileReporter {
    fn publish(&self, scenario_key: &str, title: &str, series: &AggregatedSeries) -> Result<ScenarioReport> {
        let report = build_report(scenario_key, title, series);

        std::fs::create_dir_all(&self.out_dir).map_err(|e| HarnessError::ArtifactIo {
            path: self.out_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let report_path = self.report_path(scenario_key);
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&report_path, json).map_err(|e| HarnessError::ArtifactIo {
            path: report_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let series_path = self.series_path(scenario_key);
        self.write_series(&series_path, series)?;

        info!(
            scenario = scenario_key,
            records = report.record_count,
            hash = %report.series_hash,
            path = %report_path.display(),
            "report written"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auctionlab_types::TapeRecord;

    fn series() -> AggregatedSeries {
        let mut series = AggregatedSeries::new();
        series.append_session("demo_0", vec![TapeRecord::new(1.0, 100.5), TapeRecord::new(2.0, 101.0)]);
        series.append_session("demo_1", vec![TapeRecord::new(0.5, 99.0)]);
        series
    }

    #[test]
    fn test_memory_reporter() {
        let report = MemoryReporter::new().publish("shock", "Shock Introduction Market", &series()).unwrap();

        assert_eq!(report.scenario_key, "shock");
        assert_eq!(report.series_hash.len(), 64);
        assert_eq!(report.record_count, 3);
        assert_eq!(report.session_count, 2);
        assert_eq!(report.plot.title, "Shock Introduction Market");
    }

    #[test]
    fn test_file_reporter_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = FileReporter::new(dir.path().join("reports"));

        let report = reporter.publish("shock", "Shock Introduction Market", &series()).unwrap();

        let json = std::fs::read_to_string(reporter.report_path("shock")).unwrap();
        let parsed: ScenarioReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.series_hash, report.series_hash);

        let csv_text = std::fs::read_to_string(reporter.series_path("shock")).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "trial_id,time,price");
        assert_eq!(lines[1], "demo_0,1,100.5");
        assert_eq!(lines[3], "demo_1,0.5,99");
        assert_eq!(lines.len(), 4);
    }
}
