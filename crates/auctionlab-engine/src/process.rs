use auctionlab_types::{
    HarnessError, Result, Schedule, SessionConfig, TraderGroup,
};
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::engine::MarketEngine;
use crate::layout::ArtifactLayout;

/// Session payload in the engine's own parameter vocabulary
#[derive(Debug, Clone, Serialize)]
pub struct EngineRequest {
    /// Artifact path prefix, the engine appends `_tape.csv` etc.
    pub trial_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub traders_spec: WireTraders,
    pub order_sched: WireOrderSchedule,
    pub dump_flags: WireDumpFlags,
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireTraders {
    pub sellers: Vec<(String, u32)>,
    pub buyers: Vec<(String, u32)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireOrderSchedule {
    pub sup: Vec<WireSegment>,
    pub dem: Vec<WireSegment>,
    pub interval: f64,
    pub timemode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireSegment {
    pub from: f64,
    pub to: f64,
    pub ranges: Vec<(f64, f64)>,
    pub stepmode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireDumpFlags {
    pub dump_blotters: bool,
    pub dump_lobs: bool,
    pub dump_strats: bool,
    pub dump_avgbals: bool,
    pub dump_tape: bool,
}

impl EngineRequest {
    pub fn from_config(config: &SessionConfig, layout: &ArtifactLayout) -> Self {
        let sched = &config.order_schedule;
        let flags = &config.dump_flags;
        EngineRequest {
            trial_id: layout.trial_base(&config.trial_id).display().to_string(),
            start_time: config.start_time,
            end_time: config.end_time,
            traders_spec: WireTraders {
                sellers: wire_groups(&config.population.sellers),
                buyers: wire_groups(&config.population.buyers),
            },
            order_sched: WireOrderSchedule {
                sup: wire_schedule(&sched.supply),
                dem: wire_schedule(&sched.demand),
                interval: sched.interval,
                timemode: sched.timemode.as_str().to_string(),
            },
            dump_flags: WireDumpFlags {
                dump_blotters: flags.blotters,
                dump_lobs: flags.limit_order_book,
                dump_strats: flags.strategies,
                dump_avgbals: flags.average_balances,
                dump_tape: flags.tape,
            },
            verbose: config.verbose,
        }
    }
}

fn wire_groups(groups: &[TraderGroup]) -> Vec<(String, u32)> {
    groups
        .iter()
        .map(|g| (g.type_tag.tag().to_string(), g.count))
        .collect()
}

fn wire_schedule(schedule: &Schedule) -> Vec<WireSegment> {
    schedule
        .segments()
        .iter()
        .map(|s| WireSegment {
            from: s.window.from,
            to: s.window.to,
            ranges: s.ranges.iter().map(|r| (r.low, r.high)).collect(),
            stepmode: s.stepmode.as_str().to_string(),
        })
        .collect()
}

/// Runs the real engine as a child process, one process per session.
///
/// The request is written as JSON to the child's stdin; the call returns
/// once the child exits. Any non-zero exit is an engine failure.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    layout: ArtifactLayout,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>, layout: ArtifactLayout) -> Self {
        ProcessEngine {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            layout,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    fn failure(config: &SessionConfig, reason: impl Into<String>) -> HarnessError {
        HarnessError::EngineExecution {
            trial_id: config.trial_id.clone(),
            reason: reason.into(),
        }
    }
}

impl MarketEngine for ProcessEngine {
    fn run_session(&mut self, config: &SessionConfig) -> Result<()> {
        self.layout.ensure_root()?;
        let request = EngineRequest::from_config(config, &self.layout);
        let payload = serde_json::to_vec(&request)?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!(program = %self.program.display(), trial_id = %config.trial_id, "spawning engine");
        let mut child = command
            .spawn()
            .map_err(|e| Self::failure(config, format!("spawn {}: {}", self.program.display(), e)))?;

        // The child is always reaped; a failed write is judged after exit
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| Self::failure(config, format!("wait: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(5)..].join(" | ");
            return Err(Self::failure(
                config,
                format!("exited with {}: {}", output.status, tail),
            ));
        }

        match write_result {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(trial_id = %config.trial_id, "engine exited without reading its request");
            }
            Err(e) => return Err(Self::failure(config, format!("write request: {}", e))),
            Ok(()) => {}
        }

        if config.verbose {
            info!(
                trial_id = %config.trial_id,
                stdout = %String::from_utf8_lossy(&output.stdout),
                "engine output"
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "process"
    }
}
