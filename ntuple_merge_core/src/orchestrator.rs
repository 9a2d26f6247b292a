//! Merge orchestration
//!
//! Runs one merge as a fixed sequence of stages:
//! discover, estimate, merge, compare, report. Compare only runs after a
//! successful merge; the final report always runs. An engine failure ends the
//! run with a failed outcome instead of an error, and nothing is retried or
//! cleaned up.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::discovery::{Discovery, DiscoveryOptions, FileMatcher, MatchPolicy, discover_files};
use crate::engine::MergeEngine;
use crate::error::{Result, ValidationError};
use crate::observer::{MergeEvent, MergeObserver, NullObserver};
use crate::size::{SizeEstimate, estimate_total_size};

/// Default pattern when none is given
pub const DEFAULT_PATTERN: &str = "out_*.root";

/// Default output file name when none is given
pub const DEFAULT_OUTPUT: &str = "merged.root";

/// Inputs for one merge run
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub base_dir: PathBuf,
    pub pattern: String,
    pub output: PathBuf,
    pub policy: MatchPolicy,
    pub discovery: DiscoveryOptions,
}

impl MergeRequest {
    pub fn new(base_dir: impl Into<PathBuf>, pattern: &str, output: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            pattern: pattern.to_string(),
            output: output.into(),
            policy: MatchPolicy::default(),
            discovery: DiscoveryOptions::default(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_discovery(mut self, discovery: DiscoveryOptions) -> Self {
        self.discovery = discovery;
        self
    }

    /// Reject requests the engine could never act on
    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(ValidationError::invalid_parameter("output", "path is empty").into());
        }
        Ok(())
    }
}

/// How the merge stage ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Engine succeeded; sizes are absent when the output could not be stat'ed
    Succeeded {
        final_bytes: Option<u64>,
        size_delta: Option<i64>,
    },
    /// Engine reported failure; compare was skipped
    Failed { reason: String },
}

/// Summary of one merge run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub base_dir: PathBuf,
    pub pattern: String,
    pub output: PathBuf,
    pub engine: String,
    pub files_discovered: usize,
    pub estimated_bytes: u64,
    pub size_failures: usize,
    pub outcome: MergeOutcome,
    pub elapsed_secs: f64,
}

impl MergeReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MergeOutcome::Succeeded { .. })
    }
}

/// Drives the merge stages and reports them to an observer
pub struct MergeOrchestrator {
    observer: Arc<dyn MergeObserver>,
}

impl Default for MergeOrchestrator {
    fn default() -> Self {
        Self::new(Arc::new(NullObserver))
    }
}

impl MergeOrchestrator {
    pub fn new(observer: Arc<dyn MergeObserver>) -> Self {
        Self { observer }
    }

    /// Run every stage for `request` using `engine`
    ///
    /// Errors are returned only when the request is invalid or discovery
    /// cannot start (unreadable base directory or invalid pattern). Engine
    /// failures are part of the report.
    pub fn run(&self, request: &MergeRequest, engine: &mut dyn MergeEngine) -> Result<MergeReport> {
        request.validate()?;
        let started = Instant::now();

        let discovery = self.discover(request)?;
        let estimate = self.estimate(&discovery);

        let outcome = match self.merge(&discovery, &request.output, engine) {
            Ok(()) => {
                let final_bytes = self.compare(&request.output, estimate.total_bytes);
                MergeOutcome::Succeeded {
                    final_bytes,
                    size_delta: final_bytes.map(|bytes| size_delta(bytes, estimate.total_bytes)),
                }
            }
            Err(reason) => MergeOutcome::Failed { reason },
        };

        let elapsed = started.elapsed();
        let report = MergeReport {
            base_dir: request.base_dir.clone(),
            pattern: request.pattern.clone(),
            output: request.output.clone(),
            engine: engine.name().to_string(),
            files_discovered: discovery.len(),
            estimated_bytes: estimate.total_bytes,
            size_failures: estimate.failures.len(),
            outcome,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        self.finish(elapsed, report.is_success());

        Ok(report)
    }

    /// Discover stage
    pub fn discover(&self, request: &MergeRequest) -> Result<Discovery> {
        let matcher = FileMatcher::new(&request.pattern, request.policy)?;
        discover_files(
            &request.base_dir,
            &matcher,
            &request.discovery,
            self.observer.as_ref(),
        )
    }

    /// Estimate stage
    pub fn estimate(&self, discovery: &Discovery) -> SizeEstimate {
        estimate_total_size(&discovery.files, self.observer.as_ref())
    }

    /// Merge stage; the error string is the failure reason
    pub fn merge(
        &self,
        discovery: &Discovery,
        output: &Path,
        engine: &mut dyn MergeEngine,
    ) -> std::result::Result<(), String> {
        engine.set_output(output);
        for path in &discovery.files {
            engine.add_input(path);
            self.observer.report(MergeEvent::InputQueued { path: path.clone() });
        }

        self.observer.report(MergeEvent::MergeStarted {
            engine: engine.name().to_string(),
            inputs: discovery.len(),
        });

        match engine.merge() {
            Ok(()) => {
                self.observer.report(MergeEvent::MergeSucceeded);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.observer.report(MergeEvent::MergeFailed {
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    /// Compare stage; `None` when the output cannot be stat'ed
    pub fn compare(&self, output: &Path, estimated_bytes: u64) -> Option<u64> {
        match std::fs::metadata(output) {
            Ok(metadata) => {
                let bytes = metadata.len();
                self.observer.report(MergeEvent::OutputSized {
                    path: output.to_path_buf(),
                    bytes,
                    delta: size_delta(bytes, estimated_bytes),
                });
                Some(bytes)
            }
            Err(e) => {
                self.observer.report(MergeEvent::OutputSizeUnavailable {
                    path: output.to_path_buf(),
                    error: e.to_string(),
                });
                None
            }
        }
    }

    fn finish(&self, elapsed: Duration, success: bool) {
        self.observer
            .report(MergeEvent::Finished { elapsed, success });
    }
}

/// Signed `final - estimated`, saturating at the `i64` range
fn size_delta(final_bytes: u64, estimated_bytes: u64) -> i64 {
    let delta = i128::from(final_bytes) - i128::from(estimated_bytes);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
