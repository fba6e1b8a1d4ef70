//! Sample-by-sample crack growth driver.
//!
//! Each sample starts from the seed crack and repeats the same increment:
//! build a request from the current path, run the engine, read KI, KII and the
//! local direction, turn them into a propagation angle and append the advanced
//! tip. Between increments the driver decides what happens next:
//!
//! * a tip past `x_limit` or outside `[y_min, y_max]` completes the sample;
//! * a tip reaching the load boundary moves the boundary one step forward and
//!   draws fresh loads, unless the sample already used all of its load changes;
//! * an aborted analysis, an incomplete report or an undefined angle abandons
//!   the sample, records it in the failure ledger and moves on.
//!
//! A failing increment is never retried. It means the geometry is not
//! solvable, and retrying would bias the dataset toward easy paths.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisEngine, EngineOutcome, JobName};
use crate::config::GenerationConfig;
use crate::criterion::{advance, propagation_angle};
use crate::errors::{ConfigError, IncrementError, RunError, StepError};
use crate::extract::extract;
use crate::geometry::CrackPath;
use crate::loads::{LoadPair, LoadSource};
use crate::records::{FailureLedger, IncrementRecord, SampleLog};
use crate::request::RequestBuilder;

/// Mutable state of the sample being grown.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Sample identifier.
    pub sample: u32,
    /// Crack path so far.
    pub path: CrackPath,
    /// Tip x that ends the current load stage.
    pub load_boundary: f64,
    /// Loads of the current stage.
    pub loads: LoadPair,
    /// Index of the next increment.
    pub increment: u32,
    /// Load stages started, the first one included.
    pub stages: u32,
    /// Completed increments.
    pub log: Vec<IncrementRecord>,
}

impl SimulationState {
    /// Fresh state for `sample` with the loads of its first stage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SeedPathTooShort`] for a seed with fewer than two points.
    pub fn new(
        sample: u32,
        config: &GenerationConfig,
        loads: LoadPair,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            sample,
            path: CrackPath::new(config.growth.seed_path.clone())?,
            load_boundary: config.loading.initial_boundary,
            loads,
            increment: 0,
            stages: 1,
            log: Vec::new(),
        })
    }
}

/// Where a sample is in its life cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleState {
    /// Growing under the current loads.
    Running,
    /// The tip reached the load boundary; new loads are due.
    LoadChange,
    /// The tip left the domain. The sample is complete.
    TerminatedBoundary,
    /// The sample used every load change it was allowed.
    TerminatedStageLimit,
    /// An increment failed and the sample was abandoned.
    TerminatedFailure(StepError),
}

/// How a finished sample ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleOutcome {
    /// The tip left the domain.
    ReachedBoundary,
    /// The load change budget ran out.
    StageLimit,
    /// The sample was abandoned.
    Failed {
        /// Why the last increment failed.
        reason: String,
    },
}

/// A finished crack growth realisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Sample identifier.
    pub id: u32,
    /// Full tip history, seed included.
    pub path: CrackPath,
    /// One record per completed increment.
    pub load_log: Vec<IncrementRecord>,
    /// How the sample ended.
    pub outcome: SampleOutcome,
}

/// Tally of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples whose tip left the domain.
    pub completed: Vec<u32>,
    /// Samples cut short by the load change budget.
    pub stage_limited: Vec<u32>,
    /// Abandoned samples, in ledger order.
    pub failed: Vec<u32>,
    /// Completed increments across all samples.
    pub increments: usize,
}

impl RunSummary {
    /// Count a finished sample.
    pub fn record(&mut self, sample: &Sample) {
        self.increments += sample.load_log.len();
        match sample.outcome {
            SampleOutcome::ReachedBoundary => self.completed.push(sample.id),
            SampleOutcome::StageLimit => self.stage_limited.push(sample.id),
            SampleOutcome::Failed { .. } => self.failed.push(sample.id),
        }
    }
}

/// Drives the analysis engine through every increment of every sample.
#[derive(Debug)]
pub struct SampleDriver<E, L> {
    /// Run configuration.
    config: GenerationConfig,
    /// Request builder derived from `config`.
    builder: RequestBuilder,
    /// External solver.
    engine: E,
    /// Source of stage loads.
    loads: L,
    /// Run-wide list of abandoned samples.
    ledger: FailureLedger,
}

impl<E: AnalysisEngine, L: LoadSource> SampleDriver<E, L> {
    /// Create a driver after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn new(config: GenerationConfig, engine: E, loads: L) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            builder: config.request_builder(),
            ledger: FailureLedger::new(config.failure_ledger_path()),
            config,
            engine,
            loads,
        })
    }

    /// The engine, for inspection after a run.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The load source, for inspection after a run.
    #[must_use]
    pub fn loads(&self) -> &L {
        &self.loads
    }

    /// The failure ledger.
    #[must_use]
    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    /// Generate every configured sample in order.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on any setup failure. Failing samples do not stop the run.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let directory = self.config.output.directory.clone();
        fs::create_dir_all(&directory).map_err(|error| RunError::io(&directory, error))?;

        let first = self.config.samples.first_id;
        let mut summary = RunSummary::default();
        for id in first..first.saturating_add(self.config.samples.count) {
            let sample = self.run_sample(id)?;
            summary.record(&sample);
        }
        info!(
            completed = summary.completed.len(),
            stage_limited = summary.stage_limited.len(),
            failed = summary.failed.len(),
            increments = summary.increments,
            "run finished"
        );
        Ok(summary)
    }

    /// Grow one sample from the seed crack until it terminates.
    ///
    /// The sample log and the `sample{id}.json` snapshot are written into the
    /// sample directory whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the sample directory, log, ledger or snapshot
    /// cannot be written, or the engine cannot be launched.
    pub fn run_sample(&mut self, id: u32) -> Result<Sample, RunError> {
        let workdir = self.config.sample_directory(id);
        fs::create_dir_all(&workdir).map_err(|error| RunError::io(&workdir, error))?;
        let mut log = SampleLog::create(workdir.join(&self.config.output.log_file_name), id)?;

        let first_loads = self.loads.sample_loads();
        let mut state = SimulationState::new(id, &self.config, first_loads)?;
        info!(
            sample = id,
            tensile = first_loads.tensile,
            shear = first_loads.shear,
            "starting sample"
        );

        let mut phase = SampleState::Running;
        let outcome = loop {
            phase = match phase {
                SampleState::Running => match self.increment(&mut state, &workdir) {
                    Ok(record) => {
                        log.append(&record)?;
                        self.transition(&mut state)
                    }
                    Err(IncrementError::Sample(error)) => SampleState::TerminatedFailure(error),
                    Err(IncrementError::Fatal(error)) => return Err(error),
                },
                SampleState::LoadChange => self.change_loads(&mut state),
                SampleState::TerminatedBoundary => break SampleOutcome::ReachedBoundary,
                SampleState::TerminatedStageLimit => break SampleOutcome::StageLimit,
                SampleState::TerminatedFailure(error) => {
                    warn!(sample = id, increment = state.increment, %error, "abandoning sample");
                    self.ledger.record(id)?;
                    break SampleOutcome::Failed {
                        reason: error.to_string(),
                    };
                }
            };
        };
        drop(log);

        let sample = Sample {
            id,
            path: state.path,
            load_log: state.log,
            outcome,
        };
        write_snapshot(&workdir.join(format!("sample{id}.json")), &sample)?;
        info!(
            sample = id,
            increments = sample.load_log.len(),
            outcome = ?sample.outcome,
            "sample finished"
        );
        Ok(sample)
    }

    /// Run one analysis and append the advanced tip.
    fn increment(
        &mut self,
        state: &mut SimulationState,
        workdir: &Path,
    ) -> Result<IncrementRecord, IncrementError> {
        let job = JobName {
            sample: state.sample,
            increment: state.increment,
        };
        let request = self
            .builder
            .build(&job.to_string(), &state.path, state.loads);
        let artifact = match self.engine.submit_and_wait(&request, workdir, job)? {
            EngineOutcome::Completed(artifact) => artifact,
            EngineOutcome::Aborted { reason } => {
                return Err(StepError::EngineFailure {
                    job: job.to_string(),
                    reason,
                }
                .into())
            }
        };
        let result = extract(&artifact)?;
        let angle = propagation_angle(result.k1, result.k2, result.direction)?;

        let start = state.path.tip();
        let next = advance(start, angle, self.config.growth.step_length);
        state.path.push(next);
        debug!(
            %job,
            k1 = result.k1,
            k2 = result.k2,
            angle,
            x = next.x,
            y = next.y,
            "increment complete"
        );

        let record = IncrementRecord {
            increment: state.increment,
            tip: start,
            k1: result.k1,
            k2: result.k2,
            loads: state.loads,
        };
        state.log.push(record);
        Ok(record)
    }

    /// Decide what follows a successful increment.
    fn transition(&self, state: &mut SimulationState) -> SampleState {
        let tip = state.path.tip();
        let growth = &self.config.growth;
        if tip.x > growth.x_limit || tip.y < growth.y_min || tip.y > growth.y_max {
            return SampleState::TerminatedBoundary;
        }
        state.increment += 1;
        if tip.x < state.load_boundary {
            SampleState::Running
        } else {
            state.load_boundary += self.config.loading.boundary_step;
            SampleState::LoadChange
        }
    }

    /// Start the next load stage if the sample may still change loads.
    fn change_loads(&mut self, state: &mut SimulationState) -> SampleState {
        let changes_made = state.stages - 1;
        if changes_made >= self.config.loading.max_load_changes {
            info!(sample = state.sample, stages = state.stages, "load change budget exhausted");
            return SampleState::TerminatedStageLimit;
        }
        state.loads = self.loads.sample_loads();
        state.stages += 1;
        info!(
            sample = state.sample,
            stage = state.stages,
            boundary = state.load_boundary,
            tensile = state.loads.tensile,
            shear = state.loads.shear,
            "load changed"
        );
        SampleState::Running
    }
}

/// Persist the finished sample next to its log.
fn write_snapshot(path: &Path, sample: &Sample) -> Result<(), RunError> {
    let payload =
        serde_json::to_vec_pretty(sample).map_err(|error| RunError::io(path, error.into()))?;
    fs::write(path, payload).map_err(|error| RunError::io(path, error))
}
