//! Submission of analysis requests to the external structural solver.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::RunError;
use crate::request::AnalysisRequest;

/// Unique name of one analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobName {
    /// Sample identifier.
    pub sample: u32,
    /// Increment index within the sample.
    pub increment: u32,
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample{}Incre{}", self.sample, self.increment)
    }
}

/// What the engine reported for a job.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// The job finished and wrote its report here.
    Completed(PathBuf),
    /// The job aborted or crashed.
    Aborted {
        /// Human readable cause.
        reason: String,
    },
}

/// Capability to run one analysis to completion.
///
/// Implementations block until the engine reports completion or failure. An
/// `Err` means the engine could not be driven at all and ends the whole run;
/// an aborted analysis is an [`EngineOutcome::Aborted`].
pub trait AnalysisEngine {
    /// Submit `request` under `job` in `workdir` and wait for it.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the request cannot be handed to the engine.
    fn submit_and_wait(
        &mut self,
        request: &AnalysisRequest,
        workdir: &Path,
        job: JobName,
    ) -> Result<EngineOutcome, RunError>;
}

/// Engine adapter that runs an external program once per job.
///
/// The request is written to `{workdir}/{job}.json`. `{input}` and `{job}` in
/// the argument list are replaced by that file and the job name. The program
/// runs inside `workdir` and must leave `{job}.dat` behind. Any `{job}.dat`
/// already present is deleted before launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandEngine {
    /// Executable to launch.
    pub program: String,
    /// Argument template.
    pub args: Vec<String>,
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self {
            program: "abaqus".to_owned(),
            args: vec![
                "python".to_owned(),
                "crack_model.py".to_owned(),
                "--".to_owned(),
                "{input}".to_owned(),
            ],
        }
    }
}

impl CommandEngine {
    /// Expand the placeholders in the argument template.
    fn expand_args(&self, input: &Path, job: JobName) -> Vec<String> {
        let input = input.display().to_string();
        let job = job.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{job}", &job))
            .collect()
    }
}

impl AnalysisEngine for CommandEngine {
    fn submit_and_wait(
        &mut self,
        request: &AnalysisRequest,
        workdir: &Path,
        job: JobName,
    ) -> Result<EngineOutcome, RunError> {
        let input = workdir.join(format!("{job}.json"));
        let payload = serde_json::to_vec_pretty(request)
            .map_err(|error| RunError::io(&input, error.into()))?;
        fs::write(&input, payload).map_err(|error| RunError::io(&input, error))?;

        // a report left by an earlier run must not pass for this one
        let artifact = workdir.join(format!("{job}.dat"));
        match fs::remove_file(&artifact) {
            Ok(()) => debug!(%job, "removed stale report"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => return Err(RunError::io(&artifact, error)),
        }

        let args = self.expand_args(&input, job);
        debug!(%job, program = %self.program, ?args, "submitting analysis");
        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(workdir)
            .status()
            .map_err(|error| RunError::io(&self.program, error))?;

        if !status.success() {
            return Ok(EngineOutcome::Aborted {
                reason: format!("engine exited with {status}"),
            });
        }
        if artifact.is_file() {
            Ok(EngineOutcome::Completed(artifact))
        } else {
            Ok(EngineOutcome::Aborted {
                reason: format!("no report written at {}", artifact.display()),
            })
        }
    }
}
