#![allow(dead_code)]

use std::fs;
use std::path::Path;

use crackx::{
    AnalysisEngine, AnalysisRequest, EngineOutcome, GenerationConfig, JobName, LoadPair,
    LoadSource, RunError,
};

/// How the scripted engine misbehaves on one job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    /// Report an aborted analysis.
    Abort,
    /// Write a report without the fracture tables.
    Truncated,
}

/// In-memory engine that writes a fixed fracture report for every job.
#[derive(Debug)]
pub struct ScriptedEngine {
    pub k1: f64,
    pub k2: f64,
    pub direction: (f64, f64),
    pub faults: Vec<(JobName, Fault)>,
    pub jobs: Vec<JobName>,
    pub requests: Vec<AnalysisRequest>,
}

impl ScriptedEngine {
    pub fn new(k1: f64, k2: f64, direction: (f64, f64)) -> Self {
        Self {
            k1,
            k2,
            direction,
            faults: Vec::new(),
            jobs: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn with_fault(mut self, sample: u32, increment: u32, fault: Fault) -> Self {
        self.faults.push((JobName { sample, increment }, fault));
        self
    }

    fn report(&self) -> String {
        let (k1, k2) = (self.k1, self.k2);
        format!(
            "\n S T R E S S   I N T E N S I T Y   F A C T O R S\n\n \
             XFEM_1       K1:   {k1}   {k1}   {k1}   {k1}   {k1}\n              \
             K2:   {k2}   {k2}   {k2}   {k2}   {k2}\n \
             XFEM_1  LOCAL DIRECTION OF VIRTUAL CRACK PROPAGATION   {}   {}   0.0\n",
            self.direction.0, self.direction.1
        )
    }
}

impl AnalysisEngine for ScriptedEngine {
    fn submit_and_wait(
        &mut self,
        request: &AnalysisRequest,
        workdir: &Path,
        job: JobName,
    ) -> Result<EngineOutcome, RunError> {
        self.jobs.push(job);
        self.requests.push(request.clone());
        let fault = self
            .faults
            .iter()
            .find(|(name, _)| *name == job)
            .map(|(_, fault)| *fault);
        let body = match fault {
            Some(Fault::Abort) => {
                return Ok(EngineOutcome::Aborted {
                    reason: "scripted abort".to_owned(),
                })
            }
            Some(Fault::Truncated) => "Abaqus/Standard terminated\n".to_owned(),
            None => self.report(),
        };
        let artifact = workdir.join(format!("{job}.dat"));
        fs::write(&artifact, body).expect("report written");
        Ok(EngineOutcome::Completed(artifact))
    }
}

/// Hands out a distinct, recognisable load pair per draw.
#[derive(Debug, Default)]
pub struct CountingLoads {
    pub draws: Vec<LoadPair>,
}

impl LoadSource for CountingLoads {
    fn sample_loads(&mut self) -> LoadPair {
        let n = self.draws.len() as f64;
        let pair = LoadPair::new(150.0 + 10.0 * n, 20.0 + n);
        self.draws.push(pair);
        pair
    }
}

/// Default configuration writing into `root`.
pub fn config_in(root: &Path, count: u32) -> GenerationConfig {
    let mut config = GenerationConfig::default();
    config.output.directory = root.join("samples");
    config.samples.count = count;
    config
}
