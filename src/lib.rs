#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod conditions;
pub mod config;
pub mod criterion;
pub mod driver;
pub mod errors;
pub mod extract;
pub mod geometry;
pub mod life;
pub mod loads;
pub mod records;
pub mod request;

pub use analysis::{AnalysisEngine, CommandEngine, EngineOutcome, JobName};
pub use conditions::{boundary_conditions, BoundaryCondition, Edge, Material};
pub use config::{
    GenerationConfig, GrowthConfig, LoadingConfig, MeshConfig, OutputConfig, SampleConfig,
};
pub use criterion::{advance, propagation_angle};
pub use driver::{
    RunSummary, Sample, SampleDriver, SampleOutcome, SampleState, SimulationState,
};
pub use errors::{ConfigError, IncrementError, LifeError, LogError, RunError, StepError};
pub use extract::{extract, parse_report, AnalysisResult};
pub use geometry::{point, CrackPath, Plate, Point};
pub use life::{integrate_life, ParisLaw, SegmentLife, Stations};
pub use loads::{LoadDistribution, LoadPair, LoadSource, NormalLoadSampler};
pub use records::{read_log, FailureLedger, IncrementRecord, SampleLog, LOG_HEADER};
pub use request::{AnalysisRequest, MeshSeed, RequestBuilder, StaticStep};
