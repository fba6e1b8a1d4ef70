//! Configuration for a dataset generation run.
//!
//! Reads a TOML document. Every section and key is optional and falls back to
//! the defaults below, so a file only needs the values it changes:
//!
//! ```toml
//! [samples]
//! count = 200
//!
//! [loading]
//! seed = 42
//!
//! [engine]
//! program = "abaqus"
//! args = ["python", "crack_model.py", "--", "{input}"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::CommandEngine;
use crate::conditions::Material;
use crate::errors::ConfigError;
use crate::geometry::{point, CrackPath, Plate, Point};
use crate::loads::LoadDistribution;
use crate::request::RequestBuilder;

/// Main generation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Which samples to generate.
    pub samples: SampleConfig,
    /// Plate dimensions.
    pub plate: Plate,
    /// Plate material.
    pub material: Material,
    /// Mesh and fracture output settings.
    pub mesh: MeshConfig,
    /// Crack increment and domain limits.
    pub growth: GrowthConfig,
    /// Load stages and their distributions.
    pub loading: LoadingConfig,
    /// Where results are written.
    pub output: OutputConfig,
    /// External solver invocation.
    pub engine: CommandEngine,
}

/// Range of sample identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of samples.
    pub count: u32,
    /// Identifier of the first sample.
    pub first_id: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 30,
            first_id: 1,
        }
    }
}

/// Mesh density and requested fracture output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Global element size.
    pub element_size: f64,
    /// Contour rings requested for the stress-intensity factors.
    pub contour_integrals: u32,
    /// Partition plane heights as fractions of the plate height.
    pub partition_fractions: Vec<f64>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            element_size: 0.11,
            contour_integrals: 5,
            partition_fractions: vec![0.25, 0.75],
        }
    }
}

/// Crack increment and the region the tip may occupy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Crack length added per increment.
    pub step_length: f64,
    /// Initial crack, at least two points.
    pub seed_path: Vec<Point>,
    /// A tip beyond this x ends the sample.
    pub x_limit: f64,
    /// A tip below this y ends the sample.
    pub y_min: f64,
    /// A tip above this y ends the sample.
    pub y_max: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            step_length: 0.3,
            seed_path: vec![point(0.0, 10.0), point(1.0, 10.0)],
            x_limit: 9.0,
            y_min: 0.0,
            y_max: 20.0,
        }
    }
}

/// Load stages.
///
/// A stage ends when the tip x reaches the current boundary, which then moves
/// forward by `boundary_step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Tip x that ends the first load stage.
    pub initial_boundary: f64,
    /// Distance between successive stage boundaries.
    pub boundary_step: f64,
    /// Most load changes allowed per sample.
    pub max_load_changes: u32,
    /// Tensile traction distribution.
    pub tensile: LoadDistribution,
    /// Shear traction distribution.
    pub shear: LoadDistribution,
    /// Seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            initial_boundary: 2.0,
            boundary_step: 1.0,
            max_load_changes: 8,
            tensile: LoadDistribution::new(200.0, 50.0),
            shear: LoadDistribution::new(100.0, 50.0),
            seed: None,
        }
    }
}

/// Output layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root holding one directory per sample.
    pub directory: PathBuf,
    /// Name of the per-sample log.
    pub log_file_name: String,
    /// Name of the failure ledger inside `directory`.
    pub failure_ledger: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("samples"),
            log_file_name: "result.txt".to_owned(),
            failure_ledger: "bug.txt".to_owned(),
        }
    }
}

impl GenerationConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, unparsable or invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is unparsable or invalid.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns the first offending value as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("plate.width", self.plate.width),
            ("plate.height", self.plate.height),
            ("plate.thickness", self.plate.thickness),
            ("material.elastic_modulus", self.material.elastic_modulus),
            ("mesh.element_size", self.mesh.element_size),
            (
                "mesh.contour_integrals",
                f64::from(self.mesh.contour_integrals),
            ),
            ("growth.step_length", self.growth.step_length),
            ("loading.boundary_step", self.loading.boundary_step),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        let finite = [
            ("growth.x_limit", self.growth.x_limit),
            ("growth.y_min", self.growth.y_min),
            ("growth.y_max", self.growth.y_max),
            ("loading.initial_boundary", self.loading.initial_boundary),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if let Some(&fraction) = self
            .mesh
            .partition_fractions
            .iter()
            .find(|&&fraction| fraction.is_nan() || fraction <= 0.0 || fraction >= 1.0)
        {
            return Err(ConfigError::PartitionOutOfRange(fraction));
        }
        if self
            .samples
            .first_id
            .checked_add(self.samples.count)
            .is_none()
        {
            return Err(ConfigError::SampleRangeOverflow {
                first_id: self.samples.first_id,
                count: self.samples.count,
            });
        }
        if self.growth.y_min >= self.growth.y_max {
            return Err(ConfigError::InvalidBounds {
                min: self.growth.y_min,
                max: self.growth.y_max,
            });
        }
        CrackPath::new(self.growth.seed_path.clone())?;
        for (which, distribution) in [
            ("tensile", self.loading.tensile),
            ("shear", self.loading.shear),
        ] {
            if distribution.std_dev.is_nan()
                || distribution.std_dev < 0.0
                || !distribution.mean.is_finite()
            {
                return Err(ConfigError::InvalidDistribution {
                    which,
                    reason: format!(
                        "mean {} with standard deviation {}",
                        distribution.mean, distribution.std_dev
                    ),
                });
            }
        }
        Ok(())
    }

    /// Request builder for this plate, material and mesh.
    #[must_use]
    pub fn request_builder(&self) -> RequestBuilder {
        RequestBuilder {
            plate: self.plate,
            material: self.material.clone(),
            element_size: self.mesh.element_size,
            contour_integrals: self.mesh.contour_integrals,
            partition_fractions: self.mesh.partition_fractions.clone(),
        }
    }

    /// Directory of one sample.
    #[must_use]
    pub fn sample_directory(&self, sample: u32) -> PathBuf {
        self.output.directory.join(format!("sample{sample}"))
    }

    /// Location of the failure ledger.
    #[must_use]
    pub fn failure_ledger_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.failure_ledger)
    }
}
