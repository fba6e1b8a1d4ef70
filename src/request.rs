//! Assemble the analysis request for one crack increment.

use serde::{Deserialize, Serialize};

use crate::conditions::{boundary_conditions, BoundaryCondition, Material};
use crate::geometry::{CrackPath, Plate, Point};
use crate::loads::LoadPair;

/// Mesh seeding handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshSeed {
    /// Global element size.
    pub element_size: f64,
    /// Maximum chordal deviation as a fraction of element size.
    pub deviation_factor: f64,
    /// Smallest allowed element as a fraction of element size.
    pub min_size_factor: f64,
}

/// Increment controls for the static analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticStep {
    /// Maximum number of solver increments.
    pub max_increments: u32,
    /// Initial increment as a fraction of the step.
    pub initial_increment: f64,
    /// Smallest allowed increment.
    pub min_increment: f64,
    /// Largest allowed increment.
    pub max_increment: f64,
}

impl Default for StaticStep {
    fn default() -> Self {
        Self {
            max_increments: 10_000,
            initial_increment: 0.001,
            min_increment: 1.0e-8,
            max_increment: 0.1,
        }
    }
}

/// Complete description of one analysis submitted to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Job name, unique per sample and increment.
    pub model_name: String,
    /// Plate dimensions.
    pub plate: Plate,
    /// Heights of the horizontal partition planes.
    pub partitions: Vec<f64>,
    /// Crack spline through every tip so far.
    pub crack: Vec<Point>,
    /// Plate material.
    pub material: Material,
    /// Supports and tractions.
    pub boundary_conditions: Vec<BoundaryCondition>,
    /// Static step controls.
    pub step: StaticStep,
    /// Number of contour rings for the stress-intensity factors.
    pub contour_integrals: u32,
    /// Field variables written by the engine.
    pub field_outputs: Vec<String>,
    /// Mesh seeding.
    pub mesh: MeshSeed,
}

/// Builds analysis requests from the fixed plate setup and the varying crack state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    /// Plate dimensions.
    pub plate: Plate,
    /// Plate material.
    pub material: Material,
    /// Global element size.
    pub element_size: f64,
    /// Number of contour rings.
    pub contour_integrals: u32,
    /// Partition plane heights as fractions of the plate height.
    pub partition_fractions: Vec<f64>,
}

impl RequestBuilder {
    /// Build the request for the current crack path and stage loads.
    ///
    /// The full path is passed as the crack spline, not just the tip.
    ///
    /// # Examples
    /// ```
    /// use crackx::{point, CrackPath, LoadPair, Material, Plate, RequestBuilder};
    ///
    /// let builder = RequestBuilder {
    ///     plate: Plate::default(),
    ///     material: Material::default(),
    ///     element_size: 0.11,
    ///     contour_integrals: 5,
    ///     partition_fractions: vec![0.25, 0.75],
    /// };
    /// let path = CrackPath::new(vec![point(0.0, 10.0), point(1.0, 10.0)]).unwrap();
    /// let request = builder.build("Sample1Incre0", &path, LoadPair::new(200.0, 0.0));
    /// assert_eq!(request.partitions, vec![5.0, 15.0]);
    /// assert_eq!(request.boundary_conditions.len(), 2);
    /// ```
    #[must_use]
    pub fn build(&self, model_name: &str, path: &CrackPath, loads: LoadPair) -> AnalysisRequest {
        AnalysisRequest {
            model_name: model_name.to_owned(),
            plate: self.plate,
            partitions: self
                .partition_fractions
                .iter()
                .map(|fraction| fraction * self.plate.height)
                .collect(),
            crack: path.points().to_vec(),
            material: self.material.clone(),
            boundary_conditions: boundary_conditions(loads),
            step: StaticStep::default(),
            contour_integrals: self.contour_integrals,
            field_outputs: ["S", "LE", "U", "PHILSM", "PSILSM", "STATUS", "STATUSXFEM"]
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            mesh: MeshSeed {
                element_size: self.element_size,
                deviation_factor: 0.1,
                min_size_factor: 0.1,
            },
        }
    }
}
