//! Material and boundary conditions applied to the cracked plate.

use serde::{Deserialize, Serialize};

use crate::loads::LoadPair;

/// Linear elastic material assigned to the whole plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Label handed to the engine.
    pub name: String,
    /// Young's modulus in megapascals.
    pub elastic_modulus: f64,
    /// Poisson's ratio.
    pub poissons_ratio: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Ni".to_owned(),
            elastic_modulus: 200_000.0,
            poissons_ratio: 0.31,
        }
    }
}

/// Plate edge a condition is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// The `y = 0` face.
    Bottom,
    /// The `y = height` face.
    Top,
}

/// A single boundary condition in an analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// All translations and rotations of the edge are fixed.
    Encastre {
        /// Constrained edge.
        edge: Edge,
    },
    /// Uniform surface traction over the edge.
    Traction {
        /// Name of the load in the engine model.
        name: String,
        /// Loaded edge.
        edge: Edge,
        /// Unit direction of the traction in the plate plane.
        direction: [f64; 2],
        /// Traction magnitude in megapascals.
        magnitude: f64,
    },
}

/// Build the supports and tractions for one load stage.
///
/// The bottom edge is clamped and the top edge always carries the tensile
/// traction. The shear traction is added only when it is nonzero, since the
/// engine rejects a traction definition of zero magnitude.
#[must_use]
pub fn boundary_conditions(loads: LoadPair) -> Vec<BoundaryCondition> {
    let mut conditions = vec![
        BoundaryCondition::Encastre { edge: Edge::Bottom },
        BoundaryCondition::Traction {
            name: "top-TenLOAD".to_owned(),
            edge: Edge::Top,
            direction: [0.0, 1.0],
            magnitude: loads.tensile,
        },
    ];
    if loads.shear != 0.0 {
        conditions.push(BoundaryCondition::Traction {
            name: "top-ShearLOAD".to_owned(),
            edge: Edge::Top,
            direction: [1.0, 0.0],
            magnitude: loads.shear,
        });
    }
    conditions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shear_is_omitted() {
        let conditions = boundary_conditions(LoadPair::new(150.0, 0.0));
        assert_eq!(conditions.len(), 2);
        assert_eq!(
            conditions[0],
            BoundaryCondition::Encastre { edge: Edge::Bottom }
        );
        assert!(matches!(
            &conditions[1],
            BoundaryCondition::Traction { direction, magnitude, .. }
                if *direction == [0.0, 1.0] && *magnitude == 150.0
        ));
    }

    #[test]
    fn negative_shear_is_applied() {
        let conditions = boundary_conditions(LoadPair::new(150.0, -20.0));
        assert_eq!(conditions.len(), 3);
        assert!(matches!(
            &conditions[2],
            BoundaryCondition::Traction { direction, magnitude, .. }
                if *direction == [1.0, 0.0] && *magnitude == -20.0
        ));
    }
}
