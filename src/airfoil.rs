use crate::errors::{ExportError, Result};
use crate::geometry::distances3::lerp;
use ncollide2d::na::Point2;
use serde::Serialize;

/// An airfoil cross-section outline as an ordered point sequence in the
/// chord plane: x is the chordwise coordinate, y the vertical (thickness)
/// coordinate. Built from mesh vertices by dropping the spanwise axis.
#[derive(Debug, Clone, Serialize)]
pub struct AirfoilProfile {
    points: Vec<(f64, f64)>,
}

impl AirfoilProfile {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        AirfoilProfile { points }
    }

    /// Build a profile from 3D mesh vertices, keeping the (y, z) components
    /// in vertex order.
    pub fn from_vertices(vertices: &[[f64; 3]]) -> Self {
        AirfoilProfile {
            points: vertices.iter().map(|v| (v[1], v[2])).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn point2_at(&self, i: usize) -> Point2<f64> {
        Point2::new(self.points[i].0, self.points[i].1)
    }

    /// Linearly interpolate the root and tip profiles point-by-point at the
    /// given blend factor (0 = root, 1 = tip), scaling the vertical
    /// component by `thickness`. The two profiles must have the same point
    /// count; a mismatch is a contract violation, never truncated.
    pub fn blend(root: &Self, tip: &Self, factor: f64, thickness: f64) -> Result<Self> {
        if root.len() != tip.len() {
            return Err(ExportError::ProfileMismatch {
                root: root.len(),
                tip: tip.len(),
            });
        }

        let points = root
            .points
            .iter()
            .zip(tip.points.iter())
            .map(|(r, t)| (lerp(r.0, t.0, factor), lerp(r.1, t.1, factor) * thickness))
            .collect();

        Ok(AirfoilProfile { points })
    }
}
