use crate::airfoil::AirfoilProfile;
use crate::errors::{ExportError, Result};
use crate::geometry::bezier::{BezierPoint, BezierSpline, DEFAULT_RESOLUTION};
use crate::geometry::curve3::Curve3;
use crate::section::{PanelSettings, StationLayout, WingModel};
use ncollide2d::na::Point3;
use serde::Deserialize;

/// Node-graph identifiers recognized as exportable wing/fin generators.
pub const RECOGNIZED_GENERATORS: [&str; 2] = ["WingV2", "FinV2"];

const FIN_GENERATOR: &str = "FinV2";

/// One Bézier control point as it appears in the job file.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlPointData {
    pub co: [f64; 3],
    pub handle_left: [f64; 3],
    pub handle_right: [f64; 3],
}

/// A guide curve as it appears in the job file.
#[derive(Debug, Clone, Deserialize)]
pub struct SplineData {
    pub points: Vec<ControlPointData>,
}

impl SplineData {
    fn to_spline(&self) -> Result<BezierSpline> {
        let points = self
            .points
            .iter()
            .map(|p| {
                BezierPoint::new(
                    point(&p.co),
                    point(&p.handle_left),
                    point(&p.handle_right),
                )
            })
            .collect();
        BezierSpline::new(points)
    }

    fn to_curve(&self) -> Result<Curve3> {
        Curve3::from_spline(&self.to_spline()?, DEFAULT_RESOLUTION)
    }
}

/// An airfoil cross-section source: the host object name, the name of the
/// mesh data it carries, and the mesh vertices in outline order.
#[derive(Debug, Clone, Deserialize)]
pub struct AirfoilSource {
    pub name: String,
    pub mesh_name: String,
    pub vertices: Vec<[f64; 3]>,
}

impl AirfoilSource {
    pub fn profile(&self) -> AirfoilProfile {
        AirfoilProfile::from_vertices(&self.vertices)
    }
}

/// The full wing description, replacing the host's numbered input slots
/// with named fields. Optional guide curves stay optional; a missing tip
/// airfoil defaults to the root one.
#[derive(Debug, Clone, Deserialize)]
pub struct WingDefinition {
    pub name: String,
    pub generator: String,
    #[serde(default)]
    pub location: [f64; 3],
    pub root_airfoil: AirfoilSource,
    #[serde(default)]
    pub tip_airfoil: Option<AirfoilSource>,
    pub leading_edge: SplineData,
    pub trailing_edge: SplineData,
    #[serde(default)]
    pub twist: Option<SplineData>,
    /// Accepted for host compatibility; not used by the export.
    #[serde(default)]
    pub twist_center: Option<SplineData>,
    #[serde(default)]
    pub interpolation: Option<SplineData>,
    #[serde(default)]
    pub thickness: Option<SplineData>,
    #[serde(default)]
    pub root_count: u32,
    pub rib_count: u32,
    pub tip_count: u32,
    #[serde(default)]
    pub tip_fraction: f64,
    #[serde(default)]
    pub root_fraction: f64,
}

impl WingDefinition {
    /// Precondition check: the generator must be a recognized wing/fin
    /// type and the station layout must be walkable root-to-tip. Fails
    /// before any geometry is built or any file is touched.
    pub fn validate(&self) -> Result<()> {
        if !RECOGNIZED_GENERATORS.contains(&self.generator.as_str()) {
            return Err(ExportError::UnrecognizedGenerator {
                found: self.generator.clone(),
            });
        }
        self.layout().validate()
    }

    pub fn is_fin(&self) -> bool {
        self.generator == FIN_GENERATOR
    }

    /// Root and tip use the same airfoil when no tip is given, or when the
    /// tip names the same object and the same mesh data as the root.
    pub fn shared_airfoil(&self) -> bool {
        match &self.tip_airfoil {
            None => true,
            Some(tip) => {
                tip.name == self.root_airfoil.name
                    && tip.mesh_name == self.root_airfoil.mesh_name
            }
        }
    }

    pub fn layout(&self) -> StationLayout {
        StationLayout {
            root_count: self.root_count,
            rib_count: self.rib_count,
            tip_count: self.tip_count,
            tip_fraction: self.tip_fraction,
            root_fraction: self.root_fraction,
        }
    }

    /// Validate the definition and build the sampled guide-curve model the
    /// section generator works from.
    pub fn build_model(&self) -> Result<WingModel> {
        self.validate()?;

        Ok(WingModel {
            leading: self.leading_edge.to_curve()?,
            trailing: self.trailing_edge.to_curve()?,
            twist: optional_curve(&self.twist)?,
            interpolation: optional_curve(&self.interpolation)?,
            thickness: optional_curve(&self.thickness)?,
            is_fin: self.is_fin(),
            shared_airfoil: self.shared_airfoil(),
            layout: self.layout(),
        })
    }
}

fn optional_curve(data: &Option<SplineData>) -> Result<Option<Curve3>> {
    data.as_ref().map(|d| d.to_curve()).transpose()
}

fn point(v: &[f64; 3]) -> Point3<f64> {
    Point3::new(v[0], v[1], v[2])
}

/// A complete export job: the wing plus the user panel-density settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportJob {
    pub wing: WingDefinition,
    #[serde(default)]
    pub panels: PanelSettings,
}
