use crate::errors::{ExportError, Result};
use crate::geometry::curve3::Curve3;
use ncollide2d::na::Point3;
use serde::{Deserialize, Serialize};

/// Fixed chordwise panel distribution tag understood by XFlr5.
pub const CHORD_DISTRIBUTION: &str = "COSINE";

/// Fixed spanwise panel distribution tag understood by XFlr5.
pub const SPAN_DISTRIBUTION: &str = "INVERSE SINE";

/// Panel counts never drop below this, whatever the density settings and
/// section geometry produce.
pub const MIN_PANELS: u32 = 2;

/// Empirical mapping from the thickness guide curve's amplitude to a
/// multiplicative profile-thickness factor: scale = z * 25 + 1.
const THICKNESS_GAIN: f64 = 25.0;

/// The twist guide curve's amplitude maps to a sign-inverted angle in
/// degrees: twist = -z * 1000.
const TWIST_GAIN: f64 = -1000.0;

/// User-configured panel densities in panels per metre. An explicit
/// parameter object rather than ambient settings state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub span_panels: u32,
    pub chord_panels: u32,
}

impl Default for PanelSettings {
    fn default() -> Self {
        PanelSettings {
            span_panels: 100,
            chord_panels: 100,
        }
    }
}

/// Partitioning of the [0, 1] station space into root, rib (mid) and tip
/// zones. Fraction 1.0 is the wing root, 0.0 the tip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StationLayout {
    pub root_count: u32,
    pub rib_count: u32,
    pub tip_count: u32,
    pub tip_fraction: f64,
    pub root_fraction: f64,
}

impl StationLayout {
    /// The root zone only participates with at least two root stations and
    /// a nonzero span fraction to spread them over; otherwise it is
    /// disabled and its blend fraction is forced to zero.
    fn root_enabled(&self) -> bool {
        self.root_count >= 2 && self.root_fraction > 0.0
    }

    /// Rejects layouts whose station sequence would not be strictly
    /// decreasing: zone fractions outside [0, 1), a multi-station tip zone
    /// with no span to spread over, or root and tip zones that leave no
    /// room for the mid zone between them.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.tip_fraction) || !(0.0..1.0).contains(&self.root_fraction) {
            return Err(ExportError::BadStationLayout(
                "zone fractions must lie in [0, 1)",
            ));
        }
        if self.tip_count > 1 && self.tip_fraction <= 0.0 {
            return Err(ExportError::BadStationLayout(
                "a multi-station tip zone needs a nonzero tip fraction",
            ));
        }
        let root_fraction = if self.root_enabled() {
            self.root_fraction
        } else {
            0.0
        };
        if root_fraction + self.tip_fraction >= 1.0 {
            return Err(ExportError::BadStationLayout(
                "root and tip fractions must sum to less than one",
            ));
        }
        Ok(())
    }

    /// Total number of emitted stations: root_count-1 (when the root zone
    /// is enabled) + rib_count + tip_count.
    pub fn station_count(&self) -> usize {
        let root = if self.root_enabled() {
            self.root_count as usize - 1
        } else {
            0
        };
        root + self.rib_count as usize + self.tip_count as usize
    }

    /// The ordered station fractions, strictly decreasing from 1.0 at the
    /// root to 0.0 at the tip. Each zone consumes its station budget with
    /// uniform steps of its blend-fraction share; the zones hand off with
    /// the counter of the finished zone saturated, so the sequence starts
    /// and ends exactly on the interval bounds.
    pub fn fractions(&self) -> Vec<f64> {
        let root_fraction = if self.root_enabled() {
            self.root_fraction
        } else {
            0.0
        };
        let mid_fraction = 1.0 - self.tip_fraction - root_fraction;

        let mut out = Vec::with_capacity(self.station_count());

        if self.root_enabled() {
            let denom = (self.root_count - 1) as f64;
            for j in 0..self.root_count - 1 {
                out.push(1.0 - root_fraction * j as f64 / denom);
            }
        }

        if self.rib_count > 0 {
            let denom = self.rib_count as f64;
            for k in 0..self.rib_count {
                out.push(1.0 - root_fraction - mid_fraction * k as f64 / denom);
            }
        }

        if self.tip_count > 0 {
            let denom = self.tip_count as f64;
            for m in 1..=self.tip_count {
                out.push(self.tip_fraction - self.tip_fraction * m as f64 / denom);
            }
        }

        out
    }
}

/// The sampled guide curves and flags the generator works from. The
/// optional curves may be absent, in which case they sample as the zero
/// point (zero twist, unit thickness, pure-root interpolation).
pub struct WingModel {
    pub leading: Curve3,
    pub trailing: Curve3,
    pub twist: Option<Curve3>,
    pub interpolation: Option<Curve3>,
    pub thickness: Option<Curve3>,
    pub is_fin: bool,
    pub shared_airfoil: bool,
    pub layout: StationLayout,
}

/// One row of the output table, immutable once appended. Field names mirror
/// the XFlr5 section elements they are written to.
#[derive(Debug, Clone, Serialize)]
pub struct WingSection {
    pub y_position: f64,
    pub chord: f64,
    pub x_offset: f64,
    pub dihedral: f64,
    pub twist: f64,
    pub x_panels: u32,
    pub x_distribution: &'static str,
    pub y_panels: u32,
    pub y_distribution: &'static str,
    pub left_foil: String,
    pub right_foil: String,
}

/// One blended airfoil file to produce: the station index it is named
/// after, the root→tip blend factor and the vertical thickness scale.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AirfoilJob {
    pub station: usize,
    pub factor: f64,
    pub thickness: f64,
}

/// The generator's full output: the ordered section rows plus the airfoil
/// files they reference.
#[derive(Debug, Clone, Serialize)]
pub struct SectionTable {
    pub sections: Vec<WingSection>,
    pub airfoils: Vec<AirfoilJob>,
}

fn sample_optional(curve: &Option<Curve3>, fraction: f64) -> Point3<f64> {
    match curve {
        Some(c) => c.point_at_fraction(fraction),
        None => Point3::origin(),
    }
}

/// Fins are wings rotated 90 degrees about the chord axis; swapping the
/// spanwise and vertical axes of the leading-edge samples lets the rest of
/// the computation treat them identically.
fn fin_swap(p: Point3<f64>) -> Point3<f64> {
    Point3::new(p.z, p.y, p.x)
}

fn foil_names(prefix: &str, station: usize, count: usize, shared: bool) -> (String, String) {
    if shared {
        let name = format!("{prefix}0000");
        (name.clone(), name)
    } else {
        let left = format!("{prefix}{station:04}");
        let right = if station + 1 < count {
            format!("{prefix}{:04}", station + 1)
        } else {
            // The terminal station has no section beyond it; its right side
            // reuses the terminal blend.
            left.clone()
        };
        (left, right)
    }
}

/// Walk the stations root-to-tip, sampling every guide curve at each
/// station fraction, and build the ordered section table plus the airfoil
/// jobs needed to emit coordinate files. `foil_prefix` is the basename the
/// airfoil identifiers are derived from.
pub fn generate_sections(
    model: &WingModel,
    panels: &PanelSettings,
    foil_prefix: &str,
) -> SectionTable {
    let fractions = model.layout.fractions();
    let count = fractions.len();

    let mut sections = Vec::with_capacity(count);
    let mut airfoils = Vec::new();

    // The terminal station has no following station to measure against; it
    // keeps the previous station's panel counts.
    let mut x_panels = MIN_PANELS;
    let mut y_panels = MIN_PANELS;

    for (i, &fraction) in fractions.iter().enumerate() {
        let mut leading = model.leading.point_at_fraction(fraction);
        let trailing = model.trailing.point_at_fraction(fraction);
        let twist_sample = sample_optional(&model.twist, fraction);
        let interp_sample = sample_optional(&model.interpolation, fraction);
        let thickness_sample = sample_optional(&model.thickness, fraction);

        if model.is_fin {
            leading = fin_swap(leading);
        }

        let chord = (leading.y - trailing.y).abs();

        let dihedral = if i + 1 < count {
            let mut leading_next = model.leading.point_at_fraction(fractions[i + 1]);
            if model.is_fin {
                leading_next = fin_swap(leading_next);
            }

            let span_step = (leading_next.x - leading.x).abs();
            x_panels = MIN_PANELS.max((panels.chord_panels as f64 * chord) as u32);
            y_panels = MIN_PANELS.max((panels.span_panels as f64 * span_step) as u32);

            (leading_next.z - leading.z)
                .abs()
                .atan2(span_step)
                .to_degrees()
        } else {
            0.0
        };

        if i == 0 || !model.shared_airfoil {
            airfoils.push(AirfoilJob {
                station: i,
                factor: interp_sample.z,
                thickness: thickness_sample.z * THICKNESS_GAIN + 1.0,
            });
        }

        let (left_foil, right_foil) = foil_names(foil_prefix, i, count, model.shared_airfoil);

        sections.push(WingSection {
            y_position: leading.x.abs(),
            chord,
            x_offset: leading.y,
            dihedral,
            twist: twist_sample.z * TWIST_GAIN,
            x_panels,
            x_distribution: CHORD_DISTRIBUTION,
            y_panels,
            y_distribution: SPAN_DISTRIBUTION,
            left_foil,
            right_foil,
        });
    }

    SectionTable { sections, airfoils }
}
