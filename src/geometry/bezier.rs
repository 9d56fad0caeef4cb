use crate::errors::{ExportError, Result};
use crate::geometry::distances3::dist;
use ncollide2d::na::Point3;

/// Overall sample budget used when tessellating a spline for arc-length
/// lookup. Distributed across segments proportionally to their chord length.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Floor on the number of samples a single segment receives, so that short
/// segments are never reduced to a degenerate handful of points.
const MIN_SEGMENT_SAMPLES: usize = 5;

/// One control point of a cubic Bézier spline: the knot (anchor) position
/// and the incoming/outgoing handle positions.
#[derive(Debug, Clone, Copy)]
pub struct BezierPoint {
    pub co: Point3<f64>,
    pub handle_left: Point3<f64>,
    pub handle_right: Point3<f64>,
}

impl BezierPoint {
    pub fn new(co: Point3<f64>, handle_left: Point3<f64>, handle_right: Point3<f64>) -> Self {
        BezierPoint {
            co,
            handle_left,
            handle_right,
        }
    }

    /// A control point whose handles coincide with the knot, producing
    /// straight segments on both sides.
    pub fn sharp(co: Point3<f64>) -> Self {
        BezierPoint::new(co, co, co)
    }
}

/// An open cubic Bézier spline with at least two control points. Segment i
/// runs from knot i through its right handle and knot i+1's left handle.
#[derive(Debug, Clone)]
pub struct BezierSpline {
    points: Vec<BezierPoint>,
}

impl BezierSpline {
    pub fn new(points: Vec<BezierPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ExportError::NotEnoughPoints);
        }
        Ok(BezierSpline { points })
    }

    pub fn points(&self) -> &[BezierPoint] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Tessellate the spline into an ordered point polyline. Each segment
    /// receives a share of `resolution` proportional to its knot-to-knot
    /// chord length, floored at a small minimum. Segment endpoints are
    /// included, so consecutive segments duplicate the shared knot; callers
    /// building an arc-length table deduplicate by tolerance.
    pub fn tessellate(&self, resolution: usize) -> Vec<Point3<f64>> {
        let chords: Vec<f64> = (0..self.segment_count())
            .map(|i| dist(&self.points[i].co, &self.points[i + 1].co))
            .collect();
        let total: f64 = chords.iter().sum();

        let mut out = Vec::new();
        for (i, chord) in chords.iter().enumerate() {
            let share = if total > 0.0 {
                (resolution as f64 * chord / total) as usize
            } else {
                0
            };
            let n = share.max(MIN_SEGMENT_SAMPLES);

            let k0 = self.points[i].co;
            let h0 = self.points[i].handle_right;
            let h1 = self.points[i + 1].handle_left;
            let k1 = self.points[i + 1].co;

            for j in 0..n {
                let t = j as f64 / (n - 1) as f64;
                out.push(cubic_point(&k0, &h0, &h1, &k1, t));
            }
        }

        out
    }
}

/// Evaluate a cubic Bézier segment at parameter t in [0, 1] using the
/// Bernstein form with knots k0, k1 and interior handles h0, h1.
pub fn cubic_point(
    k0: &Point3<f64>,
    h0: &Point3<f64>,
    h1: &Point3<f64>,
    k1: &Point3<f64>,
    t: f64,
) -> Point3<f64> {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;

    Point3::new(
        b0 * k0.x + b1 * h0.x + b2 * h1.x + b3 * k1.x,
        b0 * k0.y + b1 * h0.y + b2 * h1.y + b3 * k1.y,
        b0 * k0.z + b1 * h0.z + b2 * h1.z + b3 * k1.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn straight_spline(len: f64) -> BezierSpline {
        BezierSpline::new(vec![
            BezierPoint::sharp(Point3::new(0.0, 0.0, 0.0)),
            BezierPoint::sharp(Point3::new(len, 0.0, 0.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_too_few_points() {
        let result = BezierSpline::new(vec![BezierPoint::sharp(Point3::origin())]);
        assert!(matches!(result, Err(ExportError::NotEnoughPoints)));
    }

    #[test_case(0.0)]
    #[test_case(1.0)]
    fn test_cubic_endpoints(t: f64) {
        let k0 = Point3::new(1.0, 2.0, 3.0);
        let h0 = Point3::new(2.0, 4.0, 3.0);
        let h1 = Point3::new(5.0, 4.0, 1.0);
        let k1 = Point3::new(7.0, 2.0, 0.0);
        let p = cubic_point(&k0, &h0, &h1, &k1, t);
        let e = if t == 0.0 { k0 } else { k1 };

        assert_relative_eq!(e.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(e.y, p.y, epsilon = 1e-12);
        assert_relative_eq!(e.z, p.z, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_midpoint_straight() {
        let k0 = Point3::new(0.0, 0.0, 0.0);
        let k1 = Point3::new(2.0, 0.0, 0.0);
        let p = cubic_point(&k0, &k0, &k1, &k1, 0.5);
        assert_relative_eq!(1.0, p.x, epsilon = 1e-12);
    }

    #[test]
    fn test_tessellate_straight_is_collinear() {
        let spline = straight_spline(3.0);
        for p in spline.tessellate(DEFAULT_RESOLUTION) {
            assert_relative_eq!(0.0, p.y, epsilon = 1e-12);
            assert_relative_eq!(0.0, p.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_segment_sample_floor() {
        // One long segment and one very short one; the short segment's
        // proportional share rounds to zero but it still gets the floor.
        let spline = BezierSpline::new(vec![
            BezierPoint::sharp(Point3::new(0.0, 0.0, 0.0)),
            BezierPoint::sharp(Point3::new(100.0, 0.0, 0.0)),
            BezierPoint::sharp(Point3::new(100.001, 0.0, 0.0)),
        ])
        .unwrap();

        // The long segment gets 99 of the 100 samples, the short one is
        // floored at 5 rather than its proportional share of 0.
        let points = spline.tessellate(DEFAULT_RESOLUTION);
        assert_eq!(99 + MIN_SEGMENT_SAMPLES, points.len());
    }

    #[test]
    fn test_budget_is_proportional() {
        let spline = BezierSpline::new(vec![
            BezierPoint::sharp(Point3::new(0.0, 0.0, 0.0)),
            BezierPoint::sharp(Point3::new(1.0, 0.0, 0.0)),
            BezierPoint::sharp(Point3::new(4.0, 0.0, 0.0)),
        ])
        .unwrap();

        // 1/4 and 3/4 of a 100 sample budget.
        let points = spline.tessellate(DEFAULT_RESOLUTION);
        assert_eq!(25 + 75, points.len());
    }
}
