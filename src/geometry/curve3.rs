use crate::algorithms::preceding_index_search;
use crate::errors::{ExportError, Result};
use crate::geometry::bezier::BezierSpline;
use crate::geometry::distances3::dist;
use itertools::Itertools;
use ncollide2d::na::Point3;

/// A Curve3 is a 3 dimensional polygonal chain reindexed by arc length, so
/// that positions along it can be queried by traveled distance or by a
/// fraction of the total length. Guide curves (leading edge, trailing edge,
/// twist, thickness, interpolation) are all sampled through this structure.
pub struct Curve3 {
    points: Vec<Point3<f64>>,
    lengths: Vec<f64>,
}

impl Curve3 {
    /// Build the arc-length table from an ordered point polyline. Fewer
    /// than two raw points is an error; so is an input whose points all
    /// merge under the `tol` dedup, since a chain with no extent has no
    /// fractional positions.
    pub fn from_points(points: &[Point3<f64>], tol: f64) -> Result<Self> {
        if points.len() < 2 {
            return Err(ExportError::NotEnoughPoints);
        }

        let mut pts = points.to_vec();
        pts.dedup_by(|a, b| dist(a, b) <= tol);

        let mut lengths: Vec<f64> = vec![0.0];
        for (a, b) in pts.iter().tuple_windows() {
            lengths.push(lengths.last().unwrap_or(&0.0) + dist(a, b));
        }

        if *lengths.last().unwrap_or(&0.0) <= 0.0 {
            return Err(ExportError::ZeroLengthCurve);
        }

        Ok(Curve3 {
            points: pts,
            lengths,
        })
    }

    /// Tessellate a Bézier spline at the given overall resolution and build
    /// the arc-length table from the result.
    pub fn from_spline(spline: &BezierSpline, resolution: usize) -> Result<Self> {
        Curve3::from_points(&spline.tessellate(resolution), 1e-9)
    }

    pub fn length(&self) -> f64 {
        *self.lengths.last().unwrap_or(&0.0)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Finds the preceding vertex index for the given length along the
    /// curve, and the weighting of that preceding point needed to
    /// reconstruct the position at the specified length. At l<=0 this is
    /// (0, 1.0); at l>=length it is (last-1, 0.0).
    fn at_length(&self, l: f64) -> (usize, f64) {
        let d = l.clamp(0.0, self.length());
        let index = preceding_index_search(&self.lengths, d);

        if index == self.points.len() - 1 {
            (index - 1, 0.0)
        } else {
            let f = (d - self.lengths[index]) / (self.lengths[index + 1] - self.lengths[index]);
            (index, 1.0 - f)
        }
    }

    /// The interpolated position at the given length along the curve,
    /// clamped to its ends.
    pub fn point_at(&self, l: f64) -> Point3<f64> {
        let (i, f) = self.at_length(l);
        let p = self.points[i];
        let v = self.points[i + 1] - p;
        p + (1.0 - f) * v
    }

    /// The interpolated position at a fraction (0..1) of the curve's total
    /// arc length.
    pub fn point_at_fraction(&self, f: f64) -> Point3<f64> {
        self.point_at(f * self.length())
    }

    /// The fraction of total length already traveled at the table entry
    /// bracketing length `l`; non-decreasing in `l`.
    pub fn fraction_at(&self, l: f64) -> f64 {
        let (i, _) = self.at_length(l);
        self.lengths[i] / self.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bezier::{BezierPoint, DEFAULT_RESOLUTION};
    use approx::assert_relative_eq;
    use rand::prelude::*;
    use test_case::test_case;

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_create() {
        let curve = Curve3::from_points(&sample_points(), 1e-6).unwrap();
        assert_relative_eq!(3.0, curve.length(), epsilon = 1e-10);
    }

    #[test]
    fn test_dedup_points() {
        let mut points = sample_points();
        points.insert(1, Point3::new(1.0, 1e-9, 0.0));
        let curve = Curve3::from_points(&points, 1e-6).unwrap();
        assert_eq!(4, curve.point_count());
    }

    #[test]
    fn test_not_enough_points() {
        let points = [Point3::new(1.0, 1.0, 1.0)];
        let result = Curve3::from_points(&points, 1e-6);
        assert!(matches!(result, Err(ExportError::NotEnoughPoints)));
    }

    #[test]
    fn test_coincident_points_have_zero_length() {
        let points = [Point3::new(1.0, 1.0, 1.0); 8];
        let result = Curve3::from_points(&points, 1e-6);
        assert!(matches!(result, Err(ExportError::ZeroLengthCurve)));
    }

    #[test]
    fn test_points_within_tolerance_have_zero_length() {
        let points = [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0 + 1e-9, 1.0),
        ];
        let result = Curve3::from_points(&points, 1e-6);
        assert!(matches!(result, Err(ExportError::ZeroLengthCurve)));
    }

    #[test_case(0.5, 0, 0.5)]
    #[test_case(-0.5, 0, 1.0)]
    #[test_case(0.0, 0, 1.0)]
    #[test_case(5.0, 2, 0.0)]
    #[test_case(2.0, 2, 1.0)]
    #[test_case(2.25, 2, 0.75)]
    fn test_lengths(l: f64, ei: usize, ef: f64) {
        let curve = Curve3::from_points(&sample_points(), 1e-6).unwrap();
        let (i, f) = curve.at_length(l);
        assert_eq!(ei, i);
        assert_relative_eq!(ef, f, epsilon = 1e-8);
    }

    #[test_case(0.0, (0.0, 0.0, 0.0))]
    #[test_case(0.5, (0.5, 0.0, 0.0))]
    #[test_case(1.5, (1.0, 0.5, 0.0))]
    #[test_case(3.0, (1.0, 1.0, 1.0))]
    #[test_case(5.0, (1.0, 1.0, 1.0))]
    fn test_points_at_length(l: f64, e: (f64, f64, f64)) {
        let curve = Curve3::from_points(&sample_points(), 1e-6).unwrap();
        let p = curve.point_at(l);

        assert_relative_eq!(e.0, p.x, epsilon = 1e-8);
        assert_relative_eq!(e.1, p.y, epsilon = 1e-8);
        assert_relative_eq!(e.2, p.z, epsilon = 1e-8);
    }

    fn curved_spline() -> BezierSpline {
        BezierSpline::new(vec![
            BezierPoint::new(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ),
            BezierPoint::new(
                Point3::new(4.0, 0.0, 2.0),
                Point3::new(3.0, 1.0, 2.0),
                Point3::new(5.0, -1.0, 2.0),
            ),
            BezierPoint::sharp(Point3::new(6.0, 0.0, 2.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_spline_endpoint_exactness() {
        let spline = curved_spline();
        let curve = Curve3::from_spline(&spline, DEFAULT_RESOLUTION).unwrap();

        let start = curve.point_at_fraction(0.0);
        let end = curve.point_at_fraction(1.0);

        assert_relative_eq!(0.0, start.x, epsilon = 1e-9);
        assert_relative_eq!(0.0, start.y, epsilon = 1e-9);
        assert_relative_eq!(0.0, start.z, epsilon = 1e-9);
        assert_relative_eq!(6.0, end.x, epsilon = 1e-9);
        assert_relative_eq!(0.0, end.y, epsilon = 1e-9);
        assert_relative_eq!(2.0, end.z, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_spline_fraction_midpoint() {
        let spline = BezierSpline::new(vec![
            BezierPoint::sharp(Point3::new(0.0, 0.0, 0.0)),
            BezierPoint::sharp(Point3::new(2.0, 0.0, 0.0)),
        ])
        .unwrap();
        let curve = Curve3::from_spline(&spline, DEFAULT_RESOLUTION).unwrap();

        assert_relative_eq!(2.0, curve.length(), epsilon = 1e-9);
        let mid = curve.point_at_fraction(0.5);
        assert_relative_eq!(1.0, mid.x, epsilon = 1e-9);
    }

    #[test]
    fn test_fraction_monotonicity() {
        let curve = Curve3::from_spline(&curved_spline(), DEFAULT_RESOLUTION).unwrap();
        let mut rng = rand::thread_rng();
        let mut fractions: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..1.0)).collect();
        fractions.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut last = 0.0;
        for f in fractions {
            let traveled = curve.fraction_at(f * curve.length());
            assert!(traveled >= last);
            last = traveled;
        }
    }
}
