use ncollide2d::na::{Point3, RealField};

/// Return the distance between two 3D points
pub fn dist<N: RealField + Copy>(a: &Point3<N>, b: &Point3<N>) -> N {
    (a - b).norm()
}

/// Linear interpolation between two scalars; t=0 yields a, t=1 yields b.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
