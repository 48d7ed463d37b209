//! 6D spatial vector algebra, expressed at the world origin.
//!
//! Spatial vectors stack an angular and a linear part:
//!
//! ```text
//! motion = [ω; v]    force = [n; f]
//! ```
//!
//! Motion vectors hold the angular velocity and the linear velocity of the
//! body-fixed point currently at the world origin; force vectors hold the
//! moment about the world origin and the linear force.

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

/// A 6D spatial vector `[angular; linear]`.
pub(crate) type SpatialVec = Vector6<f64>;

pub(crate) fn spatial(angular: Vector3<f64>, linear: Vector3<f64>) -> SpatialVec {
    Vector6::new(
        angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
    )
}

pub(crate) fn angular(v: &SpatialVec) -> Vector3<f64> {
    v.fixed_rows::<3>(0).into_owned()
}

pub(crate) fn linear(v: &SpatialVec) -> Vector3<f64> {
    v.fixed_rows::<3>(3).into_owned()
}

/// The skew-symmetric cross-product matrix of `v`.
pub(crate) fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Motion cross product `a ×m b` (the Lie bracket of two motions).
///
/// ```text
/// [ω1; v1] ×m [ω2; v2] = [ω1 × ω2; ω1 × v2 + v1 × ω2]
/// ```
pub(crate) fn cross_motion(a: &SpatialVec, b: &SpatialVec) -> SpatialVec {
    let (w1, v1) = (angular(a), linear(a));
    let (w2, v2) = (angular(b), linear(b));
    spatial(w1.cross(&w2), w1.cross(&v2) + v1.cross(&w2))
}

/// Force cross product `v ×f f` (the dual of [`cross_motion`]).
///
/// ```text
/// [ω; v] ×f [n; f] = [ω × n + v × f; ω × f]
/// ```
pub(crate) fn cross_force(v: &SpatialVec, f: &SpatialVec) -> SpatialVec {
    let (w, vl) = (angular(v), linear(v));
    let (n, fl) = (angular(f), linear(f));
    spatial(w.cross(&n) + vl.cross(&fl), w.cross(&fl))
}

/// The 6x6 spatial inertia of a body, taken about the world origin.
///
/// `com` is the world position of the center of mass and
/// `inertia_about_com` the rotational inertia about it, both in world axes.
pub(crate) fn spatial_inertia(
    mass: f64,
    com: &Vector3<f64>,
    inertia_about_com: &Matrix3<f64>,
) -> Matrix6<f64> {
    let cx = skew(com);
    let mut inertia = Matrix6::zeros();
    inertia
        .fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&(inertia_about_com + (cx * cx.transpose()) * mass));
    inertia.fixed_view_mut::<3, 3>(0, 3).copy_from(&(cx * mass));
    inertia
        .fixed_view_mut::<3, 3>(3, 0)
        .copy_from(&(cx.transpose() * mass));
    inertia
        .fixed_view_mut::<3, 3>(3, 3)
        .copy_from(&(Matrix3::identity() * mass));
    inertia
}
