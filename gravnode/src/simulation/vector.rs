//! Fixed-size 3-component vector math used by the simulation core
//!
//! Positions, velocities and accelerations are all `NVec3` (nalgebra `Vector3<f64>`).
//! The free functions here are the small set of value operations the force model
//! and integrator are written against

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

/// a + b
#[inline]
pub fn add(a: &NVec3, b: &NVec3) -> NVec3 {
    a + b
}

/// a - b
#[inline]
pub fn subtract(a: &NVec3, b: &NVec3) -> NVec3 {
    a - b
}

/// v * k
#[inline]
pub fn scale(v: &NVec3, k: f64) -> NVec3 {
    v * k
}

/// Euclidean length |v|
#[inline]
pub fn length(v: &NVec3) -> f64 {
    v.norm()
}

/// |a - b|^2, without the square root
#[inline]
pub fn distance_squared(a: &NVec3, b: &NVec3) -> f64 {
    (a - b).norm_squared()
}

/// True when every component is neither NaN nor infinite
#[inline]
pub fn is_finite(v: &NVec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
