//! Force / acceleration contributors for the simulation
//!
//! Defines the acceleration trait, the set that sums terms into one
//! acceleration per body, and the direct radial gravity law with a
//! per-source falloff exponent

use std::sync::Arc;

use super::registry::BodyRegistry;
use super::vector::{add, length, scale, subtract, NVec3};

/// Collection of acceleration terms (gravity, drag, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all bodies in `reg`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - fixed bodies always end with zero
    /// - `out` must hold exactly one slot per body in `reg`
    pub fn accumulate_accels(&self, t: f64, reg: &BodyRegistry, out: &mut [NVec3]) {
        debug_assert_eq!(out.len(), reg.len(), "one acceleration slot per body");
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, reg, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration source operating on a [`BodyRegistry`]
/// Implementations add their contribution into `out[i]` for each free body,
/// where `i` is the body's insertion index
pub trait Acceleration {
    fn acceleration(&self, t: f64, reg: &BodyRegistry, out: &mut [NVec3]);
}

impl<T: Acceleration + ?Sized> Acceleration for Arc<T> {
    fn acceleration(&self, t: f64, reg: &BodyRegistry, out: &mut [NVec3]) {
        (**self).acceleration(t, reg, out)
    }
}

/// Direct O(n^2) radial gravity
///
/// For every free body i and every other body j:
///
/// `a_i += G * strength_j * m_j * d / r^(falloff_j + 1)`
///
/// with `d = x_j - x_i` and `r = max(|d|, softening)`. Bodies without a field
/// use strength 1 and `default_falloff`
pub struct RadialGravity {
    pub g: f64,
    pub softening: f64,
    pub default_falloff: f64,
}

impl Acceleration for RadialGravity {
    fn acceleration(&self, _t: f64, reg: &BodyRegistry, out: &mut [NVec3]) {
        let bodies = reg.bodies();
        let n = bodies.len();

        for i in 0..n {
            let bi = &bodies[i];
            // fixed bodies source gravity but never receive it
            if bi.fixed {
                continue;
            }

            let mut acc = NVec3::zeros();
            for (j, bj) in bodies.iter().enumerate() {
                if j == i {
                    continue;
                }

                let field = bj.field_or(self.default_falloff);
                let d = subtract(&bj.x, &bi.x);
                let r = length(&d).max(self.softening);

                // coincident with zero softening: no defined direction
                if r == 0.0 {
                    continue;
                }

                let coef = self.g * field.strength * bj.m / r.powf(field.falloff + 1.0);
                acc = add(&acc, &scale(&d, coef));
            }

            out[i] = add(&out[i], &acc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::{Body, GravityField};

    fn pair(dist: f64, field: Option<GravityField>) -> BodyRegistry {
        let mut reg = BodyRegistry::new();
        let mut src = Body::new(NVec3::zeros(), NVec3::zeros(), 100.0).fixed(true);
        src.field = field;
        reg.insert(src).unwrap();
        reg.insert(Body::new(NVec3::new(dist, 0.0, 0.0), NVec3::zeros(), 1.0))
            .unwrap();
        reg
    }

    fn gravity(softening: f64) -> AccelSet {
        AccelSet::new().with(RadialGravity {
            g: 1.0,
            softening,
            default_falloff: 2.0,
        })
    }

    #[test]
    fn inverse_square_by_default() {
        let forces = gravity(0.0);
        let mut near = vec![NVec3::zeros(); 2];
        let mut far = vec![NVec3::zeros(); 2];
        forces.accumulate_accels(0.0, &pair(1.0, None), &mut near);
        forces.accumulate_accels(0.0, &pair(2.0, None), &mut far);

        assert!((near[1].x + 100.0).abs() < 1e-12);
        assert!((near[1].norm() / far[1].norm() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn per_source_falloff() {
        let forces = gravity(0.0);
        let field = Some(GravityField::new(1.0, 10.0));
        let mut near = vec![NVec3::zeros(); 2];
        let mut far = vec![NVec3::zeros(); 2];
        forces.accumulate_accels(0.0, &pair(1.0, field), &mut near);
        forces.accumulate_accels(0.0, &pair(2.0, field), &mut far);

        let ratio = near[1].norm() / far[1].norm();
        assert!((ratio - 1024.0).abs() < 1e-9, "got {}", ratio);
    }

    #[test]
    fn strength_scales_linearly() {
        let forces = gravity(0.0);
        let mut plain = vec![NVec3::zeros(); 2];
        let mut strong = vec![NVec3::zeros(); 2];
        forces.accumulate_accels(0.0, &pair(3.0, None), &mut plain);
        forces.accumulate_accels(0.0, &pair(3.0, Some(GravityField::new(1.2, 2.0))), &mut strong);

        assert!((strong[1].x / plain[1].x - 1.2).abs() < 1e-12);
    }

    #[test]
    fn fixed_body_receives_nothing() {
        let forces = gravity(0.0);
        let mut out = vec![NVec3::new(5.0, 5.0, 5.0); 2];
        forces.accumulate_accels(0.0, &pair(1.0, None), &mut out);
        assert_eq!(out[0], NVec3::zeros());
        assert!(out[1].x < 0.0);
    }

    #[test]
    fn softening_clamps_separation() {
        let forces = gravity(0.5);
        let mut tiny = vec![NVec3::zeros(); 2];
        forces.accumulate_accels(0.0, &pair(1e-9, None), &mut tiny);
        // |a| = G m |d| / s^3
        assert!(tiny[1].norm() < 100.0 * 1e-9 / 0.125 + 1e-12);
    }

    #[test]
    fn coincident_without_softening_is_finite() {
        let forces = gravity(0.0);
        let mut out = vec![NVec3::zeros(); 2];
        forces.accumulate_accels(0.0, &pair(0.0, None), &mut out);
        assert_eq!(out[1], NVec3::zeros());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "one acceleration slot per body")]
    fn short_output_buffer_is_rejected() {
        let mut out = vec![NVec3::zeros(); 1];
        gravity(0.1).accumulate_accels(0.0, &pair(1.0, None), &mut out);
    }
}
