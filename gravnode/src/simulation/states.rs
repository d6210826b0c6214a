//! Core state types for the point-mass simulation.
//!
//! - `BodyHandle` stable identity issued by the registry
//! - `GravityField` per-source field parameters (strength, falloff exponent)
//! - `Body` position/velocity/mass plus the fixed flag

use std::fmt;

use super::error::SimError;
use super::vector::{is_finite, NVec3};

/// Stable identity of a body, issued in insertion order
///
/// Carries the id of the registry that issued it, so a handle from another
/// registry is rejected even when its index is in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    pub(crate) registry: u32,
    pub(crate) index: u32,
}

impl BodyHandle {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.registry, self.index)
    }
}

/// Radial gravity field sourced by a body
///
/// Acceleration on another body at separation `r` scales with
/// `strength * m / r^falloff`. `falloff = 2` is the inverse-square law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    pub strength: f64, // multiplier on G * m
    pub falloff: f64,  // distance exponent
}

impl GravityField {
    pub fn new(strength: f64, falloff: f64) -> Self {
        Self { strength, falloff }
    }

    fn validate(&self) -> Result<(), SimError> {
        if !self.strength.is_finite() {
            return Err(SimError::invalid("field strength must be finite"));
        }
        if !self.falloff.is_finite() {
            return Err(SimError::invalid("field falloff exponent must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3,                    // position
    pub v: NVec3,                    // velocity
    pub m: f64,                      // mass
    pub radius: f64,                 // display only, not used in dynamics
    pub fixed: bool,                 // immovable, still sources gravity
    pub field: Option<GravityField>, // None = strength 1, config default falloff
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self {
            x,
            v,
            m,
            radius: 0.0,
            fixed: false,
            field: None,
        }
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_field(mut self, field: GravityField) -> Self {
        self.field = Some(field);
        self
    }

    /// Checks mass > 0, radius >= 0 and finite state
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.m > 0.0) || !self.m.is_finite() {
            return Err(SimError::invalid(format!(
                "mass must be positive and finite (got {})",
                self.m
            )));
        }
        if !(self.radius >= 0.0) || !self.radius.is_finite() {
            return Err(SimError::invalid(format!(
                "radius must be non-negative and finite (got {})",
                self.radius
            )));
        }
        if !is_finite(&self.x) || !is_finite(&self.v) {
            return Err(SimError::invalid("position and velocity must be finite"));
        }
        if let Some(field) = &self.field {
            field.validate()?;
        }
        Ok(())
    }

    /// Strength and falloff this body sources, falling back to `default_falloff`
    pub fn field_or(&self, default_falloff: f64) -> GravityField {
        self.field.unwrap_or(GravityField {
            strength: 1.0,
            falloff: default_falloff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_mass() {
        let b = Body::new(NVec3::zeros(), NVec3::zeros(), 0.0);
        assert!(matches!(b.validate(), Err(SimError::InvalidParameter(_))));

        let b = Body::new(NVec3::zeros(), NVec3::zeros(), -3.0);
        assert!(b.validate().is_err());

        let b = Body::new(NVec3::zeros(), NVec3::zeros(), f64::NAN);
        assert!(b.validate().is_err());
    }

    #[test]
    fn rejects_negative_radius() {
        let b = Body::new(NVec3::zeros(), NVec3::zeros(), 1.0).with_radius(-0.1);
        assert!(b.validate().is_err());
    }

    #[test]
    fn default_field_uses_config_falloff() {
        let b = Body::new(NVec3::zeros(), NVec3::zeros(), 1.0);
        assert_eq!(b.field_or(2.0), GravityField::new(1.0, 2.0));

        let b = b.with_field(GravityField::new(1.2, 10.0));
        assert_eq!(b.field_or(2.0), GravityField::new(1.2, 10.0));
    }
}
