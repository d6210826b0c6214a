//! Numerical and physical parameters for the simulation
//!
//! `SimulationConfig` holds runtime settings:
//! - fixed step size `dt`,
//! - gravitational constant `g` and softening length,
//! - the falloff exponent used by bodies without their own field,
//! - integrator choice and the debug diagnostics flag

use super::error::SimError;
use super::integrator::IntegratorKind;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub dt: f64,              // step size
    pub g: f64,               // gravitational constant
    pub softening: f64,       // minimum separation used by the force law
    pub default_falloff: f64, // distance exponent for bodies without a field
    pub integrator: IntegratorKind,
    pub debug: bool, // log momentum/energy every tick
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            dt: 1.0 / 60.0,
            g: 1.0,
            softening: 0.1,
            default_falloff: 2.0,
            integrator: IntegratorKind::SemiImplicitEuler,
            debug: false,
        }
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    pub fn with_default_falloff(mut self, falloff: f64) -> Self {
        self.default_falloff = falloff;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SimError::invalid(format!(
                "timestep must be positive and finite (got {})",
                self.dt
            )));
        }
        if !self.g.is_finite() {
            return Err(SimError::invalid("gravitational constant must be finite"));
        }
        if !(self.softening >= 0.0) || !self.softening.is_finite() {
            return Err(SimError::invalid(format!(
                "softening must be non-negative and finite (got {})",
                self.softening
            )));
        }
        if !self.default_falloff.is_finite() {
            return Err(SimError::invalid("default falloff exponent must be finite"));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let base = SimulationConfig::new();
        assert!(base.clone().with_dt(0.0).validate().is_err());
        assert!(base.clone().with_dt(-0.1).validate().is_err());
        assert!(base.clone().with_dt(f64::INFINITY).validate().is_err());
        assert!(base.clone().with_softening(-1.0).validate().is_err());
        assert!(base.clone().with_g(f64::NAN).validate().is_err());
        assert!(base.with_default_falloff(f64::NAN).validate().is_err());
    }
}
