//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator choice and the debug diagnostics flag
//! - [`ParametersConfig`] – step size, physical constants, run length
//! - [`BodyConfig`]       – initial state of each body, its field and impulse
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   integrator: "semi_implicit_euler"   # or "leapfrog"
//!   debug: false
//!
//! parameters:
//!   dt: 0.0166667      # fixed step size
//!   G: 0.0006          # gravitational constant
//!   softening: 0.1     # minimum separation in the force law
//!   falloff: 2.0       # default distance exponent
//!   ticks: 3000        # how many ticks the CLI runs
//!
//! bodies:
//!   - name: sun
//!     x: [0.0, 0.0, 0.0]
//!     m: 10000.0
//!     radius: 2.0
//!     fixed: true
//!     field: { strength: 1.2, falloff: 10.0 }
//!   - name: earth
//!     x: [6.0, 0.0, 0.0]
//!     m: 1.0
//!     radius: 0.4
//!     impulse: [-0.7, 0.0, 0.7]
//! ```

use serde::Deserialize;

use crate::simulation::integrator::IntegratorKind;

/// Which integrator the engine uses
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "semi_implicit_euler")] // v then x, one force evaluation
    SemiImplicitEuler,

    #[serde(rename = "leapfrog")] // kick-drift-kick, two force evaluations
    Leapfrog,
}

impl From<IntegratorConfig> for IntegratorKind {
    fn from(cfg: IntegratorConfig) -> Self {
        match cfg {
            IntegratorConfig::SemiImplicitEuler => IntegratorKind::SemiImplicitEuler,
            IntegratorConfig::Leapfrog => IntegratorKind::Leapfrog,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: IntegratorConfig,
    #[serde(default)]
    pub debug: bool, // per-tick momentum/energy diagnostics
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64, // time step size
    #[serde(rename = "G")]
    pub g: f64, // gravitational constant
    #[serde(default)]
    pub softening: f64, // minimum separation, prevents singular forces
    #[serde(default = "default_falloff")]
    pub falloff: f64, // exponent for bodies without a field
    #[serde(default)]
    pub ticks: u64, // run length used by the CLI
}

fn default_falloff() -> f64 {
    2.0
}

/// Radial field sourced by a body
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct FieldConfig {
    #[serde(default = "default_strength")]
    pub strength: f64,
    pub falloff: Option<f64>, // falls back to parameters.falloff
}

fn default_strength() -> f64 {
    1.0
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub x: [f64; 3], // initial position
    #[serde(default)]
    pub v: [f64; 3], // initial velocity
    pub m: f64,      // mass
    #[serde(default)]
    pub radius: f64, // display size
    #[serde(default)]
    pub fixed: bool,
    #[serde(default)]
    pub field: Option<FieldConfig>,
    #[serde(default)]
    pub impulse: Option<[f64; 3]>, // linear impulse applied at the first tick
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
