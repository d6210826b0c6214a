//! Build ready-to-tick simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`:
//! - a `Simulation` in the `Ready` state with every body registered
//! - first-tick impulses already queued
//! - a name -> handle table for the named bodies
//! - the configured run length

use crate::configuration::config::{BodyConfig, ScenarioConfig};

use super::engine::Simulation;
use super::error::SimError;
use super::params::SimulationConfig;
use super::states::{Body, BodyHandle, GravityField};
use super::vector::NVec3;

pub struct Scenario {
    pub simulation: Simulation,
    pub names: Vec<(String, BodyHandle)>,
    pub ticks: u64,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig) -> Result<Self, SimError> {
        let p = &cfg.parameters;
        let config = SimulationConfig::new()
            .with_dt(p.dt)
            .with_g(p.g)
            .with_softening(p.softening)
            .with_default_falloff(p.falloff)
            .with_integrator(cfg.engine.integrator.into())
            .with_debug(cfg.engine.debug);

        let mut simulation = Simulation::with_config(config)?;
        let mut names = Vec::new();
        let mut impulses = Vec::new();

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        for bc in &cfg.bodies {
            let handle = simulation.insert_body(body_from_config(bc, p.falloff))?;
            if let Some(name) = &bc.name {
                names.push((name.clone(), handle));
            }
            if let Some(j) = bc.impulse {
                impulses.push((handle, NVec3::from(j)));
            }
        }

        simulation.initialize()?;
        for (handle, j) in impulses {
            simulation.schedule_linear_impulse(handle, j)?;
        }

        Ok(Self {
            simulation,
            names,
            ticks: p.ticks,
        })
    }

    pub fn handle_of(&self, name: &str) -> Option<BodyHandle> {
        self.names
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| *h)
    }

    pub fn name_of(&self, handle: BodyHandle) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, h)| *h == handle)
            .map(|(n, _)| n.as_str())
    }
}

fn body_from_config(bc: &BodyConfig, default_falloff: f64) -> Body {
    let mut body = Body::new(NVec3::from(bc.x), NVec3::from(bc.v), bc.m)
        .fixed(bc.fixed)
        .with_radius(bc.radius);
    if let Some(f) = bc.field {
        body = body.with_field(GravityField::new(
            f.strength,
            f.falloff.unwrap_or(default_falloff),
        ));
    }
    body
}
