use std::time::Instant;

use crate::simulation::engine::Simulation;
use crate::simulation::error::SimError;
use crate::simulation::forces::{AccelSet, RadialGravity};
use crate::simulation::params::SimulationConfig;
use crate::simulation::registry::BodyRegistry;
use crate::simulation::vector::NVec3;

/// Helper to build a deterministic registry of size `n`
fn make_registry(n: usize) -> Result<BodyRegistry, SimError> {
    let mut reg = BodyRegistry::new();
    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        reg.add_body(x, NVec3::zeros(), 1.0, false)?;
    }
    Ok(reg)
}

fn make_config() -> SimulationConfig {
    SimulationConfig::new()
        .with_dt(0.001)
        .with_g(0.1)
        .with_softening(0.01)
}

/// Time one force accumulation and one full driver tick for growing n
/// Output is CSV: N,forces_ms,tick_ms
pub fn bench_forces(ns: &[usize]) -> Result<(), SimError> {
    println!("N,forces_ms,tick_ms");

    for &n in ns {
        let steps = if n <= 400 { 5 } else { 1 };
        let config = make_config();
        let reg = make_registry(n)?;

        let forces = AccelSet::new().with(RadialGravity {
            g: config.g,
            softening: config.softening,
            default_falloff: config.default_falloff,
        });
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        forces.accumulate_accels(0.0, &reg, &mut out);

        let t0 = Instant::now();
        for _ in 0..steps {
            forces.accumulate_accels(0.0, &reg, &mut out);
        }
        let ms_forces = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        let mut sim = Simulation::with_config(config)?;
        for (_, b) in reg.iter() {
            sim.insert_body(b.clone())?;
        }
        sim.initialize()?;

        let t1 = Instant::now();
        sim.run(steps)?;
        let ms_tick = t1.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{:.6}", n, ms_forces, ms_tick);
    }
    Ok(())
}
