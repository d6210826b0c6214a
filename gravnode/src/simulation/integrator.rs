//! Fixed-step time integrators
//!
//! Both integrators take accelerations already evaluated at the start of the
//! step (the driver computes them) and skip fixed bodies. The leapfrog variant
//! evaluates the force set once more at the end of the step

use super::forces::AccelSet;
use super::registry::BodyRegistry;
use super::vector::{add, scale, NVec3};

/// Which integrator advances free bodies each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorKind {
    /// v += a dt, then x += v dt
    #[default]
    SemiImplicitEuler,
    /// kick-drift-kick velocity Verlet
    Leapfrog,
}

/// Advance free bodies by one step with the selected integrator
/// - `accels[i]` must hold the acceleration of body i at time `t`
/// - on return, for leapfrog, `accels` holds the accelerations at `t + dt`
pub fn advance(
    kind: IntegratorKind,
    reg: &mut BodyRegistry,
    forces: &AccelSet,
    t: f64,
    accels: &mut [NVec3],
    dt: f64,
) {
    match kind {
        IntegratorKind::SemiImplicitEuler => semi_implicit_euler(reg, accels, dt),
        IntegratorKind::Leapfrog => leapfrog(reg, forces, t, accels, dt),
    }
}

/// Semi-implicit (symplectic) Euler:
/// v_n+1 = v_n + a_n dt
/// x_n+1 = x_n + v_n+1 dt
pub fn semi_implicit_euler(reg: &mut BodyRegistry, accels: &[NVec3], dt: f64) {
    for (b, a) in reg.bodies_mut().iter_mut().zip(accels.iter()) {
        if b.fixed {
            continue;
        }
        b.v = add(&b.v, &scale(a, dt));
        b.x = add(&b.x, &scale(&b.v, dt));
    }
}

/// Velocity Verlet (kick-drift-kick), two force evaluations per step
pub fn leapfrog(reg: &mut BodyRegistry, forces: &AccelSet, t: f64, accels: &mut [NVec3], dt: f64) {
    let half_dt = 0.5 * dt;

    // Kick: v_n+1/2 = v_n + (dt/2) a_n
    // Drift: x_n+1 = x_n + dt v_n+1/2
    for (b, a) in reg.bodies_mut().iter_mut().zip(accels.iter()) {
        if b.fixed {
            continue;
        }
        b.v = add(&b.v, &scale(a, half_dt));
        b.x = add(&b.x, &scale(&b.v, dt));
    }

    // a_n+1 from x_n+1
    forces.accumulate_accels(t + dt, reg, accels);

    // Second kick: v_n+1 = v_n+1/2 + (dt/2) a_n+1
    for (b, a) in reg.bodies_mut().iter_mut().zip(accels.iter()) {
        if b.fixed {
            continue;
        }
        b.v = add(&b.v, &scale(a, half_dt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::Body;

    #[test]
    fn euler_updates_velocity_before_position() {
        let mut reg = BodyRegistry::new();
        reg.insert(Body::new(NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0), 1.0))
            .unwrap();
        let accels = vec![NVec3::new(0.0, 2.0, 0.0)];

        semi_implicit_euler(&mut reg, &accels, 0.5);

        let b = &reg.bodies()[0];
        assert_eq!(b.v, NVec3::new(1.0, 1.0, 0.0));
        assert_eq!(b.x, NVec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn fixed_bodies_do_not_move() {
        let mut reg = BodyRegistry::new();
        reg.insert(Body::new(NVec3::x(), NVec3::new(3.0, 0.0, 0.0), 1.0).fixed(true))
            .unwrap();
        let mut accels = vec![NVec3::new(1.0, 1.0, 1.0)];

        semi_implicit_euler(&mut reg, &accels, 0.1);
        leapfrog(&mut reg, &AccelSet::new(), 0.0, &mut accels, 0.1);

        let b = &reg.bodies()[0];
        assert_eq!(b.x, NVec3::x());
        assert_eq!(b.v, NVec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn leapfrog_without_forces_drifts() {
        let mut reg = BodyRegistry::new();
        reg.insert(Body::new(NVec3::zeros(), NVec3::new(2.0, 0.0, 0.0), 1.0))
            .unwrap();
        let mut accels = vec![NVec3::zeros()];

        for _ in 0..4 {
            leapfrog(&mut reg, &AccelSet::new(), 0.0, &mut accels, 0.25);
        }
        assert_eq!(reg.bodies()[0].x, NVec3::new(2.0, 0.0, 0.0));
    }
}
