//! Simulation driver
//!
//! Owns the registry, the force set and the pending impulses, and moves
//! through `Uninitialized -> Ready -> Running -> Stopped`. Each tick:
//! 1. merge pending impulses into velocities
//! 2. accumulate accelerations over the whole registry
//! 3. integrate free bodies
//! 4. publish a new `Snapshot`
//!
//! A tick runs on a copy of the registry and is committed only when every
//! body is still finite, so a failed tick leaves the previous snapshot as the
//! latest valid state

use std::sync::Arc;

use tracing::{debug, error, info};

use super::error::SimError;
use super::forces::{AccelSet, Acceleration, RadialGravity};
use super::impulse::{ImpulseQueue, PendingImpulse};
use super::integrator::{self, IntegratorKind};
use super::params::SimulationConfig;
use super::registry::BodyRegistry;
use super::snapshot::Snapshot;
use super::states::{Body, BodyHandle};
use super::vector::{is_finite, scale, NVec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Uninitialized,
    Ready,
    Running,
    Stopped,
}

pub struct Simulation {
    state: SimState,
    config: Option<SimulationConfig>,
    registry: BodyRegistry,
    forces: AccelSet,            // gravity first, then any extra terms
    extra: Vec<Arc<dyn Acceleration + Send + Sync>>,
    impulses: ImpulseQueue,
    accels: Vec<NVec3>,          // scratch, one per body
    accels_fresh: bool,          // accels already hold forces on the committed state
    tick: u64,                   // ticks committed so far
    t: f64,                      // simulated time
    latest: Option<Arc<Snapshot>>,
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            state: SimState::Uninitialized,
            config: None,
            registry: BodyRegistry::new(),
            forces: AccelSet::new(),
            extra: Vec::new(),
            impulses: ImpulseQueue::new(),
            accels: Vec::new(),
            accels_fresh: false,
            tick: 0,
            t: 0.0,
            latest: None,
        }
    }

    /// `new()` followed by `configure(config)`
    pub fn with_config(config: SimulationConfig) -> Result<Self, SimError> {
        let mut sim = Self::new();
        sim.configure(config)?;
        Ok(sim)
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn bodies(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn pending_impulses(&self) -> &ImpulseQueue {
        &self.impulses
    }

    /// Install or replace the configuration; only allowed before the first tick
    pub fn configure(&mut self, config: SimulationConfig) -> Result<(), SimError> {
        match self.state {
            SimState::Running => {
                return Err(SimError::invalid(
                    "configuration cannot change once the simulation is running",
                ))
            }
            SimState::Stopped => return Err(SimError::SimulationStopped),
            SimState::Uninitialized | SimState::Ready => {}
        }
        config.validate()?;
        self.config = Some(config);
        self.accels_fresh = false;
        if self.state == SimState::Ready {
            self.rebuild_forces();
        }
        Ok(())
    }

    /// Register an extra acceleration term summed after gravity
    pub fn add_acceleration<T>(&mut self, term: T) -> Result<(), SimError>
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.ensure_not_stopped()?;
        self.extra.push(Arc::new(term));
        self.accels_fresh = false;
        if self.state != SimState::Uninitialized {
            self.rebuild_forces();
        }
        Ok(())
    }

    pub fn add_body(
        &mut self,
        x: NVec3,
        v: NVec3,
        m: f64,
        fixed: bool,
    ) -> Result<BodyHandle, SimError> {
        self.ensure_not_stopped()?;
        self.accels_fresh = false;
        self.registry.add_body(x, v, m, fixed)
    }

    pub fn insert_body(&mut self, body: Body) -> Result<BodyHandle, SimError> {
        self.ensure_not_stopped()?;
        self.accels_fresh = false;
        self.registry.insert(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body, SimError> {
        self.registry.get(handle)
    }

    pub fn set_body(&mut self, handle: BodyHandle, body: Body) -> Result<(), SimError> {
        self.ensure_not_stopped()?;
        self.registry.set(handle, body)?;
        self.accels_fresh = false;
        Ok(())
    }

    /// Uninitialized -> Ready
    pub fn initialize(&mut self) -> Result<(), SimError> {
        match self.state {
            SimState::Stopped => return Err(SimError::SimulationStopped),
            SimState::Running => return Ok(()),
            SimState::Uninitialized | SimState::Ready => {}
        }

        let config = self.config.as_ref().ok_or(SimError::NotConfigured)?;
        if config.validate().is_err() {
            return Err(SimError::NotConfigured);
        }
        if self.registry.iter().any(|(_, b)| b.validate().is_err()) {
            return Err(SimError::NotConfigured);
        }

        info!(
            bodies = self.registry.len(),
            dt = config.dt,
            g = config.g,
            softening = config.softening,
            falloff = config.default_falloff,
            integrator = ?config.integrator,
            "simulation ready"
        );

        self.rebuild_forces();
        self.state = SimState::Ready;
        Ok(())
    }

    /// Queue a one-shot velocity change for the next tick
    pub fn schedule_impulse(&mut self, handle: BodyHandle, delta_v: NVec3) -> Result<(), SimError> {
        self.schedule(PendingImpulse {
            handle,
            delta_v,
            one_shot: true,
        })
    }

    /// Queue a one-shot linear impulse (momentum); delta-v is impulse / mass
    pub fn schedule_linear_impulse(
        &mut self,
        handle: BodyHandle,
        impulse: NVec3,
    ) -> Result<(), SimError> {
        let m = self.registry.get(handle)?.m;
        self.schedule_impulse(handle, scale(&impulse, 1.0 / m))
    }

    /// Queue a delta-v applied at every tick until `clear_impulses`
    pub fn schedule_persistent_impulse(
        &mut self,
        handle: BodyHandle,
        delta_v: NVec3,
    ) -> Result<(), SimError> {
        self.schedule(PendingImpulse {
            handle,
            delta_v,
            one_shot: false,
        })
    }

    pub fn schedule(&mut self, impulse: PendingImpulse) -> Result<(), SimError> {
        self.ensure_not_stopped()?;
        let body = self.registry.get(impulse.handle)?;
        if body.fixed {
            return Err(SimError::invalid(format!(
                "body {} is fixed and cannot receive impulses",
                impulse.handle
            )));
        }
        if !is_finite(&impulse.delta_v) {
            return Err(SimError::invalid("impulse must be finite"));
        }
        self.impulses.push(impulse);
        Ok(())
    }

    pub fn clear_impulses(&mut self, handle: BodyHandle) -> Result<(), SimError> {
        if !self.registry.contains(handle) {
            return Err(SimError::UnknownHandle(handle));
        }
        self.impulses.clear_for(handle);
        Ok(())
    }

    /// Advance one step and publish its snapshot
    pub fn tick(&mut self) -> Result<Arc<Snapshot>, SimError> {
        match self.state {
            SimState::Uninitialized => return Err(SimError::NotConfigured),
            SimState::Stopped => return Err(SimError::SimulationStopped),
            SimState::Ready | SimState::Running => {}
        }
        let (dt, kind, debug_on) = match &self.config {
            Some(c) => (c.dt, c.integrator, c.debug),
            None => return Err(SimError::NotConfigured),
        };
        let tick = self.tick + 1;

        let mut next = self.registry.clone();

        // (a) impulses land at the tick boundary
        self.impulses.apply_to(&mut next);

        // (b) forces; leapfrog's closing evaluation from the last tick is
        // still valid unless an impulse or an edit changed the state
        let reuse = kind == IntegratorKind::Leapfrog
            && self.accels_fresh
            && self.impulses.is_empty()
            && self.accels.len() == next.len();
        if !reuse {
            self.accels.clear();
            self.accels.resize(next.len(), NVec3::zeros());
            self.forces.accumulate_accels(self.t, &next, &mut self.accels);
        }

        // (c) integrate
        integrator::advance(kind, &mut next, &self.forces, self.t, &mut self.accels, dt);

        if let Some((handle, _)) = next
            .iter()
            .find(|(_, b)| !b.fixed && !(is_finite(&b.x) && is_finite(&b.v)))
        {
            self.state = SimState::Stopped;
            self.accels_fresh = false;
            error!(tick, %handle, "non-finite body state, stopping simulation");
            return Err(SimError::NumericalDivergence { tick, handle });
        }

        // commit
        self.registry = next;
        self.impulses.retire_one_shots();
        self.accels_fresh = kind == IntegratorKind::Leapfrog;
        self.tick = tick;
        self.t += dt;
        self.state = SimState::Running;

        // (d) publish
        let snapshot = Arc::new(Snapshot::capture(self.tick, self.t, &self.registry));
        if debug_on {
            let p = snapshot.total_momentum();
            debug!(
                tick,
                t = self.t,
                momentum = ?[p.x, p.y, p.z],
                kinetic = snapshot.kinetic_energy(),
                "tick"
            );
        } else {
            debug!(tick, t = self.t, "tick");
        }
        self.latest = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Tick `n` times, stopping at the first error; returns the latest snapshot
    pub fn run(&mut self, n: u64) -> Result<Arc<Snapshot>, SimError> {
        for _ in 0..n {
            self.tick()?;
        }
        self.latest()
    }

    /// Any state -> Stopped
    pub fn stop(&mut self) {
        if self.state != SimState::Stopped {
            info!(tick = self.tick, "simulation stopped");
        }
        self.state = SimState::Stopped;
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Result<Arc<Snapshot>, SimError> {
        self.latest.clone().ok_or(SimError::NoSnapshotYet)
    }

    fn ensure_not_stopped(&self) -> Result<(), SimError> {
        if self.state == SimState::Stopped {
            Err(SimError::SimulationStopped)
        } else {
            Ok(())
        }
    }

    fn rebuild_forces(&mut self) {
        let Some(config) = &self.config else {
            return;
        };
        let mut forces = AccelSet::new().with(RadialGravity {
            g: config.g,
            softening: config.softening,
            default_falloff: config.default_falloff,
        });
        for term in &self.extra {
            forces = forces.with(Arc::clone(term));
        }
        self.forces = forces;
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn lone_body() -> (Simulation, BodyHandle) {
        let mut sim = Simulation::with_config(SimulationConfig::new().with_dt(0.5)).unwrap();
        let h = sim.add_body(NVec3::zeros(), NVec3::x(), 1.0, false).unwrap();
        (sim, h)
    }

    #[test]
    fn tick_before_initialize_is_not_configured() {
        let (mut sim, _) = lone_body();
        assert_eq!(sim.state(), SimState::Uninitialized);
        assert_eq!(sim.tick(), Err(SimError::NotConfigured));
    }

    #[test]
    fn initialize_without_config_fails() {
        let mut sim = Simulation::new();
        assert_eq!(sim.initialize(), Err(SimError::NotConfigured));
        assert_eq!(sim.state(), SimState::Uninitialized);
    }

    #[test]
    fn lifecycle() {
        let (mut sim, h) = lone_body();
        assert_eq!(sim.latest(), Err(SimError::NoSnapshotYet));

        sim.initialize().unwrap();
        assert_eq!(sim.state(), SimState::Ready);

        let snap = sim.tick().unwrap();
        assert_eq!(sim.state(), SimState::Running);
        assert_eq!(snap.tick, 1);
        assert_eq!(sim.tick_count(), 1);
        assert_eq!(sim.time(), 0.5);
        assert_eq!(snap.get(h).unwrap().x, NVec3::new(0.5, 0.0, 0.0));

        sim.stop();
        assert_eq!(sim.state(), SimState::Stopped);
        assert_eq!(sim.tick(), Err(SimError::SimulationStopped));
        assert_eq!(sim.latest().unwrap().tick, 1);
    }

    #[test]
    fn impulse_validation() {
        let (mut sim, h) = lone_body();
        let sun = sim.add_body(NVec3::x(), NVec3::zeros(), 10.0, true).unwrap();
        let mut other = BodyRegistry::new();
        let ghost = other.add_body(NVec3::zeros(), NVec3::zeros(), 1.0, false).unwrap();

        assert_eq!(
            sim.schedule_impulse(ghost, NVec3::x()),
            Err(SimError::UnknownHandle(ghost))
        );
        assert!(matches!(
            sim.schedule_impulse(sun, NVec3::x()),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(sim
            .schedule_impulse(h, NVec3::new(f64::NAN, 0.0, 0.0))
            .is_err());
        assert!(sim.pending_impulses().is_empty());
    }

    /// Extra term that counts how often the force set is evaluated
    struct CountingTerm(Arc<AtomicUsize>);

    impl Acceleration for CountingTerm {
        fn acceleration(&self, _t: f64, _reg: &BodyRegistry, _out: &mut [NVec3]) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counted(kind: IntegratorKind) -> (Simulation, BodyHandle, Arc<AtomicUsize>) {
        let config = SimulationConfig::new().with_dt(0.01).with_integrator(kind);
        let mut sim = Simulation::with_config(config).unwrap();
        sim.add_body(NVec3::zeros(), NVec3::zeros(), 100.0, true).unwrap();
        let h = sim.add_body(NVec3::x() * 2.0, NVec3::y(), 1.0, false).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        sim.add_acceleration(CountingTerm(Arc::clone(&calls))).unwrap();
        sim.initialize().unwrap();
        (sim, h, calls)
    }

    #[test]
    fn leapfrog_reuses_closing_forces() {
        let (mut sim, h, calls) = counted(IntegratorKind::Leapfrog);
        sim.run(10).unwrap();
        // one opening evaluation, then one per tick at t + dt
        assert_eq!(calls.load(Ordering::Relaxed), 11);

        let mut edited = sim.body(h).unwrap().clone();
        edited.v = NVec3::zeros();
        sim.set_body(h, edited).unwrap();
        sim.tick().unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 13);

        sim.schedule_impulse(h, NVec3::z()).unwrap();
        sim.tick().unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 15);

        sim.tick().unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 16);
    }

    #[test]
    fn euler_evaluates_once_per_tick() {
        let (mut sim, _, calls) = counted(IntegratorKind::SemiImplicitEuler);
        sim.run(10).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn configure_is_locked_once_running() {
        let (mut sim, _) = lone_body();
        sim.initialize().unwrap();
        sim.tick().unwrap();
        assert!(sim.configure(SimulationConfig::new()).is_err());
    }
}
