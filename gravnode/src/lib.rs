//! Deterministic N-body point-mass gravity core.
//!
//! Bodies live in an insertion-ordered registry, a radial gravity law with a
//! per-source falloff exponent produces accelerations, a fixed-step integrator
//! advances the free bodies, and the driver publishes an immutable snapshot
//! after every tick for whatever renders it.

pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::vector::NVec3;
pub use simulation::states::{Body, BodyHandle, GravityField};
pub use simulation::registry::BodyRegistry;
pub use simulation::forces::{Acceleration, AccelSet, RadialGravity};
pub use simulation::integrator::{semi_implicit_euler, leapfrog, IntegratorKind};
pub use simulation::impulse::{PendingImpulse, ImpulseQueue};
pub use simulation::params::SimulationConfig;
pub use simulation::snapshot::{Snapshot, BodyState};
pub use simulation::engine::{Simulation, SimState};
pub use simulation::error::SimError;
pub use simulation::scenario::Scenario;

pub use configuration::config::{IntegratorConfig, EngineConfig, ParametersConfig, FieldConfig, BodyConfig, ScenarioConfig};

pub use benchmark::benchmark::bench_forces;
