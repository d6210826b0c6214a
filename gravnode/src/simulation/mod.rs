pub mod vector;
pub mod error;
pub mod states;
pub mod registry;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod impulse;
pub mod snapshot;
pub mod engine;
pub mod scenario;
