//! Immutable per-tick view of body state handed to consumers
//!
//! The driver publishes each snapshot behind an `Arc`; a consumer can keep
//! reading one while the next tick is computed

use super::registry::BodyRegistry;
use super::states::BodyHandle;
use super::vector::{scale, NVec3};

#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub handle: BodyHandle,
    pub x: NVec3,     // position
    pub v: NVec3,     // velocity
    pub m: f64,       // mass
    pub radius: f64,  // display size
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64, // 1 for the first published tick
    pub t: f64,    // simulated time
    pub bodies: Vec<BodyState>,
}

impl Snapshot {
    pub(crate) fn capture(tick: u64, t: f64, reg: &BodyRegistry) -> Self {
        let bodies = reg
            .iter()
            .map(|(handle, b)| BodyState {
                handle,
                x: b.x,
                v: b.v,
                m: b.m,
                radius: b.radius,
                fixed: b.fixed,
            })
            .collect();
        Self { tick, t, bodies }
    }

    /// None for handles issued by another registry
    pub fn get(&self, handle: BodyHandle) -> Option<&BodyState> {
        self.bodies
            .get(handle.index())
            .filter(|b| b.handle == handle)
    }

    /// Σ m v over every body
    pub fn total_momentum(&self) -> NVec3 {
        self.bodies
            .iter()
            .fold(NVec3::zeros(), |acc, b| acc + scale(&b.v, b.m))
    }

    /// Σ ½ m |v|² over every body
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| 0.5 * b.m * b.v.norm_squared())
            .sum()
    }
}
