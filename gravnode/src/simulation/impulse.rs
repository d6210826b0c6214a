//! Deferred velocity changes, merged at the start of the next tick

use super::registry::BodyRegistry;
use super::states::BodyHandle;
use super::vector::{add, NVec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingImpulse {
    pub handle: BodyHandle,
    pub delta_v: NVec3, // velocity change, not momentum
    pub one_shot: bool, // false = reapplied every tick until cleared
}

/// Impulses waiting for the next tick boundary, kept in scheduling order
#[derive(Debug, Clone, Default)]
pub struct ImpulseQueue {
    pending: Vec<PendingImpulse>,
}

impl ImpulseQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, impulse: PendingImpulse) {
        self.pending.push(impulse);
    }

    /// Drop every impulse (one-shot or persistent) aimed at `handle`
    pub fn clear_for(&mut self, handle: BodyHandle) {
        self.pending.retain(|p| p.handle != handle);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Add every pending delta-v to its target's velocity; the queue is untouched
    /// so a failed tick can leave it as it was
    pub fn apply_to(&self, reg: &mut BodyRegistry) {
        let bodies = reg.bodies_mut();
        for p in &self.pending {
            if let Some(b) = bodies.get_mut(p.handle.index()) {
                if !b.fixed {
                    b.v = add(&b.v, &p.delta_v);
                }
            }
        }
    }

    /// Forget one-shot impulses once their tick has been committed
    pub fn retire_one_shots(&mut self) {
        self.pending.retain(|p| !p.one_shot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::Body;

    #[test]
    fn one_shots_retire_persistent_stay() {
        let mut reg = BodyRegistry::new();
        let h = reg
            .insert(Body::new(NVec3::zeros(), NVec3::zeros(), 1.0))
            .unwrap();

        let mut q = ImpulseQueue::new();
        q.push(PendingImpulse { handle: h, delta_v: NVec3::x(), one_shot: true });
        q.push(PendingImpulse { handle: h, delta_v: NVec3::y(), one_shot: false });

        q.apply_to(&mut reg);
        assert_eq!(reg.get(h).unwrap().v, NVec3::new(1.0, 1.0, 0.0));

        q.retire_one_shots();
        assert_eq!(q.len(), 1);

        q.apply_to(&mut reg);
        assert_eq!(reg.get(h).unwrap().v, NVec3::new(1.0, 2.0, 0.0));

        q.clear_for(h);
        assert!(q.is_empty());
    }
}
