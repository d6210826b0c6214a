//! Ordered owner of every simulated body
//!
//! Insertion order is the iteration order, and the force model sums in that
//! order, so results are reproducible bit for bit

use std::sync::atomic::{AtomicU32, Ordering};

use super::error::SimError;
use super::states::{Body, BodyHandle};
use super::vector::NVec3;

static NEXT_REGISTRY_ID: AtomicU32 = AtomicU32::new(0);

/// Clones keep the id, so a copy accepts the original's handles
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    id: u32,           // stamped into every handle issued here
    bodies: Vec<Body>, // handle i lives at bodies[i]
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            bodies: Vec::new(),
        }
    }

    /// Add a body with no field override and zero radius
    pub fn add_body(
        &mut self,
        x: NVec3,
        v: NVec3,
        m: f64,
        fixed: bool,
    ) -> Result<BodyHandle, SimError> {
        self.insert(Body::new(x, v, m).fixed(fixed))
    }

    /// Add a fully built body after validating it
    pub fn insert(&mut self, body: Body) -> Result<BodyHandle, SimError> {
        body.validate()?;
        let idx = u32::try_from(self.bodies.len())
            .map_err(|_| SimError::invalid("too many bodies"))?;
        self.bodies.push(body);
        Ok(self.handle_at(idx))
    }

    pub fn get(&self, handle: BodyHandle) -> Result<&Body, SimError> {
        if !self.contains(handle) {
            return Err(SimError::UnknownHandle(handle));
        }
        Ok(&self.bodies[handle.index()])
    }

    /// Replace a body's state; the replacement is validated like a new body
    pub fn set(&mut self, handle: BodyHandle, body: Body) -> Result<(), SimError> {
        if !self.contains(handle) {
            return Err(SimError::UnknownHandle(handle));
        }
        body.validate()?;
        self.bodies[handle.index()] = body;
        Ok(())
    }

    /// Issued by this registry (or one it was cloned from) and in range
    pub fn contains(&self, handle: BodyHandle) -> bool {
        handle.registry == self.id && handle.index() < self.bodies.len()
    }

    /// (handle, body) pairs in insertion order; call again to restart
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + Clone + '_ {
        self.bodies
            .iter()
            .enumerate()
            .map(move |(i, b)| (self.handle_at(i as u32), b))
    }

    pub fn for_each<F: FnMut(BodyHandle, &Body)>(&self, mut f: F) {
        for (h, b) in self.iter() {
            f(h, b);
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn handle_at(&self, index: u32) -> BodyHandle {
        BodyHandle {
            registry: self.id,
            index,
        }
    }

    pub(crate) fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
