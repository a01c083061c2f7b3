//! Entity lifecycle with deferred waiting rooms
//!
//! Acquiring or releasing an entity never changes the live set immediately.
//! Both requests wait in a buffer until `flush`, which runs once per tick
//! after all logic has finished. Entities acquired during tick N are
//! therefore first visible to logic on tick N + 1.

use crate::ecs::{ComponentType, EntityMemoryPool, Meta, PoolError};
use std::collections::BTreeSet;

/// Counts reported by [`EntityLifecycle::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug, Default)]
pub struct EntityLifecycle {
    live: BTreeSet<usize>,
    pending_add: Vec<usize>,
    pending_remove: Vec<usize>,
}

impl EntityLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the first slot whose liveness component is inactive.
    ///
    /// The slot is reset, its `Meta` is marked active (so a second acquire in
    /// the same tick picks a different slot) and it joins the addition
    /// waiting room. When every slot is taken the next index would be
    /// `capacity`; the pool never grows on its own, so that case is reported
    /// as [`PoolError::CapacityViolation`] and the caller must resize first.
    pub fn acquire(&mut self, pool: &mut EntityMemoryPool) -> Result<usize, PoolError> {
        let index = pool
            .column::<Meta>()
            .iter()
            .position(|meta| !meta.active)
            .unwrap_or(pool.capacity());

        pool.try_reset_slot(index)?;
        pool.set_active(ComponentType::LIVENESS, index, true);
        self.pending_add.push(index);
        tracing::trace!(index, "entity acquired");
        Ok(index)
    }

    /// Queue `index` for removal at the next flush. Pool state is untouched
    /// until then.
    ///
    /// Releasing an entity acquired this same tick cancels its pending
    /// addition, so the flush never publishes a slot it has just cleared.
    pub fn release(&mut self, index: usize) {
        if let Some(pos) = self.pending_add.iter().position(|&i| i == index) {
            self.pending_add.swap_remove(pos);
        } else if !self.live.contains(&index) {
            tracing::warn!(index, "release of an entity that is not live; ignoring");
            return;
        }
        self.pending_remove.push(index);
        tracing::trace!(index, "entity released");
    }

    /// Drain both waiting rooms, removals first.
    ///
    /// Released slots are reset, so a dead slot has no active component and
    /// classifies into the empty archetype until `acquire` hands it out again.
    pub fn flush(&mut self, pool: &mut EntityMemoryPool) -> FlushSummary {
        let mut summary = FlushSummary::default();

        for index in self.pending_remove.drain(..) {
            if index < pool.capacity() {
                pool.reset_slot(index);
            }
            if self.live.remove(&index) {
                summary.removed += 1;
            }
        }

        for index in self.pending_add.drain(..) {
            if self.live.insert(index) {
                summary.added += 1;
            }
        }

        if summary != FlushSummary::default() {
            tracing::debug!(
                added = summary.added,
                removed = summary.removed,
                live = self.live.len(),
                "flushed entity waiting rooms"
            );
        }
        summary
    }

    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.live.contains(&index)
    }

    /// Live entity indices in ascending order.
    pub fn live(&self) -> impl Iterator<Item = usize> + '_ {
        self.live.iter().copied()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pending_additions(&self) -> &[usize] {
        &self.pending_add
    }

    pub fn pending_removals(&self) -> &[usize] {
        &self.pending_remove
    }

    /// Forget every entity and pending request. The pool is not touched.
    pub fn clear(&mut self) {
        self.live.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
    }
}
