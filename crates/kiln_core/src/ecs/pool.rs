// pool.rs - Entity memory pool operations
//
// The column layout itself is generated by `component_registry!`; this file
// holds the operations that must keep every column in lockstep.

use crate::ecs::{Component, ComponentType, EntityMemoryPool, EntityRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("slot {index} is outside the pool (capacity {capacity})")]
    CapacityViolation { index: usize, capacity: usize },

    #[error("shrinking to {new_capacity} slots would truncate live entity {index}")]
    TruncatesLiveEntity { index: usize, new_capacity: usize },

    #[error("{component} column holds {len} slots but the pool capacity is {capacity}")]
    ColumnLengthMismatch {
        component: ComponentType,
        len: usize,
        capacity: usize,
    },
}

impl EntityMemoryPool {
    /// Allocate every component column at `capacity` default (inactive) slots.
    pub fn new(capacity: usize) -> Self {
        tracing::debug!(capacity, components = ComponentType::COUNT, "allocating entity pool");
        Self::allocate(capacity)
    }

    /// Resize every column to `new_capacity` in one step.
    ///
    /// Growing appends default slots. Shrinking is refused, leaving the pool
    /// untouched, if any slot past the new end is still live.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), PoolError> {
        let old_capacity = self.capacity();
        if new_capacity < old_capacity {
            if let Some(index) =
                (new_capacity..old_capacity).find(|&i| self.is_active(ComponentType::LIVENESS, i))
            {
                return Err(PoolError::TruncatesLiveEntity {
                    index,
                    new_capacity,
                });
            }
        }

        self.resize_columns(new_capacity);
        self.check_invariants()?;
        tracing::debug!(old_capacity, new_capacity, "resized entity pool");
        Ok(())
    }

    /// Verify every column has exactly `capacity` slots.
    pub fn check_invariants(&self) -> Result<(), PoolError> {
        let capacity = self.capacity();
        for (component, len) in self.column_lengths() {
            if len != capacity {
                return Err(PoolError::ColumnLengthMismatch {
                    component,
                    len,
                    capacity,
                });
            }
        }
        Ok(())
    }

    /// Reference to entity `index`'s `T` value.
    ///
    /// Panics if `index >= capacity`, like any slice index.
    #[inline]
    pub fn get<T: Component>(&self, index: usize) -> &T {
        &T::column(self)[index]
    }

    #[inline]
    pub fn get_mut<T: Component>(&mut self, index: usize) -> &mut T {
        &mut T::column_mut(self)[index]
    }

    /// The whole `T` column, indexed by entity.
    #[inline]
    pub fn column<T: Component>(&self) -> &[T] {
        T::column(self)
    }

    #[inline]
    pub fn column_mut<T: Component>(&mut self) -> &mut [T] {
        T::column_mut(self)
    }

    /// Default-construct every component at `index`, clearing all flags and
    /// payloads. Used when a released slot is claimed again.
    ///
    /// Panics if `index >= capacity`; see [`Self::try_reset_slot`].
    pub fn reset_slot(&mut self, index: usize) {
        self.reset_columns(index);
    }

    pub fn try_reset_slot(&mut self, index: usize) -> Result<(), PoolError> {
        self.ensure_in_bounds(index)?;
        self.reset_columns(index);
        Ok(())
    }

    /// Number of slots with `component` active.
    pub fn active_count(&self, component: ComponentType) -> usize {
        (0..self.capacity())
            .filter(|&i| self.is_active(component, i))
            .count()
    }

    /// Write every initializer present in `record` into slot `index`, marking
    /// those components active. Components the record omits are untouched.
    pub fn apply_record(&mut self, index: usize, record: &EntityRecord) -> Result<(), PoolError> {
        self.ensure_in_bounds(index)?;
        record.write_into(self, index);
        Ok(())
    }

    pub(crate) fn ensure_in_bounds(&self, index: usize) -> Result<(), PoolError> {
        if index < self.capacity() {
            Ok(())
        } else {
            Err(PoolError::CapacityViolation {
                index,
                capacity: self.capacity(),
            })
        }
    }
}
