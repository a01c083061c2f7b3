// component.rs - Typed access to the closed component set
//
// Components are identified by their `ComponentType` registry index, which is
// baked into archetype bitsets and therefore never changes.

use crate::ecs::{ComponentType, EntityMemoryPool, EntityRecord};

/// Trait implemented by every registered component payload.
///
/// Implementations are generated by `component_registry!`; each one knows
/// which pool column holds its values.
pub trait Component: 'static + Sized + Default + Clone {
    /// Registry entry for this component.
    const TYPE: ComponentType;

    /// Human-readable name for debugging.
    const NAME: &'static str;

    /// Whether the owning entity currently "has" this component.
    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    /// The pool column holding every slot's value of this component.
    fn column(pool: &EntityMemoryPool) -> &[Self];

    fn column_mut(pool: &mut EntityMemoryPool) -> &mut [Self];

    #[doc(hidden)]
    fn record_slot(record: &EntityRecord) -> &Option<Self>;

    #[doc(hidden)]
    fn record_slot_mut(record: &mut EntityRecord) -> &mut Option<Self>;
}
