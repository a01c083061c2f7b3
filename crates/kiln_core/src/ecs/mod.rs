//! Entity Component System core types.
//!
//! Storage is a fixed-capacity struct-of-arrays: one column per registered
//! component type, every column the same length. An entity is nothing more
//! than a slot index into those columns, and its composition is derived
//! from the `active` flag each component carries. Classification into
//! archetypes is rebuilt from the pool once per tick.

mod archetype;
mod component;
mod components;
mod lifecycle;
mod macros;
mod pool;
mod registry;

pub use archetype::{ArchetypeId, ArchetypeManager};
pub use component::Component;
pub use components::{Collider, Health, Lifespan, Meta, Motion, Sprite, Transform};
pub use lifecycle::{EntityLifecycle, FlushSummary};
pub use pool::PoolError;
pub use registry::{ComponentType, EntityMemoryPool, EntityRecord};
