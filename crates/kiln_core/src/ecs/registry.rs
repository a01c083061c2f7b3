// registry.rs - The registered component set
//
// Registry indices are persisted inside archetype bitsets. Append new types
// at the end; never reorder or reuse an index.

use crate::ecs::macros::component_registry;
use crate::ecs::{Collider, Component, Health, Lifespan, Meta, Motion, Sprite, Transform};

component_registry! {
    0 => Meta in meta,
    1 => Transform in transform,
    2 => Motion in motion,
    3 => Collider in collider,
    4 => Sprite in sprite,
    5 => Health in health,
    6 => Lifespan in lifespan,
}

impl ComponentType {
    /// The component whose `active` flag marks a slot as in use.
    pub const LIVENESS: ComponentType = ComponentType::Meta;
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl EntityRecord {
    /// Add an initializer for `T`, replacing any previous one.
    pub fn with<T: Component>(mut self, value: T) -> Self {
        *T::record_slot_mut(&mut self) = Some(value);
        self
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        T::record_slot(self).as_ref()
    }
}
