// logic.rs - Per-archetype consumers run during the logic phase
//
// A logic unit declares which archetype it is interested in and receives the
// matching entity indices from the classification computed at the end of the
// previous tick. It reads and writes component data straight in the pool.

use crate::ecs::{ArchetypeId, ArchetypeManager, Component, EntityLifecycle, EntityMemoryPool};
use crate::events::{
    EventBus, EventId, EventPayload, EventType, SharedSubscriber, SubscriberRegistry,
};
use crate::scene::SceneError;

/// How a logic unit's requirement is matched against archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Only entities whose composition equals the requirement.
    Exact,
    /// Entities having at least the required components.
    #[default]
    Inclusive,
}

/// A unit of game logic, run once per tick when its match is non-empty.
pub trait Logic {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Components an entity must have for this unit to see it.
    fn requirement(&self) -> ArchetypeId;

    fn match_mode(&self) -> MatchMode {
        MatchMode::Inclusive
    }

    /// Process the matched entities.
    ///
    /// `entities` reflects last tick's classification: entities acquired
    /// this tick are not included, and released ones still are.
    fn update(&mut self, entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError>;
}

/// Everything a logic unit may touch during the logic phase.
pub struct LogicContext<'a> {
    pub(crate) pool: &'a mut EntityMemoryPool,
    pub(crate) lifecycle: &'a mut EntityLifecycle,
    pub(crate) bus: &'a mut EventBus,
    pub(crate) registry: &'a mut SubscriberRegistry,
    pub(crate) archetypes: &'a ArchetypeManager,
    pub(crate) default_event_lifetime: u8,
    pub(crate) tick: u64,
}

impl<'a> LogicContext<'a> {
    #[inline]
    pub fn get<T: Component>(&self, index: usize) -> &T {
        self.pool.get::<T>(index)
    }

    #[inline]
    pub fn get_mut<T: Component>(&mut self, index: usize) -> &mut T {
        self.pool.get_mut::<T>(index)
    }

    pub fn pool(&self) -> &EntityMemoryPool {
        &*self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityMemoryPool {
        &mut *self.pool
    }

    /// Claim a slot; it becomes live at the end of this tick.
    pub fn acquire(&mut self) -> Result<usize, SceneError> {
        Ok(self.lifecycle.acquire(&mut *self.pool)?)
    }

    /// Queue a live entity for removal at the end of this tick.
    pub fn release(&mut self, index: usize) {
        self.lifecycle.release(index);
    }

    /// Publish with the scene's default lifetime.
    pub fn publish(&mut self, event_type: EventType, payload: EventPayload) -> Result<EventId, SceneError> {
        self.publish_with_lifetime(event_type, payload, self.default_event_lifetime)
    }

    /// Publish a packet that survives `lifetime` bus ticks. It is delivered
    /// `lifetime - 1` times, so a lifetime of 1 never reaches a subscriber.
    pub fn publish_with_lifetime(
        &mut self,
        event_type: EventType,
        payload: EventPayload,
        lifetime: u8,
    ) -> Result<EventId, SceneError> {
        if lifetime == 1 {
            tracing::warn!(?event_type, tick = self.tick, "event with lifetime 1 expires before subscribers are notified");
        }
        Ok(self.bus.publish(event_type, payload, lifetime)?)
    }

    pub fn register(&mut self, subscriber: &SharedSubscriber, event_type: EventType) {
        self.registry.register(subscriber, event_type);
    }

    /// Classification from the end of the previous tick.
    pub fn archetypes(&self) -> &ArchetypeManager {
        self.archetypes
    }

    /// Packets currently on the bus.
    pub fn bus(&self) -> &EventBus {
        &*self.bus
    }

    /// Index of the tick being executed.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
