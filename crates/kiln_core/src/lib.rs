//! Kiln Engine Core
//!
//! Contains the per-tick simulation core:
//! - Fixed-capacity entity memory pool (struct-of-arrays)
//! - Entity lifecycle with deferred waiting rooms
//! - Archetype classification by active-component bitsets
//! - Lifetime-bounded event bus with weakly held subscribers
//! - The `Scene` that runs the tick pipeline in order

pub mod ecs;
pub mod events;
pub mod scene;
pub mod time;

pub use glam;

pub use ecs::{
    ArchetypeId, ArchetypeManager, Component, ComponentType, EntityLifecycle, EntityMemoryPool,
    EntityRecord, PoolError,
};
pub use events::{
    EventBus, EventError, EventPacket, EventPayload, EventType, SharedSubscriber, Subscriber,
    SubscriberRegistry,
};
pub use scene::{Logic, LogicContext, MatchMode, Scene, SceneConfig, SceneError, TickReport};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
