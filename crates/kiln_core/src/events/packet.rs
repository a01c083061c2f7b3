// packet.rs - Event packet types

use glam::Vec2;
use std::fmt;

/// Registration key for subscribers and the type tag of every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Collision,
    Damage,
    Spawned,
    Despawned,
    Input,
    SceneChange,
    Ui,
}

/// Value carried by a packet and, optionally, required by a subscriber.
///
/// Equality compares the variant first and then its value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventPayload {
    #[default]
    None,
    Flag(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Entity(usize),
    Position(Vec2),
}

impl From<&str> for EventPayload {
    fn from(value: &str) -> Self {
        EventPayload::Text(value.to_string())
    }
}

/// Bus-assigned packet identifier, unique for the lifetime of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl EventId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// A typed notification that survives `lifetime` bus ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPacket {
    pub event_type: EventType,
    pub payload: EventPayload,
    lifetime: u8,
    id: EventId,
}

impl EventPacket {
    pub(crate) fn new(id: EventId, event_type: EventType, payload: EventPayload, lifetime: u8) -> Self {
        Self {
            event_type,
            payload,
            lifetime,
            id,
        }
    }

    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Remaining bus ticks; zero means the packet is dead.
    #[inline]
    pub fn lifetime(&self) -> u8 {
        self.lifetime
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    pub(crate) fn decrement(&mut self) {
        self.lifetime = self.lifetime.saturating_sub(1);
    }
}
