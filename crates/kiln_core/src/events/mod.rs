//! Short-lived typed notifications.
//!
//! Producers publish packets onto a single ordered [`EventBus`]. Each packet
//! lives for a fixed number of bus ticks. Interested parties own a
//! [`Subscriber`] and register it with the [`SubscriberRegistry`], which keeps
//! only weak references: dropping the subscriber is all it takes to
//! unsubscribe.

mod bus;
mod packet;
mod registry;
mod subscriber;

pub use bus::EventBus;
pub use packet::{EventId, EventPacket, EventPayload, EventType};
pub use registry::SubscriberRegistry;
pub use subscriber::{SharedSubscriber, Subscriber};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("{event_type:?} event published with a lifetime of zero")]
    ZeroLifetime { event_type: EventType },

    #[error("subscriber is already registered for {event_type:?} events")]
    DuplicateRegistration { event_type: EventType },
}
