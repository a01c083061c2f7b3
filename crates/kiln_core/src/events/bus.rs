// bus.rs - Global event bus
//
// Packets are kept in publish order. A bus tick ages every packet by one and
// sweeps the dead ones in the same call, so readers never see a packet at
// lifetime zero.

use crate::events::{EventError, EventId, EventPacket, EventPayload, EventType};

#[derive(Debug, Default)]
pub struct EventBus {
    packets: Vec<EventPacket>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a packet that will survive `lifetime` ticks.
    ///
    /// Subscribers observe same-tick packets in publish order.
    pub fn publish(
        &mut self,
        event_type: EventType,
        payload: EventPayload,
        lifetime: u8,
    ) -> Result<EventId, EventError> {
        if lifetime == 0 {
            return Err(EventError::ZeroLifetime { event_type });
        }

        let id = EventId::new(self.next_id);
        self.next_id += 1;
        tracing::trace!(%id, ?event_type, ?payload, lifetime, "event published");
        self.packets
            .push(EventPacket::new(id, event_type, payload, lifetime));
        Ok(id)
    }

    /// Age every packet by one tick and drop the ones that reached zero.
    ///
    /// Returns the number of packets removed.
    pub fn tick(&mut self) -> usize {
        let before = self.packets.len();
        self.packets.retain_mut(|packet| {
            packet.decrement();
            packet.is_alive()
        });
        let expired = before - self.packets.len();
        if expired > 0 {
            tracing::debug!(expired, remaining = self.packets.len(), "swept expired events");
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventPacket> {
        self.packets.iter()
    }

    /// Packets of one type, in publish order.
    pub fn events_of(&self, event_type: EventType) -> impl Iterator<Item = &EventPacket> {
        self.packets
            .iter()
            .filter(move |packet| packet.event_type == event_type)
    }

    pub fn get(&self, id: EventId) -> Option<&EventPacket> {
        self.packets.iter().find(|packet| packet.id() == id)
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }
}
