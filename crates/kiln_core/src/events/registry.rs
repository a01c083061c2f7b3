// registry.rs - Event type -> weakly held subscribers
//
// The registry never keeps a subscriber alive. A reference whose owner has
// been dropped is skipped during notification and dropped by `prune_expired`.

use crate::events::{EventBus, EventError, EventType, SharedSubscriber, Subscriber};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: HashMap<EventType, Vec<Weak<RefCell<Subscriber>>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Register `subscriber` under `event_type`.
    ///
    /// Registering the same subscriber twice is not detected; it will then
    /// be notified twice per matching packet. Use [`Self::try_register`] to
    /// reject duplicates.
    pub fn register(&mut self, subscriber: &SharedSubscriber, event_type: EventType) {
        self.subscribers
            .entry(event_type)
            .or_default()
            .push(Rc::downgrade(subscriber));
    }

    pub fn try_register(
        &mut self,
        subscriber: &SharedSubscriber,
        event_type: EventType,
    ) -> Result<(), EventError> {
        let duplicate = self
            .subscribers
            .get(&event_type)
            .is_some_and(|list| list.iter().any(|weak| weak.as_ptr() == Rc::as_ptr(subscriber)));
        if duplicate {
            return Err(EventError::DuplicateRegistration { event_type });
        }
        self.register(subscriber, event_type);
        Ok(())
    }

    /// Push every packet on the bus to the live subscribers registered for
    /// its type, in publish order.
    ///
    /// Returns the number of activations.
    pub fn notify_subscribers(&self, bus: &EventBus) -> usize {
        let mut activations = 0;
        for packet in bus.iter() {
            let Some(list) = self.subscribers.get(&packet.event_type) else {
                continue;
            };
            for weak in list {
                let Some(subscriber) = weak.upgrade() else {
                    continue;
                };
                let Ok(mut subscriber) = subscriber.try_borrow_mut() else {
                    tracing::warn!(
                        id = %packet.id(),
                        event_type = ?packet.event_type,
                        "subscriber is borrowed during notification; skipping"
                    );
                    continue;
                };
                if subscriber.should_activate(&packet.payload) {
                    subscriber.activate(&packet.payload);
                    activations += 1;
                    tracing::trace!(id = %packet.id(), event_type = ?packet.event_type, "subscriber activated");
                }
            }
        }
        activations
    }

    /// Drop references whose owners are gone. Returns how many were removed.
    pub fn prune_expired(&mut self) -> usize {
        let mut pruned = 0;
        for list in self.subscribers.values_mut() {
            let before = list.len();
            list.retain(|weak| weak.strong_count() > 0);
            pruned += before - list.len();
        }
        self.subscribers.retain(|_, list| !list.is_empty());
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired subscribers");
        }
        pruned
    }

    /// Registered references for `event_type`, expired ones included.
    pub fn registered(&self, event_type: EventType) -> usize {
        self.subscribers.get(&event_type).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.subscribers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPayload;

    #[test]
    fn trigger_mismatch_does_not_activate() {
        let mut bus = EventBus::new();
        let mut registry = SubscriberRegistry::new();
        let button = Subscriber::with_trigger(EventType::Ui, EventPayload::from("play")).shared();
        registry.register(&button, EventType::Ui);

        bus.publish(EventType::Ui, EventPayload::from("options"), 2).unwrap();
        assert_eq!(registry.notify_subscribers(&bus), 0);
        assert!(!button.borrow().is_active());

        bus.publish(EventType::Ui, EventPayload::from("play"), 2).unwrap();
        assert_eq!(registry.notify_subscribers(&bus), 1);
        assert!(button.borrow().is_active());
        assert_eq!(button.borrow().last_payload(), Some(&EventPayload::from("play")));
    }

    #[test]
    fn untriggered_subscriber_sees_any_payload_of_its_type_only() {
        let mut bus = EventBus::new();
        let mut registry = SubscriberRegistry::new();
        let hits = Subscriber::new(EventType::Damage).shared();
        registry.register(&hits, EventType::Damage);

        bus.publish(EventType::Collision, EventPayload::Entity(1), 1).unwrap();
        registry.notify_subscribers(&bus);
        assert!(!hits.borrow().is_active());

        bus.publish(EventType::Damage, EventPayload::Int(10), 1).unwrap();
        registry.notify_subscribers(&bus);
        assert_eq!(hits.borrow_mut().take_activation(), Some(EventPayload::Int(10)));
    }

    #[test]
    fn later_packets_overwrite_last_payload() {
        let mut bus = EventBus::new();
        let mut registry = SubscriberRegistry::new();
        let sub = Subscriber::new(EventType::Input).shared();
        registry.register(&sub, EventType::Input);

        bus.publish(EventType::Input, EventPayload::Int(1), 1).unwrap();
        bus.publish(EventType::Input, EventPayload::Int(2), 1).unwrap();
        assert_eq!(registry.notify_subscribers(&bus), 2);
        assert_eq!(sub.borrow().last_payload(), Some(&EventPayload::Int(2)));
    }

    #[test]
    fn dropped_subscriber_is_skipped_then_pruned() {
        let mut bus = EventBus::new();
        let mut registry = SubscriberRegistry::new();
        let keep = Subscriber::new(EventType::Spawned).shared();
        let dropped = Subscriber::new(EventType::Spawned).shared();
        registry.register(&keep, EventType::Spawned);
        registry.register(&dropped, EventType::Spawned);
        drop(dropped);

        bus.publish(EventType::Spawned, EventPayload::Entity(0), 1).unwrap();
        assert_eq!(registry.notify_subscribers(&bus), 1);
        assert!(keep.borrow().is_active());

        assert_eq!(registry.registered(EventType::Spawned), 2);
        assert_eq!(registry.prune_expired(), 1);
        assert_eq!(registry.registered(EventType::Spawned), 1);
    }

    #[test]
    fn duplicate_registration() {
        let mut bus = EventBus::new();
        let mut registry = SubscriberRegistry::new();
        let sub = Subscriber::new(EventType::SceneChange).shared();

        registry.register(&sub, EventType::SceneChange);
        registry.register(&sub, EventType::SceneChange);
        bus.publish(EventType::SceneChange, EventPayload::None, 1).unwrap();
        assert_eq!(registry.notify_subscribers(&bus), 2);

        assert_eq!(
            registry.try_register(&sub, EventType::SceneChange),
            Err(EventError::DuplicateRegistration { event_type: EventType::SceneChange })
        );
        assert!(registry.try_register(&sub, EventType::Ui).is_ok());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn borrowed_subscriber_is_skipped() {
        let mut bus = EventBus::new();
        let mut registry = SubscriberRegistry::new();
        let sub = Subscriber::new(EventType::Ui).shared();
        registry.register(&sub, EventType::Ui);
        bus.publish(EventType::Ui, EventPayload::None, 1).unwrap();

        let guard = sub.borrow_mut();
        assert_eq!(registry.notify_subscribers(&bus), 0);
        drop(guard);
        assert_eq!(registry.notify_subscribers(&bus), 1);
    }
}
