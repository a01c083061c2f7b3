//! Subscribers: passive flags raised by the notifier
//!
//! The owner keeps the strong `Rc`; the registry only ever holds a `Weak`.

use crate::events::{EventPayload, EventType};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared ownership handle for a subscriber.
pub type SharedSubscriber = Rc<RefCell<Subscriber>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    event_type: EventType,
    trigger: Option<EventPayload>,
    active: bool,
    last_payload: Option<EventPayload>,
}

impl Subscriber {
    /// Subscriber that activates on any event of `event_type`.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            trigger: None,
            active: false,
            last_payload: None,
        }
    }

    /// Subscriber that activates only on payloads equal to `trigger`.
    pub fn with_trigger(event_type: EventType, trigger: EventPayload) -> Self {
        Self {
            trigger: Some(trigger),
            ..Self::new(event_type)
        }
    }

    /// Wrap into the shared handle the registry expects.
    pub fn shared(self) -> SharedSubscriber {
        Rc::new(RefCell::new(self))
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn trigger(&self) -> Option<&EventPayload> {
        self.trigger.as_ref()
    }

    /// No trigger matches everything; otherwise the payload must be equal.
    pub fn should_activate(&self, payload: &EventPayload) -> bool {
        match &self.trigger {
            None => true,
            Some(trigger) => trigger == payload,
        }
    }

    pub(crate) fn activate(&mut self, payload: &EventPayload) {
        self.active = true;
        self.last_payload = Some(payload.clone());
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Payload of the most recent activation.
    pub fn last_payload(&self) -> Option<&EventPayload> {
        self.last_payload.as_ref()
    }

    /// Acknowledge an activation. The registry never does this itself.
    pub fn set_inactive(&mut self) {
        self.active = false;
    }

    /// Consume a pending activation, returning its payload.
    pub fn take_activation(&mut self) -> Option<EventPayload> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.last_payload.clone()
    }
}
