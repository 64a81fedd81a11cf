//! Events - change notifications from the colony for UI and other observers
//!
//! The colony queues [`ColonyEvent`]s as it mutates; the engine drains the
//! queue after every operation and hands each event to every subscribed
//! [`ColonyObserver`], in subscription order.

use serde::{Deserialize, Serialize};

use crate::components::CharacterId;

/// Something observable changed in the colony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColonyEvent {
    /// New stock of a resource; 0 when the entry was removed
    ResourceChanged { resource: String, amount: i64 },
    /// Settlement reached a new tier
    SettlementUpgraded { tier: u32 },
    CitizenAdded { citizen: CharacterId },
    CitizenRemoved { citizen: CharacterId },
}

/// Receives colony events
pub trait ColonyObserver {
    fn on_event(&mut self, event: &ColonyEvent);
}

impl<F> ColonyObserver for F
where
    F: FnMut(&ColonyEvent),
{
    fn on_event(&mut self, event: &ColonyEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

/// Fan-out of colony events to observers
#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriptionId, Box<dyn ColonyObserver>)>,
    next_id: u32,
    dispatched: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn ColonyObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if the subscription was not found
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Total events delivered since creation
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn dispatch(&mut self, events: Vec<ColonyEvent>) {
        for event in &events {
            for (_, observer) in &mut self.observers {
                observer.on_event(event);
            }
            self.dispatched += 1;
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(Box::new(move |e: &ColonyEvent| sink.borrow_mut().push(e.clone())));

        bus.dispatch(vec![
            ColonyEvent::SettlementUpgraded { tier: 1 },
            ColonyEvent::CitizenAdded {
                citizen: CharacterId(4),
            },
        ]);

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[0], ColonyEvent::SettlementUpgraded { tier: 1 });
        assert_eq!(bus.dispatched(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&count);
        let id = bus.subscribe(Box::new(move |_: &ColonyEvent| *sink.borrow_mut() += 1));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.dispatch(vec![ColonyEvent::SettlementUpgraded { tier: 2 }]);
        assert_eq!(*count.borrow(), 0);
    }
}
