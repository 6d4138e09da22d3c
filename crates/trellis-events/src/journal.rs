//! Single-threaded notification journal.
//!
//! Hosts clone the journal into a root-level listener and read it back later;
//! all clones share one replay ring. When the ring is full the oldest envelope
//! is dropped.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{JournalError, JournalResult};
use crate::payloads::{ChangeEvent, DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId};

#[derive(Debug)]
struct JournalState {
    replay: VecDeque<EventEnvelope>,
    next_id: EventId,
}

/// Shared recorder with sequential ids and a bounded replay ring.
#[derive(Debug, Clone)]
pub struct EventJournal {
    state: Rc<RefCell<JournalState>>,
    replay_capacity: usize,
}

impl EventJournal {
    /// Construct a journal with a custom replay capacity.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::ZeroCapacity`] when `replay_capacity` is zero.
    pub fn with_capacity(replay_capacity: usize) -> JournalResult<Self> {
        if replay_capacity == 0 {
            return Err(JournalError::ZeroCapacity);
        }
        Ok(Self {
            state: Rc::new(RefCell::new(JournalState {
                replay: VecDeque::with_capacity(replay_capacity),
                next_id: 1,
            })),
            replay_capacity,
        })
    }

    /// Construct a journal with the default replay capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(JournalState {
                replay: VecDeque::with_capacity(DEFAULT_REPLAY_CAPACITY),
                next_id: 1,
            })),
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
        }
    }

    /// Record a notification and return its assigned id.
    pub fn record(&self, host: Uuid, event: ChangeEvent) -> EventId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id = state.next_id.saturating_add(1);
        if state.replay.len() == self.replay_capacity {
            let _ = state.replay.pop_front();
        }
        state.replay.push_back(EventEnvelope {
            id,
            timestamp: Utc::now(),
            host,
            event,
        });
        id
    }

    /// Last id still held in the replay ring.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.state.borrow().replay.back().map(|env| env.id)
    }

    /// Envelopes recorded after the specified id.
    #[must_use]
    pub fn backlog_since(&self, id: EventId) -> Vec<EventEnvelope> {
        self.state
            .borrow()
            .replay
            .iter()
            .filter(|env| env.id > id)
            .cloned()
            .collect()
    }

    /// Payloads currently held, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.state
            .borrow()
            .replay
            .iter()
            .map(|env| env.event.clone())
            .collect()
    }

    /// Remove and return every held envelope.
    pub fn drain(&self) -> Vec<EventEnvelope> {
        self.state.borrow_mut().replay.drain(..).collect()
    }

    /// Number of envelopes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().replay.len()
    }

    /// Whether the ring is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().replay.is_empty()
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggled(id: &str, expanded: bool) -> ChangeEvent {
        ChangeEvent::DisclosureChanged {
            item_id: id.into(),
            expanded,
        }
    }

    #[test]
    fn sequential_ids_and_backlog() {
        let journal = EventJournal::new();
        let host = Uuid::nil();
        let first = journal.record(host, toggled("a", true));
        let second = journal.record(host, toggled("a", false));

        assert_eq!(second, first + 1);
        assert_eq!(journal.last_event_id(), Some(second));
        let backlog = journal.backlog_since(first);
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].event, toggled("a", false));
    }

    #[test]
    fn clones_share_the_ring() {
        let journal = EventJournal::new();
        let observer = journal.clone();
        journal.record(Uuid::nil(), toggled("b", true));
        assert_eq!(observer.events(), vec![toggled("b", true)]);
        assert_eq!(observer.drain().len(), 1);
        assert!(journal.is_empty());
    }

    #[test]
    fn full_ring_drops_oldest() {
        let journal = EventJournal::with_capacity(2).expect("capacity");
        for idx in 0..3 {
            journal.record(Uuid::nil(), toggled(&idx.to_string(), true));
        }
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.events()[0].subject(), "1");
        assert_eq!(journal.last_event_id(), Some(3));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            EventJournal::with_capacity(0).err(),
            Some(JournalError::ZeroCapacity)
        );
    }
}
