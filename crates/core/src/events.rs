use crate::{PickerId, SequenceId};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Observer of one picker. Told about empty/filled transitions only, never
/// about a value being replaced while the picker stays filled.
pub trait SelectionListener {
    fn selection_made_on(&mut self, picker: PickerId);
    fn selection_cleared_on(&mut self, picker: PickerId);
}

pub trait SequenceListener {
    fn became_filled(&mut self, sequence: SequenceId, member: PickerId);
    fn became_empty(&mut self, sequence: SequenceId, member: PickerId);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    SelectionMade {
        picker: PickerId,
    },
    SelectionCleared {
        picker: PickerId,
    },
    BecameFilled {
        sequence: SequenceId,
        member: PickerId,
    },
    BecameEmpty {
        sequence: SequenceId,
        member: PickerId,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Listener that records every notification it receives into a shared
/// [`EventBus`]. Clones record into the same bus.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    bus: Rc<RefCell<EventBus>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Event> {
        self.bus.borrow_mut().drain().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bus.borrow().is_empty()
    }
}

impl SelectionListener for EventRecorder {
    fn selection_made_on(&mut self, picker: PickerId) {
        self.bus.borrow_mut().push(Event::SelectionMade { picker });
    }

    fn selection_cleared_on(&mut self, picker: PickerId) {
        self.bus.borrow_mut().push(Event::SelectionCleared { picker });
    }
}

impl SequenceListener for EventRecorder {
    fn became_filled(&mut self, sequence: SequenceId, member: PickerId) {
        self.bus
            .borrow_mut()
            .push(Event::BecameFilled { sequence, member });
    }

    fn became_empty(&mut self, sequence: SequenceId, member: PickerId) {
        self.bus
            .borrow_mut()
            .push(Event::BecameEmpty { sequence, member });
    }
}
