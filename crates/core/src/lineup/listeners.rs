use super::*;
use crate::{SelectionListener, SequenceListener};

impl<T> Lineup<T> {
    pub fn attach_listener(
        &mut self,
        picker: PickerId,
        listener: Box<dyn SelectionListener>,
    ) -> Result<ListenerId, LineupError> {
        self.picker(picker)?;
        let id = self.next_listener_id();
        self.pickers[picker.0].add_listener(id, listener);
        Ok(id)
    }

    pub fn detach_listener(
        &mut self,
        picker: PickerId,
        id: ListenerId,
    ) -> Option<Box<dyn SelectionListener>> {
        self.pickers.get_mut(picker.0)?.remove_listener(id)
    }

    pub fn attach_sequence_listener(
        &mut self,
        sequence: SequenceId,
        listener: Box<dyn SequenceListener>,
    ) -> Result<ListenerId, LineupError> {
        self.sequence(sequence)?;
        let id = self.next_listener_id();
        self.sequences[sequence.0].add_listener(id, listener);
        Ok(id)
    }

    pub fn detach_sequence_listener(
        &mut self,
        sequence: SequenceId,
        id: ListenerId,
    ) -> Option<Box<dyn SequenceListener>> {
        self.sequences.get_mut(sequence.0)?.remove_listener(id)
    }
}
