use crate::{
    DealingGroup, GroupId, ListenerId, OptionIndex, Picker, PickerId, PickerRole, SelectionError,
    Sequence, SequenceId,
};
use thiserror::Error;

mod build;
mod listeners;
mod select;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineupError {
    #[error("option is not in the pool")]
    UnknownOption,
    #[error("option is claimed elsewhere and not offered by picker {picker}")]
    Unavailable { picker: PickerId },
    #[error("{0}")]
    InvalidLocalIndex(#[from] SelectionError),
    #[error("position {position} is out of range for {len} offered options")]
    InvalidPosition { position: usize, len: usize },
    #[error("unknown picker {0}")]
    UnknownPicker(PickerId),
    #[error("unknown sequence {0:?}")]
    UnknownSequence(SequenceId),
    #[error("picker {0} has no options attached")]
    NotAttached(PickerId),
    #[error("picker {0} already belongs to a dealing group")]
    AlreadyGrouped(PickerId),
    #[error("picker {0} already belongs to a sequence")]
    AlreadySequenced(PickerId),
    #[error("picker {0} is listed more than once")]
    DuplicateMember(PickerId),
    #[error("picker {0} must join a dealing group before a sequence")]
    NotGrouped(PickerId),
    #[error("sequence members must share one dealing group")]
    SequenceSpansGroups,
    #[error("picker {0} is filled; sequences start empty")]
    SequenceNotEmpty(PickerId),
    #[error("substitute at position {position} is not fillable, frontier is {frontier}")]
    OutOfOrder { position: usize, frontier: usize },
    #[error("slot {0} is inactive")]
    SlotInactive(PickerId),
    #[error("picker {0} is not a starter")]
    NotStarter(PickerId),
    #[error("picker {0} is not a substitute")]
    NotSubstitute(PickerId),
    #[error("picker {0} is empty")]
    EmptySlot(PickerId),
    #[error("pickers belong to different dealing groups")]
    DifferentGroups,
    #[error("pickers belong to different sequences")]
    DifferentSequences,
    #[error("a dealing group needs at least one member")]
    EmptyGroup,
    #[error("a sequence needs at least one member")]
    EmptySequence,
}

/// Owns every picker, dealing group and sequence of one session.
///
/// Pickers are stored in an arena and addressed by [`PickerId`]; groups and
/// sequences hold ids only. Every mutating entry point takes `&mut self`, so
/// one gesture's whole cascade runs before anything else can observe or
/// touch the state.
#[derive(Debug)]
pub struct Lineup<T> {
    pickers: Vec<Picker<T>>,
    groups: Vec<DealingGroup<T>>,
    sequences: Vec<Sequence>,
    next_listener: u64,
}

impl<T> Default for Lineup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Lineup<T> {
    pub fn new() -> Self {
        Self {
            pickers: Vec::new(),
            groups: Vec::new(),
            sequences: Vec::new(),
            next_listener: 1,
        }
    }

    pub fn picker(&self, id: PickerId) -> Result<&Picker<T>, LineupError> {
        self.pickers.get(id.0).ok_or(LineupError::UnknownPicker(id))
    }

    pub fn pickers(&self) -> &[Picker<T>] {
        &self.pickers
    }

    pub fn group(&self, id: GroupId) -> Option<&DealingGroup<T>> {
        self.groups.get(id.0)
    }

    pub fn groups(&self) -> &[DealingGroup<T>] {
        &self.groups
    }

    pub fn sequence(&self, id: SequenceId) -> Result<&Sequence, LineupError> {
        self.sequences
            .get(id.0)
            .ok_or(LineupError::UnknownSequence(id))
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn selection(&self, id: PickerId) -> Result<Option<&T>, LineupError> {
        Ok(self.picker(id)?.selection())
    }

    pub fn selection_index(&self, id: PickerId) -> Result<Option<OptionIndex>, LineupError> {
        Ok(self.picker(id)?.selection_index())
    }

    pub fn mask(&self, id: PickerId) -> Result<&[OptionIndex], LineupError> {
        Ok(self.picker(id)?.mask())
    }

    pub fn offered(&self, id: PickerId) -> Result<Vec<&T>, LineupError> {
        Ok(self.picker(id)?.offered())
    }

    pub fn role(&self, id: PickerId) -> Result<PickerRole, LineupError> {
        Ok(self.picker(id)?.role())
    }

    pub fn group_of(&self, id: PickerId) -> Result<Option<GroupId>, LineupError> {
        Ok(self.picker(id)?.group())
    }

    pub fn sequence_of(&self, id: PickerId) -> Result<Option<SequenceId>, LineupError> {
        Ok(match self.picker(id)?.role() {
            PickerRole::Substitute { sequence, .. } => Some(sequence),
            PickerRole::Starter => None,
        })
    }

    pub fn frontier(&self, id: SequenceId) -> Result<usize, LineupError> {
        Ok(self.sequence(id)?.frontier(&self.pickers))
    }

    pub fn next_fillable(&self, id: SequenceId) -> Result<Option<PickerId>, LineupError> {
        Ok(self.sequence(id)?.next_fillable(&self.pickers))
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }
}
