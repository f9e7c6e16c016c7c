use crate::{ListenerId, Picker, PickerId, PickerRole, SelectionError, SequenceListener};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceId(pub usize);

/// Ordered substitute slots that fill front to back without holes.
///
/// The filled members always form a prefix; the first empty member is the
/// frontier and the only one a user may fill. Clearing a filled member
/// collapses the content behind it forward. Collapse and swap only move
/// claims between members of the same dealing group, so they use the
/// pickers' local primitives and never ripple to the group.
pub struct Sequence {
    id: SequenceId,
    members: Vec<PickerId>,
    highlighted: Option<usize>,
    listeners: Vec<(ListenerId, Box<dyn SequenceListener>)>,
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("id", &self.id)
            .field("members", &self.members)
            .field("highlighted", &self.highlighted)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Sequence {
    pub(crate) fn create<T>(
        id: SequenceId,
        members: Vec<PickerId>,
        pickers: &mut [Picker<T>],
    ) -> Self {
        for (position, member) in members.iter().enumerate() {
            pickers[member.0].set_role(PickerRole::Substitute {
                sequence: id,
                position,
            });
        }
        let mut sequence = Self {
            id,
            members,
            highlighted: None,
            listeners: Vec::new(),
        };
        sequence.refresh_frontier(pickers);
        sequence
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn members(&self) -> &[PickerId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn frontier<T>(&self, pickers: &[Picker<T>]) -> usize {
        self.members
            .iter()
            .take_while(|member| pickers[member.0].is_filled())
            .count()
    }

    pub fn next_fillable<T>(&self, pickers: &[Picker<T>]) -> Option<PickerId> {
        self.members.get(self.frontier(pickers)).copied()
    }

    pub fn is_gap_free<T>(&self, pickers: &[Picker<T>]) -> bool {
        let frontier = self.frontier(pickers);
        self.members[frontier..]
            .iter()
            .all(|member| !pickers[member.0].is_filled())
    }

    pub(crate) fn content_added<T>(&mut self, position: usize, pickers: &mut [Picker<T>]) -> PickerId {
        debug_assert!(self.is_gap_free(pickers), "fill left a gap in {:?}", self.id);
        self.refresh_frontier(pickers);
        self.members[position]
    }

    /// The member at `position` just went from filled to empty. Shifts every
    /// later member's content one step forward and returns the member that
    /// ends up empty.
    pub(crate) fn content_removed<T>(
        &mut self,
        position: usize,
        pickers: &mut [Picker<T>],
    ) -> Result<PickerId, SelectionError> {
        let last = self.members.len() - 1;
        for current in position..last {
            let next = self.members[current + 1];
            let content = pickers[next.0].selection_index();
            pickers[self.members[current].0].acquire_content(content)?;
        }
        pickers[self.members[last].0].discard_content()?;
        let frontier = self.frontier(pickers);
        debug_assert!(self.is_gap_free(pickers), "collapse left a gap in {:?}", self.id);
        log::debug!(
            "sequence {:?}: collapsed from position {position}, frontier now {frontier}",
            self.id
        );
        self.refresh_frontier(pickers);
        Ok(self.members[frontier])
    }

    pub(crate) fn swap_content<T>(
        &mut self,
        first: usize,
        second: usize,
        pickers: &mut [Picker<T>],
    ) -> Result<(), SelectionError> {
        let first_id = self.members[first];
        let second_id = self.members[second];
        let first_content = pickers[first_id.0].selection_index();
        let second_content = pickers[second_id.0].selection_index();
        pickers[second_id.0].acquire_content(first_content)?;
        pickers[first_id.0].acquire_content(second_content)?;
        log::debug!("sequence {:?}: swapped positions {first} and {second}", self.id);
        Ok(())
    }

    pub(crate) fn refresh_frontier<T>(&mut self, pickers: &mut [Picker<T>]) {
        let frontier = self.frontier(pickers);
        let target = (frontier < self.members.len()).then_some(frontier);
        if self.highlighted != target {
            if let Some(previous) = self.highlighted {
                pickers[self.members[previous].0].view_mut().dehighlight();
            }
            if let Some(next) = target {
                pickers[self.members[next].0].view_mut().highlight();
            }
            log::trace!(
                "sequence {:?}: highlight {:?} -> {:?}",
                self.id,
                self.highlighted,
                target
            );
            self.highlighted = target;
        }
        for (position, member) in self.members.iter().enumerate() {
            pickers[member.0].set_gate_open(position <= frontier);
        }
    }

    pub(crate) fn add_listener(&mut self, id: ListenerId, listener: Box<dyn SequenceListener>) {
        self.listeners.push((id, listener));
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn SequenceListener>> {
        let position = self.listeners.iter().position(|(entry, _)| *entry == id)?;
        Some(self.listeners.remove(position).1)
    }

    pub(crate) fn notify_filled(&mut self, member: PickerId) {
        let id = self.id;
        for (_, listener) in &mut self.listeners {
            listener.became_filled(id, member);
        }
    }

    pub(crate) fn notify_emptied(&mut self, member: PickerId) {
        let id = self.id;
        for (_, listener) in &mut self.listeners {
            listener.became_empty(id, member);
        }
    }
}
