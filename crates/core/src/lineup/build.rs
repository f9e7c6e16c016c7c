use super::*;
use crate::{OptionPool, OptionView, PickerRole};
use std::collections::HashSet;
use std::rc::Rc;

impl<T> Lineup<T> {
    pub fn add_picker(
        &mut self,
        label: impl Into<String>,
        view: Box<dyn OptionView<T>>,
    ) -> PickerId {
        let id = PickerId(self.pickers.len());
        self.pickers.push(Picker::new(id, label.into(), view));
        id
    }

    pub fn initialize_group(
        &mut self,
        members: &[PickerId],
        values: Vec<T>,
    ) -> Result<GroupId, LineupError> {
        if members.is_empty() {
            return Err(LineupError::EmptyGroup);
        }
        let mut seen = HashSet::new();
        for &member in members {
            let picker = self.picker(member)?;
            if !seen.insert(member) {
                return Err(LineupError::DuplicateMember(member));
            }
            if picker.group().is_some() {
                return Err(LineupError::AlreadyGrouped(member));
            }
        }
        let id = GroupId(self.groups.len());
        let pool = Rc::new(OptionPool::new(values));
        log::debug!(
            "group {id:?}: {} members over {} options",
            members.len(),
            pool.len()
        );
        let group = DealingGroup::initialize(id, members.to_vec(), pool, &mut self.pickers);
        self.groups.push(group);
        Ok(id)
    }

    pub fn create_sequence(&mut self, members: &[PickerId]) -> Result<SequenceId, LineupError> {
        let first = *members.first().ok_or(LineupError::EmptySequence)?;
        let group = self
            .picker(first)?
            .group()
            .ok_or(LineupError::NotGrouped(first))?;
        let mut seen = HashSet::new();
        for &member in members {
            let picker = self.picker(member)?;
            if !seen.insert(member) {
                return Err(LineupError::DuplicateMember(member));
            }
            match picker.group() {
                None => return Err(LineupError::NotGrouped(member)),
                Some(other) if other != group => return Err(LineupError::SequenceSpansGroups),
                Some(_) => {}
            }
            if matches!(picker.role(), PickerRole::Substitute { .. }) {
                return Err(LineupError::AlreadySequenced(member));
            }
            if picker.is_filled() {
                return Err(LineupError::SequenceNotEmpty(member));
            }
        }
        let id = SequenceId(self.sequences.len());
        log::debug!("sequence {id:?}: {} members in group {group:?}", members.len());
        let sequence = Sequence::create(id, members.to_vec(), &mut self.pickers);
        self.sequences.push(sequence);
        Ok(id)
    }
}
