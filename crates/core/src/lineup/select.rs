use super::*;
use crate::PickerRole;

impl<T> Lineup<T> {
    pub fn pick(&mut self, id: PickerId, position: usize) -> Result<(), LineupError> {
        let picker = self.picker(id)?;
        let index = picker
            .absolute_index(position)
            .ok_or(LineupError::InvalidPosition {
                position,
                len: picker.mask().len(),
            })?;
        log::debug!("pick {id} position {position} -> option {index}");
        self.apply_selection(id, Some(index))
    }

    pub fn clear_selection(&mut self, id: PickerId) -> Result<(), LineupError> {
        log::debug!("clear {id}");
        self.apply_selection(id, None)
    }

    pub fn swap(&mut self, first: PickerId, second: PickerId) -> Result<(), LineupError> {
        let (sequence, first_position) = self.substitute_slot(first)?;
        let (other, second_position) = self.substitute_slot(second)?;
        if sequence != other {
            return Err(LineupError::DifferentSequences);
        }
        for id in [first, second] {
            if !self.pickers[id.0].is_filled() {
                return Err(LineupError::EmptySlot(id));
            }
        }
        if first == second {
            return Ok(());
        }
        self.sequences[sequence.0].swap_content(first_position, second_position, &mut self.pickers)?;
        Ok(())
    }

    /// Moves a substitute's player into a starter slot. The substitute is
    /// cleared first, which collapses its sequence and hands the player back
    /// to the group; the starter then claims it through the normal path.
    pub fn promote(&mut self, substitute: PickerId, starter: PickerId) -> Result<(), LineupError> {
        self.substitute_slot(substitute)?;
        let index = self.pickers[substitute.0]
            .selection_index()
            .ok_or(LineupError::EmptySlot(substitute))?;
        let target = self.picker(starter)?;
        if target.role() != PickerRole::Starter {
            return Err(LineupError::NotStarter(starter));
        }
        if !target.is_active() {
            return Err(LineupError::SlotInactive(starter));
        }
        if target.group() != self.pickers[substitute.0].group() {
            return Err(LineupError::DifferentGroups);
        }
        log::debug!("promote {substitute} into {starter}");
        self.apply_selection(substitute, None)?;
        self.apply_selection(starter, Some(index))
    }

    pub fn set_active(&mut self, id: PickerId, active: bool) -> Result<(), LineupError> {
        let picker = self.picker(id)?;
        if picker.role() != PickerRole::Starter {
            return Err(LineupError::NotStarter(id));
        }
        if picker.is_active() == active {
            return Ok(());
        }
        if !active && picker.is_filled() {
            self.apply_selection(id, None)?;
        }
        log::debug!("slot {id} active={active}");
        self.pickers[id.0].set_active(active);
        Ok(())
    }

    fn substitute_slot(&self, id: PickerId) -> Result<(SequenceId, usize), LineupError> {
        match self.picker(id)?.role() {
            PickerRole::Substitute { sequence, position } => Ok((sequence, position)),
            PickerRole::Starter => Err(LineupError::NotSubstitute(id)),
        }
    }

    /// The rippling path shared by every user-facing selection change.
    ///
    /// All checks run before the first mutation. The group hears about the
    /// old option and then the new one; listeners and the sequence hear only
    /// about a net empty/filled transition.
    pub(super) fn apply_selection(
        &mut self,
        id: PickerId,
        next: Option<OptionIndex>,
    ) -> Result<(), LineupError> {
        let picker = self.picker(id)?;
        let group = picker.group().ok_or(LineupError::NotAttached(id))?;
        if !picker.is_active() {
            return Err(LineupError::SlotInactive(id));
        }
        let previous = picker.selection_index();
        if previous == next {
            log::trace!("{id}: selection unchanged");
            return Ok(());
        }
        if let Some(index) = next {
            if !picker.offers(index) {
                return Err(LineupError::Unavailable { picker: id });
            }
        }
        let role = picker.role();
        if let PickerRole::Substitute { sequence, position } = role {
            if previous.is_none() {
                let frontier = self.sequences[sequence.0].frontier(&self.pickers);
                if position != frontier {
                    return Err(LineupError::OutOfOrder { position, frontier });
                }
            }
        }

        let dealing = &self.groups[group.0];
        if let Some(index) = previous {
            dealing.on_cleared(id, index, &mut self.pickers)?;
        }
        self.pickers[id.0].select_locally(next)?;
        if let Some(index) = next {
            dealing.on_picked(id, index, &mut self.pickers)?;
        }

        match (previous.is_some(), next.is_some()) {
            (false, true) => self.selection_made(id, role),
            (true, false) => self.selection_cleared(id, role)?,
            _ => {}
        }
        Ok(())
    }

    fn selection_made(&mut self, id: PickerId, role: PickerRole) {
        match role {
            PickerRole::Starter => self.pickers[id.0].notify_made(),
            PickerRole::Substitute { sequence, position } => {
                let sequence = &mut self.sequences[sequence.0];
                let member = sequence.content_added(position, &mut self.pickers);
                sequence.notify_filled(member);
                self.pickers[member.0].notify_made();
            }
        }
    }

    fn selection_cleared(&mut self, id: PickerId, role: PickerRole) -> Result<(), LineupError> {
        match role {
            PickerRole::Starter => self.pickers[id.0].notify_cleared(),
            PickerRole::Substitute { sequence, position } => {
                let sequence = &mut self.sequences[sequence.0];
                let member = sequence.content_removed(position, &mut self.pickers)?;
                sequence.notify_emptied(member);
                self.pickers[member.0].notify_cleared();
            }
        }
        Ok(())
    }
}

impl<T: PartialEq> Lineup<T> {
    pub fn set_selection(&mut self, id: PickerId, value: Option<&T>) -> Result<(), LineupError> {
        let next = match value {
            None => None,
            Some(value) => {
                let picker = self.picker(id)?;
                let pool = picker.pool().ok_or(LineupError::NotAttached(id))?;
                let index = pool.position(value).ok_or(LineupError::UnknownOption)?;
                if !picker.offers(index) {
                    return Err(LineupError::Unavailable { picker: id });
                }
                Some(index)
            }
        };
        self.apply_selection(id, next)
    }
}
