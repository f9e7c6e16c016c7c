use crate::{OptionIndex, OptionPool, Picker, PickerId, SelectionError};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// Sibling pickers competing for one pool. A pick retires the option from
/// every other member, a clear restores it.
#[derive(Debug)]
pub struct DealingGroup<T> {
    id: GroupId,
    pool: Rc<OptionPool<T>>,
    members: Vec<PickerId>,
}

impl<T> DealingGroup<T> {
    pub(crate) fn initialize(
        id: GroupId,
        members: Vec<PickerId>,
        pool: Rc<OptionPool<T>>,
        pickers: &mut [Picker<T>],
    ) -> Self {
        for member in &members {
            let picker = &mut pickers[member.0];
            picker.attach_options(Rc::clone(&pool));
            picker.set_group(id);
        }
        Self { id, pool, members }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn pool(&self) -> &OptionPool<T> {
        &self.pool
    }

    pub fn members(&self) -> &[PickerId] {
        &self.members
    }

    pub(crate) fn on_picked(
        &self,
        picker: PickerId,
        index: OptionIndex,
        pickers: &mut [Picker<T>],
    ) -> Result<(), SelectionError> {
        log::trace!("group {:?}: retire {index} from siblings of {picker}", self.id);
        for member in self.siblings(picker) {
            pickers[member.0].retire_option_locally(index)?;
        }
        Ok(())
    }

    pub(crate) fn on_cleared(
        &self,
        picker: PickerId,
        index: OptionIndex,
        pickers: &mut [Picker<T>],
    ) -> Result<(), SelectionError> {
        log::trace!("group {:?}: restore {index} to siblings of {picker}", self.id);
        for member in self.siblings(picker) {
            pickers[member.0].restore_option_locally(index)?;
        }
        Ok(())
    }

    fn siblings(&self, picker: PickerId) -> impl Iterator<Item = PickerId> + '_ {
        self.members
            .iter()
            .copied()
            .filter(move |member| *member != picker)
    }

    pub fn claims<'a>(&'a self, pickers: &'a [Picker<T>]) -> Vec<(PickerId, OptionIndex)> {
        self.members
            .iter()
            .filter_map(|member| {
                pickers[member.0]
                    .selection_index()
                    .map(|index| (*member, index))
            })
            .collect()
    }
}
