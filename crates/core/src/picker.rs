use crate::{
    GroupId, ListenerId, OptionIndex, OptionPool, OptionView, SelectionListener, SequenceId,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickerId(pub usize);

impl fmt::Display for PickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickerRole {
    Starter,
    Substitute {
        sequence: SequenceId,
        position: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid local index {index}")]
    InvalidLocalIndex { index: OptionIndex },
}

/// One slot's selection state over a shared pool.
///
/// `mask` holds the absolute indices this picker currently offers, sorted in
/// pool order. The picker's own selection stays in its mask; siblings in the
/// same dealing group have it retired from theirs.
///
/// Every mutator here is local: it touches this picker and its view only.
/// Rippling to siblings is done by [`crate::Lineup`].
pub struct Picker<T> {
    id: PickerId,
    label: String,
    role: PickerRole,
    group: Option<GroupId>,
    pool: Option<Rc<OptionPool<T>>>,
    mask: Vec<OptionIndex>,
    selection: Option<OptionIndex>,
    active: bool,
    gate_open: bool,
    controls_enabled: bool,
    view: Box<dyn OptionView<T>>,
    listeners: Vec<(ListenerId, Box<dyn SelectionListener>)>,
}

impl<T> fmt::Debug for Picker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("role", &self.role)
            .field("group", &self.group)
            .field("mask", &self.mask)
            .field("selection", &self.selection)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T> Picker<T> {
    pub(crate) fn new(id: PickerId, label: String, view: Box<dyn OptionView<T>>) -> Self {
        Self {
            id,
            label,
            role: PickerRole::Starter,
            group: None,
            pool: None,
            mask: Vec::new(),
            selection: None,
            active: true,
            gate_open: true,
            controls_enabled: true,
            view,
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> PickerId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn role(&self) -> PickerRole {
        self.role
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn pool(&self) -> Option<&OptionPool<T>> {
        self.pool.as_deref()
    }

    pub fn mask(&self) -> &[OptionIndex] {
        &self.mask
    }

    pub fn selection_index(&self) -> Option<OptionIndex> {
        self.selection
    }

    pub fn selection(&self) -> Option<&T> {
        let index = self.selection?;
        self.pool.as_ref()?.get(index)
    }

    pub fn is_filled(&self) -> bool {
        self.selection.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn offered(&self) -> Vec<&T> {
        match self.pool.as_ref() {
            Some(pool) => self.mask.iter().filter_map(|&index| pool.get(index)).collect(),
            None => Vec::new(),
        }
    }

    pub fn offers(&self, index: OptionIndex) -> bool {
        self.mask.binary_search(&index).is_ok()
    }

    pub fn relative_position(&self, index: OptionIndex) -> Option<usize> {
        self.mask.binary_search(&index).ok()
    }

    pub fn absolute_index(&self, position: usize) -> Option<OptionIndex> {
        self.mask.get(position).copied()
    }

    pub(crate) fn set_role(&mut self, role: PickerRole) {
        self.role = role;
    }

    pub(crate) fn set_group(&mut self, group: GroupId) {
        self.group = Some(group);
    }

    pub(crate) fn view_mut(&mut self) -> &mut dyn OptionView<T> {
        self.view.as_mut()
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
        self.sync_controls();
    }

    pub(crate) fn set_gate_open(&mut self, open: bool) {
        self.gate_open = open;
        self.sync_controls();
    }

    fn sync_controls(&mut self) {
        let enabled = self.active && self.gate_open;
        if enabled != self.controls_enabled {
            self.controls_enabled = enabled;
            self.view.set_controls_enabled(enabled);
        }
    }

    pub(crate) fn attach_options(&mut self, pool: Rc<OptionPool<T>>) {
        self.mask = (0..pool.len()).collect();
        self.selection = None;
        self.view.init_options(pool.values());
        self.pool = Some(pool);
    }

    pub(crate) fn retire_option_locally(
        &mut self,
        index: OptionIndex,
    ) -> Result<(), SelectionError> {
        let position = self
            .mask
            .binary_search(&index)
            .map_err(|_| SelectionError::InvalidLocalIndex { index })?;
        self.mask.remove(position);
        self.view.remove_option_at(position);
        Ok(())
    }

    pub(crate) fn restore_option_locally(
        &mut self,
        index: OptionIndex,
    ) -> Result<(), SelectionError> {
        let pool = match self.pool.as_ref() {
            Some(pool) if index < pool.len() => pool,
            _ => return Err(SelectionError::InvalidLocalIndex { index }),
        };
        let position = self.mask.partition_point(|&entry| entry < index);
        if self.mask.get(position) == Some(&index) {
            return Err(SelectionError::InvalidLocalIndex { index });
        }
        self.mask.insert(position, index);
        self.view.insert_option_at(&pool[index], position);
        Ok(())
    }

    pub(crate) fn select_locally(
        &mut self,
        index: Option<OptionIndex>,
    ) -> Result<(), SelectionError> {
        let position = match index {
            Some(index) => Some(
                self.relative_position(index)
                    .ok_or(SelectionError::InvalidLocalIndex { index })?,
            ),
            None => None,
        };
        self.selection = index;
        self.view.select_option_at(position);
        Ok(())
    }

    /// Takes over `content`, which a sibling of the same group held until
    /// now. The previous selection, already claimed by another sibling, is
    /// retired afterwards so the view never shows an empty slot in between.
    pub(crate) fn acquire_content(
        &mut self,
        content: Option<OptionIndex>,
    ) -> Result<(), SelectionError> {
        let previous = self.selection;
        if previous == content {
            return Ok(());
        }
        if let Some(index) = content {
            self.restore_option_locally(index)?;
        }
        self.select_locally(content)?;
        if let Some(index) = previous {
            self.retire_option_locally(index)?;
        }
        Ok(())
    }

    pub(crate) fn discard_content(&mut self) -> Result<(), SelectionError> {
        if let Some(index) = self.selection {
            self.select_locally(None)?;
            self.retire_option_locally(index)?;
        }
        Ok(())
    }

    pub(crate) fn add_listener(&mut self, id: ListenerId, listener: Box<dyn SelectionListener>) {
        self.listeners.push((id, listener));
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn SelectionListener>> {
        let position = self.listeners.iter().position(|(entry, _)| *entry == id)?;
        Some(self.listeners.remove(position).1)
    }

    pub(crate) fn notify_made(&mut self) {
        let id = self.id;
        for (_, listener) in &mut self.listeners {
            listener.selection_made_on(id);
        }
    }

    pub(crate) fn notify_cleared(&mut self) {
        let id = self.id;
        for (_, listener) in &mut self.listeners {
            listener.selection_cleared_on(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MirrorView;

    fn picker(values: &[&'static str]) -> (Picker<&'static str>, MirrorView<&'static str>) {
        let mirror = MirrorView::new();
        let mut picker = Picker::new(PickerId(0), "P".to_string(), Box::new(mirror.clone()));
        picker.attach_options(Rc::new(OptionPool::new(values.to_vec())));
        (picker, mirror)
    }

    #[test]
    fn attach_offers_whole_pool() {
        let (picker, mirror) = picker(&["a", "b", "c"]);
        assert_eq!(picker.mask(), &[0, 1, 2]);
        assert_eq!(picker.selection_index(), None);
        assert_eq!(mirror.options(), vec!["a", "b", "c"]);
    }

    #[test]
    fn restore_keeps_pool_order() {
        let (mut picker, mirror) = picker(&["a", "b", "c", "d"]);
        picker.retire_option_locally(1).expect("retire b");
        picker.retire_option_locally(2).expect("retire c");
        picker.retire_option_locally(0).expect("retire a");
        picker.restore_option_locally(2).expect("restore c");
        picker.restore_option_locally(0).expect("restore a");
        assert_eq!(picker.mask(), &[0, 2, 3]);
        assert_eq!(mirror.options(), vec!["a", "c", "d"]);
    }

    #[test]
    fn local_primitives_reject_bad_indices() {
        let (mut picker, _mirror) = picker(&["a", "b"]);
        assert_eq!(
            picker.restore_option_locally(1),
            Err(SelectionError::InvalidLocalIndex { index: 1 })
        );
        assert_eq!(
            picker.restore_option_locally(7),
            Err(SelectionError::InvalidLocalIndex { index: 7 })
        );
        picker.retire_option_locally(1).expect("retire");
        assert_eq!(
            picker.retire_option_locally(1),
            Err(SelectionError::InvalidLocalIndex { index: 1 })
        );
        assert_eq!(
            picker.select_locally(Some(1)),
            Err(SelectionError::InvalidLocalIndex { index: 1 })
        );
        assert_eq!(picker.selection_index(), None);
    }

    #[test]
    fn acquire_swaps_held_index_without_clearing_view() {
        let (mut picker, mirror) = picker(&["a", "b", "c"]);
        picker.select_locally(Some(0)).expect("select a");
        // Sibling holds c, so it is not offered here.
        picker.retire_option_locally(2).expect("retire c");
        let cleared_before = mirror.snapshot().cleared_count;

        picker.acquire_content(Some(2)).expect("acquire c");

        assert_eq!(picker.selection_index(), Some(2));
        assert_eq!(picker.mask(), &[1, 2]);
        assert_eq!(mirror.options(), vec!["b", "c"]);
        assert_eq!(mirror.selected_value(), Some("c"));
        assert_eq!(mirror.snapshot().cleared_count, cleared_before);
    }

    #[test]
    fn discard_retires_held_index() {
        let (mut picker, mirror) = picker(&["a", "b"]);
        picker.select_locally(Some(1)).expect("select b");
        picker.discard_content().expect("discard");
        assert_eq!(picker.selection_index(), None);
        assert_eq!(picker.mask(), &[0]);
        assert_eq!(mirror.selected_value(), None);
    }
}
