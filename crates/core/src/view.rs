use std::cell::RefCell;
use std::rc::Rc;

/// Rendering side of a picker. The engine drives these calls; none of them
/// hands the view a way back into the picker, so a view cannot re-enter the
/// engine while it is being updated.
///
/// Positions are relative: they index the picker's offered list, not the pool.
pub trait OptionView<T> {
    fn init_options(&mut self, values: &[T]);
    fn remove_option_at(&mut self, position: usize);
    fn insert_option_at(&mut self, value: &T, position: usize);
    fn select_option_at(&mut self, position: Option<usize>);

    fn highlight(&mut self) {}
    fn dehighlight(&mut self) {}
    fn set_controls_enabled(&mut self, _enabled: bool) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl<T> OptionView<T> for NullView {
    fn init_options(&mut self, _values: &[T]) {}
    fn remove_option_at(&mut self, _position: usize) {}
    fn insert_option_at(&mut self, _value: &T, _position: usize) {}
    fn select_option_at(&mut self, _position: Option<usize>) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub options: Vec<T>,
    pub selected: Option<usize>,
    pub highlighted: bool,
    pub enabled: bool,
    pub cleared_count: usize,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
            highlighted: false,
            enabled: true,
            cleared_count: 0,
        }
    }
}

impl<T> ViewState<T> {
    pub fn selected_value(&self) -> Option<&T> {
        self.selected.and_then(|position| self.options.get(position))
    }
}

#[derive(Debug)]
pub struct MirrorView<T> {
    state: Rc<RefCell<ViewState<T>>>,
}

impl<T> Clone for MirrorView<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> Default for MirrorView<T> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewState::default())),
        }
    }
}

impl<T: Clone> MirrorView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    pub fn options(&self) -> Vec<T> {
        self.state.borrow().options.clone()
    }

    pub fn selected_value(&self) -> Option<T> {
        self.state.borrow().selected_value().cloned()
    }
}

impl<T: Clone> OptionView<T> for MirrorView<T> {
    fn init_options(&mut self, values: &[T]) {
        let mut state = self.state.borrow_mut();
        state.options = values.to_vec();
        state.selected = None;
    }

    fn remove_option_at(&mut self, position: usize) {
        let mut state = self.state.borrow_mut();
        state.options.remove(position);
        state.selected = match state.selected {
            Some(selected) if selected == position => None,
            Some(selected) if selected > position => Some(selected - 1),
            other => other,
        };
    }

    fn insert_option_at(&mut self, value: &T, position: usize) {
        let mut state = self.state.borrow_mut();
        state.options.insert(position, value.clone());
        if let Some(selected) = state.selected {
            if selected >= position {
                state.selected = Some(selected + 1);
            }
        }
    }

    fn select_option_at(&mut self, position: Option<usize>) {
        let mut state = self.state.borrow_mut();
        if position.is_none() {
            state.cleared_count += 1;
        }
        state.selected = position;
    }

    fn highlight(&mut self) {
        self.state.borrow_mut().highlighted = true;
    }

    fn dehighlight(&mut self) {
        self.state.borrow_mut().highlighted = false;
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_tracks_selection_across_edits() {
        let mirror: MirrorView<&str> = MirrorView::new();
        let mut view = mirror.clone();
        view.init_options(&["a", "b", "c"]);
        view.select_option_at(Some(1));
        view.insert_option_at(&"z", 0);
        assert_eq!(mirror.selected_value(), Some("b"));
        view.remove_option_at(0);
        view.remove_option_at(0);
        assert_eq!(mirror.options(), vec!["b", "c"]);
        assert_eq!(mirror.selected_value(), Some("b"));
    }
}
