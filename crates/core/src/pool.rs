use std::ops::Index;

pub type OptionIndex = usize;

/// Immutable ordered candidate list shared by every picker of one dealing
/// group. Pickers hold an `Rc` to it and never a private copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPool<T> {
    values: Vec<T>,
}

impl<T> OptionPool<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: OptionIndex) -> Option<&T> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }
}

impl<T: PartialEq> OptionPool<T> {
    pub fn position(&self, value: &T) -> Option<OptionIndex> {
        self.values.iter().position(|item| item == value)
    }
}

impl<T> Index<OptionIndex> for OptionPool<T> {
    type Output = T;

    fn index(&self, index: OptionIndex) -> &T {
        &self.values[index]
    }
}
