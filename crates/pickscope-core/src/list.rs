//! Hover and press state for a flat list of items.
//!
//! Hovering an item marks it "gray"; pressing an item makes it the single
//! "dark-gray" selection and hands its value back, e.g. the link to open.

use crate::error::{PickscopeError, Result};

/// Class applied while the pointer is over an item.
pub const HOVER_CLASS: &str = "gray";

/// Class applied to the pressed item.
pub const SELECTED_CLASS: &str = "dark-gray";

/// One entry of an [`ItemList`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem<T> {
    value: T,
    hovered: bool,
    selected: bool,
}

impl<T> ListItem<T> {
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// CSS-style class names currently applied to the item.
    #[must_use]
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.hovered {
            classes.push(HOVER_CLASS);
        }
        if self.selected {
            classes.push(SELECTED_CLASS);
        }
        classes
    }
}

/// A list with independent hover state and exclusive press selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemList<T> {
    items: Vec<ListItem<T>>,
}

impl<T> ItemList<T> {
    /// Builds a list with nothing hovered or selected.
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: values
                .into_iter()
                .map(|value| ListItem {
                    value,
                    hovered: false,
                    selected: false,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ListItem<T>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListItem<T>> {
        self.items.iter()
    }

    /// Index of the pressed item, if any.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.selected)
    }

    pub fn pointer_enter(&mut self, index: usize) -> Result<()> {
        self.item_mut(index)?.hovered = true;
        Ok(())
    }

    pub fn pointer_leave(&mut self, index: usize) -> Result<()> {
        self.item_mut(index)?.hovered = false;
        Ok(())
    }

    /// Presses an item: it becomes the only selected one.
    pub fn press(&mut self, index: usize) -> Result<&T> {
        let len = self.items.len();
        if index >= len {
            return Err(PickscopeError::ItemOutOfRange { index, len });
        }
        for item in &mut self.items {
            item.selected = false;
        }
        let item = &mut self.items[index];
        item.selected = true;
        log::debug!("selected item {index}");
        Ok(&item.value)
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut ListItem<T>> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(PickscopeError::ItemOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos() -> ItemList<&'static str> {
        ItemList::new(["todo 1", "todo 2", "todo 3", "todo 4"])
    }

    #[test]
    fn test_hover_toggles_gray() {
        let mut list = todos();
        list.pointer_enter(1).unwrap();
        assert_eq!(list.get(1).unwrap().class_names(), vec![HOVER_CLASS]);
        list.pointer_leave(1).unwrap();
        assert!(list.get(1).unwrap().class_names().is_empty());
    }

    #[test]
    fn test_press_is_exclusive() {
        let mut list = todos();
        assert_eq!(list.press(0).unwrap(), &"todo 1");
        assert_eq!(list.press(2).unwrap(), &"todo 3");
        assert_eq!(list.selected_index(), Some(2));
        assert_eq!(list.iter().filter(|item| item.is_selected()).count(), 1);
    }

    #[test]
    fn test_hover_and_selection_are_independent() {
        let mut list = todos();
        list.press(3).unwrap();
        list.pointer_enter(3).unwrap();
        assert_eq!(
            list.get(3).unwrap().class_names(),
            vec![HOVER_CLASS, SELECTED_CLASS]
        );
    }

    #[test]
    fn test_out_of_range() {
        let mut list = todos();
        assert!(matches!(
            list.press(9),
            Err(PickscopeError::ItemOutOfRange { index: 9, len: 4 })
        ));
        assert!(list.pointer_enter(4).is_err());
        assert_eq!(list.selected_index(), None);
    }
}
