//! Search/select filter - a filtered view over a fixed list with a selection.
//!
//! The filter owns its source list for the whole session. A query narrows
//! the visible list to items whose label matches, in source order. Selection
//! is tracked per item, not per row: when the query changes, selected items
//! that stay visible keep their selection under their new index, and
//! selected items that drop out of view are deselected.
//!
//! ## Example
//!
//! ```ignore
//! use campaign_sync::{SearchSelectFilter, SelectionMode};
//!
//! let fruits = vec!["Apple", "Banana", "Cherry"];
//! let mut filter = SearchSelectFilter::new(fruits, SelectionMode::Multi);
//! filter.set_query("an");
//! filter.toggle(0)?;
//! assert_eq!(filter.selected_items(), vec![&"Banana"]);
//! ```

mod error;
mod item;
mod query;

use std::collections::BTreeSet;

use tracing::{debug, error};

pub use error::SelectionError;
pub use item::SelectableItem;
pub use query::MatchMode;

use query::Query;

/// Whether a filter allows one or many selected items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one item; selecting replaces the previous choice.
    Single,
    /// Any number of items; selecting toggles.
    Multi,
}

/// What `select_all_or_none` would do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    CheckAll,
    UncheckAll,
}

type Listener<T> = Box<dyn Fn(&[&T])>;

/// A filtered, selectable view over a fixed list of items.
pub struct SearchSelectFilter<T> {
    source: Vec<T>,
    mode: SelectionMode,
    match_mode: MatchMode,
    query: Query,
    /// Source indices of visible items, ascending.
    visible: Vec<usize>,
    /// Source indices of selected items. Always a subset of `visible`.
    selected: BTreeSet<usize>,
    listeners: Vec<Listener<T>>,
}

impl<T: SelectableItem> SearchSelectFilter<T> {
    pub fn new(items: Vec<T>, mode: SelectionMode) -> Self {
        let visible = (0..items.len()).collect();
        Self {
            source: items,
            mode,
            match_mode: MatchMode::default(),
            query: Query::default(),
            visible,
            selected: BTreeSet::new(),
            listeners: Vec::new(),
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self.refilter();
        self
    }

    /// Start with `indices` (positions in the visible list) selected, applied
    /// in order with `toggle` semantics. Listeners are not notified.
    pub fn with_selected(
        mut self,
        indices: impl IntoIterator<Item = usize>,
    ) -> Result<Self, SelectionError> {
        for index in indices {
            self.apply_toggle(index)?;
        }
        Ok(self)
    }

    /// Register a callback invoked with the selected items after every
    /// `toggle` and `select_all_or_none`.
    pub fn on_selection_changed(&mut self, listener: impl Fn(&[&T]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// The active query, trimmed.
    pub fn query(&self) -> &str {
        self.query.text()
    }

    pub fn source_items(&self) -> &[T] {
        &self.source
    }

    pub fn visible_items(&self) -> Vec<&T> {
        self.visible.iter().map(|&i| &self.source[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Selected positions in the current visible list.
    pub fn selection(&self) -> BTreeSet<usize> {
        self.selected
            .iter()
            .filter_map(|source| self.visible.binary_search(source).ok())
            .collect()
    }

    /// Selected items, in visible order.
    pub fn selected_items(&self) -> Vec<&T> {
        self.selected.iter().map(|&i| &self.source[i]).collect()
    }

    /// Lowest selected visible position, e.g. to scroll it into view.
    pub fn first_selected(&self) -> Option<usize> {
        self.selection().into_iter().next()
    }

    pub fn selection_action(&self) -> SelectionAction {
        if self.selected.is_empty() {
            SelectionAction::CheckAll
        } else {
            SelectionAction::UncheckAll
        }
    }

    /// Filter the visible list by `text` (trimmed, case-insensitive). An empty
    /// query shows every item. Selected items that are no longer visible are
    /// deselected.
    pub fn set_query(&mut self, text: &str) -> Vec<&T> {
        self.query = Query::parse(text);
        self.refilter();
        debug!(
            query = self.query.text(),
            visible = self.visible.len(),
            selected = self.selected.len(),
            "filter updated"
        );
        self.visible_items()
    }

    /// Select the item at visible position `index`.
    ///
    /// Multi-select flips its membership. Single-select makes it the only
    /// selected item; selecting it again keeps it selected.
    pub fn toggle(&mut self, index: usize) -> Result<BTreeSet<usize>, SelectionError> {
        self.apply_toggle(index)?;
        self.notify();
        Ok(self.selection())
    }

    /// Multi-select only: select every visible item if nothing is selected,
    /// otherwise clear the selection. Returns the items now selected.
    pub fn select_all_or_none(&mut self) -> Result<Vec<&T>, SelectionError> {
        if self.mode != SelectionMode::Multi {
            error!("select all/none called on a single-select filter");
            return Err(SelectionError::MultiSelectOnly);
        }

        if self.selected.is_empty() {
            self.selected = self.visible.iter().copied().collect();
        } else {
            self.selected.clear();
        }
        self.notify();
        Ok(self.selected_items())
    }

    fn apply_toggle(&mut self, index: usize) -> Result<(), SelectionError> {
        let Some(&source) = self.visible.get(index) else {
            let len = self.visible.len();
            error!(index, len, "selection index out of range");
            return Err(SelectionError::OutOfRange { index, len });
        };

        match self.mode {
            SelectionMode::Multi => {
                if !self.selected.remove(&source) {
                    self.selected.insert(source);
                }
            }
            SelectionMode::Single => {
                self.selected.clear();
                self.selected.insert(source);
            }
        }
        Ok(())
    }

    fn refilter(&mut self) {
        let query = &self.query;
        let match_mode = self.match_mode;
        self.visible = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, item)| query.matches(item.label(), match_mode))
            .map(|(i, _)| i)
            .collect();

        let visible = &self.visible;
        self.selected.retain(|source| visible.binary_search(source).is_ok());
    }

    fn notify(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let selected = self.selected_items();
        for listener in &self.listeners {
            listener(&selected);
        }
    }
}
