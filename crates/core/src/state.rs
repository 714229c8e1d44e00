//! Client state container.
//!
//! [`ClientState`] owns the in-memory item list a UI renders from, plus the
//! search term, active category filter and selection. Every mutation consumes
//! the state and returns the new one; callers hand `items()` to the sync
//! worker after each mutation.

use std::collections::HashSet;

use crate::category::CategoryFilter;
use crate::error::CoreError;
use crate::export::ExportOptions;
use crate::filter::{collect_tags, filter_items};
use crate::item::{Item, ItemForm};
use crate::types::{new_item_id, EpochMillis, ItemId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    items: Vec<Item>,
    search_term: String,
    category: CategoryFilter,
    selected: HashSet<ItemId>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Replace the item list (initial load). Selected ids that no longer
    /// exist are dropped.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self.prune_selection();
        self
    }

    /// Create (no `id` on the form) or update an item.
    ///
    /// New items are prepended with a fresh id and timestamps. Updates
    /// replace the item in place and bump `updated_at`. Returns the new state
    /// and the id of the saved item.
    pub fn save_item(
        mut self,
        form: ItemForm,
        now: EpochMillis,
    ) -> Result<(Self, ItemId), CoreError> {
        form.validate()?;

        match form.id.clone() {
            Some(id) => {
                let slot = self
                    .items
                    .iter_mut()
                    .find(|item| item.id == id)
                    .ok_or_else(|| CoreError::NotFound {
                        entity: "Item",
                        id: id.clone(),
                    })?;
                *slot = form.apply_to(slot, now);
                Ok((self, id))
            }
            None => {
                let id = new_item_id();
                let item = form.into_new_item(id.clone(), now);
                self.items.insert(0, item);
                Ok((self, id))
            }
        }
    }

    /// Remove an item and drop it from the selection. Unknown ids are a no-op.
    pub fn delete_item(mut self, id: &str) -> Self {
        self.items.retain(|item| item.id != id);
        self.selected.remove(id);
        self
    }

    /// Change the category filter. The selection is cleared whenever the
    /// filter actually changes so hidden items cannot be exported.
    pub fn set_category(mut self, category: CategoryFilter) -> Self {
        if self.category != category {
            self.category = category;
            self.selected.clear();
        }
        self
    }

    pub fn set_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Flip selection of one item. Ids not in the list are ignored.
    pub fn toggle_select(mut self, id: &str) -> Self {
        if !self.selected.remove(id) && self.items.iter().any(|item| item.id == id) {
            self.selected.insert(id.to_string());
        }
        self
    }

    /// Select every visible item, or clear the selection if all visible
    /// items are already selected.
    pub fn toggle_select_all(mut self) -> Self {
        let visible: HashSet<ItemId> = self
            .visible_items()
            .into_iter()
            .map(|item| item.id.clone())
            .collect();

        if !visible.is_empty() && self.selected.len() == visible.len() {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
        self
    }

    pub fn clear_selection(mut self) -> Self {
        self.selected.clear();
        self
    }

    fn prune_selection(&mut self) {
        let items = &self.items;
        self.selected
            .retain(|id| items.iter().any(|item| &item.id == id));
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Items passing the current category filter and search term.
    pub fn visible_items(&self) -> Vec<&Item> {
        filter_items(&self.items, self.category, &self.search_term)
    }

    /// Selected items, in list order.
    pub fn selected_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .cloned()
            .collect()
    }

    /// Distinct tags across all items, sorted (tag autocomplete source).
    pub fn all_tags(&self) -> Vec<String> {
        collect_tags(&self.items)
    }

    /// Which export actions the current selection offers.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::for_selection(&self.selected_items())
    }
}
