//! Linear search/filter over an item list.

use std::collections::BTreeSet;

use crate::category::CategoryFilter;
use crate::item::Item;

/// Items whose category passes `filter` and whose title, content, or any tag
/// contains `term` (case-insensitive). Input order is preserved.
pub fn filter_items<'a>(items: &'a [Item], filter: CategoryFilter, term: &str) -> Vec<&'a Item> {
    let term_lower = term.to_lowercase();
    items
        .iter()
        .filter(|item| filter.matches(item.category) && item.matches_search(&term_lower))
        .collect()
}

/// Every distinct tag across `items`, sorted.
pub fn collect_tags(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
