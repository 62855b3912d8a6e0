//! Result set and selection state.
//!
//! [`ResultStore`] is the only owner of the current hits and of which hit is
//! selected. Every call that changes the selection returns a
//! [`SelectionChange`]; the session forwards it to the content coordinator.
//! Calls that leave the selection as it was return `None`.

use std::collections::HashSet;

use crate::types::{ItemKey, ResultItem};

/// Notification emitted whenever the selection is mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    /// Identity of the selection before the mutation.
    pub previous: Option<ItemKey>,
    /// The selection after the mutation.
    pub current: Option<ResultItem>,
}

#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<ResultItem>,
    /// Index into `results`. Always `Some` when `results` is non-empty.
    selected: Option<usize>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole result set and selects its first hit.
    ///
    /// Any earlier selection is dropped even if the same hit is still present.
    /// Duplicate identity keys keep their first occurrence.
    pub fn replace_results(&mut self, items: Vec<ResultItem>) -> SelectionChange {
        let previous = self.selection().map(ResultItem::key);
        self.results = dedup_by_key(items);
        self.selected = if self.results.is_empty() { None } else { Some(0) };
        SelectionChange { previous, current: self.selection().cloned() }
    }

    /// Drops all results. Same as `replace_results(vec![])`.
    pub fn clear(&mut self) -> SelectionChange {
        self.replace_results(Vec::new())
    }

    /// Selects the hit whose identity matches `item`.
    ///
    /// No-op when `item` is not part of the current result set, or is already
    /// selected.
    pub fn select(&mut self, item: &ResultItem) -> Option<SelectionChange> {
        self.select_key(&item.key())
    }

    pub fn select_key(&mut self, key: &ItemKey) -> Option<SelectionChange> {
        let index = self.results.iter().position(|r| r.has_key(key))?;
        self.select_index(index)
    }

    /// Selects the hit at `index`; out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) -> Option<SelectionChange> {
        if index >= self.results.len() || self.selected == Some(index) {
            return None;
        }
        let previous = self.selection().map(ResultItem::key);
        self.selected = Some(index);
        Some(SelectionChange { previous, current: self.selection().cloned() })
    }

    pub fn select_next(&mut self) -> Option<SelectionChange> {
        let next = self.selected.map_or(0, |i| i.saturating_add(1));
        self.select_index(next.min(self.results.len().saturating_sub(1)))
    }

    pub fn select_previous(&mut self) -> Option<SelectionChange> {
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.select_index(prev)
    }

    pub fn select_first(&mut self) -> Option<SelectionChange> {
        self.select_index(0)
    }

    pub fn select_last(&mut self) -> Option<SelectionChange> {
        self.select_index(self.results.len().saturating_sub(1))
    }

    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    pub fn selection(&self) -> Option<&ResultItem> {
        self.selected.and_then(|i| self.results.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn dedup_by_key(items: Vec<ResultItem>) -> Vec<ResultItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items.into_iter().filter(|item| seen.insert(item.key())).collect()
}
