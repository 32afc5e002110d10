//! Selection state for the archive/restore screens.
//!
//! The selected key set is the single source of truth. Group-level and
//! select-all checkbox state are recomputed from it on read, so mixing
//! record-level and group-level toggles can never leave a stale summary flag.

use std::collections::BTreeSet;

use crate::{Group, SelectionKey};

/// The set of records currently ticked on a screen.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: BTreeSet<SelectionKey>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// The selected keys, ordered by (table, id).
    pub fn keys(&self) -> &BTreeSet<SelectionKey> {
        &self.selected
    }

    /// Discard the whole selection (on refetch, whatever the batch verdict).
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Flip one record. Group and select-all state are derived, so nothing
    /// else needs updating.
    pub fn toggle_record(&mut self, table: &str, id: u64) {
        let key = SelectionKey::new(table, id);
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
    }

    /// Tick or untick an entire group: if every record of the group is
    /// selected, deselect them all, otherwise select them all.
    pub fn toggle_group(&mut self, group: &Group) {
        if self.is_group_checked(group) {
            for record in &group.records {
                self.selected.remove(&record.key());
            }
        } else {
            for record in &group.records {
                self.selected.insert(record.key());
            }
        }
    }

    /// Absolute toggle over every fetched record: everything selected →
    /// clear; anything unselected → select all.
    pub fn toggle_select_all(&mut self, groups: &[Group]) {
        if self.is_all_checked(groups) {
            self.selected.clear();
        } else {
            for group in groups {
                for record in &group.records {
                    self.selected.insert(record.key());
                }
            }
        }
    }

    pub fn is_record_checked(&self, table: &str, id: u64) -> bool {
        self.selected.contains(&SelectionKey::new(table, id))
    }

    /// A group reads as checked iff it is non-empty and every one of its
    /// records is selected.
    pub fn is_group_checked(&self, group: &Group) -> bool {
        !group.records.is_empty()
            && group
                .records
                .iter()
                .all(|r| self.selected.contains(&r.key()))
    }

    /// The select-all checkbox reads as checked iff every record of every
    /// non-empty group is selected.
    pub fn is_all_checked(&self, groups: &[Group]) -> bool {
        let mut any = false;
        for group in groups {
            for record in &group.records {
                any = true;
                if !self.selected.contains(&record.key()) {
                    return false;
                }
            }
        }
        any
    }
}
