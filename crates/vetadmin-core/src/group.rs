//! Partitioning a flat fetch result into per-table groups.

use crate::Record;

/// Records sharing one backend table origin, collected for a single fetch
/// cycle. Membership changes only on refetch.
#[derive(Debug, Clone)]
pub struct Group {
    pub table_name: String,
    pub records: Vec<Record>,
}

/// Partition `records` into groups keyed by `table_name`.
///
/// Group order is first-seen order of the input, not alphabetical; the UI row
/// order depends on it.
pub fn group_records(records: Vec<Record>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|g| g.table_name == record.table_name)
        {
            Some(group) => group.records.push(record),
            None => groups.push(Group {
                table_name: record.table_name.clone(),
                records: vec![record],
            }),
        }
    }
    groups
}
