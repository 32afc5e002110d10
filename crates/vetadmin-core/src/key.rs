//! Selection keys: the identifier naming one record across all groups.
//!
//! In memory a key is the structured `(table, id)` pair; the `"{table}-{id}"`
//! string form exists only at serialization boundaries (CLI arguments, list
//! keys in a rendering layer).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("malformed selection key: {0:?}")]
    Malformed(String),
}

/// Uniquely names one record within the current working set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionKey {
    pub table: String,
    pub id: u64,
}

impl SelectionKey {
    pub fn new(table: impl Into<String>, id: u64) -> Self {
        Self {
            table: table.into(),
            id,
        }
    }
}

/// Encode as `"{table}-{id}"`.
impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.table, self.id)
    }
}

/// Decode by splitting at the *last* separator.
///
/// Ids are always numeric and never contain `-`, but table names legally may
/// ("unit-of-measurement"), so a first-occurrence split would mis-parse them.
impl FromStr for SelectionKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (table, id) = s
            .rsplit_once('-')
            .ok_or_else(|| KeyError::Malformed(s.to_string()))?;
        let id: u64 = id.parse().map_err(|_| KeyError::Malformed(s.to_string()))?;
        Ok(Self::new(table, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_simple() {
        let key = SelectionKey::new("brands", 7);
        let encoded = key.to_string();
        assert_eq!(encoded, "brands-7");
        assert_eq!(encoded.parse::<SelectionKey>().unwrap(), key);
    }

    #[test]
    fn round_trip_table_containing_separator() {
        let key = SelectionKey::new("unit-of-measurement", 12);
        let parsed: SelectionKey = key.to_string().parse().unwrap();
        assert_eq!(parsed.table, "unit-of-measurement");
        assert_eq!(parsed.id, 12);
    }

    #[test]
    fn missing_separator_is_malformed() {
        let err = "brands".parse::<SelectionKey>().unwrap_err();
        assert_eq!(err, KeyError::Malformed("brands".into()));
    }

    #[test]
    fn non_numeric_suffix_is_malformed() {
        assert!("garbage-key-no-id".parse::<SelectionKey>().is_err());
        assert!("brands-".parse::<SelectionKey>().is_err());
    }

    #[test]
    fn negative_id_is_malformed() {
        // "brands--3" splits into ("brands-", "3"); "-3" never reaches the
        // parser as an id. A lone trailing minus is the malformed case.
        assert!("brands--3".parse::<SelectionKey>().is_ok());
        assert!("-".parse::<SelectionKey>().is_err());
    }

    #[test]
    fn keys_order_by_table_then_id() {
        let mut keys = vec![
            SelectionKey::new("inventory", 9),
            SelectionKey::new("brands", 3),
            SelectionKey::new("inventory", 7),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                SelectionKey::new("brands", 3),
                SelectionKey::new("inventory", 7),
                SelectionKey::new("inventory", 9),
            ]
        );
    }
}
