//! Mapping human-facing group labels to backend table identifiers.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// The clinic's monitored tables, label → identifier.
static TABLE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Brand", "brands"),
        ("Category", "categories"),
        ("Unit of Measurement", "unit_of_measurement"),
        ("Product", "products"),
        ("Supplier", "suppliers"),
        ("Service", "services"),
        ("Appointment", "appointments"),
        ("Sale", "sales"),
    ])
});

/// Resolve a group label to its backend table identifier.
///
/// Unknown labels pass through unchanged so new groups still round-trip; the
/// backend may or may not recognize the raw label.
pub fn resolve_table(label: &str) -> &str {
    TABLE_LABELS.get(label).copied().unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_identifiers() {
        assert_eq!(resolve_table("Unit of Measurement"), "unit_of_measurement");
        assert_eq!(resolve_table("Brand"), "brands");
        assert_eq!(resolve_table("Sale"), "sales");
    }

    #[test]
    fn unknown_labels_pass_through() {
        assert_eq!(resolve_table("brands"), "brands");
        assert_eq!(resolve_table("Vaccination Log"), "Vaccination Log");
    }
}
