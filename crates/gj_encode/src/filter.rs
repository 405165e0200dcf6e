//! Group visibility test.

use alloc::string::String;

use crate::config::GroupMode;

/// Returns whether a field tagged with `field_groups` is visible for
/// `requested` under `mode`.
///
/// A field without groups is never visible, and nothing is visible when no
/// group is requested.
///
/// ```
/// use gj_encode::{include, GroupMode};
///
/// let requested = ["public".to_string(), "admin".to_string()];
/// assert!(include(&requested, &["public"], GroupMode::Or));
/// assert!(!include(&requested, &["public"], GroupMode::And));
/// assert!(include(&requested, &["admin", "public", "x"], GroupMode::And));
/// ```
pub fn include(requested: &[String], field_groups: &[&str], mode: GroupMode) -> bool {
    if requested.is_empty() || field_groups.is_empty() {
        return false;
    }
    let has = |group: &String| field_groups.iter().any(|g| *g == group.as_str());
    match mode {
        GroupMode::Or => requested.iter().any(has),
        GroupMode::And => requested.iter().all(has),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    fn owned(groups: &[&str]) -> Vec<String> {
        groups.iter().map(|g| String::from(*g)).collect()
    }

    #[test]
    fn empty_sides_exclude() {
        assert!(!include(&[], &["a"], GroupMode::Or));
        assert!(!include(&[], &["a"], GroupMode::And));
        assert!(!include(&owned(&["a"]), &[], GroupMode::Or));
        assert!(!include(&owned(&["a"]), &[], GroupMode::And));
    }

    #[test]
    fn or_and_and() {
        let requested = owned(&["public", "admin"]);
        assert!(include(&requested, &["admin"], GroupMode::Or));
        assert!(!include(&requested, &["internal"], GroupMode::Or));
        assert!(!include(&requested, &["admin"], GroupMode::And));
        assert!(include(&requested, &["public", "admin"], GroupMode::And));
    }

    proptest! {
        #[test]
        fn and_implies_or(
            requested in prop::collection::vec("[a-d]", 0..4),
            field in prop::collection::vec("[a-d]", 0..4),
        ) {
            let field: Vec<&str> = field.iter().map(String::as_str).collect();
            if include(&requested, &field, GroupMode::And) {
                prop_assert!(include(&requested, &field, GroupMode::Or));
            }
        }

        #[test]
        fn or_matches_intersection(
            requested in prop::collection::vec("[a-d]", 1..4),
            field in prop::collection::vec("[a-d]", 1..4),
        ) {
            let field_refs: Vec<&str> = field.iter().map(String::as_str).collect();
            let intersects = requested.iter().any(|r| field.contains(r));
            prop_assert_eq!(include(&requested, &field_refs, GroupMode::Or), intersects);
        }

        #[test]
        fn and_matches_subset(
            requested in prop::collection::vec("[a-d]", 1..4),
            field in prop::collection::vec("[a-d]", 1..4),
        ) {
            let field_refs: Vec<&str> = field.iter().map(String::as_str).collect();
            let subset = requested.iter().all(|r| field.contains(r));
            prop_assert_eq!(include(&requested, &field_refs, GroupMode::And), subset);
        }
    }
}
