use std::collections::HashSet;

use uuid::Uuid;

/// Allocates `n` fresh random (v4) identifiers, one per item, in order.
pub fn fresh_ids(n: usize) -> Vec<String> {
    (0..n).map(|_| Uuid::new_v4().to_string()).collect()
}

/// `true` when `id` parses as a UUID (the only string ids a point index accepts).
pub fn is_uuid(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// `true` when no id appears twice.
pub fn all_unique(ids: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().all(|id| seen.insert(id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uuid_check() {
        assert!(is_uuid(&fresh_ids(1)[0]));
        assert!(!is_uuid("chunk-1"));
    }

    proptest! {
        #[test]
        fn fresh_ids_are_unique_and_sized(n in 0usize..300) {
            let ids = fresh_ids(n);
            prop_assert_eq!(ids.len(), n);
            prop_assert!(all_unique(&ids));
            prop_assert!(ids.iter().all(|id| is_uuid(id)));
        }
    }
}
