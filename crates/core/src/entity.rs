//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Rows inside a directory or ledger are entities: two rows with identical
/// values are still distinct when their ids differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// The row in `rows` whose id is `id`.
pub fn find_by_id<'a, E: Entity>(rows: &'a [E], id: &E::Id) -> Option<&'a E> {
    rows.iter().find(|row| row.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        id: u32,
        name: &'static str,
    }

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &Self::Id {
            &self.id
        }
    }

    #[test]
    fn rows_with_equal_values_are_told_apart_by_id() {
        let rows = [Row { id: 1, name: "Rice" }, Row { id: 2, name: "Rice" }];
        assert_eq!(find_by_id(&rows, &2).map(|r| r.id), Some(2));
        assert_eq!(find_by_id(&rows, &1).map(|r| r.name), Some("Rice"));
        assert!(find_by_id(&rows, &3).is_none());
    }
}
