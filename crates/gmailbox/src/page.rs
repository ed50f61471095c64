//! Pagination over ordered identifier lists.
//!
//! Search results can be large; callers page through them with a limit and
//! offset. All bounds are clamped so out-of-range requests yield an empty
//! page instead of panicking.

/// Upper bound on the number of elements in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// No bound; take everything after the offset.
    Unbounded,
    /// Take at most this many elements.
    Max(usize),
}

/// Returns the sub-slice of `items` starting at `offset` with at most
/// `limit` elements.
///
/// If `offset` is at or past the end of `items`, the page is empty.
#[must_use]
pub fn page<T>(items: &[T], limit: Limit, offset: usize) -> &[T] {
    if offset >= items.len() {
        return &[];
    }
    let rest = &items[offset..];
    match limit {
        Limit::Unbounded => rest,
        Limit::Max(n) => &rest[..rest.len().min(n)],
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn middle_of_list() {
        let ids = [1, 2, 3, 4, 5];
        assert_eq!(page(&ids, Limit::Max(2), 1), &[2, 3]);
    }

    #[test]
    fn limit_past_end_is_clamped() {
        let ids = [1, 2, 3];
        assert_eq!(page(&ids, Limit::Max(10), 1), &[2, 3]);
    }

    #[test]
    fn unbounded_takes_everything_after_offset() {
        let ids = [1, 2, 3, 4];
        assert_eq!(page(&ids, Limit::Unbounded, 2), &[3, 4]);
        assert_eq!(page(&ids, Limit::Unbounded, 0), &ids);
    }

    #[test]
    fn offset_at_len_is_empty() {
        let ids = [1, 2, 3];
        assert!(page(&ids, Limit::Unbounded, 3).is_empty());
        assert!(page(&ids, Limit::Max(1), 100).is_empty());
    }

    #[test]
    fn empty_input() {
        let ids: [u32; 0] = [];
        assert!(page(&ids, Limit::Max(5), 0).is_empty());
    }

    proptest! {
        #[test]
        fn offset_past_end_always_empty(
            ids in proptest::collection::vec(any::<u32>(), 0..64),
            extra in 0usize..100,
        ) {
            let offset = ids.len() + extra;
            prop_assert!(page(&ids, Limit::Unbounded, offset).is_empty());
            prop_assert!(page(&ids, Limit::Max(7), offset).is_empty());
        }

        #[test]
        fn page_length_law(
            ids in proptest::collection::vec(any::<u32>(), 0..64),
            limit in 1usize..100,
            offset in 0usize..100,
        ) {
            let expected = limit.min(ids.len().saturating_sub(offset));
            prop_assert_eq!(page(&ids, Limit::Max(limit), offset).len(), expected);
        }

        #[test]
        fn page_preserves_order(
            ids in proptest::collection::vec(any::<u32>(), 0..64),
            limit in 1usize..100,
            offset in 0usize..100,
        ) {
            let slice = page(&ids, Limit::Max(limit), offset);
            for (i, item) in slice.iter().enumerate() {
                prop_assert_eq!(*item, ids[offset + i]);
            }
        }
    }
}
