//! Page arithmetic over any slice. Pages are 1-indexed.

/// Number of pages needed for `total` items; 0 when there is nothing to show.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The items on page `page_number`, clipped to bounds.
/// Out-of-range pages (including page 0) are empty rather than an error.
pub fn page<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Bring `page_number` back into `[1, max(1, page_count)]`.
pub fn clamp_page(page_number: usize, total: usize, page_size: usize) -> usize {
    page_number.clamp(1, page_count(total, page_size).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_eighty_movies_in_pages_of_twelve() {
        let items: Vec<u32> = (1..=80).collect();
        assert_eq!(page_count(items.len(), 12), 7);
        assert_eq!(page(&items, 7, 12).len(), 8);
        assert_eq!(page(&items, 7, 12).first(), Some(&73));
        assert_eq!(page(&items, 1, 12), &items[..12]);
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(page_count(0, 12), 0);
        assert!(page(&items, 1, 12).is_empty());
        assert_eq!(clamp_page(5, 0, 12), 1);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items: Vec<u32> = (0..10).collect();
        assert!(page(&items, 0, 4).is_empty());
        assert!(page(&items, 4, 4).is_empty());
        assert!(page(&items, usize::MAX, 4).is_empty());
    }

    #[test]
    fn test_clamp_page_shrinks_to_last_page() {
        assert_eq!(clamp_page(7, 30, 12), 3);
        assert_eq!(clamp_page(0, 30, 12), 1);
        assert_eq!(clamp_page(2, 30, 12), 2);
    }

    proptest! {
        #[test]
        fn page_count_is_ceiling(total in 0usize..10_000, size in 1usize..200) {
            let expected = (total + size - 1) / size;
            prop_assert_eq!(page_count(total, size), expected);
        }

        /// Concatenating every page gives back the original items.
        #[test]
        fn pages_reconstruct_items(items in proptest::collection::vec(any::<u16>(), 0..300), size in 1usize..40) {
            let count = page_count(items.len(), size);
            let mut rebuilt = Vec::with_capacity(items.len());
            for n in 1..=count {
                let chunk = page(&items, n, size);
                prop_assert!(!chunk.is_empty());
                if n < count {
                    prop_assert_eq!(chunk.len(), size);
                }
                rebuilt.extend_from_slice(chunk);
            }
            prop_assert_eq!(rebuilt, items);
        }

        #[test]
        fn clamped_page_is_in_bounds(p in 0usize..1000, total in 0usize..500, size in 1usize..50) {
            let clamped = clamp_page(p, total, size);
            prop_assert!(clamped >= 1);
            prop_assert!(clamped <= page_count(total, size).max(1));
        }
    }
}
