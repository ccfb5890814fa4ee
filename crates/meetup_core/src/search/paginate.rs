//! Fixed-size page slicing.

/// Returns page `page` (1-based) of `elements` with `page_size` items.
///
/// Out-of-range pages clip to an empty result. Page `0` is treated as page
/// `1` and a zero `page_size` yields an empty page; neither panics.
pub fn paginate<T>(elements: Vec<T>, page: u32, page_size: usize) -> Vec<T> {
    let skip = page_offset(page, page_size);
    elements.into_iter().skip(skip).take(page_size).collect()
}

/// Maps a missing or zero page number to the first page.
pub fn normalize_page(page: Option<u32>) -> u32 {
    match page {
        None | Some(0) => 1,
        Some(value) => value,
    }
}

fn page_offset(page: u32, page_size: usize) -> usize {
    let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
    index.saturating_mul(page_size)
}

#[cfg(test)]
mod tests {
    use super::{normalize_page, paginate};

    fn numbers(len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    #[test]
    fn first_page_returns_leading_slice() {
        assert_eq!(paginate(numbers(25), 1, 10), numbers(10));
    }

    #[test]
    fn last_partial_page_is_clipped() {
        assert_eq!(paginate(numbers(25), 3, 10), vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn page_past_end_is_empty() {
        assert!(paginate(numbers(5), 100, 10).is_empty());
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        assert!(paginate(numbers(5), u32::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn page_zero_behaves_like_first_page() {
        assert_eq!(paginate(numbers(4), 0, 2), vec![0, 1]);
    }

    #[test]
    fn zero_page_size_is_empty() {
        assert!(paginate(numbers(4), 1, 0).is_empty());
    }

    #[test]
    fn normalize_page_defaults_to_one() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(Some(7)), 7);
    }
}
