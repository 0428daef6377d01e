//! Wrapping cursor movement over a list of `all` items

/// Move up, wrapping to the last item. With no cursor, start at the bottom.
pub fn prev(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        _ if all == 0 => None,
        Some(idx) if idx < all => idx.checked_sub(1).or(Some(all - 1)),
        _ => Some(all - 1),
    }
}

/// Move down, wrapping to the first item. With no cursor, start at the top.
pub fn next(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        _ if all == 0 => None,
        Some(idx) if idx + 1 < all => Some(idx + 1),
        _ => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_both_ways() {
        assert_eq!(prev(Some(0), 3), Some(2));
        assert_eq!(prev(Some(2), 3), Some(1));
        assert_eq!(next(Some(2), 3), Some(0));
        assert_eq!(next(Some(0), 3), Some(1));
    }

    #[test]
    fn starts_from_an_edge_without_cursor() {
        assert_eq!(prev(None, 3), Some(2));
        assert_eq!(next(None, 3), Some(0));
    }

    #[test]
    fn empty_list_has_no_cursor() {
        assert_eq!(prev(Some(1), 0), None);
        assert_eq!(next(None, 0), None);
    }

    #[test]
    fn out_of_range_cursor_is_reset() {
        assert_eq!(prev(Some(7), 3), Some(2));
        assert_eq!(next(Some(7), 3), Some(0));
    }
}
