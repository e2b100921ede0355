use serde::Serialize;

/// One slice of a larger result list.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Slice `items` into 1-based pages of `page_size` and return the
/// requested one.
///
/// `requested` is the raw `page` query parameter. Anything that does
/// not parse as a positive integer falls back to page 1, and a number
/// past the end clamps to the last page; bad input never surfaces as
/// an error. An empty list yields a single empty page.
pub fn paginate<T>(items: Vec<T>, page_size: usize, requested: Option<&str>) -> Page<T> {
    let total_pages = items.len().div_ceil(page_size).max(1);

    let page = requested
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
        .min(total_pages);

    let start = (page - 1) * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        total_pages,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn first_page_by_default() {
        let page = paginate(numbers(20), 9, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, numbers(9));
        assert!(!page.has_previous);
        assert!(page.has_next);
    }

    #[test]
    fn non_numeric_page_falls_back_to_first() {
        let page = paginate(numbers(20), 9, Some("abc"));
        assert_eq!(page.page, 1);
        assert_eq!(page.items, numbers(9));
    }

    #[test]
    fn zero_and_negative_fall_back_to_first() {
        assert_eq!(paginate(numbers(20), 9, Some("0")).page, 1);
        assert_eq!(paginate(numbers(20), 9, Some("-3")).page, 1);
    }

    #[test]
    fn overflowing_page_clamps_to_last() {
        let page = paginate(numbers(20), 9, Some("9999"));
        assert_eq!(page.page, 3);
        assert_eq!(page.items, vec![19, 20]);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn middle_page_slices_correctly() {
        let page = paginate(numbers(20), 9, Some("2"));
        assert_eq!(page.items, (10..=18).collect::<Vec<_>>());
        assert!(page.has_previous);
        assert!(page.has_next);
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let page = paginate(Vec::<usize>::new(), 5, Some("4"));
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let page = paginate(numbers(10), 5, Some("2"));
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert!(!page.has_next);
    }

    #[test]
    fn saved_list_page_size_of_five() {
        let page = paginate(numbers(7), 5, Some("2"));
        assert_eq!(page.page, 2);
        assert_eq!(page.items, vec![6, 7]);
    }
}
