//! Fixed-size pagination of result rows.

/// One page of a larger slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'r, T> {
    /// Items on this page
    pub items: &'r [T],
    /// 1-based page number after clamping
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<'_, T> {
    /// Index of the first item of this page within the full slice.
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.page_size
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// Number of pages for `total` items, never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size))
}

/// Slice `items` into the requested page. A page size of zero is treated as one.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let number = clamp_page(page, items.len(), page_size);
    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages: total_pages(items.len(), page_size),
        total_items: items.len(),
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 25, 10), 1);
        assert_eq!(clamp_page(2, 25, 10), 2);
        assert_eq!(clamp_page(99, 25, 10), 3);
    }

    #[test]
    fn test_last_page_partial() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, &[21, 22, 23, 24, 25]);
        assert_eq!(page.offset(), 20);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_empty_items() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 4, 10);
        assert_eq!(page.number, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
