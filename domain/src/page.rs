use crate::ban::BanRecord;

/// Slice of a chronologically sorted list selected by a page request.
///
/// Pages are counted from the end of the list: page 1 holds the most recent
/// `page_size` entries, page 2 the ones before them, and so on. When a page
/// reaches past the start of the list it is shortened, and a page lying
/// entirely before the start is empty with `start` clamped to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub len: usize,
}

impl PageWindow {
    #[must_use]
    pub fn from_end(total: usize, page_size: usize, page_number: usize) -> Self {
        let reach = page_size.saturating_mul(page_number);

        let (start, len) = if reach >= total {
            let before = page_size.saturating_mul(page_number.saturating_sub(1));
            (0, total.saturating_sub(before))
        } else {
            (total - reach, page_size)
        };

        // Page 0 is not a valid request but must still produce an in-bounds window.
        let len = len.min(total.saturating_sub(start));
        Self { start, len }
    }

    /// 1-based position of the first entry, as shown to users.
    #[must_use]
    pub fn start_rank(&self) -> usize {
        self.start + 1
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanListQuery {
    pub search: String,
    pub page_size: usize,
    pub page_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanPage {
    pub start_rank: usize,
    pub total_matches: usize,
    pub records: Vec<BanRecord>,
}

impl BanPage {
    /// Cuts the page described by `query` out of records already sorted oldest first.
    #[must_use]
    pub fn from_sorted(sorted: Vec<BanRecord>, query: &BanListQuery) -> Self {
        let total_matches = sorted.len();
        let window = PageWindow::from_end(total_matches, query.page_size, query.page_number);
        let records = sorted
            .into_iter()
            .skip(window.start)
            .take(window.len)
            .collect();

        Self {
            start_rank: window.start_rank(),
            total_matches,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_page_comes_first() {
        let window = PageWindow::from_end(10, 5, 1);
        assert_eq!(window, PageWindow { start: 5, len: 5 });
        assert_eq!(window.start_rank(), 6);
        assert_eq!(window.end(), 10);
    }

    #[test]
    fn page_touching_the_start_is_full() {
        let window = PageWindow::from_end(10, 5, 2);
        assert_eq!(window, PageWindow { start: 0, len: 5 });
        assert_eq!(window.start_rank(), 1);
    }

    #[test]
    fn page_past_the_start_is_empty_with_rank_one() {
        let window = PageWindow::from_end(10, 5, 3);
        assert_eq!(window, PageWindow { start: 0, len: 0 });
        assert_eq!(window.start_rank(), 1);
    }

    #[test]
    fn partial_last_page_is_short() {
        assert_eq!(PageWindow::from_end(7, 5, 1), PageWindow { start: 2, len: 5 });
        assert_eq!(PageWindow::from_end(7, 5, 2), PageWindow { start: 0, len: 2 });
    }

    #[test]
    fn empty_list_yields_empty_first_page() {
        assert_eq!(PageWindow::from_end(0, 5, 1), PageWindow { start: 0, len: 0 });
    }

    #[test]
    fn page_zero_stays_in_bounds() {
        let window = PageWindow::from_end(10, 5, 0);
        assert!(window.end() <= 10);
        assert_eq!(window.len, 0);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let window = PageWindow::from_end(3, usize::MAX, usize::MAX);
        assert_eq!(window, PageWindow { start: 0, len: 0 });
    }
}
