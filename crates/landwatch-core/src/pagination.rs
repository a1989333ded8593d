//! Page-button window for the results table

use serde::Serialize;

/// Most page buttons shown at once
pub const WINDOW_SIZE: u32 = 5;

/// Pagination controls derived from a loaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub total_size: u64,
}

impl Pagination {
    pub fn new(current: u32, total_pages: u32, total_size: u64) -> Self {
        Self {
            current,
            total_pages,
            total_size,
        }
    }

    /// Controls render only when there is more than one page
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Target of the "previous" button
    pub fn prev_page(&self) -> u32 {
        self.current.saturating_sub(1).max(1)
    }

    /// Target of the "next" button
    pub fn next_page(&self) -> u32 {
        self.current.saturating_add(1).min(self.total_pages.max(1))
    }

    /// Page numbers for the buttons
    pub fn window(&self) -> Vec<u32> {
        page_window(self.current, self.total_pages)
    }
}

/// At most five consecutive pages around `current`, clamped to `1..=total`
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    if total <= WINDOW_SIZE {
        return (1..=total).collect();
    }
    let start = if current <= 3 {
        1
    } else if current >= total - 2 {
        total - WINDOW_SIZE + 1
    } else {
        current - 2
    };
    (start..=start + (WINDOW_SIZE - 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_totals_show_everything() {
        assert_eq!(page_window(1, 0), Vec::<u32>::new());
        assert_eq!(page_window(1, 1), vec![1]);
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
        assert_eq!(page_window(5, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_anchored_at_start() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_anchored_at_end() {
        assert_eq!(page_window(8, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_window_centered() {
        assert_eq!(page_window(4, 10), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(7, 10), vec![5, 6, 7, 8, 9]);
        assert_eq!(page_window(4, 6), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_window_always_within_bounds() {
        for total in 0..15u32 {
            for current in 1..=total.max(1) {
                let window = page_window(current, total);
                assert!(window.len() <= WINDOW_SIZE as usize);
                assert!(window.iter().all(|p| *p >= 1 && *p <= total));
                if total > 0 {
                    assert!(window.contains(&current));
                }
            }
        }
    }

    #[test]
    fn test_prev_next_and_visibility() {
        let p = Pagination::new(1, 3, 45);
        assert!(p.is_visible());
        assert!(!p.has_prev());
        assert!(p.has_next());
        assert!(p.contains(3));
        assert!(!p.contains(0));
        assert!(!p.contains(4));

        let single = Pagination::new(1, 1, 7);
        assert!(!single.is_visible());
        assert_eq!(p.prev_page(), 1);
        assert_eq!(p.next_page(), 2);
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let last = Pagination::new(u32::MAX, u32::MAX, u64::MAX);
        assert_eq!(last.next_page(), u32::MAX);
        assert_eq!(last.prev_page(), u32::MAX - 1);
        assert_eq!(last.window(), (u32::MAX - 4..=u32::MAX).collect::<Vec<_>>());
        assert!(last.contains(u32::MAX));
    }
}
