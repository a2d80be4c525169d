//! Fixed-size page windows.

/// Rows per page for every paginated listing.
pub const ITEMS_PER_PAGE: u64 = 6;

/// Offset/limit window for one page of a sorted read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Window for a 1-based page number.
    ///
    /// Pages below 1 are clamped to page 1. The offset saturates at
    /// `i64::MAX` so it stays representable by every SQL backend.
    pub fn for_page(page: i64) -> Self {
        let page = page.max(1) as u64;
        let offset = (page - 1)
            .saturating_mul(ITEMS_PER_PAGE)
            .min(i64::MAX as u64);
        Self {
            offset,
            limit: ITEMS_PER_PAGE,
        }
    }

    /// Index range this window covers within a full result.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(total);
        let end = start
            .saturating_add(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .min(total);
        start..end
    }
}

/// Number of pages needed for `total` matching rows.
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(ITEMS_PER_PAGE)
}
