pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// 1-based page request for the history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// If either value fails to parse, both fall back to the defaults.
    /// Otherwise page is at least 1 and page_size is kept within 1..=100.
    pub fn from_params(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: usize| match raw {
            Some(s) => s.trim().parse::<i64>().ok(),
            None => Some(default as i64),
        };

        match (
            parse(page, DEFAULT_PAGE),
            parse(page_size, DEFAULT_PAGE_SIZE),
        ) {
            (Some(page), Some(page_size)) => Self {
                page: page.max(1) as usize,
                page_size: page_size.clamp(1, MAX_PAGE_SIZE as i64) as usize,
            },
            _ => Self::default(),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.offset().saturating_add(self.page_size) < total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
