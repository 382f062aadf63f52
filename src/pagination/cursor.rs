/// Configuration for paginated requests
#[derive(Debug, Clone, Default)]
pub struct PaginationConfig {
    pub max_pages: Option<usize>,
}

impl PaginationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }
}

/// Tracks the next page to request. Pages are 1-based.
#[derive(Debug)]
pub struct PageCursor {
    config: PaginationConfig,
    page: usize,
    fetched: usize,
}

impl PageCursor {
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            config,
            page: 1,
            fetched: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    pub fn has_reached_max(&self) -> bool {
        self.config.max_pages.is_some_and(|max| self.fetched >= max)
    }

    pub fn advance(&mut self) {
        self.page += 1;
        self.fetched += 1;
    }
}

/// Appends a `page` query parameter, respecting any existing query string
pub fn build_paginated_url(base: &str, page: usize) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base, separator, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_paginated_url() {
        assert_eq!(build_paginated_url("http://host/api/events", 1), "http://host/api/events?page=1");
        assert_eq!(build_paginated_url("http://host/events?city=vegas", 3), "http://host/events?city=vegas&page=3");
    }

    #[test]
    fn test_cursor_stops_at_max_pages() {
        let mut cursor = PageCursor::new(PaginationConfig::new().with_max_pages(2));
        assert_eq!(cursor.current_page(), 1);

        cursor.advance();
        assert!(!cursor.has_reached_max());
        cursor.advance();
        assert!(cursor.has_reached_max());
        assert_eq!(cursor.current_page(), 3);
    }

    #[test]
    fn test_unbounded_cursor() {
        let mut cursor = PageCursor::new(PaginationConfig::default());
        for _ in 0..100 {
            cursor.advance();
        }
        assert!(!cursor.has_reached_max());
        assert_eq!(cursor.pages_fetched(), 100);
    }
}
