//! Page-number pagination

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

/// Resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Resolve raw query values. A missing or unusable `page_size` falls back
    /// to the default and anything above the maximum is clamped; an unusable
    /// `page` is an invalid page.
    pub fn resolve(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> AppResult<Self> {
        let page_size = page_size
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(config.max_page_size))
            .unwrap_or(config.default_page_size);

        let page = match page {
            None => 1,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(invalid_page)?,
        };

        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Number of pages for `total` rows. An empty result still has one page.
    pub fn num_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.page_size - 1) / self.page_size
        }
    }

    pub fn ensure_within(&self, total: i64) -> AppResult<()> {
        if self.page > self.num_pages(total) {
            return Err(invalid_page());
        }
        Ok(())
    }

    pub fn has_next(&self, total: i64) -> bool {
        self.page < self.num_pages(total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

fn invalid_page() -> AppError {
    AppError::NotFound("Invalid page.".to_string())
}
