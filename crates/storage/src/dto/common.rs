use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be between 1 and {MAX_PAGE_SIZE}"));
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(params: PaginationParams, total_items: i64) -> Self {
        let page_size = i64::from(params.page_size.max(1));
        let total_pages = ((total_items.max(0) + page_size - 1) / page_size) as u32;
        Self {
            page: params.page,
            page_size: params.page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: PaginationParams, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(params, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_offset() {
        let params = PaginationParams::new(Some(3), None);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 100);
        assert_eq!(params.limit(), 50);
    }

    #[test]
    fn test_rejects_oversized_pages() {
        assert!(PaginationParams::new(Some(1), Some(101)).validate().is_err());
        assert!(PaginationParams::new(Some(0), Some(10)).validate().is_err());
        assert!(PaginationParams::new(Some(2), Some(100)).validate().is_ok());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let meta = PaginationMeta::new(PaginationParams::new(Some(1), Some(10)), 21);
        assert_eq!(meta.total_pages, 3);

        let empty = PaginationMeta::new(PaginationParams::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }
}
