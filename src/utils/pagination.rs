//! # 페이지네이션
//!
//! 관리자 회원 목록의 페이지 계산과 페이지 버튼 윈도우를 제공합니다.
//! 버튼 윈도우는 현재 페이지를 가운데에 두는 최대 5개의 페이지 번호입니다.
//!
//! ```text
//! page=1,  page_count=20 → [1, 2, 3, 4, 5]
//! page=10, page_count=20 → [8, 9, 10, 11, 12]
//! page=20, page_count=20 → [16, 17, 18, 19, 20]
//! ```

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_BUTTON_COUNT: u64 = 5;

/// 페이지 정보 (1부터 시작)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub page_count: u64,
    pub buttons: Vec<u64>,
}

impl Pagination {
    /// 요청 값을 정규화하여 페이지 정보를 계산합니다.
    ///
    /// * `page` - 0 또는 None이면 1, 마지막 페이지보다 크면 마지막 페이지
    /// * `page_size` - None/0이면 10, 100 초과면 100
    pub fn new(page: Option<u64>, page_size: Option<u64>, total: u64) -> Self {
        let page_size = Self::normalize_page_size(page_size);
        let page_count = total.div_ceil(page_size);
        let page = page.unwrap_or(1).clamp(1, page_count.max(1));

        Self {
            page,
            page_size,
            total,
            page_count,
            buttons: button_window(page, page_count, MAX_BUTTON_COUNT),
        }
    }

    pub fn normalize_page_size(page_size: Option<u64>) -> u64 {
        match page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        }
    }

    /// 조회 시 건너뛸 문서 수
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// 현재 페이지를 중심으로 최대 `max_buttons`개의 페이지 번호를 만듭니다.
pub fn button_window(page: u64, page_count: u64, max_buttons: u64) -> Vec<u64> {
    if page_count == 0 || max_buttons == 0 {
        return Vec::new();
    }

    let page = page.clamp(1, page_count);
    let mut begin = page.saturating_sub(max_buttons / 2).max(1);
    let end = (begin + max_buttons - 1).min(page_count);

    if end - begin + 1 < max_buttons {
        begin = end.saturating_sub(max_buttons - 1).max(1);
    }

    (begin..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_limits() {
        let pagination = Pagination::new(None, None, 35);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, 10);
        assert_eq!(pagination.page_count, 4);
        assert_eq!(pagination.offset(), 0);

        assert_eq!(Pagination::new(Some(1), Some(1000), 0).page_size, 100);
        assert_eq!(Pagination::new(Some(1), Some(0), 0).page_size, 10);
    }

    #[test]
    fn test_page_is_clamped_to_last_page() {
        let pagination = Pagination::new(Some(9), Some(10), 35);
        assert_eq!(pagination.page, 4);
        assert_eq!(pagination.offset(), 30);
    }

    #[test]
    fn test_empty_result() {
        let pagination = Pagination::new(Some(3), None, 0);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_count, 0);
        assert!(pagination.buttons.is_empty());
    }

    #[test]
    fn test_button_window_positions() {
        assert_eq!(button_window(1, 20, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(button_window(2, 20, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(button_window(10, 20, 5), vec![8, 9, 10, 11, 12]);
        assert_eq!(button_window(19, 20, 5), vec![16, 17, 18, 19, 20]);
        assert_eq!(button_window(20, 20, 5), vec![16, 17, 18, 19, 20]);
        assert_eq!(button_window(2, 3, 5), vec![1, 2, 3]);
    }

    #[test]
    fn test_button_window_never_exceeds_limit() {
        for page_count in 0..30 {
            for page in 1..=page_count.max(1) {
                let buttons = button_window(page, page_count, MAX_BUTTON_COUNT);
                assert!(buttons.len() as u64 <= MAX_BUTTON_COUNT);
                if page_count > 0 {
                    assert!(buttons.contains(&page));
                }
            }
        }
    }
}
