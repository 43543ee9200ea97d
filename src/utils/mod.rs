//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정리, 검증 메시지 추출
//! - [`pagination`] - 페이지 계산과 페이지 버튼 윈도우
//! - [`display_terminal`] - 기동 시 터미널 출력 포맷팅

pub mod string_utils;
pub mod pagination;
pub mod display_terminal;
