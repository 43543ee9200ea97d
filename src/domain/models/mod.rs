//! 외부 시스템 통합 모델
//!
//! - [`mini_program`] - 인증 서버 세션 정보와 복호화된 사용자 정보
//! - [`token`] - JWT 클레임과 캐시에 저장되는 토큰 쌍

pub mod mini_program;
pub mod token;
