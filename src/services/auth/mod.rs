//! 인증 서비스 모듈
//!
//! 미니프로그램 로그인(코드 교환, 사용자 데이터 복호화)과
//! 로컬 액세스 토큰(발급, 갱신, 검증)을 담당합니다.
//!
//! # Security
//!
//! - rawData 서명은 SHA-1, 사용자 데이터는 AES-128-CBC
//! - 서명/토큰 비교는 상수 시간
//! - 핸드셰이크 토큰은 GETDEL로 한 번만 소비
//! - 액세스 토큰은 HMAC-SHA256 JWT, 회원/채널당 현재 토큰 한 쌍만 유효

pub mod access_token_service;
pub mod mini_program_service;
pub mod wechat_client;
pub mod wechat_crypto;

pub use access_token_service::{AccessTokenService, IssueMode};
pub use mini_program_service::MiniProgramService;
pub use wechat_client::{MiniProgramApi, WechatClient};
