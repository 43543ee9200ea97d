//! # Configuration Module
//!
//! 환경 변수 기반 설정을 한 곳에서 관리합니다.
//! `.env.{PROFILE}` 파일은 `main`에서 먼저 로드됩니다.
//!
//! - [`data_config`] - 실행 환경, 서버, 속도 제한, 데이터 저장소, 패스워드 해싱
//! - [`auth_config`] - 미니프로그램 앱, JWT, 관리자 API 키
//!
//! ```rust,ignore
//! use crate::config::{ServerConfig, JwtSettings};
//!
//! let address = ServerConfig::bind_address();
//! let jwt = JwtSettings::from_env();
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
