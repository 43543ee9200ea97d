//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 `ServiceLocator`에 등록된 싱글톤이며, 저장소와 캐시는 trait 객체로 주입받습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{auth::MiniProgramService, members::MemberAdminService};
//!
//! let login = MiniProgramService::instance();
//! let admin = MemberAdminService::instance();
//! ```

pub mod auth;
pub mod members;
