//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB 영속 객체 (member_info, member_auth)
//! ├── dto       - API 요청/응답 객체
//! └── models    - 인증 서버 세션, 복호화 사용자 정보, JWT 클레임
//! ```

pub mod entities;
pub mod dto;
pub mod models;
