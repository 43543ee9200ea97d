//! 회원 인증 게이트웨이
//!
//! 미니프로그램 로그인(코드 교환, 사용자 데이터 복호화)으로 회원을 식별하고
//! 로컬 액세스 토큰을 발급하는 서비스입니다. 관리자용 회원 관리 API를 함께 제공합니다.
//!
//! # Features
//!
//! - **미니프로그램 로그인**: `jscode2session` 교환, rawData 서명 검증, AES-128-CBC 복호화
//! - **회원 연결**: (type, openid) 인증 정보를 회원에 한 번만 연결
//! - **액세스 토큰**: HS256 JWT, 재사용/갱신(rotation)/검증
//! - **관리자 API**: 회원 목록(페이지 버튼 5개), 생성, 수정, 상태 변경, 삭제
//! - **MongoDB**: 회원/인증 정보 저장
//! - **Redis**: 핸드셰이크 토큰과 발급된 토큰 쌍 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api/v1/mini-program, /access-token, /admin/members
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 추출 + ApiResult 래핑
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← MiniProgramService, AccessTokenService, MemberAdminService
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← MemberStore (MongoDB)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │
//! └─────────────────┘
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
