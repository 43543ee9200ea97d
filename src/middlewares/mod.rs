//! HTTP 미들웨어

pub mod admin_middleware;
mod admin_inner;

pub use admin_middleware::{ADMIN_KEY_HEADER, AdminGuard};
