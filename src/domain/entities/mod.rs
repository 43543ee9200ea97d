//! 영속 엔티티
//!
//! - [`members::MemberInfo`] - `member_info` 컬렉션
//! - [`members::MemberAuth`] - `member_auth` 컬렉션

pub mod members;
