//! 회원 데이터 액세스 계층
//!
//! ```rust,ignore
//! use crate::repositories::members::{MemberRepository, MemberStore};
//!
//! let repo = MemberRepository::instance();
//! let auth = repo.find_auth(AuthClient::MiniProgram, "openid").await?;
//! ```

pub mod member_store;
pub mod member_repo;
#[cfg(test)]
pub mod memory;

pub use member_store::{MemberListFilter, MemberStore};
pub use member_repo::MemberRepository;
