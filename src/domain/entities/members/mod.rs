pub mod member_info;
pub mod member_auth;

pub use member_info::*;
pub use member_auth::*;
