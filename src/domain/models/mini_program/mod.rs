pub mod session;
pub mod user_info;

pub use session::*;
pub use user_info::*;
