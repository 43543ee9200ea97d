//! 데이터 전송 객체 (Request/Response)

pub mod api_result;
pub mod members;
pub mod mini_program;
pub mod tokens;

pub use api_result::ApiResult;
