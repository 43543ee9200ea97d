//! HTTP 요청 핸들러
//!
//! 핸들러는 추출, 서비스 호출, `ApiResult` 래핑만 담당합니다.
//! 에러는 `AppError`로 반환하면 `{code, message, data: null}` 응답으로 변환됩니다.

pub mod access_token;
pub mod members;
pub mod mini_program;

#[cfg(test)]
pub(crate) mod test_support;
