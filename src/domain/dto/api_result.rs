use serde::Serialize;

/// API 응답 래퍼 `{code, message, data}`
///
/// 실패 응답은 `AppError::error_response`가 같은 형태로 만듭니다.
#[derive(Debug, Serialize)]
pub struct ApiResult<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}
