//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 회원 인증 게이트웨이를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 응답(`{code, message, data}`)을 제공합니다.
//!
//! ## 상태 코드 매핑
//!
//! | 에러 | HTTP 상태 |
//! |------|-----------|
//! | 검증/업스트림/만료/서명/미존재/복호화/충돌 | 422 Unprocessable Entity |
//! | 인증 실패 | 401 Unauthorized |
//! | 권한 부족 | 403 Forbidden |
//! | DB/Redis/내부 오류 | 500 Internal Server Error |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn session_key(code: &str) -> Result<String, AppError> {
//!     if code.trim().is_empty() {
//!         return Err(AppError::ValidationError("code가 필요합니다".to_string()));
//!     }
//!     Ok(code.to_string())
//! }
//! ```

use actix_web::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 게이트웨이에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 입력값 누락 또는 형식 오류
    #[error("{0}")]
    ValidationError(String),

    /// 외부 인증 공급자가 에러 응답을 돌려준 경우
    #[error("{0}")]
    UpstreamError(String),

    /// 핸드셰이크 토큰(auth_key)이 없거나 만료된 경우
    #[error("{0}")]
    ExpiredTokenError(String),

    /// rawData 서명이 일치하지 않는 경우 (변조/재전송)
    #[error("{0}")]
    SignatureMismatchError(String),

    /// 연결된 계정 또는 리소스를 찾을 수 없는 경우
    #[error("{0}")]
    NotFound(String),

    /// 암호화 페이로드를 복호화할 수 없는 경우
    #[error("{0}")]
    DecryptionError(String),

    /// 충돌/중복 에러
    #[error("{0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    code: u16,
    message: String,
    data: Option<()>,
}

impl AppError {
    /// 클라이언트에게 노출할 메시지
    ///
    /// 인프라 에러의 상세 내용은 로그로만 남기고 일반 메시지를 반환합니다.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                "서버 내부 오류가 발생했습니다".to_string()
            }
            AppError::AuthenticationError(msg) | AppError::AuthorizationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::UpstreamError(_)
            | AppError::ExpiredTokenError(_)
            | AppError::SignatureMismatchError(_)
            | AppError::NotFound(_)
            | AppError::DecryptionError(_)
            | AppError::ConflictError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 모든 에러는 `{code, message, data: null}` 형태로 내려가며
    /// `code`는 HTTP 상태 코드와 동일합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("요청 처리 실패: {}", self);
        } else {
            log::debug!("요청 거부 ({}): {}", status.as_u16(), self);
        }

        actix_web::HttpResponse::build(status).json(ErrorEnvelope {
            code: status.as_u16(),
            message: self.public_message(),
            data: None,
        })
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
