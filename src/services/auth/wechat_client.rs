//! 미니프로그램 인증 서버 클라이언트
//!
//! 일회용 로그인 코드를 `jscode2session` API로 교환하여 `session_key`와 `openid`를 받습니다.
//!
//! ```text
//! GET {base}/sns/jscode2session?appid=APPID&secret=SECRET&js_code=CODE&grant_type=authorization_code
//!
//! 성공: {"openid": "...", "session_key": "...", "unionid": "..."}
//! 실패: {"errcode": 40029, "errmsg": "invalid code"}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::MiniProgramConfig;
use crate::domain::models::mini_program::SessionInfo;
use crate::errors::errors::{AppError, ErrorContext};

/// 코드 교환 API 추상화 (테스트에서 가짜 구현으로 교체)
#[async_trait]
pub trait MiniProgramApi: Send + Sync {
    async fn code_to_session(&self, code: &str) -> Result<SessionInfo, AppError>;
}

#[derive(Debug, Deserialize)]
struct Code2SessionResponse {
    #[serde(default)]
    openid: Option<String>,
    #[serde(default)]
    session_key: Option<String>,
    #[serde(default)]
    unionid: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: Option<String>,
}

/// reqwest 기반 인증 서버 클라이언트
pub struct WechatClient {
    http: reqwest::Client,
    base_uri: String,
    app_id: String,
    secret: String,
}

impl WechatClient {
    pub fn new(base_uri: String, app_id: String, secret: String, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        Ok(Self { http, base_uri, app_id, secret })
    }

    /// 환경 변수로 클라이언트를 생성합니다.
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(
            MiniProgramConfig::api_base_uri(),
            MiniProgramConfig::app_id()?,
            MiniProgramConfig::secret()?,
            Duration::from_secs(MiniProgramConfig::http_timeout_secs()),
        )
    }
}

#[async_trait]
impl MiniProgramApi for WechatClient {
    async fn code_to_session(&self, code: &str) -> Result<SessionInfo, AppError> {
        let url = format!("{}/sns/jscode2session", self.base_uri);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("secret", self.secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("인증 서버 요청 실패: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamError(format!("인증 서버 응답 읽기 실패: {}", e)))?;

        if !status.is_success() {
            log::warn!("jscode2session HTTP {}: {}", status, body);
            return Err(AppError::UpstreamError(format!("인증 서버 오류 (HTTP {})", status.as_u16())));
        }

        parse_session_response(&body)
    }
}

/// `jscode2session` 응답 본문을 해석합니다.
///
/// 인증 서버는 에러도 HTTP 200으로 응답하므로 `errcode`로 판단합니다.
pub fn parse_session_response(body: &str) -> Result<SessionInfo, AppError> {
    let response: Code2SessionResponse = serde_json::from_str(body)
        .map_err(|e| AppError::UpstreamError(format!("인증 서버 응답 형식 오류: {}", e)))?;

    if response.errcode != 0 {
        let message = response.errmsg.unwrap_or_else(|| "unknown error".to_string());
        log::info!("jscode2session 실패: errcode={}, errmsg={}", response.errcode, message);
        return Err(AppError::UpstreamError(format!("{} ({})", message, response.errcode)));
    }

    match (response.session_key, response.openid) {
        (Some(session_key), Some(open_id)) if !session_key.is_empty() && !open_id.is_empty() => {
            Ok(SessionInfo {
                session_key,
                open_id,
                union_id: response.unionid.filter(|id| !id.is_empty()),
            })
        }
        _ => Err(AppError::UpstreamError(
            "인증 서버 응답에 session_key 또는 openid가 없습니다".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"openid":"o-1","session_key":"tiihtNczf5v6AKRyjwEUhQ==","unionid":"u-1"}"#;
        let session = parse_session_response(body).unwrap();

        assert_eq!(session.open_id, "o-1");
        assert_eq!(session.session_key, "tiihtNczf5v6AKRyjwEUhQ==");
        assert_eq!(session.union_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_parse_success_without_unionid() {
        let body = r#"{"openid":"o-1","session_key":"k","errcode":0,"errmsg":"ok"}"#;
        let session = parse_session_response(body).unwrap();

        assert_eq!(session.union_id, None);
    }

    #[test]
    fn test_parse_error_envelope() {
        let body = r#"{"errcode":40029,"errmsg":"invalid code"}"#;

        match parse_session_response(body) {
            Err(AppError::UpstreamError(message)) => {
                assert!(message.contains("invalid code"));
                assert!(message.contains("40029"));
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_session_response("<html>"),
            Err(AppError::UpstreamError(_))
        ));
        assert!(matches!(
            parse_session_response(r#"{"openid":"o-1"}"#),
            Err(AppError::UpstreamError(_))
        ));
    }
}
