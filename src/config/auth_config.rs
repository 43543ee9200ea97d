//! 인증 관련 설정 관리 모듈
//!
//! 미니프로그램 앱 정보, JWT 액세스 토큰, 관리자 API 키 설정을 환경 변수에서 읽습니다.
//!
//! # Environment Variables
//!
//! ```bash
//! export MINI_PROGRAM_APP_ID="wx1234567890abcdef"
//! export MINI_PROGRAM_SECRET="app-secret"
//! export MINI_PROGRAM_API_BASE="https://api.weixin.qq.com"   # 선택
//! export HANDSHAKE_TTL_SECONDS="7195"                         # 선택
//!
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_ACCESS_EXPIRATION_SECONDS="7200"
//! export JWT_REFRESH_EXPIRATION_DAYS="30"
//!
//! export ADMIN_API_KEY="admin-key"
//! ```

use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::errors::AppError;

/// 핸드셰이크 토큰 기본 유효 시간 (초)
pub const DEFAULT_HANDSHAKE_TTL_SECS: u64 = 7195;

/// 미니프로그램 앱 설정
pub struct MiniProgramConfig;

impl MiniProgramConfig {
    pub fn app_id() -> Result<String, AppError> {
        required("MINI_PROGRAM_APP_ID")
    }

    pub fn secret() -> Result<String, AppError> {
        required("MINI_PROGRAM_SECRET")
    }

    /// 인증 서버 주소 (테스트 시 목 서버로 교체 가능)
    pub fn api_base_uri() -> String {
        env::var("MINI_PROGRAM_API_BASE")
            .map(|uri| uri.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "https://api.weixin.qq.com".to_string())
    }

    pub fn handshake_ttl_secs() -> u64 {
        env::var("HANDSHAKE_TTL_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|ttl: &u64| *ttl > 0)
            .unwrap_or(DEFAULT_HANDSHAKE_TTL_SECS)
    }

    pub fn http_timeout_secs() -> u64 {
        env::var("MINI_PROGRAM_HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(5)
    }
}

/// JWT 설정
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        })
    }

    /// 액세스 토큰 유효 시간 (초, 기본 2시간)
    pub fn access_expiration_secs() -> i64 {
        env::var("JWT_ACCESS_EXPIRATION_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|secs: &i64| *secs > 0)
            .unwrap_or(7200)
    }

    /// 리프레시 토큰 유효 기간 (일, 기본 30일)
    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|days: &i64| *days > 0)
            .unwrap_or(30)
    }
}

/// 관리자 API 설정
pub struct AdminConfig;

impl AdminConfig {
    /// `ADMIN_API_KEY`가 비어 있으면 `None` (관리자 API 전체 거부)
    pub fn api_key() -> Option<String> {
        env::var("ADMIN_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::InternalError(format!("{} must be set", name)))
}

/// 서비스에 주입되는 미니프로그램 설정 스냅샷
#[derive(Debug, Clone)]
pub struct MiniProgramSettings {
    pub app_id: String,
    pub handshake_ttl_secs: u64,
}

impl MiniProgramSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            app_id: MiniProgramConfig::app_id()?,
            handshake_ttl_secs: MiniProgramConfig::handshake_ttl_secs(),
        })
    }
}

/// 서비스에 주입되는 JWT 설정 스냅샷
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl JwtSettings {
    pub fn from_env() -> Self {
        Self {
            secret: JwtConfig::secret(),
            access_ttl_secs: JwtConfig::access_expiration_secs(),
            refresh_ttl_secs: JwtConfig::refresh_expiration_days() * 24 * 60 * 60,
        }
    }
}

/// 외부 인증 클라이언트 종류
///
/// `member_auth.type` 컬럼과 액세스 토큰의 `group` 클레임에 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthClient {
    /// 미니프로그램
    MiniProgram,
}

impl AuthClient {
    /// 회원 토큰 폐기 시 순회하는 전체 채널
    pub const ALL: [AuthClient; 1] = [AuthClient::MiniProgram];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthClient::MiniProgram => "mini_program",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_client_serialization_matches_as_str() {
        for client in AuthClient::ALL {
            let json = serde_json::to_string(&client).unwrap();
            assert_eq!(json, format!("\"{}\"", client.as_str()));

            let back: AuthClient = serde_json::from_str(&json).unwrap();
            assert_eq!(back, client);
        }
    }

    #[test]
    fn test_handshake_ttl_default() {
        if env::var("HANDSHAKE_TTL_SECONDS").is_err() {
            assert_eq!(MiniProgramConfig::handshake_ttl_secs(), 7195);
        }
    }

    #[test]
    fn test_jwt_settings_refresh_ttl_in_seconds() {
        let settings = JwtSettings::from_env();
        assert_eq!(
            settings.refresh_ttl_secs,
            JwtConfig::refresh_expiration_days() * 86_400
        );
    }
}
