use serde::{Deserialize, Serialize};

use crate::config::AuthClient;

/// 토큰 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 회원 ID (ObjectId hex)
    pub sub: String,
    /// 토큰이 발급된 로그인 채널
    pub group: AuthClient,
    pub token_type: TokenType,
    /// 토큰 고유 ID. 같은 초에 발급된 토큰도 서로 다르게 만듭니다.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// 회원/채널별로 캐시에 저장되는 현재 토큰 쌍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAccessToken {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 만료 시각 (unix seconds)
    pub expiration_time: i64,
    pub member_id: String,
}

impl StoredAccessToken {
    pub fn access_expired_at(&self, now: i64) -> bool {
        self.expiration_time <= now
    }
}
