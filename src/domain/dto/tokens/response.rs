use serde::Serialize;

use crate::config::AuthClient;
use crate::domain::dto::members::MemberResponse;

/// 로그인/갱신 결과로 내려가는 액세스 토큰
#[derive(Debug, Clone, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 만료 시각 (unix seconds)
    pub expiration_time: i64,
    /// 남은 유효 시간 (초)
    pub expires_in: i64,
    pub member: MemberResponse,
}

/// 액세스 토큰 검증 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenVerification {
    pub member_id: String,
    pub group: AuthClient,
    pub expiration_time: i64,
}
