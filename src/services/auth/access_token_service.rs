//! 액세스 토큰 발급/갱신/검증 서비스
//!
//! 회원과 로그인 채널(group)마다 현재 토큰 쌍 하나를 캐시에 보관합니다.
//!
//! ```text
//! key   = access_token:{group}:{member_id}
//! value = StoredAccessToken { access_token, refresh_token, expiration_time, member_id }
//! ttl   = refresh token 유효 기간
//! ```
//!
//! * `IssueMode::Reuse` - 저장된 토큰이 아직 유효하면 그대로 반환
//! * `IssueMode::Refresh` - 새 토큰 쌍을 발급하고 이전 쌍을 덮어씀 (이전 토큰은 검증 실패)

use std::any::{Any, TypeId};
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::caching::redis::RedisClient;
use crate::caching::{CacheExt, KeyValueCache};
use crate::config::{AuthClient, JwtSettings};
use crate::core::registry::{ComponentRegistration, ServiceLocator};
use crate::domain::dto::members::MemberResponse;
use crate::domain::dto::tokens::{AccessTokenResponse, TokenVerification};
use crate::domain::entities::members::MemberInfo;
use crate::domain::models::token::{StoredAccessToken, TokenClaims, TokenType};
use crate::errors::errors::{AppError, ErrorContext};
use crate::repositories::members::{MemberRepository, MemberStore};

/// 토큰 발급 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueMode {
    /// 유효한 기존 토큰이 있으면 재사용 (기본)
    Reuse,
    /// 항상 새로 발급
    Refresh,
}

pub struct AccessTokenService {
    cache: Arc<dyn KeyValueCache>,
    members: Arc<dyn MemberStore>,
    settings: JwtSettings,
}

inventory::submit! {
    ComponentRegistration {
        name: "access_token_service",
        type_id: TypeId::of::<AccessTokenService>,
        constructor: || {
            let cache: Arc<dyn KeyValueCache> = ServiceLocator::get::<RedisClient>();
            let members: Arc<dyn MemberStore> = MemberRepository::instance();
            Arc::new(AccessTokenService::new(cache, members, JwtSettings::from_env())) as Arc<dyn Any + Send + Sync>
        },
    }
}

impl AccessTokenService {
    pub fn new(cache: Arc<dyn KeyValueCache>, members: Arc<dyn MemberStore>, settings: JwtSettings) -> Self {
        Self { cache, members, settings }
    }

    pub fn instance() -> Arc<Self> {
        ServiceLocator::get::<Self>()
    }

    fn cache_key(group: AuthClient, member_id: &str) -> String {
        format!("access_token:{}:{}", group.as_str(), member_id)
    }

    /// 회원에게 액세스 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `InternalError` - 회원 ID가 없거나 JWT 서명 실패
    /// * `RedisError` - 캐시 접근 실패
    pub async fn issue(
        &self,
        member: &MemberInfo,
        group: AuthClient,
        mode: IssueMode,
    ) -> Result<AccessTokenResponse, AppError> {
        let member_id = member
            .id_string()
            .ok_or_else(|| AppError::InternalError("회원 ID가 없습니다".to_string()))?;
        let key = Self::cache_key(group, &member_id);
        let now = Utc::now().timestamp();

        if mode == IssueMode::Reuse {
            if let Some(stored) = self.cache.get_json::<StoredAccessToken>(&key).await? {
                if !stored.access_expired_at(now) {
                    return Ok(Self::response(stored, member, now));
                }
            }
        }

        let stored = StoredAccessToken {
            access_token: self.sign(&member_id, group, TokenType::Access, now, self.settings.access_ttl_secs)?,
            refresh_token: self.sign(&member_id, group, TokenType::Refresh, now, self.settings.refresh_ttl_secs)?,
            expiration_time: now + self.settings.access_ttl_secs,
            member_id: member_id.clone(),
        };

        self.cache
            .set_json_with_expiry(&key, &stored, self.settings.refresh_ttl_secs.max(1) as u64)
            .await?;

        log::info!("액세스 토큰 발급: member={}, group={}", member_id, group.as_str());
        Ok(Self::response(stored, member, now))
    }

    /// 리프레시 토큰으로 새 토큰 쌍을 발급합니다. 사용한 리프레시 토큰은 폐기됩니다.
    ///
    /// # Errors
    ///
    /// * `AuthenticationError` - 토큰이 유효하지 않거나, 이미 교체되었거나, 회원이 비활성인 경우
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessTokenResponse, AppError> {
        let claims = self.decode_claims(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AppError::AuthenticationError("refresh token이 아닙니다".to_string()));
        }

        self.current_pair(&claims)
            .await?
            .filter(|stored| constant_time_eq(&stored.refresh_token, refresh_token))
            .ok_or_else(|| AppError::AuthenticationError("이미 사용되었거나 폐기된 토큰입니다".to_string()))?;

        let member_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()))?;

        let member = self
            .members
            .find_member(member_id)
            .await?
            .filter(MemberInfo::is_enabled)
            .ok_or_else(|| AppError::AuthenticationError("사용할 수 없는 회원입니다".to_string()))?;

        self.issue(&member, claims.group, IssueMode::Refresh).await
    }

    /// 액세스 토큰이 유효하고 회원의 현재 토큰인지 확인합니다.
    pub async fn verify(&self, access_token: &str) -> Result<TokenVerification, AppError> {
        let claims = self.decode_claims(access_token)?;
        if claims.token_type != TokenType::Access {
            return Err(AppError::AuthenticationError("access token이 아닙니다".to_string()));
        }

        let stored = self
            .current_pair(&claims)
            .await?
            .filter(|stored| constant_time_eq(&stored.access_token, access_token))
            .ok_or_else(|| AppError::AuthenticationError("폐기된 토큰입니다".to_string()))?;

        Ok(TokenVerification {
            member_id: claims.sub,
            group: claims.group,
            expiration_time: stored.expiration_time,
        })
    }

    /// 회원의 모든 채널 토큰을 폐기합니다.
    pub async fn revoke_member(&self, member_id: &str) -> Result<(), AppError> {
        for group in AuthClient::ALL {
            self.cache.delete(&Self::cache_key(group, member_id)).await?;
        }
        log::info!("회원 토큰 폐기: {}", member_id);
        Ok(())
    }

    /// `Authorization: Bearer <token>` 헤더에서 토큰을 꺼냅니다.
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string()))
    }

    async fn current_pair(&self, claims: &TokenClaims) -> Result<Option<StoredAccessToken>, AppError> {
        self.cache
            .get_json::<StoredAccessToken>(&Self::cache_key(claims.group, &claims.sub))
            .await
    }

    fn sign(
        &self,
        member_id: &str,
        group: AuthClient,
        token_type: TokenType,
        now: i64,
        ttl_secs: i64,
    ) -> Result<String, AppError> {
        let claims = TokenClaims {
            sub: member_id.to_string(),
            group,
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.settings.secret.as_bytes()),
        )
        .context("JWT 토큰 생성 실패")
    }

    fn decode_claims(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.settings.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
            }
            _ => AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()),
        })
    }

    fn response(stored: StoredAccessToken, member: &MemberInfo, now: i64) -> AccessTokenResponse {
        AccessTokenResponse {
            expires_in: (stored.expiration_time - now).max(0),
            expiration_time: stored.expiration_time,
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
            member: MemberResponse::from(member.clone()),
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
