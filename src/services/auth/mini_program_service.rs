//! 미니프로그램 로그인 서비스
//!
//! # 로그인 흐름
//!
//! ```text
//! 1. exchange_code(code)
//!    └─ jscode2session → SessionInfo 캐시 (auth_key, 7195초) → { auth_key }
//!
//! 2. decode_and_login(auth_key, rawData, signature, iv, encryptedData)
//!    ├─ 캐시 조회 (없으면 ExpiredTokenError)
//!    ├─ sha1 서명 검증 (불일치 시 SignatureMismatchError)
//!    ├─ AES-128-CBC 복호화 + watermark.appid 확인
//!    ├─ auth_key 원자적 소비 (GETDEL, 이미 소비되었으면 ExpiredTokenError)
//!    ├─ member_auth upsert (type, openid)
//!    ├─ 연결된 회원이 없으면 생성 후 조건부 연결
//!    ├─ 방문 기록
//!    └─ 액세스 토큰 발급 (재사용)
//!
//! 3. find_token_by_openid(openid)
//!    └─ 연결된 활성 회원이 있으면 토큰 발급, 없으면 NotFound
//! ```
//!
//! 서명이나 복호화에 실패한 요청은 auth_key를 소비하지 않으므로
//! 같은 auth_key로 올바른 요청을 다시 보낼 수 있습니다.

use std::any::{Any, TypeId};
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::RngCore;
use validator::Validate;

use crate::caching::redis::RedisClient;
use crate::caching::{CacheExt, KeyValueCache};
use crate::config::{AuthClient, MiniProgramSettings};
use crate::core::registry::{ComponentRegistration, ServiceLocator};
use crate::domain::dto::mini_program::{MiniProgramLoginRequest, SessionKeyResponse};
use crate::domain::dto::tokens::AccessTokenResponse;
use crate::domain::entities::members::{MemberAuth, MemberInfo};
use crate::domain::models::mini_program::{DecryptedUserInfo, SessionInfo};
use crate::errors::errors::AppError;
use crate::repositories::members::{MemberRepository, MemberStore};
use crate::services::auth::access_token_service::{AccessTokenService, IssueMode};
use crate::services::auth::wechat_client::{MiniProgramApi, WechatClient};
use crate::services::auth::wechat_crypto::{decrypt_user_info, verify_signature};
use crate::utils::string_utils::first_validation_message;

const EXPIRED_AUTH_KEY: &str = "auth_key가 만료되었습니다";
const MEMBER_NOT_FOUND: &str = "사용자 정보를 찾을 수 없습니다";

pub struct MiniProgramService {
    api: Arc<dyn MiniProgramApi>,
    cache: Arc<dyn KeyValueCache>,
    members: Arc<dyn MemberStore>,
    tokens: Arc<AccessTokenService>,
    settings: MiniProgramSettings,
}

inventory::submit! {
    ComponentRegistration {
        name: "mini_program_service",
        type_id: TypeId::of::<MiniProgramService>,
        constructor: || {
            let (api, settings) = match (WechatClient::from_env(), MiniProgramSettings::from_env()) {
                (Ok(api), Ok(settings)) => (api, settings),
                (Err(e), _) | (_, Err(e)) => panic!("미니프로그램 설정 오류: {}", e),
            };
            let api: Arc<dyn MiniProgramApi> = Arc::new(api);
            let cache: Arc<dyn KeyValueCache> = ServiceLocator::get::<RedisClient>();
            let members: Arc<dyn MemberStore> = MemberRepository::instance();

            Arc::new(MiniProgramService::new(api, cache, members, AccessTokenService::instance(), settings))
                as Arc<dyn Any + Send + Sync>
        },
    }
}

impl MiniProgramService {
    pub fn new(
        api: Arc<dyn MiniProgramApi>,
        cache: Arc<dyn KeyValueCache>,
        members: Arc<dyn MemberStore>,
        tokens: Arc<AccessTokenService>,
        settings: MiniProgramSettings,
    ) -> Self {
        Self { api, cache, members, tokens, settings }
    }

    pub fn instance() -> Arc<Self> {
        ServiceLocator::get::<Self>()
    }

    /// 로그인 코드를 세션으로 교환하고 핸드셰이크 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - code가 비어 있음
    /// * `UpstreamError` - 인증 서버 에러 응답 또는 통신 실패
    pub async fn exchange_code(&self, code: &str) -> Result<SessionKeyResponse, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::ValidationError(
                "통신 오류입니다. 미니프로그램에서 다시 요청해주세요".to_string(),
            ));
        }

        let session = self.api.code_to_session(code).await?;
        let auth_key = generate_auth_key();

        self.cache
            .set_json_with_expiry(&auth_key, &session, self.settings.handshake_ttl_secs)
            .await?;

        log::debug!("핸드셰이크 토큰 발급: openid={}", session.open_id);
        Ok(SessionKeyResponse { auth_key })
    }

    /// 암호화된 사용자 정보를 검증/복호화하고 로그인 처리합니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 필수 필드 누락 (첫 번째 필드 메시지)
    /// * `ExpiredTokenError` - auth_key가 없거나 만료 또는 이미 사용됨
    /// * `SignatureMismatchError` - 서명 불일치
    /// * `DecryptionError` - 복호화 실패 또는 다른 앱의 데이터
    pub async fn decode_and_login(
        &self,
        request: &MiniProgramLoginRequest,
        client_ip: Option<&str>,
    ) -> Result<AccessTokenResponse, AppError> {
        request.validate().map_err(|errors| {
            AppError::ValidationError(first_validation_message(&errors, &MiniProgramLoginRequest::FIELD_ORDER))
        })?;

        let auth_key = request.auth_key.trim();

        let session: SessionInfo = self
            .cache
            .get_json(auth_key)
            .await?
            .ok_or_else(|| AppError::ExpiredTokenError(EXPIRED_AUTH_KEY.to_string()))?;

        if !verify_signature(&request.raw_data, &session.session_key, &request.signature) {
            log::warn!("rawData 서명 불일치: openid={}", session.open_id);
            return Err(AppError::SignatureMismatchError("서명 오류".to_string()));
        }

        let user_info = decrypt_user_info(&session.session_key, &request.iv, &request.encrypted_data)?;
        self.check_watermark(&user_info)?;

        // 동시에 같은 auth_key로 들어온 요청 중 하나만 통과
        self.cache
            .take_json::<SessionInfo>(auth_key)
            .await?
            .ok_or_else(|| AppError::ExpiredTokenError(EXPIRED_AUTH_KEY.to_string()))?;

        let mut snapshot = user_info.auth_snapshot();
        if snapshot.unionid.is_empty() {
            snapshot.unionid = session.union_id.clone().unwrap_or_default();
        }

        let auth = self
            .members
            .upsert_auth(AuthClient::MiniProgram, &user_info.open_id, &snapshot)
            .await?;

        let member = self.resolve_member(&auth, &user_info).await?;
        let member = self.record_visit(member, client_ip).await?;

        self.tokens.issue(&member, AuthClient::MiniProgram, IssueMode::Reuse).await
    }

    /// openid로 기존 회원의 액세스 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 인증 정보가 없거나, 회원이 연결되지 않았거나, 삭제된 회원
    pub async fn find_token_by_openid(
        &self,
        openid: &str,
        client_ip: Option<&str>,
    ) -> Result<AccessTokenResponse, AppError> {
        let openid = openid.trim();
        if openid.is_empty() {
            return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
        }

        let member_id = self
            .members
            .find_auth(AuthClient::MiniProgram, openid)
            .await?
            .and_then(|auth| auth.member_id)
            .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

        let member = self
            .members
            .find_member(member_id)
            .await?
            .filter(|member| !member.is_deleted())
            .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

        let member = self.record_visit(member, client_ip).await?;

        self.tokens.issue(&member, AuthClient::MiniProgram, IssueMode::Reuse).await
    }

    fn check_watermark(&self, user_info: &DecryptedUserInfo) -> Result<(), AppError> {
        match &user_info.watermark {
            Some(watermark) if watermark.appid != self.settings.app_id => {
                log::warn!("다른 앱의 암호화 데이터: appid={}", watermark.appid);
                Err(AppError::DecryptionError("다른 앱에서 발급된 데이터입니다".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// 연결된 회원을 찾거나, 없으면 새로 만들어 연결합니다.
    ///
    /// * 삭제된 회원에 연결되어 있으면 `NotFound`. 관리자 삭제는 재로그인으로 되돌려지지 않습니다.
    /// * 연결된 회원 문서가 없으면 새 회원을 만들고 그 ID가 그대로일 때만 교체합니다.
    /// * 연결이 비어 있으면 `member_id`가 비어 있을 때만 연결합니다.
    ///
    /// 다른 요청이 먼저 연결했다면 방금 만든 회원을 지우고 먼저 연결된 회원을 사용합니다.
    async fn resolve_member(&self, auth: &MemberAuth, user_info: &DecryptedUserInfo) -> Result<MemberInfo, AppError> {
        if let Some(member_id) = auth.member_id {
            match self.members.find_member(member_id).await? {
                Some(member) if member.is_deleted() => {
                    log::info!("삭제된 회원의 로그인 시도: member_id={}", member_id);
                    return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
                }
                Some(member) => return Ok(member),
                None => log::warn!("연결된 회원 문서가 없습니다: member_id={}", member_id),
            }
        }

        let auth_id = auth
            .id
            .ok_or_else(|| AppError::InternalError("인증 정보 ID가 없습니다".to_string()))?;

        let created = self
            .members
            .create_member(MemberInfo::new(user_info.member_profile()))
            .await?;
        let created_id = created
            .id
            .ok_or_else(|| AppError::InternalError("생성된 회원 ID가 없습니다".to_string()))?;

        let linked = match auth.member_id {
            None => self.members.link_member(auth_id, created_id).await?,
            Some(stale_id) => self.members.relink_member(auth_id, stale_id, created_id).await?,
        };

        if linked {
            log::info!("신규 회원 생성 및 연결: member_id={}", created_id);
            return Ok(created);
        }

        self.members.remove_member(created_id).await?;

        let winner_id = self
            .members
            .find_auth(auth.client, &auth.openid)
            .await?
            .and_then(|auth| auth.member_id)
            .ok_or_else(|| AppError::InternalError("회원 연결 상태를 확인할 수 없습니다".to_string()))?;

        self.members
            .find_member(winner_id)
            .await?
            .filter(|member| !member.is_deleted())
            .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))
    }

    async fn record_visit(&self, member: MemberInfo, client_ip: Option<&str>) -> Result<MemberInfo, AppError> {
        let Some(member_id) = member.id else {
            return Ok(member);
        };

        Ok(self.members.record_visit(member_id, client_ip).await?.unwrap_or(member))
    }
}

/// `<32자 url-safe 랜덤 문자열>_<unix seconds>` 형태의 핸드셰이크 토큰
pub fn generate_auth_key() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);

    format!("{}_{}", URL_SAFE_NO_PAD.encode(bytes), Utc::now().timestamp())
}
