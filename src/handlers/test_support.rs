//! 핸들러 테스트용 서비스 구성
//!
//! `ServiceLocator`는 프로세스 전역이므로 인메모리 구현으로 한 번만 등록하고
//! 모든 핸들러 테스트가 공유합니다. 테스트끼리 겹치지 않도록 code/openid를 다르게 씁니다.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::caching::memory::MemoryCache;
use crate::config::{JwtSettings, MiniProgramSettings};
use crate::core::registry::ServiceLocator;
use crate::domain::models::mini_program::SessionInfo;
use crate::errors::errors::AppError;
use crate::repositories::members::memory::InMemoryMemberStore;
use crate::services::auth::wechat_crypto::{encrypt_for_test, sign_raw_data};
use crate::services::auth::{AccessTokenService, MiniProgramApi, MiniProgramService};
use crate::services::members::MemberAdminService;

pub const APP_ID: &str = "wx-handler-test";
pub const ADMIN_KEY: &str = "handler-admin-key";
pub const SESSION_KEY: &str = "tiihtNczf5v6AKRyjwEUhQ==";
pub const IV: &str = "r7BXXKkLb8qrSNn05n0qiA==";

/// `code-<suffix>` → openid `o-<suffix>`
struct PrefixApi;

#[async_trait]
impl MiniProgramApi for PrefixApi {
    async fn code_to_session(&self, code: &str) -> Result<SessionInfo, AppError> {
        let suffix = code
            .strip_prefix("code-")
            .ok_or_else(|| AppError::UpstreamError("invalid code (40029)".to_string()))?;

        Ok(SessionInfo {
            session_key: SESSION_KEY.to_string(),
            open_id: format!("o-{}", suffix),
            union_id: None,
        })
    }
}

static INSTALLED: Lazy<()> = Lazy::new(|| {
    let cache = Arc::new(MemoryCache::new());
    let store = Arc::new(InMemoryMemberStore::new());

    let tokens = Arc::new(AccessTokenService::new(
        cache.clone(),
        store.clone(),
        JwtSettings {
            secret: "handler-test-secret".to_string(),
            access_ttl_secs: 7200,
            refresh_ttl_secs: 86_400,
        },
    ));
    let mini_program = Arc::new(MiniProgramService::new(
        Arc::new(PrefixApi),
        cache.clone(),
        store.clone(),
        tokens.clone(),
        MiniProgramSettings {
            app_id: APP_ID.to_string(),
            handshake_ttl_secs: 7195,
        },
    ));
    let admin = Arc::new(MemberAdminService::new(store.clone(), tokens.clone(), 4));

    ServiceLocator::set(tokens);
    ServiceLocator::set(mini_program);
    ServiceLocator::set(admin);
});

pub fn install() {
    Lazy::force(&INSTALLED);
}

/// 클라이언트가 보내는 decode 요청 본문 (JSON)
pub fn decode_body(auth_key: &str, open_id: &str, nickname: &str) -> serde_json::Value {
    let raw_data = format!(r#"{{"nickName":"{}","gender":1}}"#, nickname);
    let plaintext = format!(
        r#"{{"openId":"{}","nickName":"{}","gender":1,"watermark":{{"appid":"{}","timestamp":1}}}}"#,
        open_id, nickname, APP_ID
    );

    serde_json::json!({
        "auth_key": auth_key,
        "signature": sign_raw_data(&raw_data, SESSION_KEY),
        "rawData": raw_data,
        "iv": IV,
        "encryptedData": encrypt_for_test(SESSION_KEY, IV, &plaintext),
    })
}
