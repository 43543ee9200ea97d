//! # 관리자 회원 관리 서비스
//!
//! 회원 목록 조회와 회원 정보 변경을 담당합니다.
//!
//! ```text
//! list ─── count_members ─► Pagination::new ─► list_members(offset, limit)
//! create ─ 프로필 검증 ─► (계정 중복 확인 + bcrypt) ─► create_member
//! status ─ set_status ─► 비활성/삭제 시 액세스 토큰 폐기
//! ```
//!
//! 삭제는 `status = -1`로 표시만 하며, 삭제된 회원은 모든 조회/변경에서 없는 회원으로 취급합니다.
//! 계정(username)은 삭제되지 않은 회원 사이에서만 유일합니다.

use std::any::{Any, TypeId};
use std::sync::Arc;

use bcrypt::hash;
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::config::PasswordConfig;
use crate::core::registry::{ComponentRegistration, ServiceLocator};
use crate::domain::dto::members::{
    CreateMemberRequest, MemberListQuery, MemberListResponse, MemberProfileRequest, MemberResponse,
    UpdateCredentialsRequest, UpdateStatusRequest,
};
use crate::domain::entities::members::{MemberInfo, STATUS_DELETED, STATUS_ENABLED};
use crate::errors::errors::AppError;
use crate::repositories::members::{MemberListFilter, MemberRepository, MemberStore};
use crate::services::auth::AccessTokenService;
use crate::utils::pagination::Pagination;
use crate::utils::string_utils::first_validation_message;

const PROFILE_FIELD_ORDER: [&str; 6] = ["realname", "nickname", "head_portrait", "sex", "mobile_phone", "email"];
const CREDENTIAL_FIELD_ORDER: [&str; 2] = ["username", "password"];

pub struct MemberAdminService {
    members: Arc<dyn MemberStore>,
    tokens: Arc<AccessTokenService>,
    bcrypt_cost: u32,
}

inventory::submit! {
    ComponentRegistration {
        name: "member_admin_service",
        type_id: TypeId::of::<MemberAdminService>,
        constructor: || {
            let members: Arc<dyn MemberStore> = MemberRepository::instance();

            Arc::new(MemberAdminService::new(
                members,
                AccessTokenService::instance(),
                PasswordConfig::bcrypt_cost(),
            )) as Arc<dyn Any + Send + Sync>
        },
    }
}

impl MemberAdminService {
    pub fn new(members: Arc<dyn MemberStore>, tokens: Arc<AccessTokenService>, bcrypt_cost: u32) -> Self {
        Self { members, tokens, bcrypt_cost }
    }

    pub fn instance() -> Arc<Self> {
        ServiceLocator::get::<Self>()
    }

    /// 삭제되지 않은 회원을 최신순으로 조회합니다.
    ///
    /// 요청 페이지가 마지막 페이지를 넘으면 마지막 페이지를 반환합니다.
    pub async fn list(&self, query: MemberListQuery) -> Result<MemberListResponse, AppError> {
        let keyword = query.keyword;

        let total = self.members.count_members(keyword.as_deref()).await?;
        let pagination = Pagination::new(query.page, query.page_size, total);

        let items = if total == 0 {
            Vec::new()
        } else {
            let filter = MemberListFilter {
                keyword,
                offset: pagination.offset(),
                limit: pagination.page_size,
            };
            self.members.list_members(&filter).await?
        };

        Ok(MemberListResponse {
            items: items.into_iter().map(MemberResponse::from).collect(),
            pagination,
        })
    }

    pub async fn get(&self, id: &str) -> Result<MemberResponse, AppError> {
        let id = parse_member_id(id)?;
        self.find_active(id).await.map(MemberResponse::from)
    }

    /// 회원을 생성합니다. 계정과 비밀번호는 둘 다 주거나 둘 다 생략해야 합니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 입력값 오류 또는 계정/비밀번호 중 하나만 주어짐
    /// * `ConflictError` - 이미 사용 중인 계정
    pub async fn create(&self, request: CreateMemberRequest) -> Result<MemberResponse, AppError> {
        validate(&request.profile, &PROFILE_FIELD_ORDER)?;
        validate(&request, &CREDENTIAL_FIELD_ORDER)?;

        let mut member = MemberInfo::new(request.profile.into());

        match (request.username, request.password) {
            (Some(username), Some(password)) => {
                self.ensure_username_available(&username, None).await?;
                member.password_hash = Some(self.hash_password(&password)?);
                member.username = Some(username);
            }
            (None, None) => {}
            (Some(_), None) => return Err(AppError::ValidationError("비밀번호가 필요합니다".to_string())),
            (None, Some(_)) => return Err(AppError::ValidationError("계정이 필요합니다".to_string())),
        }

        let created = self.members.create_member(member).await?;
        log::info!("관리자 회원 생성: {}", created.id_string().unwrap_or_default());

        Ok(created.into())
    }

    pub async fn update(&self, id: &str, request: MemberProfileRequest) -> Result<MemberResponse, AppError> {
        let id = parse_member_id(id)?;
        validate(&request, &PROFILE_FIELD_ORDER)?;

        self.members
            .update_profile(id, &request.into())
            .await?
            .map(MemberResponse::from)
            .ok_or_else(member_not_found)
    }

    /// 계정과 비밀번호를 변경합니다. 본인이 이미 쓰는 계정은 그대로 둘 수 있습니다.
    pub async fn update_credentials(
        &self,
        id: &str,
        request: UpdateCredentialsRequest,
    ) -> Result<MemberResponse, AppError> {
        let id = parse_member_id(id)?;
        validate(&request, &CREDENTIAL_FIELD_ORDER)?;

        self.find_active(id).await?;
        self.ensure_username_available(&request.username, Some(id)).await?;

        let password_hash = self.hash_password(&request.password)?;

        self.members
            .update_credentials(id, &request.username, &password_hash)
            .await?
            .map(MemberResponse::from)
            .ok_or_else(member_not_found)
    }

    /// 활성(1)/비활성(0) 전환. 비활성화하면 발급된 액세스 토큰을 폐기합니다.
    pub async fn set_status(&self, id: &str, request: UpdateStatusRequest) -> Result<MemberResponse, AppError> {
        let id = parse_member_id(id)?;
        validate(&request, &["status"])?;

        let member = self
            .members
            .set_status(id, request.status)
            .await?
            .ok_or_else(member_not_found)?;

        if request.status != STATUS_ENABLED {
            self.tokens.revoke_member(&id.to_hex()).await?;
        }

        Ok(member.into())
    }

    /// 회원을 삭제 상태로 표시하고 토큰을 폐기합니다.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = parse_member_id(id)?;

        self.members
            .set_status(id, STATUS_DELETED)
            .await?
            .ok_or_else(member_not_found)?;

        self.tokens.revoke_member(&id.to_hex()).await?;
        log::info!("회원 삭제: {}", id);

        Ok(())
    }

    async fn find_active(&self, id: ObjectId) -> Result<MemberInfo, AppError> {
        self.members
            .find_member(id)
            .await?
            .filter(|member| !member.is_deleted())
            .ok_or_else(member_not_found)
    }

    async fn ensure_username_available(&self, username: &str, owner: Option<ObjectId>) -> Result<(), AppError> {
        match self.members.find_member_by_username(username).await? {
            Some(existing) if existing.id != owner => {
                Err(AppError::ConflictError(format!("이미 사용 중인 계정입니다: {}", username)))
            }
            _ => Ok(()),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let started = std::time::Instant::now();
        let password_hash = hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        log::debug!("Password hashing took: {:?}", started.elapsed());
        Ok(password_hash)
    }
}

fn parse_member_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim()).map_err(|_| AppError::ValidationError("잘못된 회원 ID 형식입니다".to_string()))
}

fn member_not_found() -> AppError {
    AppError::NotFound("회원을 찾을 수 없습니다".to_string())
}

fn validate<T: Validate>(request: &T, field_order: &[&str]) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|errors| AppError::ValidationError(first_validation_message(&errors, field_order)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::caching::memory::MemoryCache;
    use crate::config::{AuthClient, JwtSettings};
    use crate::domain::entities::members::{MemberProfileFields, STATUS_DISABLED};
    use crate::repositories::members::memory::InMemoryMemberStore;
    use crate::services::auth::IssueMode;

    struct Fixture {
        service: MemberAdminService,
        store: Arc<InMemoryMemberStore>,
        tokens: Arc<AccessTokenService>,
    }

    fn fixture() -> Fixture {
        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(InMemoryMemberStore::new());
        let tokens = Arc::new(AccessTokenService::new(
            cache,
            store.clone(),
            JwtSettings {
                secret: "test-secret".to_string(),
                access_ttl_secs: 7200,
                refresh_ttl_secs: 86_400,
            },
        ));

        Fixture {
            service: MemberAdminService::new(store.clone(), tokens.clone(), 4),
            store,
            tokens,
        }
    }

    fn create_request(nickname: &str, username: Option<&str>, password: Option<&str>) -> CreateMemberRequest {
        CreateMemberRequest {
            profile: MemberProfileRequest {
                nickname: nickname.to_string(),
                ..Default::default()
            },
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    async fn seed(store: &InMemoryMemberStore, nickname: &str) -> MemberInfo {
        store
            .create_member(MemberInfo::new(MemberProfileFields {
                nickname: nickname.to_string(),
                ..Default::default()
            }))
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn test_create_with_credentials_hashes_password() {
        let f = fixture();

        let created = f
            .service
            .create(create_request("tom", Some("tom01"), Some("secret1")))
            .await
            .unwrap();

        assert_eq!(created.username.as_deref(), Some("tom01"));
        assert_eq!(created.status, STATUS_ENABLED);

        let stored = f.store.find_member_by_username("tom01").await.unwrap().unwrap();
        let password_hash = stored.password_hash.unwrap();
        assert_ne!(password_hash, "secret1");
        assert!(bcrypt::verify("secret1", &password_hash).unwrap());
    }

    #[actix_web::test]
    async fn test_create_requires_both_credentials() {
        let f = fixture();

        assert!(matches!(
            f.service.create(create_request("tom", Some("tom01"), None)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            f.service.create(create_request("tom", None, Some("secret1"))).await,
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(f.store.member_count(), 0);
    }

    #[actix_web::test]
    async fn test_create_invalid_profile_message() {
        let f = fixture();
        let mut request = create_request("tom", None, None);
        request.profile.sex = 9;

        match f.service.create(request).await {
            Err(AppError::ValidationError(message)) => assert_eq!(message, "성별 값이 올바르지 않습니다"),
            other => panic!("Expected ValidationError, got {:?}", other.map(|m| m.id)),
        }
    }

    #[actix_web::test]
    async fn test_duplicate_username_conflicts() {
        let f = fixture();
        f.service
            .create(create_request("a", Some("shared"), Some("secret1")))
            .await
            .unwrap();

        assert!(matches!(
            f.service.create(create_request("b", Some("shared"), Some("secret2"))).await,
            Err(AppError::ConflictError(_))
        ));
    }

    #[actix_web::test]
    async fn test_deleted_member_releases_username() {
        let f = fixture();
        let first = f
            .service
            .create(create_request("a", Some("shared"), Some("secret1")))
            .await
            .unwrap();

        f.service.delete(&first.id).await.unwrap();

        assert!(f
            .service
            .create(create_request("b", Some("shared"), Some("secret2")))
            .await
            .is_ok());
    }

    #[actix_web::test]
    async fn test_update_credentials_allows_own_username() {
        let f = fixture();
        let member = f
            .service
            .create(create_request("a", Some("mine"), Some("secret1")))
            .await
            .unwrap();
        let other = f
            .service
            .create(create_request("b", Some("taken"), Some("secret1")))
            .await
            .unwrap();

        let same = UpdateCredentialsRequest {
            username: "mine".to_string(),
            password: "changed1".to_string(),
        };
        assert!(f.service.update_credentials(&member.id, same).await.is_ok());

        let clash = UpdateCredentialsRequest {
            username: "taken".to_string(),
            password: "changed1".to_string(),
        };
        assert!(matches!(
            f.service.update_credentials(&member.id, clash).await,
            Err(AppError::ConflictError(_))
        ));

        let short = UpdateCredentialsRequest {
            username: "ok-name".to_string(),
            password: "123".to_string(),
        };
        assert!(matches!(
            f.service.update_credentials(&other.id, short).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_update_credentials_rejects_padded_short_username() {
        let f = fixture();
        let member = seed(&f.store, "pad").await;
        let id = member.id_string().unwrap();

        for username in ["   ", "  ab "] {
            let json = serde_json::json!({ "username": username, "password": "secret1" });
            let request: UpdateCredentialsRequest = serde_json::from_value(json).unwrap();

            match f.service.update_credentials(&id, request).await {
                Err(AppError::ValidationError(message)) => assert_eq!(message, "계정은 3-30자 사이여야 합니다"),
                other => panic!("Expected ValidationError, got {:?}", other.map(|m| m.username)),
            }
        }

        let json = serde_json::json!({ "username": "  padded ", "password": "secret1" });
        let request: UpdateCredentialsRequest = serde_json::from_value(json).unwrap();
        let updated = f.service.update_credentials(&id, request).await.unwrap();

        assert_eq!(updated.username.as_deref(), Some("padded"));
        let stored = f.store.find_member(member.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.username.as_deref(), Some("padded"));
    }

    #[actix_web::test]
    async fn test_get_and_update() {
        let f = fixture();
        let member = seed(&f.store, "before").await;
        let id = member.id_string().unwrap();

        let update = MemberProfileRequest {
            nickname: "  after ".to_string(),
            sex: 2,
            ..Default::default()
        };
        let updated = f.service.update(&id, update).await.unwrap();

        assert_eq!(updated.nickname, "after");
        assert_eq!(f.service.get(&id).await.unwrap().sex, 2);
    }

    #[actix_web::test]
    async fn test_invalid_or_missing_id() {
        let f = fixture();

        assert!(matches!(f.service.get("not-an-id").await, Err(AppError::ValidationError(_))));
        assert!(matches!(
            f.service.get(&ObjectId::new().to_hex()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete(&ObjectId::new().to_hex()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_delete_hides_member_and_revokes_tokens() {
        let f = fixture();
        let member = seed(&f.store, "gone").await;
        let id = member.id_string().unwrap();

        let token = f
            .tokens
            .issue(&member, AuthClient::MiniProgram, IssueMode::Reuse)
            .await
            .unwrap();

        f.service.delete(&id).await.unwrap();

        assert!(matches!(f.service.get(&id).await, Err(AppError::NotFound(_))));
        assert!(f.tokens.verify(&token.access_token).await.is_err());
        assert!(matches!(f.service.delete(&id).await, Err(AppError::NotFound(_))));

        let listed = f.service.list(MemberListQuery::default()).await.unwrap();
        assert_eq!(listed.pagination.total, 0);
        assert!(listed.items.is_empty());
    }

    #[actix_web::test]
    async fn test_disable_revokes_tokens() {
        let f = fixture();
        let member = seed(&f.store, "m").await;
        let id = member.id_string().unwrap();
        let token = f
            .tokens
            .issue(&member, AuthClient::MiniProgram, IssueMode::Reuse)
            .await
            .unwrap();

        let disabled = f
            .service
            .set_status(&id, UpdateStatusRequest { status: STATUS_DISABLED })
            .await
            .unwrap();

        assert_eq!(disabled.status, STATUS_DISABLED);
        assert!(f.tokens.verify(&token.access_token).await.is_err());

        assert!(matches!(
            f.service.set_status(&id, UpdateStatusRequest { status: STATUS_DELETED }).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_list_paginates_newest_first() {
        let f = fixture();
        for i in 0..23 {
            seed(&f.store, &format!("member-{:02}", i)).await;
        }

        let query = MemberListQuery {
            page: Some(3),
            page_size: Some(10),
            keyword: None,
        };
        let page = f.service.list(query).await.unwrap();

        assert_eq!(page.pagination.total, 23);
        assert_eq!(page.pagination.page_count, 3);
        assert_eq!(page.pagination.buttons, vec![1, 2, 3]);
        assert_eq!(page.items.len(), 3);

        let beyond = MemberListQuery {
            page: Some(99),
            page_size: Some(10),
            keyword: None,
        };
        let last = f.service.list(beyond).await.unwrap();
        assert_eq!(last.pagination.page, 3);
    }

    #[actix_web::test]
    async fn test_list_keyword() {
        let f = fixture();
        seed(&f.store, "apple").await;
        seed(&f.store, "banana").await;

        let query = MemberListQuery {
            keyword: Some("ban".to_string()),
            ..Default::default()
        };
        let found = f.service.list(query).await.unwrap();

        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.items[0].nickname, "banana");
    }
}
