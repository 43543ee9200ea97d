//! MongoDB 회원 리포지토리
//!
//! `member_info`, `member_auth` 두 컬렉션을 다룹니다.
//!
//! # 인덱스
//!
//! | 컬렉션 | 키 | 옵션 |
//! |--------|----|------|
//! | member_auth | `{type: 1, openid: 1}` | unique |
//! | member_auth | `{member_id: 1}` | |
//! | member_info | `{username: 1}` | unique (계정이 있는 삭제되지 않은 회원) |
//! | member_info | `{status: 1, created_at: -1}` | |
//!
//! (type, openid) 유니크 인덱스가 있어야 `upsert_auth`가 동시 요청에서도
//! 문서를 하나만 만듭니다. username 부분 유니크 인덱스는 동시 생성에서 밀린 요청을
//! `ConflictError`로 돌려보냅니다. 기동 시 [`MemberRepository::create_indexes`]를 호출하세요.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, DateTime, Document, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};
use singleton_macro::repository;

use crate::config::AuthClient;
use crate::db::Database;
use crate::domain::entities::members::{
    AuthProfileSnapshot, MemberAuth, MemberInfo, MemberProfileFields, STATUS_DELETED, STATUS_DISABLED,
    STATUS_ENABLED,
};
use crate::errors::errors::AppError;
use crate::repositories::members::member_store::{MemberListFilter, MemberStore};

pub const MEMBER_AUTH_COLLECTION: &str = "member_auth";

const DUPLICATE_KEY_CODE: i32 = 11000;

#[repository(name = "member", collection = "member_info")]
pub struct MemberRepository {
    db: Arc<Database>,
}

impl MemberRepository {
    fn members(&self) -> Collection<MemberInfo> {
        self.collection::<MemberInfo>()
    }

    fn auths(&self) -> Collection<MemberAuth> {
        self.db.get_database().collection(MEMBER_AUTH_COLLECTION)
    }

    /// 두 컬렉션의 인덱스를 생성합니다. 이미 있으면 아무 일도 하지 않습니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let type_openid_unique = IndexModel::builder()
            .keys(doc! { "type": 1, "openid": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("type_openid_unique".to_string())
                    .build(),
            )
            .build();

        let member_id_index = IndexModel::builder()
            .keys(doc! { "member_id": 1 })
            .options(IndexOptions::builder().name("member_id".to_string()).build())
            .build();

        self.auths()
            .create_indexes([type_openid_unique, member_id_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let username_unique = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(Self::username_index_filter())
                    .name("username_active_unique".to_string())
                    .build(),
            )
            .build();

        let listing_index = IndexModel::builder()
            .keys(doc! { "status": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("status_created_at_desc".to_string()).build())
            .build();

        self.members()
            .create_indexes([username_unique, listing_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!("✅ 회원 컬렉션 인덱스 확인 완료");
        Ok(())
    }

    /// 계정이 설정된 삭제되지 않은 회원만 유일성 검사 대상
    fn username_index_filter() -> Document {
        doc! {
            "username": { "$type": "string" },
            "status": { "$gte": STATUS_DISABLED },
        }
    }

    fn after_update() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }

    fn listing_filter(keyword: Option<&str>) -> Document {
        let mut filter = doc! { "status": { "$ne": STATUS_DELETED } };

        if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
            let pattern = escape_regex(keyword);
            let matches: Vec<Document> = ["username", "nickname", "realname", "mobile_phone"]
                .iter()
                .map(|field| {
                    let mut clause = Document::new();
                    clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                    clause
                })
                .collect();
            filter.insert("$or", matches);
        }

        filter
    }

    async fn update_active_member(&self, id: ObjectId, mut set: Document) -> Result<Option<MemberInfo>, AppError> {
        set.insert("updated_at", DateTime::now());

        self.members()
            .find_one_and_update(
                doc! { "_id": id, "status": { "$ne": STATUS_DELETED } },
                doc! { "$set": set },
            )
            .with_options(Self::after_update())
            .await
            .map_err(|e| username_write_error(e, None))
    }
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn find_auth(&self, client: AuthClient, openid: &str) -> Result<Option<MemberAuth>, AppError> {
        self.auths()
            .find_one(doc! { "type": client.as_str(), "openid": openid })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn upsert_auth(
        &self,
        client: AuthClient,
        openid: &str,
        profile: &AuthProfileSnapshot,
    ) -> Result<MemberAuth, AppError> {
        let now = DateTime::now();

        let mut set = doc! {
            "sex": profile.sex,
            "nickname": profile.nickname.as_str(),
            "head_portrait": profile.head_portrait.as_str(),
            "country": profile.country.as_str(),
            "province": profile.province.as_str(),
            "city": profile.city.as_str(),
            "language": profile.language.as_str(),
            "updated_at": now,
        };
        let mut set_on_insert = doc! {
            "member_id": Bson::Null,
            "status": STATUS_ENABLED,
            "created_at": now,
        };

        // 빈 unionid로 기존 값을 지우지 않음
        if profile.unionid.is_empty() {
            set_on_insert.insert("unionid", "");
        } else {
            set.insert("unionid", profile.unionid.as_str());
        }

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let result = self
            .auths()
            .find_one_and_update(
                doc! { "type": client.as_str(), "openid": openid },
                doc! { "$set": set, "$setOnInsert": set_on_insert },
            )
            .with_options(options)
            .await;

        match result {
            Ok(Some(auth)) => Ok(auth),
            Ok(None) => Err(AppError::DatabaseError("upsert 결과가 비어 있습니다".to_string())),
            // 동시 upsert에서 밀린 경우 먼저 생성된 문서를 사용
            Err(e) if is_duplicate_key(&e) => {
                log::debug!("member_auth 중복 생성 경쟁 감지: {}", openid);
                self.find_auth(client, openid).await?.ok_or_else(|| {
                    AppError::DatabaseError("중복 키 이후 인증 정보를 찾을 수 없습니다".to_string())
                })
            }
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    async fn link_member(&self, auth_id: ObjectId, member_id: ObjectId) -> Result<bool, AppError> {
        let result = self
            .auths()
            .update_one(
                doc! { "_id": auth_id, "member_id": Bson::Null },
                doc! { "$set": { "member_id": member_id, "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count == 1)
    }

    async fn relink_member(
        &self,
        auth_id: ObjectId,
        stale_id: ObjectId,
        member_id: ObjectId,
    ) -> Result<bool, AppError> {
        let result = self
            .auths()
            .update_one(
                doc! { "_id": auth_id, "member_id": stale_id },
                doc! { "$set": { "member_id": member_id, "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count == 1)
    }

    async fn find_member(&self, id: ObjectId) -> Result<Option<MemberInfo>, AppError> {
        self.members()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_member_by_username(&self, username: &str) -> Result<Option<MemberInfo>, AppError> {
        self.members()
            .find_one(doc! { "username": username, "status": { "$ne": STATUS_DELETED } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn create_member(&self, mut member: MemberInfo) -> Result<MemberInfo, AppError> {
        let result = self
            .members()
            .insert_one(&member)
            .await
            .map_err(|e| username_write_error(e, member.username.as_deref()))?;

        member.id = result.inserted_id.as_object_id();
        if member.id.is_none() {
            return Err(AppError::DatabaseError("생성된 회원 ID를 확인할 수 없습니다".to_string()));
        }

        Ok(member)
    }

    async fn remove_member(&self, id: ObjectId) -> Result<(), AppError> {
        self.members()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn record_visit(&self, id: ObjectId, ip: Option<&str>) -> Result<Option<MemberInfo>, AppError> {
        let now = DateTime::now();
        let last_ip = ip.map(|ip| Bson::String(ip.to_string())).unwrap_or(Bson::Null);

        self.members()
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$inc": { "visit_count": 1_i64 },
                    "$set": { "last_time": now, "last_ip": last_ip, "updated_at": now },
                },
            )
            .with_options(Self::after_update())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn list_members(&self, filter: &MemberListFilter) -> Result<Vec<MemberInfo>, AppError> {
        let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);

        self.members()
            .find(Self::listing_filter(filter.keyword.as_deref()))
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(filter.offset)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn count_members(&self, keyword: Option<&str>) -> Result<u64, AppError> {
        self.members()
            .count_documents(Self::listing_filter(keyword))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn update_profile(
        &self,
        id: ObjectId,
        profile: &MemberProfileFields,
    ) -> Result<Option<MemberInfo>, AppError> {
        self.update_active_member(
            id,
            doc! {
                "realname": profile.realname.as_str(),
                "nickname": profile.nickname.as_str(),
                "head_portrait": profile.head_portrait.as_str(),
                "sex": profile.sex,
                "mobile_phone": profile.mobile_phone.as_str(),
                "email": profile.email.as_str(),
            },
        )
        .await
    }

    async fn update_credentials(
        &self,
        id: ObjectId,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<MemberInfo>, AppError> {
        self.update_active_member(id, doc! { "username": username, "password_hash": password_hash })
            .await
            .map_err(|e| match e {
                AppError::ConflictError(_) => username_conflict(username),
                other => other,
            })
    }

    async fn set_status(&self, id: ObjectId, status: i32) -> Result<Option<MemberInfo>, AppError> {
        self.update_active_member(id, doc! { "status": status }).await
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn username_conflict(username: &str) -> AppError {
    AppError::ConflictError(format!("이미 사용 중인 계정입니다: {}", username))
}

/// 회원 쓰기 오류 변환. 유일성 위반은 계정 중복뿐이므로 `ConflictError`가 됩니다.
fn username_write_error(error: mongodb::error::Error, username: Option<&str>) -> AppError {
    if !is_duplicate_key(&error) {
        return AppError::DatabaseError(error.to_string());
    }

    match username {
        Some(username) => username_conflict(username),
        None => AppError::ConflictError("이미 사용 중인 계정입니다".to_string()),
    }
}

/// 정규식 메타 문자를 이스케이프합니다.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
