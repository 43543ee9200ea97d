//! Member Entity
//!
//! `member_info` 컬렉션에 저장되는 로컬 회원 엔티티입니다.
//! 외부 로그인 최초 성공 시 지연 생성되며, 관리자 API와 이후 로그인(방문 기록)으로 갱신됩니다.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 회원 상태: 활성
pub const STATUS_ENABLED: i32 = 1;
/// 회원 상태: 비활성
pub const STATUS_DISABLED: i32 = 0;
/// 회원 상태: 삭제됨 (소프트 삭제)
pub const STATUS_DELETED: i32 = -1;

/// 회원 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 로그인 계정 (외부 로그인으로 생성된 회원은 None)
    #[serde(default)]
    pub username: Option<String>,
    /// bcrypt 해시
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub realname: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub head_portrait: String,
    /// 0 알 수 없음, 1 남성, 2 여성
    #[serde(default)]
    pub sex: i32,
    #[serde(default)]
    pub mobile_phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub visit_count: i64,
    #[serde(default)]
    pub last_time: Option<DateTime>,
    #[serde(default)]
    pub last_ip: Option<String>,
    pub status: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// 관리자/외부 로그인이 채우는 회원 프로필 필드
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberProfileFields {
    pub realname: String,
    pub nickname: String,
    pub head_portrait: String,
    pub sex: i32,
    pub mobile_phone: String,
    pub email: String,
}

impl MemberInfo {
    /// 프로필만으로 활성 상태의 새 회원을 만듭니다.
    pub fn new(profile: MemberProfileFields) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username: None,
            password_hash: None,
            realname: profile.realname,
            nickname: profile.nickname,
            head_portrait: profile.head_portrait,
            sex: profile.sex,
            mobile_phone: profile.mobile_phone,
            email: profile.email,
            visit_count: 0,
            last_time: None,
            last_ip: None,
            status: STATUS_ENABLED,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }

    pub fn is_deleted(&self) -> bool {
        self.status == STATUS_DELETED
    }
}
