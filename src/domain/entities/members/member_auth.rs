//! Member Auth Link Entity
//!
//! 외부 인증 식별자 (클라이언트 종류, openid, unionid)를 로컬 회원에 연결하는
//! `member_auth` 컬렉션 엔티티입니다. (type, openid) 조합마다 하나만 존재합니다.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::config::AuthClient;

/// 외부 인증 연결 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAuth {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "type")]
    pub client: AuthClient,
    pub openid: String,
    #[serde(default)]
    pub unionid: String,
    /// 연결된 회원. 연결 전에는 None
    #[serde(default)]
    pub member_id: Option<ObjectId>,
    #[serde(default)]
    pub sex: i32,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub head_portrait: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub language: String,
    pub status: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// 공급자 프로필 스냅샷
///
/// 로그인할 때마다 `member_auth` 문서에 덮어씁니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthProfileSnapshot {
    pub unionid: String,
    pub sex: i32,
    pub nickname: String,
    pub head_portrait: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub language: String,
}

impl MemberAuth {
    /// 아직 회원이 연결되지 않은 새 인증 정보를 만듭니다.
    pub fn new(client: AuthClient, openid: String, profile: AuthProfileSnapshot) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            client,
            openid,
            unionid: profile.unionid,
            member_id: None,
            sex: profile.sex,
            nickname: profile.nickname,
            head_portrait: profile.head_portrait,
            country: profile.country,
            province: profile.province,
            city: profile.city,
            language: profile.language,
            status: super::member_info::STATUS_ENABLED,
            created_at: now,
            updated_at: now,
        }
    }

    /// 스냅샷으로 프로필 필드를 갱신합니다. 연결 정보는 그대로 둡니다.
    pub fn apply_profile(&mut self, profile: AuthProfileSnapshot) {
        if !profile.unionid.is_empty() {
            self.unionid = profile.unionid;
        }
        self.sex = profile.sex;
        self.nickname = profile.nickname;
        self.head_portrait = profile.head_portrait;
        self.country = profile.country;
        self.province = profile.province;
        self.city = profile.city;
        self.language = profile.language;
        self.updated_at = DateTime::now();
    }
}
