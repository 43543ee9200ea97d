//! 복호화된 미니프로그램 사용자 정보
//!
//! `encryptedData`를 AES-128-CBC로 복호화한 평문 JSON의 형태입니다.
//!
//! ```json
//! {
//!   "openId": "OPENID",
//!   "nickName": "NICKNAME",
//!   "gender": 1,
//!   "city": "CITY",
//!   "province": "PROVINCE",
//!   "country": "COUNTRY",
//!   "avatarUrl": "AVATARURL",
//!   "unionId": "UNIONID",
//!   "language": "zh_CN",
//!   "watermark": { "appid": "APPID", "timestamp": 1477314187 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::entities::members::{AuthProfileSnapshot, MemberProfileFields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedUserInfo {
    pub open_id: String,
    #[serde(default)]
    pub nick_name: String,
    #[serde(default)]
    pub gender: i32,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub union_id: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub watermark: Option<Watermark>,
}

/// 복호화 데이터에 포함된 발급 앱 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    pub appid: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl DecryptedUserInfo {
    /// `member_auth`에 저장할 프로필 스냅샷
    pub fn auth_snapshot(&self) -> AuthProfileSnapshot {
        AuthProfileSnapshot {
            unionid: self.union_id.clone().unwrap_or_default(),
            sex: self.gender,
            nickname: self.nick_name.clone(),
            head_portrait: self.avatar_url.clone(),
            country: self.country.clone(),
            province: self.province.clone(),
            city: self.city.clone(),
            language: self.language.clone(),
        }
    }

    /// 신규 회원 생성에 쓰는 프로필 (성별, 닉네임, 프로필 이미지)
    pub fn member_profile(&self) -> MemberProfileFields {
        MemberProfileFields {
            nickname: self.nick_name.clone(),
            head_portrait: self.avatar_url.clone(),
            sex: self.gender,
            ..Default::default()
        }
    }
}
