use serde::Serialize;

use crate::domain::entities::members::MemberInfo;
use crate::utils::pagination::Pagination;

/// 회원 응답. 시각 필드는 unix seconds 입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub username: Option<String>,
    pub realname: String,
    pub nickname: String,
    pub head_portrait: String,
    pub sex: i32,
    pub mobile_phone: String,
    pub email: String,
    pub visit_count: i64,
    pub last_time: Option<i64>,
    pub last_ip: Option<String>,
    pub status: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<MemberInfo> for MemberResponse {
    fn from(member: MemberInfo) -> Self {
        let MemberInfo {
            id,
            username,
            realname,
            nickname,
            head_portrait,
            sex,
            mobile_phone,
            email,
            visit_count,
            last_time,
            last_ip,
            status,
            created_at,
            updated_at,
            ..
        } = member;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            username,
            realname,
            nickname,
            head_portrait,
            sex,
            mobile_phone,
            email,
            visit_count,
            last_time: last_time.map(|time| time.timestamp_millis() / 1000),
            last_ip,
            status,
            created_at: created_at.timestamp_millis() / 1000,
            updated_at: updated_at.timestamp_millis() / 1000,
        }
    }
}

/// 회원 목록 페이지
#[derive(Debug, Clone, Serialize)]
pub struct MemberListResponse {
    pub items: Vec<MemberResponse>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::members::MemberProfileFields;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_password_hash_is_not_exposed() {
        let mut member = MemberInfo::new(MemberProfileFields::default());
        member.id = Some(ObjectId::new());
        member.password_hash = Some("$2b$04$hash".to_string());

        let json = serde_json::to_value(MemberResponse::from(member)).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["id"].as_str().unwrap().len(), 24);
        assert!(json["last_time"].is_null());
    }
}
