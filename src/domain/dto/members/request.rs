//! 관리자 회원 관리 요청 DTO

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::members::MemberProfileFields;
use crate::utils::string_utils::{deserialize_optional_string, deserialize_trimmed_string, optional_email};

/// 목록 조회 쿼리
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
}

/// 회원 프로필 입력 (생성/수정 공통)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MemberProfileRequest {
    #[serde(default)]
    #[validate(length(max = 50, message = "실명은 50자 이하여야 합니다"))]
    pub realname: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "닉네임은 50자 이하여야 합니다"))]
    pub nickname: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "프로필 이미지 주소가 너무 깁니다"))]
    pub head_portrait: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 2, message = "성별 값이 올바르지 않습니다"))]
    pub sex: i32,

    #[serde(default)]
    #[validate(length(max = 20, message = "휴대폰 번호는 20자 이하여야 합니다"))]
    pub mobile_phone: String,

    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,
}

impl From<MemberProfileRequest> for MemberProfileFields {
    fn from(request: MemberProfileRequest) -> Self {
        Self {
            realname: request.realname.trim().to_string(),
            nickname: request.nickname.trim().to_string(),
            head_portrait: request.head_portrait.trim().to_string(),
            sex: request.sex,
            mobile_phone: request.mobile_phone.trim().to_string(),
            email: request.email.trim().to_string(),
        }
    }
}

/// 회원 생성 요청. 계정 정보는 선택이며 함께 주어지면 바로 설정합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: MemberProfileRequest,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 3, max = 30, message = "계정은 3-30자 사이여야 합니다"))]
    pub username: Option<String>,

    #[serde(default)]
    #[validate(length(min = 6, max = 72, message = "비밀번호는 6-72자 사이여야 합니다"))]
    pub password: Option<String>,
}

/// 계정/비밀번호 변경 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCredentialsRequest {
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 3, max = 30, message = "계정은 3-30자 사이여야 합니다"))]
    pub username: String,

    #[validate(length(min = 6, max = 72, message = "비밀번호는 6-72자 사이여야 합니다"))]
    pub password: String,
}

/// 상태 변경 요청 (0 비활성, 1 활성)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(range(min = 0, max = 1, message = "상태 값은 0 또는 1이어야 합니다"))]
    pub status: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_flattens_profile() {
        let json = r#"{"nickname": "tom", "sex": 1, "username": "tom01", "password": "secret1"}"#;
        let request: CreateMemberRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.profile.nickname, "tom");
        assert_eq!(request.username.as_deref(), Some("tom01"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_profile_values() {
        let request = MemberProfileRequest {
            sex: 5,
            email: "nope".to_string(),
            ..Default::default()
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sex"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_credentials_username_is_trimmed_before_validation() {
        let request: UpdateCredentialsRequest =
            serde_json::from_str(r#"{"username": " tom01 ", "password": "secret1"}"#).unwrap();
        assert_eq!(request.username, "tom01");
        assert!(request.validate().is_ok());

        for username in ["   ", "  ab "] {
            let json = serde_json::json!({ "username": username, "password": "secret1" });
            let request: UpdateCredentialsRequest = serde_json::from_value(json).unwrap();
            let errors = request.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("username"));
        }
    }

    #[test]
    fn test_create_username_is_trimmed_before_validation() {
        let json = r#"{"nickname": "tom", "username": "  ab ", "password": "secret1"}"#;
        let request: CreateMemberRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.username.as_deref(), Some("ab"));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_status_range() {
        assert!(UpdateStatusRequest { status: 1 }.validate().is_ok());
        assert!(UpdateStatusRequest { status: -1 }.validate().is_err());
    }
}
