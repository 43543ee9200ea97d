//! 미니프로그램 로그인 요청 DTO
//!
//! 모든 필드는 누락 시 빈 문자열로 역직렬화됩니다. 로그인 요청은 `validate()`의
//! 공백 검사로, `code`는 서비스의 공백 검사로 `ValidationError`가 됩니다.

use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::not_blank;

/// `GET /session-key?code=...`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionKeyQuery {
    #[serde(default)]
    pub code: String,
}

/// `POST /decode`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MiniProgramLoginRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "auth_key가 필요합니다"))]
    pub auth_key: String,

    #[serde(default, rename = "rawData")]
    #[validate(custom(function = "not_blank", message = "rawData가 필요합니다"))]
    pub raw_data: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "signature가 필요합니다"))]
    pub signature: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "iv가 필요합니다"))]
    pub iv: String,

    #[serde(default, rename = "encryptedData")]
    #[validate(custom(function = "not_blank", message = "encryptedData가 필요합니다"))]
    pub encrypted_data: String,
}

impl MiniProgramLoginRequest {
    /// 검증 메시지 우선순위 (요청 필드 순서). serde 이름과 필드 이름을 모두 포함합니다.
    pub const FIELD_ORDER: [&'static str; 7] = [
        "auth_key",
        "rawData",
        "raw_data",
        "signature",
        "iv",
        "encryptedData",
        "encrypted_data",
    ];
}

/// `POST /find-token-by-openid`
#[derive(Debug, Clone, Deserialize)]
pub struct FindTokenRequest {
    #[serde(default)]
    pub openid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_utils::first_validation_message;

    #[test]
    fn test_login_request_uses_provider_field_names() {
        let json = r#"{
            "auth_key": "k_1",
            "rawData": "{}",
            "signature": "s",
            "iv": "i",
            "encryptedData": "e"
        }"#;

        let request: MiniProgramLoginRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.raw_data, "{}");
        assert_eq!(request.encrypted_data, "e");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_report_first_field() {
        let request: MiniProgramLoginRequest =
            serde_json::from_str(r#"{"auth_key": "k", "iv": "  "}"#).unwrap();

        let errors = request.validate().unwrap_err();
        let message = first_validation_message(&errors, &MiniProgramLoginRequest::FIELD_ORDER);

        assert_eq!(message, "rawData가 필요합니다");
    }

    #[test]
    fn test_missing_code_defaults_to_empty() {
        let query: SessionKeyQuery = serde_json::from_str("{}").unwrap();
        assert!(query.code.is_empty());
    }
}
