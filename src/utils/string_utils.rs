//! # 문자열 유틸리티
//!
//! 요청 필드 검증과 정리에 쓰는 공통 함수들입니다.

use serde::Deserialize;
use validator::{ValidateEmail, ValidationError, ValidationErrors, ValidationErrorsKind};

/// 선택적 문자열 필드 정리. 빈 문자열/공백은 `None`이 됩니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`와 함께 사용합니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 앞뒤 공백을 제거한 문자열로 역직렬화합니다.
///
/// 길이 검증이 저장될 값 기준으로 이뤄지도록 필수 문자열 필드에 사용합니다.
pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// validator용 공백 검사
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// 비어 있지 않을 때만 이메일 형식을 검사합니다.
pub fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("유효한 이메일 주소를 입력해주세요".into()))
}

/// 검증 실패 중 첫 번째 필드의 메시지를 반환합니다.
///
/// `ValidationErrors`는 순서를 보장하지 않으므로 `field_order` 순서로 찾고,
/// 목록에 없는 필드는 이름순으로 뒤에 둡니다.
pub fn first_validation_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let mut fields: Vec<_> = errors.errors().iter().collect();

    fields.sort_by_key(|(field, _)| {
        let field_name: &str = field.as_ref();
        let rank = field_order
            .iter()
            .position(|name| *name == field_name)
            .unwrap_or(field_order.len());
        (rank, field_name.to_string())
    });

    fields
        .into_iter()
        .find_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list.first().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{}의 값이 올바르지 않습니다", field))
            }),
            _ => None,
        })
        .unwrap_or_else(|| "요청 값이 올바르지 않습니다".to_string())
}
