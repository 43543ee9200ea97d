use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::not_blank;

/// 토큰 갱신 요청 DTO
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "refresh_token이 필요합니다"))]
    pub refresh_token: String,
}
