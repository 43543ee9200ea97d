use serde::{Deserialize, Serialize};

/// 핸드셰이크 토큰 뒤에 캐시되는 세션 정보
///
/// `jscode2session` 응답에서 얻은 값이며, `decode` 단계에서 한 번만 소비됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_key: String,
    pub open_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union_id: Option<String>,
}
