use serde::{Deserialize, Serialize};

/// 코드 교환 결과. `auth_key`는 `decode` 요청에 그대로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionKeyResponse {
    pub auth_key: String,
}
