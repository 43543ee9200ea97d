//! 캐싱 계층 모듈
//!
//! 키-값 캐시 추상화([`KeyValueCache`])와 Redis 구현체를 제공합니다.
//! 서비스는 `Arc<dyn KeyValueCache>`에 의존하므로 테스트에서는
//! 인메모리 구현체로 교체할 수 있습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::{CacheExt, KeyValueCache};
//!
//! cache.set_json_with_expiry("auth_key", &session, 7195).await?;
//! let session: Option<SessionInfo> = cache.get_json("auth_key").await?;
//! let consumed: Option<SessionInfo> = cache.take_json("auth_key").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://127.0.0.1:6379  # 기본값
//! ```

pub mod redis;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::errors::AppError;

/// 문자열 기반 키-값 캐시
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set_raw_with_expiry(&self, key: &str, value: String, seconds: u64) -> Result<(), AppError>;

    /// 값을 읽고 즉시 삭제합니다. 동시에 호출되면 하나의 호출만 값을 받습니다.
    async fn take_raw(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// JSON 직렬화를 얹은 편의 메서드
#[async_trait]
pub trait CacheExt {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError>;

    async fn set_json_with_expiry<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), AppError>;

    async fn take_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError>;
}

#[async_trait]
impl<C: KeyValueCache + ?Sized> CacheExt for C {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError> {
        self.get_raw(key).await?.map(|json| decode(key, &json)).transpose()
    }

    async fn set_json_with_expiry<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), AppError> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::InternalError(format!("캐시 직렬화 실패: {}", e)))?;
        self.set_raw_with_expiry(key, json, seconds).await
    }

    async fn take_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError> {
        self.take_raw(key).await?.map(|json| decode(key, &json)).transpose()
    }
}

fn decode<T: DeserializeOwned>(key: &str, json: &str) -> Result<T, AppError> {
    serde_json::from_str(json)
        .map_err(|e| AppError::InternalError(format!("캐시 역직렬화 실패 ({}): {}", key, e)))
}
