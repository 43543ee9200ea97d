//! Redis 캐시 클라이언트
//!
//! 핸드셰이크 토큰과 액세스 토큰 저장에 사용하는 Redis 래퍼입니다.
//! 모든 값은 JSON 문자열로 저장되며, 만료 시간은 `SETEX`로 지정합니다.

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::caching::KeyValueCache;
use crate::config::DataStoreConfig;
use crate::errors::errors::AppError;

/// Redis 클라이언트 래퍼
///
/// 요청마다 멀티플렉스 연결을 가져와 명령을 실행합니다.
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// `REDIS_URL`로 클라이언트를 생성하고 `PING`으로 연결을 확인합니다.
    ///
    /// # Errors
    ///
    /// * URL 형식이 잘못된 경우
    /// * Redis 서버에 연결할 수 없는 경우
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::open(DataStoreConfig::redis_url())?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl KeyValueCache for RedisClient {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.connection().await?;
        Ok(conn.get(key).await?)
    }

    async fn set_raw_with_expiry(&self, key: &str, value: String, seconds: u64) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    /// `GETDEL`로 읽기와 삭제를 한 번에 수행합니다 (Redis 6.2+).
    async fn take_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
