//! 테스트용 인메모리 캐시

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::caching::KeyValueCache;
use crate::errors::errors::AppError;

/// 만료 시간을 지원하는 `HashMap` 기반 캐시
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 키를 즉시 만료시킵니다.
    pub fn expire_now(&self, key: &str) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.1 = Instant::now();
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > Instant::now())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let now = Instant::now();
        Ok(self
            .lock()
            .get(key)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(value, _)| value.clone()))
    }

    async fn set_raw_with_expiry(&self, key: &str, value: String, seconds: u64) -> Result<(), AppError> {
        let expires_at = Instant::now() + Duration::from_secs(seconds);
        self.lock().insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn take_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let now = Instant::now();
        Ok(self
            .lock()
            .remove(key)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(value, _)| value))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.lock().remove(key);
        Ok(())
    }
}
