//! 对象缓存层
//!
//! 后端以插件形式注册（`moka` 内存缓存、`redis`），启动时按 `cache.cache_type` 选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 键存在但无法取回（后端出错、反序列化失败等）
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str(&json) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::debug!("Dropping undecodable cache entry {}: {}", key, e);
                    self.remove(key).await;
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    pub async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.insert_raw(key, json, ttl).await,
            Err(e) => tracing::warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }
}

/// 注册缓存插件，类型需提供 `fn new() -> Result<Self, String>`
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| {
                                Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                            })
                            .map_err($crate::errors::TutorHubError::cache_connection)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.0.lock().unwrap().get(key) {
                Some(v) => CacheResult::Found(v.clone()),
                None => CacheResult::NotFound,
            }
        }
        async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
            self.0.lock().unwrap().insert(key, value);
        }
        async fn remove(&self, key: &str) {
            self.0.lock().unwrap().remove(key);
        }
        async fn invalidate_all(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    #[tokio::test]
    async fn test_json_helpers_drop_corrupt_entries() {
        let cache: Box<dyn ObjectCache> = Box::new(MapCache::default());

        cache.insert_json("k".to_string(), &vec![1, 2, 3], 0).await;
        assert_eq!(cache.get_json::<Vec<i32>>("k").await, CacheResult::Found(vec![1, 2, 3]));

        cache.insert_raw("bad".to_string(), "{not json".to_string(), 0).await;
        assert_eq!(
            cache.get_json::<Vec<i32>>("bad").await,
            CacheResult::ExistsButNoValue
        );
        assert_eq!(cache.get_raw("bad").await, CacheResult::NotFound);
    }
}
