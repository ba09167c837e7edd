//! 缓存层
//!
//! 目前仅提供基于 Moka 的进程内缓存，用于缓存 JWT 对应的登录身份。

pub mod moka;

use async_trait::async_trait;
use std::sync::Arc;

pub use moka::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
}

/// 根据配置创建缓存实例
pub fn create_cache(max_capacity: u64, default_ttl: u64) -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::new(max_capacity, default_ttl))
}
