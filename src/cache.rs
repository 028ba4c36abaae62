use async_trait::async_trait;
use dashmap::DashMap;

/// Key/value store for compiled output, keyed by the digest of the raw input.
#[async_trait]
pub trait ArtifactCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String);
}

/// Hex MD5 digest of `content`, used as the cache key.
pub fn digest(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// Process-local cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl ArtifactCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}
