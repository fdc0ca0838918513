use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use tokio::sync::RwLock;
use weave_core::types::Value;
use weave_core::{Interceptor, InvocationContext, InvocationResult};

#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Method names to cache, every method when empty
    pub methods: Vec<String>,
    #[default = 1024]
    pub max_entries: usize,
}

/// Memoizes successful results by method and arguments.
///
/// A hit returns the stored value without proceeding, so neither the rest of
/// the chain nor the target runs. Failures are never stored. Once
/// `max_entries` is reached new results are returned but not remembered.
#[derive(Debug, Default)]
pub struct CachingInterceptor {
    config: CacheConfig,
    entries: RwLock<HashMap<String, Value>>,
    hits: AtomicU64,
}

impl CachingInterceptor {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn applies_to(&self, method: &str) -> bool {
        self.config.methods.is_empty() || self.config.methods.iter().any(|it| it == method)
    }

    fn key(invocation: &InvocationContext<'_>) -> String {
        format!("{}:{}", invocation.method(), Value::Array(invocation.arguments().to_vec()))
    }
}

#[async_trait::async_trait]
impl Interceptor for CachingInterceptor {
    fn name(&self) -> &str {
        "caching"
    }

    async fn intercept<'a>(&'a self, invocation: InvocationContext<'a>) -> InvocationResult {
        if !self.applies_to(&invocation.method().name) {
            return invocation.proceed().await;
        }

        let key = Self::key(&invocation);
        if let Some(value) = self.entries.read().await.get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("Cache hit for {}", key);
            return Ok(value);
        }

        let value = invocation.proceed().await?;

        let mut entries = self.entries.write().await;
        if entries.len() < self.config.max_entries || entries.contains_key(&key) {
            entries.insert(key, value.clone());
        }
        Ok(value)
    }
}
