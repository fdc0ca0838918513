use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use serde_json::json;
use weave_core::definition::{ConcreteType, Contract, MethodSignature};
use weave_core::types::Arguments;
use weave_core::{
    DefaultProxyFactory, DispatchStrategy, InvocationResult, Proxy, ProxyConfig, ProxyFactory, ProxySettings, Target,
    WeaveError,
};
use weave_interceptors::{
    CacheConfig, CachingInterceptor, LoggingConfig, LoggingInterceptor, RetryConfig, RetryInterceptor,
    TimeoutInterceptor,
};

/// Fails the first load of every id, answers the second one
#[derive(Default)]
struct Repository {
    seen: Mutex<HashSet<String>>,
    loads: Mutex<usize>,
}

#[async_trait::async_trait]
impl Target for Repository {
    async fn invoke(&self, method: &MethodSignature, arguments: Arguments) -> InvocationResult {
        match method.name.as_str() {
            "load" => {
                *self.loads.lock().unwrap() += 1;
                let id = arguments[0].as_str().unwrap_or_default().to_string();
                if self.seen.lock().unwrap().insert(id.clone()) {
                    Err(WeaveError::invocation("repository", format!("connection reset loading {}", id)))
                } else {
                    Ok(json!({ "id": id }))
                }
            }
            "stall" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(json!(null))
            }
            other => Err(WeaveError::invocation("repository", format!("unsupported {}", other))),
        }
    }
}

fn repository_type() -> Arc<ConcreteType> {
    Arc::new(
        ConcreteType::new("Repository")
            .with_method("load", 1)
            .with_method("stall", 0)
            .implementing(Contract::new("Store").with_method("load", 1)),
    )
}

fn proxy(settings: ProxySettings, repository: Arc<Repository>, cache: Arc<CachingInterceptor>) -> Proxy {
    let config = ProxyConfig::builder()
        .target_type(repository_type())
        .target(repository)
        .settings(settings)
        .interceptor(Arc::new(LoggingInterceptor::new(LoggingConfig::default())))
        .interceptor(Arc::new(TimeoutInterceptor::from_millis(200)))
        .interceptor(Arc::new(RetryInterceptor::new(RetryConfig { max_attempts: 2, backoff_ms: 1 })))
        .interceptor(cache)
        .build();
    DefaultProxyFactory::new().create(config).unwrap()
}

#[tokio::test]
async fn retry_recovers_and_cache_short_circuits_the_target() {
    let repository = Arc::new(Repository::default());
    let cache = Arc::new(CachingInterceptor::new(CacheConfig::default()));
    let proxy = proxy(ProxySettings::default(), repository.clone(), cache.clone());

    assert_eq!(proxy.strategy(), DispatchStrategy::SubclassBased);
    assert_eq!(proxy.call("load", vec![json!("a")]).await.unwrap(), json!({ "id": "a" }));
    assert_eq!(proxy.call("load", vec![json!("a")]).await.unwrap(), json!({ "id": "a" }));

    // One failed and one successful load, then a cache hit
    assert_eq!(*repository.loads.lock().unwrap(), 2);
    assert_eq!(cache.hits(), 1);
}

#[tokio::test]
async fn settings_from_json_pick_the_strategy() {
    let settings = ProxySettings::from_json(r#"{ "expose_proxy": true }"#).unwrap();
    let config = ProxyConfig::builder()
        .target_type(repository_type())
        .target(Arc::new(Repository::default()))
        .settings(settings)
        .contract(Contract::new("Store").with_method("load", 1))
        .build();

    let proxy = DefaultProxyFactory::new().create(config).unwrap();

    assert_eq!(proxy.strategy(), DispatchStrategy::ContractBased);
    assert!(proxy.advised().unwrap().settings().expose_proxy);
    assert!(matches!(proxy.call("stall", vec![]).await, Err(WeaveError::UnknownMethod { .. })));
}

#[tokio::test]
async fn timeout_wraps_the_slow_target() {
    let repository = Arc::new(Repository::default());
    let proxy = proxy(ProxySettings::default(), repository, Arc::new(CachingInterceptor::default()));

    let error = proxy.call("stall", vec![]).await.unwrap_err();

    assert_eq!(error.as_invocation().unwrap().origin, "timeout");
}

#[test]
fn interceptor_configs_read_from_json() {
    let retry: RetryConfig = serde_json::from_str(r#"{ "max_attempts": 5 }"#).unwrap();
    assert_eq!(retry.max_attempts, 5);
    assert_eq!(retry.backoff_ms, 0);

    let cache: CacheConfig = serde_json::from_str(r#"{ "methods": ["load"] }"#).unwrap();
    assert_eq!(cache.methods, vec!["load"]);
    assert_eq!(cache.max_entries, 1024);
}

/// Always fails with the very same error instance
struct Broken {
    error: WeaveError,
}

#[async_trait::async_trait]
impl Target for Broken {
    async fn invoke(&self, _method: &MethodSignature, _arguments: Arguments) -> InvocationResult {
        Err(self.error.clone())
    }
}

#[tokio::test]
async fn target_error_crosses_the_chain_as_the_same_error() {
    let raised = WeaveError::invocation_with_source("repository", "write failed", std::io::Error::other("disk full"));
    let config = ProxyConfig::builder()
        .target_type(repository_type())
        .target(Arc::new(Broken { error: raised.clone() }))
        .interceptor(Arc::new(LoggingInterceptor::default()))
        .interceptor(Arc::new(TimeoutInterceptor::from_millis(1_000)))
        .interceptor(Arc::new(RetryInterceptor::new(RetryConfig { max_attempts: 3, backoff_ms: 0 })))
        .build();
    let proxy = DefaultProxyFactory::new().create(config).unwrap();

    let error = proxy.call("load", vec![json!("a")]).await.unwrap_err();

    let raised = raised.as_invocation().unwrap();
    assert!(error.as_invocation().unwrap().same_source(raised));

    let lookalike = WeaveError::invocation_with_source("repository", "write failed", std::io::Error::other("disk full"));
    assert!(!lookalike.as_invocation().unwrap().same_source(raised));
}
