//! Reusable interceptors for `weave-core` proxies.

pub mod logging;
pub mod caching;
pub mod retry;
pub mod timeout;

pub use caching::{CacheConfig, CachingInterceptor};
pub use logging::{LoggingConfig, LoggingInterceptor};
pub use retry::{RetryConfig, RetryInterceptor};
pub use timeout::TimeoutInterceptor;
