use std::time::Duration;
use weave_core::{Interceptor, InvocationContext, InvocationResult, WeaveError};

/// Fails the call with an invocation error when the rest of the chain takes
/// longer than the limit. The abandoned work is dropped.
#[derive(Debug)]
pub struct TimeoutInterceptor {
    limit: Duration,
}

impl TimeoutInterceptor {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn from_millis(limit_ms: u64) -> Self {
        Self::new(Duration::from_millis(limit_ms))
    }
}

#[async_trait::async_trait]
impl Interceptor for TimeoutInterceptor {
    fn name(&self) -> &str {
        "timeout"
    }

    async fn intercept<'a>(&'a self, invocation: InvocationContext<'a>) -> InvocationResult {
        let method = invocation.method();
        match tokio::time::timeout(self.limit, invocation.proceed()).await {
            Ok(result) => result,
            Err(_) => Err(WeaveError::invocation(
                self.name(),
                format!("'{}' did not complete within {:?}", method, self.limit),
            )),
        }
    }
}
