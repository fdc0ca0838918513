use std::time::Duration;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use weave_core::{Interceptor, InvocationContext, InvocationResult, WeaveError};

#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, the first one included
    #[default = 3]
    pub max_attempts: u32,
    /// Fixed pause between attempts, in milliseconds
    #[default = 0]
    pub backoff_ms: u64,
}

/// Calls the rest of the chain again when it fails with an invocation error.
///
/// Each attempt proceeds on a fresh clone of the invocation, so the arguments
/// seen by every attempt are the ones this interceptor received. Configuration
/// errors, unknown methods and unavailable targets are returned at once. When
/// attempts run out the last error is returned unchanged.
#[derive(Debug, Default)]
pub struct RetryInterceptor {
    config: RetryConfig,
}

impl RetryInterceptor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl Interceptor for RetryInterceptor {
    fn name(&self) -> &str {
        "retry"
    }

    async fn intercept<'a>(&'a self, invocation: InvocationContext<'a>) -> InvocationResult {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match invocation.clone().proceed().await {
                Err(WeaveError::Invocation(error)) if attempt < max_attempts => {
                    log::debug!(
                        "Attempt {}/{} of {} failed, retrying: {}",
                        attempt,
                        max_attempts,
                        invocation.method(),
                        error
                    );
                    attempt += 1;
                    if self.config.backoff_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.backoff_ms)).await;
                    }
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use serde_json::json;
    use weave_core::definition::MethodSignature;
    use weave_core::interceptor::chain_of;
    use weave_core::target::FnTarget;
    use weave_core::types::Arguments;
    use super::*;

    /// Fails until the given attempt, then answers with the attempt number
    fn flaky(succeeds_on: u32, attempts: Arc<AtomicU32>) -> impl weave_core::Target {
        FnTarget::new(move |_: &MethodSignature, _: Arguments| {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt < succeeds_on {
                Err(WeaveError::invocation("flaky", format!("attempt {}", attempt)))
            } else {
                Ok(json!(attempt))
            }
        })
    }

    async fn run(retry: RetryInterceptor, target: &dyn weave_core::Target) -> InvocationResult {
        let chain = chain_of(vec![Arc::new(retry)]);
        let method = MethodSignature::new("work", 0);
        InvocationContext::new(target, &method, vec![], &chain).proceed().await
    }

    #[tokio::test]
    async fn succeeds_once_the_target_recovers() {
        let attempts = Arc::new(AtomicU32::new(0));
        let target = flaky(3, attempts.clone());

        let value = run(RetryInterceptor::default(), &target).await.unwrap();

        assert_eq!(value, json!(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_with_the_last_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let target = flaky(10, attempts.clone());
        let retry = RetryInterceptor::new(RetryConfig { max_attempts: 2, backoff_ms: 1 });

        let error = run(retry, &target).await.unwrap_err();

        assert_eq!(error.as_invocation().unwrap().message, "attempt 2");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let target = FnTarget::new(move |_: &MethodSignature, _: Arguments| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(WeaveError::target_unavailable("gone"))
        });

        let error = run(RetryInterceptor::default(), &target).await.unwrap_err();

        assert!(matches!(error, WeaveError::TargetUnavailable { .. }));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_calls_once() {
        let attempts = Arc::new(AtomicU32::new(0));
        let target = flaky(1, attempts.clone());
        let retry = RetryInterceptor::new(RetryConfig { max_attempts: 0, ..Default::default() });

        assert_eq!(run(retry, &target).await.unwrap(), json!(1));
    }
}
