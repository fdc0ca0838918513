use std::pin::Pin;
use std::sync::Arc;
use crate::error::WeaveResult;
use crate::interceptor::context::InvocationContext;
use crate::types::Value;

pub mod context;
pub mod engine;

pub type InvocationResult = WeaveResult<Value>;

/// Boxed future of one step of the chain
pub type InvocationFuture<'a> = Pin<Box<dyn Future<Output = InvocationResult> + Send + 'a>>;

/// Ordered advice chain, already resolved for one target. Immutable once a proxy is built.
pub type InterceptorChain = Arc<[Arc<dyn Interceptor>]>;

/// Cross-cutting behavior around a call.
///
/// The interceptor receives the invocation positioned on the next step and
/// decides whether, when, and how many times to call [`InvocationContext::proceed`]:
/// never to short-circuit, once to pass through, again on a clone to retry.
#[async_trait::async_trait]
pub trait Interceptor: Send + Sync {
    /// Name used in logs and diagnostics
    fn name(&self) -> &str;

    async fn intercept<'a>(&'a self, invocation: InvocationContext<'a>) -> InvocationResult;
}

/// Builds a chain from interceptors in the given order
pub fn chain_of(interceptors: Vec<Arc<dyn Interceptor>>) -> InterceptorChain {
    interceptors.into()
}

