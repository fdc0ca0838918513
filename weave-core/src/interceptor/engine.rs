use crate::interceptor::InvocationFuture;
use crate::interceptor::context::InvocationContext;

/// Walks an invocation through its chain (Filter Chain Pattern).
///
/// Each step either hands the invocation, moved one position forward, to the
/// interceptor at the cursor, or, once the chain is exhausted, calls the real
/// target. Results and errors come back untouched.
pub struct ChainRunner;

impl ChainRunner {
    pub fn proceed<'a>(invocation: InvocationContext<'a>) -> InvocationFuture<'a> {
        Box::pin(async move {
            let chain = invocation.chain;
            match chain.get(invocation.position) {
                Some(interceptor) => interceptor.intercept(invocation.advanced()).await,
                None => invocation.target.invoke(invocation.method, invocation.arguments).await,
            }
        })
    }
}
