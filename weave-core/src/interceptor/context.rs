use std::fmt;
use std::sync::Arc;
use crate::definition::MethodSignature;
use crate::interceptor::engine::ChainRunner;
use crate::interceptor::{Interceptor, InvocationFuture};
use crate::target::Target;
use crate::types::{Arguments, Value};

/// One intercepted call, positioned on the next step of the chain.
///
/// Created fresh for every call and owned by it. The target, method and chain
/// are borrowed for the duration of the call only. Cloning gives an
/// independent cursor over the same call, which is how an interceptor retries.
#[derive(Clone)]
pub struct InvocationContext<'a> {
    pub(crate) target: &'a dyn Target,
    pub(crate) method: &'a MethodSignature,
    pub(crate) arguments: Arguments,
    pub(crate) chain: &'a [Arc<dyn Interceptor>],
    pub(crate) position: usize,
}

impl<'a> InvocationContext<'a> {
    pub fn new(
        target: &'a dyn Target,
        method: &'a MethodSignature,
        arguments: Arguments,
        chain: &'a [Arc<dyn Interceptor>],
    ) -> Self {
        Self {
            target,
            method,
            arguments,
            chain,
            position: 0,
        }
    }

    pub fn method(&self) -> &'a MethodSignature {
        self.method
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Arguments the rest of the chain, and finally the target, will see
    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    pub fn target(&self) -> &'a dyn Target {
        self.target
    }

    /// Index of the step `proceed` will run next; equals `chain_len` once only the target is left
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// Runs the rest of the chain and the target
    pub fn proceed(self) -> InvocationFuture<'a> {
        ChainRunner::proceed(self)
    }

    pub(crate) fn advanced(mut self) -> Self {
        self.position += 1;
        self
    }
}

impl fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("method", &self.method)
            .field("arguments", &self.arguments)
            .field("position", &self.position)
            .field("chain_len", &self.chain.len())
            .finish()
    }
}
