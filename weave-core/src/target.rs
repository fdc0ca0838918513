use std::fmt;
use std::sync::Arc;
use crate::definition::{MethodSignature, TypeDescriptor};
use crate::error::{WeaveError, WeaveResult};
use crate::interceptor::InvocationResult;
use crate::types::Arguments;

/// The real implementation a proxy forwards to once the chain is exhausted.
#[async_trait::async_trait]
pub trait Target: Send + Sync {
    async fn invoke(&self, method: &MethodSignature, arguments: Arguments) -> InvocationResult;
}

/// Target backed by a plain closure. Handy for synthetic function types.
pub struct FnTarget<F>(F);

impl<F> FnTarget<F>
where
    F: Fn(&MethodSignature, Arguments) -> InvocationResult + Send + Sync,
{
    pub fn new(function: F) -> Self {
        Self(function)
    }
}

#[async_trait::async_trait]
impl<F> Target for FnTarget<F>
where
    F: Fn(&MethodSignature, Arguments) -> InvocationResult + Send + Sync,
{
    async fn invoke(&self, method: &MethodSignature, arguments: Arguments) -> InvocationResult {
        (self.0)(method, arguments)
    }
}

/// Hands out the target instance for each call.
#[async_trait::async_trait]
pub trait TargetSource: Send + Sync {
    /// Type of the instances handed out, if known without creating one
    fn target_type(&self) -> Option<Arc<dyn TypeDescriptor>>;

    /// Static sources always return the same instance, which is never released
    fn is_static(&self) -> bool {
        true
    }

    async fn target(&self) -> WeaveResult<Arc<dyn Target>>;

    /// Called after each call on a non-static source
    async fn release_target(&self, _target: Arc<dyn Target>) -> WeaveResult<()> {
        Ok(())
    }
}

/// One shared instance for every call.
pub struct SingletonTargetSource {
    target: Arc<dyn Target>,
    target_type: Option<Arc<dyn TypeDescriptor>>,
}

impl SingletonTargetSource {
    pub fn new(target: Arc<dyn Target>) -> Self {
        Self { target, target_type: None }
    }

    pub fn typed(target: Arc<dyn Target>, target_type: Arc<dyn TypeDescriptor>) -> Self {
        Self { target, target_type: Some(target_type) }
    }
}

#[async_trait::async_trait]
impl TargetSource for SingletonTargetSource {
    fn target_type(&self) -> Option<Arc<dyn TypeDescriptor>> {
        self.target_type.clone()
    }

    async fn target(&self) -> WeaveResult<Arc<dyn Target>> {
        Ok(self.target.clone())
    }
}

type TargetFactory = dyn Fn() -> WeaveResult<Arc<dyn Target>> + Send + Sync;

/// A fresh instance per call, created by a factory.
pub struct PrototypeTargetSource {
    factory: Box<TargetFactory>,
    target_type: Arc<dyn TypeDescriptor>,
}

impl PrototypeTargetSource {
    pub fn new<F>(target_type: Arc<dyn TypeDescriptor>, factory: F) -> Self
    where
        F: Fn() -> WeaveResult<Arc<dyn Target>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            target_type,
        }
    }
}

#[async_trait::async_trait]
impl TargetSource for PrototypeTargetSource {
    fn target_type(&self) -> Option<Arc<dyn TypeDescriptor>> {
        Some(self.target_type.clone())
    }

    fn is_static(&self) -> bool {
        false
    }

    async fn target(&self) -> WeaveResult<Arc<dyn Target>> {
        (self.factory)()
    }

    // Dropping our handle is all a prototype needs
    async fn release_target(&self, target: Arc<dyn Target>) -> WeaveResult<()> {
        drop(target);
        Ok(())
    }
}

/// No instance at all: the interceptors are expected to answer every call.
/// A call that reaches the end of the chain fails with `TargetUnavailable`.
#[derive(Default)]
pub struct EmptyTargetSource {
    target_type: Option<Arc<dyn TypeDescriptor>>,
}

impl EmptyTargetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typed(target_type: Arc<dyn TypeDescriptor>) -> Self {
        Self { target_type: Some(target_type) }
    }
}

#[async_trait::async_trait]
impl TargetSource for EmptyTargetSource {
    fn target_type(&self) -> Option<Arc<dyn TypeDescriptor>> {
        self.target_type.clone()
    }

    async fn target(&self) -> WeaveResult<Arc<dyn Target>> {
        let description = match &self.target_type {
            Some(target_type) => format!("no instance of '{}' behind an empty target source", target_type.name()),
            None => "empty target source".to_string(),
        };
        Ok(Arc::new(UnavailableTarget(description)))
    }
}

/// Stands in for a missing instance; fails only if a call actually reaches it.
struct UnavailableTarget(String);

#[async_trait::async_trait]
impl Target for UnavailableTarget {
    async fn invoke(&self, method: &MethodSignature, _arguments: Arguments) -> InvocationResult {
        Err(WeaveError::target_unavailable(format!("cannot invoke '{method}': {}", self.0)))
    }
}

impl fmt::Debug for dyn TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSource")
            .field("target_type", &self.target_type().map(|it| it.name().to_string()))
            .field("static", &self.is_static())
            .finish()
    }
}
