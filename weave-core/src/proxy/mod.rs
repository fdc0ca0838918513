use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use derive_more::Display;
use crate::definition::{Contract, GeneratedType, MethodSignature, TypeDescriptor, generated_name};
use crate::error::{WeaveError, WeaveResult};
use crate::interceptor::context::InvocationContext;
use crate::interceptor::{InvocationFuture, InvocationResult};
use crate::proxy::config::ProxyConfig;
use crate::target::{Target, TargetSource};
use crate::types::Arguments;

pub mod config;
pub mod selector;
pub mod contract;
pub mod subclass;
pub mod factory;
pub mod exposure;

/// How a proxy is wired to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DispatchStrategy {
    /// Implements the declared contracts only
    #[display("contract-based")]
    ContractBased,
    /// Derives from the target's concrete type
    #[display("subclass-based")]
    SubclassBased,
}

impl DispatchStrategy {
    /// Tag used in generated type names
    fn artifact_kind(&self) -> &'static str {
        match self {
            Self::ContractBased => "Contract",
            Self::SubclassBased => "Subclass",
        }
    }
}

/// Builds one variant of proxy from a configuration.
pub trait ProxyBuilder: Send + Sync {
    fn strategy(&self) -> DispatchStrategy;

    fn build(&self, config: Arc<ProxyConfig>) -> WeaveResult<Proxy>;
}

/// What a proxied method goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Through the interceptor chain
    Intercepted,
    /// Straight to the target: the method cannot be overridden
    Direct,
}

static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// A built intercepting wrapper.
///
/// Cheap to clone and safe to share: every clone dispatches through the same
/// read-only configuration and chain, and no state is kept between calls.
#[derive(Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

struct ProxyInner {
    config: Arc<ProxyConfig>,
    strategy: DispatchStrategy,
    descriptor: Arc<GeneratedType>,
    routes: Vec<(MethodSignature, Route)>,
}

impl Proxy {
    pub(crate) fn new(
        config: Arc<ProxyConfig>,
        strategy: DispatchStrategy,
        base_name: &str,
        routes: Vec<(MethodSignature, Route)>,
        contracts: Vec<Contract>,
    ) -> Self {
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let name = generated_name(base_name, strategy.artifact_kind(), sequence);
        let methods = routes.iter().map(|(method, _)| method.clone()).collect();

        Self {
            inner: Arc::new(ProxyInner {
                config,
                strategy,
                descriptor: Arc::new(GeneratedType::new(name, methods, contracts)),
                routes,
            }),
        }
    }

    pub fn strategy(&self) -> DispatchStrategy {
        self.inner.strategy
    }

    /// Generated type name, e.g. `Widget$$WeaveSubclass$$3`
    pub fn type_name(&self) -> &str {
        self.inner.descriptor.name()
    }

    /// The proxy's own type, usable as the target type of another proxy
    pub fn type_descriptor(&self) -> Arc<dyn TypeDescriptor> {
        self.inner.descriptor.clone()
    }

    /// Every callable method and how it is routed
    pub fn routes(&self) -> &[(MethodSignature, Route)] {
        &self.inner.routes
    }

    pub fn contracts(&self) -> Vec<Contract> {
        self.inner.descriptor.contracts()
    }

    /// The configuration behind the proxy, unless it was built opaque
    pub fn advised(&self) -> Option<&ProxyConfig> {
        if self.inner.config.settings().opaque {
            None
        } else {
            Some(&self.inner.config)
        }
    }

    /// Calls `method` through the proxy.
    ///
    /// Fails with `UnknownMethod` when the proxy does not expose a method with
    /// that name taking that many arguments. Anything raised by the
    /// interceptors or the target comes back unchanged.
    pub async fn call(&self, method: &str, arguments: Arguments) -> InvocationResult {
        let arity = arguments.len();
        let (signature, route) = self.inner.routes.iter()
            .find(|(signature, _)| signature.matches(method, arity))
            .ok_or_else(|| WeaveError::unknown_method(self.type_name(), method, arity))?;

        log::trace!("{} -> {} ({:?})", self.type_name(), signature, route);

        let source = self.inner.config.target_source();
        let target = source.target().await?;
        let lease = (!source.is_static()).then(|| Lease::new(source.clone(), target.clone()));

        let result = {
            let call = self.dispatch(target.as_ref(), signature, *route, arguments);
            if self.inner.config.settings().expose_proxy {
                exposure::expose(self.clone(), call).await
            } else {
                call.await
            }
        };
        drop(target);

        let Some(lease) = lease else {
            return result;
        };
        match (lease.release().await, result) {
            (Err(release_error), Ok(_)) => Err(release_error),
            (Err(release_error), Err(error)) => {
                log::warn!("{}: failed to release target after '{}' failed: {}", self.type_name(), signature, release_error);
                Err(error)
            }
            (Ok(()), result) => result,
        }
    }

    fn dispatch<'a>(
        &'a self,
        target: &'a dyn Target,
        signature: &'a MethodSignature,
        route: Route,
        arguments: Arguments,
    ) -> InvocationFuture<'a> {
        let chain = self.inner.config.chain();
        if route == Route::Direct || chain.is_empty() {
            return target.invoke(signature, arguments);
        }
        InvocationContext::new(target, signature, arguments, chain).proceed()
    }
}

/// A target handed out by a non-static source for the length of one call.
///
/// Released explicitly once the call completes. A lease dropped while the
/// call is still pending (the caller gave up on it) hands the target back on
/// a spawned task instead.
struct Lease {
    source: Arc<dyn TargetSource>,
    target: Option<Arc<dyn Target>>,
}

impl Lease {
    fn new(source: Arc<dyn TargetSource>, target: Arc<dyn Target>) -> Self {
        Self { source, target: Some(target) }
    }

    async fn release(mut self) -> WeaveResult<()> {
        match self.target.take() {
            Some(target) => self.source.release_target(target).await,
            None => Ok(()),
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        let Some(target) = self.target.take() else {
            return;
        };
        let source = self.source.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(error) = source.release_target(target).await {
                        log::warn!("Failed to release target of a cancelled call: {}", error);
                    }
                });
            }
            Err(_) => log::warn!("Cannot release target of a cancelled call: no runtime available"),
        }
    }
}

/// A proxy can itself be the target of another proxy.
#[async_trait::async_trait]
impl Target for Proxy {
    async fn invoke(&self, method: &MethodSignature, arguments: Arguments) -> InvocationResult {
        self.call(&method.name, arguments).await
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("type_name", &self.type_name())
            .field("strategy", &self.inner.strategy)
            .field("methods", &self.inner.routes.len())
            .finish()
    }
}
