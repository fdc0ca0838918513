pub mod types;
pub mod error;
pub mod definition;
pub mod target;
pub mod interceptor;
pub mod proxy;

pub use error::{InvocationError, WeaveError, WeaveResult};
pub use interceptor::context::InvocationContext;
pub use interceptor::{Interceptor, InterceptorChain, InvocationResult};
pub use proxy::config::{ProxyConfig, ProxySettings};
pub use proxy::exposure::current_proxy;
pub use proxy::factory::{DefaultProxyFactory, ProxyFactory};
pub use proxy::{DispatchStrategy, Proxy};
pub use target::{Target, TargetSource};
