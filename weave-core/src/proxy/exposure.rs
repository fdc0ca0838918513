use crate::error::{WeaveError, WeaveResult};
use crate::proxy::Proxy;

tokio::task_local! {
    static CURRENT_PROXY: Proxy;
}

/// The proxy handling the call currently running on this task.
///
/// Only available to proxies built with `expose_proxy`, and only on the task
/// that entered the proxy: work spawned onto other tasks does not inherit it.
/// Calling back through the returned proxy runs the interceptor chain again,
/// which a plain `self` call inside the target would bypass.
pub fn current_proxy() -> WeaveResult<Proxy> {
    CURRENT_PROXY.try_with(Proxy::clone)
        .map_err(|_| WeaveError::configuration(
            "Cannot find current proxy: set 'expose_proxy' to make it available, and call from the task handling the invocation"
        ))
}

pub(crate) async fn expose<F: Future>(proxy: Proxy, call: F) -> F::Output {
    CURRENT_PROXY.scope(proxy, call).await
}
