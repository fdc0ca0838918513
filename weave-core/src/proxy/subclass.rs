use std::sync::Arc;
use crate::config_error;
use crate::definition::{Contract, ContractSet};
use crate::error::{WeaveError, WeaveResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::{DispatchStrategy, Proxy, ProxyBuilder, Route};

/// Builds proxies deriving from the target's concrete type.
///
/// Every overridable method goes through the interceptor chain; methods that
/// cannot be overridden keep calling the real implementation directly.
#[derive(Debug, Default)]
pub struct SubclassProxyBuilder;

impl ProxyBuilder for SubclassProxyBuilder {
    fn strategy(&self) -> DispatchStrategy {
        DispatchStrategy::SubclassBased
    }

    fn build(&self, config: Arc<ProxyConfig>) -> WeaveResult<Proxy> {
        let target_type = config.target_type()
            .ok_or_else(|| WeaveError::configuration("Cannot build a subclass-based proxy without a target type"))?
            .clone();

        if target_type.is_sealed() {
            return config_error!("Cannot derive from sealed type '{}'", target_type.name());
        }
        if target_type.is_contract_only() {
            return config_error!(
                "Cannot derive from contract '{}': it has no implementation, use contract-based dispatch",
                target_type.name()
            );
        }

        let routes = target_type.methods().into_iter()
            .map(|method| {
                let route = if method.overridable { Route::Intercepted } else { Route::Direct };
                (method, route)
            })
            .collect::<Vec<_>>();

        // Whatever the class implements, what the user declared, and the marker
        let mut contracts: ContractSet = target_type.contracts().into_iter().collect();
        contracts.extend(config.contracts().iter().cloned());
        contracts.insert(Contract::managed_proxy());

        log::debug!(
            "Building subclass-based proxy for '{}': {} intercepted, {} direct method(s), {} interceptor(s)",
            target_type.name(),
            routes.iter().filter(|(_, route)| *route == Route::Intercepted).count(),
            routes.iter().filter(|(_, route)| *route == Route::Direct).count(),
            config.chain().len(),
        );

        let contracts = contracts.iter().cloned().collect();
        Ok(Proxy::new(config, DispatchStrategy::SubclassBased, target_type.name(), routes, contracts))
    }
}
