use std::sync::Arc;
use crate::config_error;
use crate::definition::{Contract, ContractSet, MethodSignature, TypeDescriptor};
use crate::error::{WeaveError, WeaveResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::{DispatchStrategy, Proxy, ProxyBuilder, Route};

/// Builds proxies that implement a set of contracts and nothing else.
///
/// Every contract method goes through the interceptor chain. Methods of the
/// target that no contract declares are not reachable through the proxy.
#[derive(Debug, Default)]
pub struct ContractProxyBuilder;

impl ContractProxyBuilder {
    /// Declared contracts, completed from the target type when none of them
    /// is a user contract, plus the marker contract.
    pub fn complete_contracts(config: &ProxyConfig, target_type: &dyn TypeDescriptor) -> ContractSet {
        let mut contracts = config.contracts().clone();
        if contracts.has_no_user_contracts() {
            contracts.extend(target_type.contracts());
        }
        contracts.insert(Contract::managed_proxy());
        contracts
    }
}

impl ProxyBuilder for ContractProxyBuilder {
    fn strategy(&self) -> DispatchStrategy {
        DispatchStrategy::ContractBased
    }

    fn build(&self, config: Arc<ProxyConfig>) -> WeaveResult<Proxy> {
        let target_type = config.target_type()
            .ok_or_else(|| WeaveError::configuration("Cannot build a contract-based proxy without a target type"))?
            .clone();

        let contracts = Self::complete_contracts(&config, target_type.as_ref());
        if contracts.user_contracts().next().is_none() {
            return config_error!(
                "Cannot build a contract-based proxy for '{}': it declares no contract to implement",
                target_type.name()
            );
        }

        let mut routes: Vec<(MethodSignature, Route)> = Vec::new();
        for method in contracts.iter().flat_map(|it| it.methods()) {
            if !routes.iter().any(|(known, _)| known.same_shape(method)) {
                routes.push((method.clone(), Route::Intercepted));
            }
        }

        log::debug!(
            "Building contract-based proxy for '{}' implementing [{}] with {} interceptor(s)",
            target_type.name(),
            contracts.iter().map(Contract::name).collect::<Vec<_>>().join(", "),
            config.chain().len(),
        );

        let contracts = contracts.iter().cloned().collect();
        Ok(Proxy::new(config, DispatchStrategy::ContractBased, target_type.name(), routes, contracts))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use serde_json::json;
    use crate::definition::{ConcreteType, FunctionType, MANAGED_PROXY_CONTRACT};
    use crate::error::WeaveError;
    use crate::target::{FnTarget, Target};
    use super::*;

    fn runnable() -> Contract {
        Contract::new("Runnable").with_method("run", 0)
    }

    fn widget() -> ConcreteType {
        ConcreteType::new("Widget")
            .with_method("spin", 1)
            .with_method("run", 0)
            .implementing(runnable())
    }

    fn echo() -> Arc<dyn Target> {
        Arc::new(FnTarget::new(|method, arguments| Ok(json!({ "method": method.name, "arguments": arguments }))))
    }

    #[tokio::test]
    async fn exposes_only_contract_methods() {
        let config = ProxyConfig::builder()
            .target_type(Arc::new(widget()))
            .target(echo())
            .contract(runnable())
            .build();

        let proxy = ContractProxyBuilder.build(Arc::new(config)).unwrap();

        assert_eq!(proxy.strategy(), DispatchStrategy::ContractBased);
        assert_eq!(proxy.call("run", vec![]).await.unwrap(), json!({ "method": "run", "arguments": [] }));
        assert!(matches!(
            proxy.call("spin", vec![json!(1)]).await.unwrap_err(),
            WeaveError::UnknownMethod { arity: 1, .. }
        ));
    }

    #[test]
    fn proxy_implements_the_marker_and_is_a_generated_type() {
        let config = ProxyConfig::builder().target_type(Arc::new(widget())).contract(runnable()).build();

        let proxy = ContractProxyBuilder.build(Arc::new(config)).unwrap();

        let names = proxy.contracts().iter().map(|it| it.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Runnable", MANAGED_PROXY_CONTRACT]);
        assert!(proxy.type_name().starts_with("Widget$$WeaveContract$$"));
        assert!(proxy.type_descriptor().is_already_generated());
    }

    #[test]
    fn completes_contracts_from_a_contract_target_type() {
        let config = ProxyConfig::builder().target_type(Arc::new(runnable())).build();

        let proxy = ContractProxyBuilder.build(Arc::new(config)).unwrap();

        assert_eq!(proxy.routes().len(), 1);
        assert!(proxy.routes()[0].0.matches("run", 0));
    }

    #[test]
    fn completes_contracts_from_a_function_type() {
        let supplier = Contract::new("Supplier").with_method("get", 0);
        let config = ProxyConfig::builder()
            .target_type(Arc::new(FunctionType::new("Main$$Lambda$1", supplier)))
            .contract(Contract::managed_proxy())
            .build();

        let proxy = ContractProxyBuilder.build(Arc::new(config)).unwrap();

        assert!(proxy.routes()[0].0.matches("get", 0));
    }

    #[test]
    fn nothing_to_implement_is_a_configuration_error() {
        let config = ProxyConfig::builder()
            .target_type(Arc::new(ConcreteType::new("Plain").with_method("spin", 0)))
            .build();

        let error = ContractProxyBuilder.build(Arc::new(config)).unwrap_err();
        assert!(error.is_configuration());
        assert!(error.to_string().contains("Plain"));
    }

    #[test]
    fn missing_target_type_is_a_configuration_error() {
        let config = ProxyConfig::builder().build();
        assert!(ContractProxyBuilder.build(Arc::new(config)).unwrap_err().is_configuration());
    }
}
