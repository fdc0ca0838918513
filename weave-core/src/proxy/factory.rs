use std::sync::Arc;
use crate::config_error;
use crate::error::WeaveResult;
use crate::proxy::config::ProxyConfig;
use crate::proxy::contract::ContractProxyBuilder;
use crate::proxy::selector::StrategySelector;
use crate::proxy::subclass::SubclassProxyBuilder;
use crate::proxy::{DispatchStrategy, Proxy, ProxyBuilder};

/// Entry point: turns a configuration into a working proxy.
pub trait ProxyFactory: Send + Sync {
    fn create(&self, config: ProxyConfig) -> WeaveResult<Proxy>;
}

/// Picks the strategy with [`StrategySelector`] and hands the configuration
/// to the matching builder. Configuration errors surface as they are, the
/// factory never retries with the other strategy.
pub struct DefaultProxyFactory {
    contract_builder: Arc<dyn ProxyBuilder>,
    subclass_builder: Arc<dyn ProxyBuilder>,
}

impl DefaultProxyFactory {
    pub fn new() -> Self {
        Self {
            contract_builder: Arc::new(ContractProxyBuilder),
            subclass_builder: Arc::new(SubclassProxyBuilder),
        }
    }

    /// Replaces the builders. Each one must build the strategy it is registered for.
    pub fn with_builders(
        contract_builder: Arc<dyn ProxyBuilder>,
        subclass_builder: Arc<dyn ProxyBuilder>,
    ) -> WeaveResult<Self> {
        for (builder, expected) in [
            (&contract_builder, DispatchStrategy::ContractBased),
            (&subclass_builder, DispatchStrategy::SubclassBased),
        ] {
            if builder.strategy() != expected {
                return config_error!(
                    "Cannot register a {} builder for {} dispatch",
                    builder.strategy(),
                    expected
                );
            }
        }

        Ok(Self {
            contract_builder,
            subclass_builder,
        })
    }

    fn builder_for(&self, strategy: DispatchStrategy) -> &Arc<dyn ProxyBuilder> {
        match strategy {
            DispatchStrategy::ContractBased => &self.contract_builder,
            DispatchStrategy::SubclassBased => &self.subclass_builder,
        }
    }
}

impl Default for DefaultProxyFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyFactory for DefaultProxyFactory {
    fn create(&self, config: ProxyConfig) -> WeaveResult<Proxy> {
        let strategy = StrategySelector::decide(&config)?;
        let proxy = self.builder_for(strategy).build(Arc::new(config))?;
        log::debug!("Created {} proxy '{}'", proxy.strategy(), proxy.type_name());
        Ok(proxy)
    }
}
