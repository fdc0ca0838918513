use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::definition::{Contract, ContractSet, TypeDescriptor};
use crate::error::{WeaveError, WeaveResult};
use crate::interceptor::{Interceptor, InterceptorChain};
use crate::target::{EmptyTargetSource, SingletonTargetSource, Target, TargetSource};

/// Behavioral flags of a proxy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Let the factory pick the faster dispatch when it can
    pub optimize: bool,
    /// Proxy the target's concrete type instead of its declared contracts
    pub proxy_target_class: bool,
    /// Make the proxy reachable through `current_proxy()` while it handles a call
    pub expose_proxy: bool,
    /// Hide the configuration from `Proxy::advised`
    pub opaque: bool,
}

impl ProxySettings {
    /// Parses settings from an already loaded JSON document. Missing keys keep their default.
    pub fn from_json(document: &str) -> WeaveResult<Self> {
        serde_json::from_str(document)
            .map_err(|e| WeaveError::configuration(format!("Invalid proxy settings: {e}")))
    }
}

/// Everything needed to decide on and build one proxy. Read-only once built.
pub struct ProxyConfig {
    target_type: Option<Arc<dyn TypeDescriptor>>,
    target_source: Arc<dyn TargetSource>,
    contracts: ContractSet,
    settings: ProxySettings,
    chain: InterceptorChain,
}

impl ProxyConfig {
    pub fn builder() -> ProxyConfigBuilder {
        ProxyConfigBuilder::default()
    }

    /// Target type as resolved when the configuration was built
    pub fn target_type(&self) -> Option<&Arc<dyn TypeDescriptor>> {
        self.target_type.as_ref()
    }

    pub fn target_source(&self) -> &Arc<dyn TargetSource> {
        &self.target_source
    }

    /// Contracts declared by the user
    pub fn contracts(&self) -> &ContractSet {
        &self.contracts
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    pub fn interceptor_names(&self) -> Vec<&str> {
        self.chain.iter().map(|it| it.name()).collect()
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("target_type", &self.target_type.as_ref().map(|it| it.name()))
            .field("target_source", &self.target_source)
            .field("contracts", &self.contracts.iter().map(Contract::name).collect::<Vec<_>>())
            .field("settings", &self.settings)
            .field("chain", &self.interceptor_names())
            .finish()
    }
}

#[derive(Default)]
pub struct ProxyConfigBuilder {
    target_type: Option<Arc<dyn TypeDescriptor>>,
    target_source: Option<Arc<dyn TargetSource>>,
    contracts: ContractSet,
    settings: ProxySettings,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ProxyConfigBuilder {
    pub fn target_type(mut self, target_type: Arc<dyn TypeDescriptor>) -> Self {
        self.target_type = Some(target_type);
        self
    }

    /// Shorthand for a singleton target source around `target`
    pub fn target(self, target: Arc<dyn Target>) -> Self {
        self.target_source(Arc::new(SingletonTargetSource::new(target)))
    }

    pub fn target_source(mut self, target_source: Arc<dyn TargetSource>) -> Self {
        self.target_source = Some(target_source);
        self
    }

    /// Adds a contract; one with an already declared name is ignored
    pub fn contract(mut self, contract: Contract) -> Self {
        self.contracts.insert(contract);
        self
    }

    pub fn contracts(mut self, contracts: impl IntoIterator<Item = Contract>) -> Self {
        self.contracts.extend(contracts);
        self
    }

    pub fn settings(mut self, settings: ProxySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.settings.optimize = optimize;
        self
    }

    pub fn proxy_target_class(mut self, proxy_target_class: bool) -> Self {
        self.settings.proxy_target_class = proxy_target_class;
        self
    }

    pub fn expose_proxy(mut self, expose_proxy: bool) -> Self {
        self.settings.expose_proxy = expose_proxy;
        self
    }

    pub fn opaque(mut self, opaque: bool) -> Self {
        self.settings.opaque = opaque;
        self
    }

    /// Appends to the chain; interceptors run in the order they are added
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn interceptors(mut self, interceptors: impl IntoIterator<Item = Arc<dyn Interceptor>>) -> Self {
        self.interceptors.extend(interceptors);
        self
    }

    /// Resolves the target type once: the explicit type, else the target
    /// source's, else the first declared user contract.
    pub fn build(self) -> ProxyConfig {
        let target_source = self.target_source
            .unwrap_or_else(|| Arc::new(EmptyTargetSource::new()));
        let target_type = self.target_type
            .or_else(|| target_source.target_type())
            .or_else(|| {
                self.contracts.user_contracts().next()
                    .map(|contract| Arc::new(contract.clone()) as Arc<dyn TypeDescriptor>)
            });

        ProxyConfig {
            target_type,
            target_source,
            contracts: self.contracts,
            settings: self.settings,
            chain: self.interceptors.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::definition::ConcreteType;
    use crate::target::FnTarget;
    use serde_json::json;
    use super::*;

    #[test]
    fn settings_from_partial_json() {
        let settings = ProxySettings::from_json(r#"{ "proxy_target_class": true, "opaque": true }"#).unwrap();

        assert_eq!(settings, ProxySettings { proxy_target_class: true, opaque: true, ..Default::default() });
        assert!(ProxySettings::from_json("{ not json").unwrap_err().is_configuration());
    }

    #[test]
    fn target_type_falls_back_to_the_source() {
        let target: Arc<dyn Target> = Arc::new(FnTarget::new(|_, _| Ok(json!(null))));
        let source = SingletonTargetSource::typed(target, Arc::new(ConcreteType::new("FromSource")));

        let config = ProxyConfig::builder().target_source(Arc::new(source)).build();
        assert_eq!(config.target_type().unwrap().name(), "FromSource");

        let explicit = ProxyConfig::builder()
            .target_type(Arc::new(ConcreteType::new("Explicit")))
            .build();
        assert_eq!(explicit.target_type().unwrap().name(), "Explicit");
        assert!(ProxyConfig::builder().build().target_type().is_none());
    }

    #[test]
    fn target_type_can_be_inferred_from_a_user_contract() {
        let config = ProxyConfig::builder()
            .contracts([Contract::managed_proxy(), Contract::new("Runnable"), Contract::new("Closeable")])
            .build();

        let target_type = config.target_type().unwrap();
        assert_eq!(target_type.name(), "Runnable");
        assert!(target_type.is_contract_only());

        let marker_only = ProxyConfig::builder().contract(Contract::managed_proxy()).build();
        assert!(marker_only.target_type().is_none());
    }

    #[test]
    fn declared_contracts_behave_as_a_set() {
        let config = ProxyConfig::builder()
            .contract(Contract::new("Runnable"))
            .contracts([Contract::new("Closeable"), Contract::new("Runnable")])
            .build();

        assert_eq!(config.contracts().len(), 2);
    }
}
