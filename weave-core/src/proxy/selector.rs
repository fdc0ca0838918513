use crate::error::WeaveResult;
use crate::proxy::DispatchStrategy;
use crate::proxy::config::ProxyConfig;
use crate::config_error;

/// Decides which dispatch strategy can wrap a target.
///
/// Subclass-based dispatch wins as soon as the configuration asks for it
/// (`optimize`, `proxy_target_class`) or has nothing else to offer (no user
/// contract). Only then is the target type checked: contracts, generated
/// artifacts and synthetic function types cannot be derived from and fall
/// back to contract-based dispatch. Flags are evaluated before the type
/// checks; a type check only vetoes a request it cannot satisfy.
pub struct StrategySelector;

impl StrategySelector {
    pub fn decide(config: &ProxyConfig) -> WeaveResult<DispatchStrategy> {
        let settings = config.settings();
        if !(settings.optimize || settings.proxy_target_class || config.contracts().has_no_user_contracts()) {
            return Ok(DispatchStrategy::ContractBased);
        }

        let Some(target_type) = config.target_type() else {
            return config_error!(
                "Cannot determine target type: either a contract, a target type or a typed target is required for proxy creation"
            );
        };

        let strategy = if target_type.is_contract_only()
            || target_type.is_already_generated()
            || target_type.is_synthetic_function()
        {
            DispatchStrategy::ContractBased
        } else {
            DispatchStrategy::SubclassBased
        };

        log::debug!(
            "Selected {} dispatch for '{}' (optimize: {}, proxy_target_class: {}, contracts: {})",
            strategy,
            target_type.name(),
            settings.optimize,
            settings.proxy_target_class,
            config.contracts().len(),
        );
        Ok(strategy)
    }
}
