use crate::definition::method::MethodSignature;
use crate::definition::type_descriptor::TypeDescriptor;

/// Name of the sentinel contract every built proxy implements.
pub const MANAGED_PROXY_CONTRACT: &str = "ManagedProxy";

/// A named set of method signatures a type claims to implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    name: String,
    methods: Vec<MethodSignature>,
    /// Names of the contracts this one extends
    extends: Vec<String>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            extends: Vec::new(),
        }
    }

    /// The marker contract: "this object is already a managed proxy"
    pub fn managed_proxy() -> Self {
        Self::new(MANAGED_PROXY_CONTRACT)
    }

    pub fn with_method(mut self, name: impl Into<String>, arity: usize) -> Self {
        let method = MethodSignature::new(name, arity).declared_by(self.name.clone());
        if !self.methods.iter().any(|it| it.same_shape(&method)) {
            self.methods.push(method);
        }
        self
    }

    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends.push(parent.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// True for the marker contract itself and for contracts deriving from it
    pub fn is_marker(&self) -> bool {
        self.name == MANAGED_PROXY_CONTRACT || self.extends.iter().any(|it| it == MANAGED_PROXY_CONTRACT)
    }

    pub fn find_method(&self, name: &str, arity: usize) -> Option<&MethodSignature> {
        self.methods.iter().find(|it| it.matches(name, arity))
    }
}

/// A contract is a type too: one with no implementation, only signatures.
impl TypeDescriptor for Contract {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_contract_only(&self) -> bool {
        true
    }

    fn methods(&self) -> Vec<MethodSignature> {
        self.methods.clone()
    }

    fn contracts(&self) -> Vec<Contract> {
        vec![self.clone()]
    }
}

/// Contracts keyed by name: no duplicates, insertion order kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractSet(Vec<Contract>);

impl ContractSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns false when a contract with the same name was already present
    pub fn insert(&mut self, contract: Contract) -> bool {
        if self.contains(contract.name()) {
            return false;
        }
        self.0.push(contract);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|it| it.name() == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contract> {
        self.0.iter()
    }

    /// Empty, or only the marker contract: the set exists for bookkeeping,
    /// it does not describe behavior the user asked to proxy.
    pub fn has_no_user_contracts(&self) -> bool {
        match self.0.as_slice() {
            [] => true,
            [single] => single.is_marker(),
            _ => false,
        }
    }

    /// Contracts that are not markers
    pub fn user_contracts(&self) -> impl Iterator<Item = &Contract> {
        self.0.iter().filter(|it| !it.is_marker())
    }

    /// First method matching name and arity, in contract order
    pub fn find_method(&self, name: &str, arity: usize) -> Option<&MethodSignature> {
        self.0.iter().find_map(|it| it.find_method(name, arity))
    }
}

impl FromIterator<Contract> for ContractSet {
    fn from_iter<T: IntoIterator<Item = Contract>>(iter: T) -> Self {
        let mut set = ContractSet::new();
        for contract in iter {
            set.insert(contract);
        }
        set
    }
}

impl Extend<Contract> for ContractSet {
    fn extend<T: IntoIterator<Item = Contract>>(&mut self, iter: T) {
        for contract in iter {
            self.insert(contract);
        }
    }
}
