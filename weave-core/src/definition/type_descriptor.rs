use std::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use crate::definition::contract::Contract;
use crate::definition::method::MethodSignature;

lazy_static! {
    /// `<Target>$$WeaveContract$$<n>` or `<Target>$$WeaveSubclass$$<n>`
    static ref GENERATED_NAME: Regex = Regex::new(r"\$\$Weave(Contract|Subclass)\$\$\d+$")
        .expect("generated name pattern is valid");
}

/// Whether `name` follows the naming convention of proxy types built by this crate
pub fn is_generated_name(name: &str) -> bool {
    GENERATED_NAME.is_match(name)
}

/// Builds a name following the generated artifact convention
pub fn generated_name(base: &str, kind: &str, sequence: usize) -> String {
    format!("{base}$$Weave{kind}$${sequence}")
}

/// Capability queries answered by a target type, resolved once when the
/// configuration is assembled.
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Interface-only type: signatures, no implementation to derive from
    fn is_contract_only(&self) -> bool {
        false
    }

    /// Already a dispatch artifact built at runtime
    fn is_already_generated(&self) -> bool {
        is_generated_name(self.name())
    }

    /// Cannot be derived from
    fn is_sealed(&self) -> bool {
        false
    }

    /// Anonymous single-method function type
    fn is_synthetic_function(&self) -> bool {
        false
    }

    /// Every method a derived wrapper would expose
    fn methods(&self) -> Vec<MethodSignature>;

    /// Contracts the type implements
    fn contracts(&self) -> Vec<Contract> {
        Vec::new()
    }
}

/// A concrete, instantiable type.
#[derive(Debug, Clone)]
pub struct ConcreteType {
    name: String,
    sealed: bool,
    methods: Vec<MethodSignature>,
    contracts: Vec<Contract>,
}

impl ConcreteType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sealed: false,
            methods: Vec::new(),
            contracts: Vec::new(),
        }
    }

    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, arity: usize) -> Self {
        let method = MethodSignature::new(name, arity).declared_by(self.name.clone());
        self.methods.push(method);
        self
    }

    /// A method derived wrappers cannot override, such as a finalization hook
    pub fn with_final_method(mut self, name: impl Into<String>, arity: usize) -> Self {
        let method = MethodSignature::new(name, arity)
            .declared_by(self.name.clone())
            .non_overridable();
        self.methods.push(method);
        self
    }

    pub fn implementing(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }
}

impl TypeDescriptor for ConcreteType {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_sealed(&self) -> bool {
        self.sealed
    }

    // Own methods first, then contract methods the type did not redeclare
    fn methods(&self) -> Vec<MethodSignature> {
        let mut methods = self.methods.clone();
        for method in self.contracts.iter().flat_map(|it| it.methods()) {
            if !methods.iter().any(|it| it.same_shape(method)) {
                methods.push(method.clone());
            }
        }
        methods
    }

    fn contracts(&self) -> Vec<Contract> {
        self.contracts.clone()
    }
}

/// A type built at runtime by a proxy builder.
#[derive(Debug, Clone)]
pub struct GeneratedType {
    name: String,
    methods: Vec<MethodSignature>,
    contracts: Vec<Contract>,
}

impl GeneratedType {
    pub fn new(name: impl Into<String>, methods: Vec<MethodSignature>, contracts: Vec<Contract>) -> Self {
        Self {
            name: name.into(),
            methods,
            contracts,
        }
    }
}

impl TypeDescriptor for GeneratedType {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_already_generated(&self) -> bool {
        true
    }

    // Generated wrappers are final
    fn is_sealed(&self) -> bool {
        true
    }

    fn methods(&self) -> Vec<MethodSignature> {
        self.methods.clone()
    }

    fn contracts(&self) -> Vec<Contract> {
        self.contracts.clone()
    }
}

/// Synthetic single-method function type, implementing one functional contract.
#[derive(Debug, Clone)]
pub struct FunctionType {
    name: String,
    contract: Contract,
}

impl FunctionType {
    /// `contract` should declare exactly the one method the function implements
    pub fn new(name: impl Into<String>, contract: Contract) -> Self {
        Self {
            name: name.into(),
            contract,
        }
    }
}

impl TypeDescriptor for FunctionType {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_sealed(&self) -> bool {
        true
    }

    fn is_synthetic_function(&self) -> bool {
        true
    }

    fn methods(&self) -> Vec<MethodSignature> {
        self.contract.methods().to_vec()
    }

    fn contracts(&self) -> Vec<Contract> {
        vec![self.contract.clone()]
    }
}
