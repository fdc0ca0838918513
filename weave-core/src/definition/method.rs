use derive_more::Display;

/// Identity of a callable method: its name and how many arguments it takes.
///
/// `overridable` is false for methods a derived wrapper cannot replace
/// (finalization hooks, sealed methods): subclass-based proxies route those
/// straight to the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{name}/{arity}")]
pub struct MethodSignature {
    pub name: String,
    pub arity: usize,
    pub overridable: bool,
    /// Contract or type that declares the method, if known
    pub declared_by: Option<String>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            overridable: true,
            declared_by: None,
        }
    }

    /// Marks the method as one a derived wrapper cannot override
    pub fn non_overridable(mut self) -> Self {
        self.overridable = false;
        self
    }

    pub fn declared_by(mut self, owner: impl Into<String>) -> Self {
        self.declared_by = Some(owner.into());
        self
    }

    pub fn matches(&self, name: &str, arity: usize) -> bool {
        self.name == name && self.arity == arity
    }

    /// Same name and arity, regardless of where it was declared
    pub fn same_shape(&self, other: &MethodSignature) -> bool {
        self.matches(&other.name, other.arity)
    }
}
