pub mod method;
pub mod contract;
pub mod type_descriptor;

pub use contract::{Contract, ContractSet, MANAGED_PROXY_CONTRACT};
pub use method::MethodSignature;
pub use type_descriptor::{ConcreteType, FunctionType, GeneratedType, TypeDescriptor, generated_name, is_generated_name};
