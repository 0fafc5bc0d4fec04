#![deny(missing_docs)]
#![doc = "Error taxonomy and plan data model shared by the plansym crates."]

pub mod causal;
pub mod errors;
pub mod plan;

pub use causal::{CausalStructure, Consumer, PcLink, Producer};
pub use errors::{ErrorInfo, SymError};
pub use plan::{
    Atom, Binding, Constant, Domain, Literal, Operator, PartialPlan, Predicate, Problem,
    Substitution, Type, Variable, GOAL_OPERATOR, INIT_OPERATOR,
};
