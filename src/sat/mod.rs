//! Bridge between the host's boolean decision variables and an incremental
//! satisfiability engine.

pub mod gates;
pub mod propagator;
pub mod registry;

pub use gates::{
    add_bool_and_array_eq_var, add_bool_and_array_equal_false, add_bool_and_eq_var,
    add_bool_eq, add_bool_le, add_bool_not, add_bool_or_array_equal_true,
};
pub use propagator::{Lifecycle, PropagatorStats, SatPropagator};
pub use registry::LiteralRegistry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("operand '{operand}' is not a boolean variable")]
    NotBoolean { operand: String },
    #[error("the propagator is already attached to the search")]
    AlreadyPosted,
}
