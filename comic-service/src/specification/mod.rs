//! Storage-independent query specifications
//!
//! - [`Value`]: a column value
//! - [`Schema`]: the filterable fields of an entity
//! - [`Specification`]: a compiled conjunction of conditions with a distinct flag
//! - [`compile`]: criteria to specification
//!
//! The in-memory store evaluates specifications directly; see
//! [`Specification::multiplicity`] for the join semantics.

mod compiler;
mod predicate;
mod schema;
mod value;

pub use compiler::compile;
pub use predicate::{Condition, Specification, Test};
pub use schema::{
    Cardinality, Column, FieldDescriptor, FieldKind, JoinResolver, Schema, Target,
};
pub use value::Value;
