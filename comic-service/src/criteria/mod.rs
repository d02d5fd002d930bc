//! Filter criteria
//!
//! Criteria describe, field by field, which entities a caller wants. They
//! are built programmatically or read from query parameters with
//! [`parse_criteria`], then compiled into a
//! [`Specification`](crate::specification::Specification).

mod error;
mod filter;
mod params;
mod set;

pub use error::{CriteriaError, CriteriaErrorKind};
pub use filter::{
    BooleanFilter, FieldFilter, Filter, IntegerFilter, LongFilter, Operator, RangeFilter,
    RelationFilter, StringFilter, TypedFilter,
};
pub use params::{parse_criteria, FilterOperand, DISTINCT_PARAM, PAGING_PARAMS};
pub use set::Criteria;
