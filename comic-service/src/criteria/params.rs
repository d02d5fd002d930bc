//! Reading criteria from query parameters
//!
//! Filters arrive as `field.operator=value` pairs, for example
//! `issuenumber.greaterThan=3` or `seriesId.in=1,2`. List operators take
//! comma-separated values and accumulate across repeated keys; scalar
//! operators keep the last value given. `distinct=true|false` sets the
//! distinct flag. Paging keys are left for the caller.
//!
//! # Example
//!
//! ```rust
//! use comic_service::criteria::{parse_criteria, IntegerFilter, RelationFilter};
//! use comic_service::domain::Comic;
//! use comic_service::domain::Entity;
//!
//! let params = [
//!     ("issuenumber.lessThan", "10"),
//!     ("seriesId.in", "1, 2"),
//!     ("sort", "id,desc"),
//! ];
//! let criteria = parse_criteria(Comic::schema(), params).unwrap();
//!
//! assert_eq!(
//!     criteria.get_as::<IntegerFilter>("issuenumber").and_then(|f| f.less_than),
//!     Some(10)
//! );
//! assert_eq!(
//!     criteria.get_as::<RelationFilter>("seriesId").and_then(|f| f.in_list.clone()),
//!     Some(vec![1, 2])
//! );
//! ```

use super::error::CriteriaError;
use super::filter::{FieldFilter, Filter, Operator, RangeFilter, StringFilter};
use super::set::Criteria;
use crate::specification::Schema;

/// Query key carrying the distinct flag
pub const DISTINCT_PARAM: &str = "distinct";

/// Query keys owned by paging and sorting
pub const PAGING_PARAMS: [&str; 3] = ["page", "size", "sort"];

/// Operand types a filter can be parsed into
pub trait FilterOperand: Sized {
    /// Parse one operand from its textual form
    fn parse_operand(raw: &str) -> Result<Self, String>;
}

impl FilterOperand for i64 {
    fn parse_operand(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e| format!("expected a long: {e}"))
    }
}

impl FilterOperand for i32 {
    fn parse_operand(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e| format!("expected an integer: {e}"))
    }
}

impl FilterOperand for String {
    fn parse_operand(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FilterOperand for bool {
    fn parse_operand(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err("expected a boolean".to_string()),
        }
    }
}

/// Build criteria for `schema` from `(key, value)` query pairs
///
/// # Errors
///
/// - [`CriteriaError::SchemaMismatch`] for a key that is not `distinct`, a
///   paging key, or `field.operator` with a field of the schema and an
///   operator that field supports
/// - [`CriteriaError::MalformedFilterValue`] when a value cannot be parsed
///   as the field's type
pub fn parse_criteria<E, K, V>(
    schema: &Schema<E>,
    params: impl IntoIterator<Item = (K, V)>,
) -> Result<Criteria, CriteriaError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut criteria = Criteria::new();

    for (key, value) in params {
        let (key, raw) = (key.as_ref(), value.as_ref());

        if PAGING_PARAMS.contains(&key) {
            continue;
        }

        if key == DISTINCT_PARAM {
            let distinct = bool::parse_operand(raw).map_err(|reason| {
                CriteriaError::malformed_value(DISTINCT_PARAM, Operator::Equals.as_str(), raw, reason)
            })?;
            criteria.set_distinct(distinct);
            continue;
        }

        let Some((name, op_name)) = key.split_once('.') else {
            return Err(CriteriaError::schema_mismatch(
                schema.entity(),
                key,
                "expected a parameter of the form field.operator",
            ));
        };

        let field = schema.field(name).ok_or_else(|| {
            CriteriaError::schema_mismatch(schema.entity(), name, "unknown field")
        })?;

        let op = Operator::parse(op_name).ok_or_else(|| {
            CriteriaError::schema_mismatch(
                schema.entity(),
                name,
                format!("unknown operator '{op_name}'"),
            )
        })?;

        let kind = field.kind();
        let slot = criteria.slot_or_insert_with(name, || kind.empty_filter());
        apply(slot, schema.entity(), name, op, raw)?;
    }

    Ok(criteria)
}

fn apply(
    slot: &mut FieldFilter,
    entity: &str,
    field: &str,
    op: Operator,
    raw: &str,
) -> Result<(), CriteriaError> {
    let filter_name = slot.name();
    let applied = match slot {
        FieldFilter::Long(filter) => apply_range(filter, field, op, raw)?,
        FieldFilter::Integer(filter) => apply_range(filter, field, op, raw)?,
        FieldFilter::String(filter) => apply_string(filter, field, op, raw)?,
        FieldFilter::Boolean(filter) => apply_common(filter, field, op, raw)?,
        FieldFilter::Relation(filter) => apply_range(&mut filter.filter, field, op, raw)?,
    };

    if applied {
        Ok(())
    } else {
        Err(CriteriaError::schema_mismatch(
            entity,
            field,
            format!("operator '{op}' is not supported by {filter_name}"),
        ))
    }
}

fn operand<T: FilterOperand>(field: &str, op: Operator, raw: &str) -> Result<T, CriteriaError> {
    T::parse_operand(raw)
        .map_err(|reason| CriteriaError::malformed_value(field, op.as_str(), raw, reason))
}

fn operands<T: FilterOperand>(
    field: &str,
    op: Operator,
    raw: &str,
) -> Result<Vec<T>, CriteriaError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|item| operand(field, op, item.trim()))
        .collect()
}

/// Returns `Ok(false)` when `op` is not one of the common operators
fn apply_common<T: FilterOperand>(
    filter: &mut Filter<T>,
    field: &str,
    op: Operator,
    raw: &str,
) -> Result<bool, CriteriaError> {
    match op {
        Operator::Equals => filter.equals = Some(operand(field, op, raw)?),
        Operator::NotEquals => filter.not_equals = Some(operand(field, op, raw)?),
        Operator::In => filter
            .in_list
            .get_or_insert_with(Vec::new)
            .extend(operands(field, op, raw)?),
        Operator::NotIn => filter
            .not_in
            .get_or_insert_with(Vec::new)
            .extend(operands(field, op, raw)?),
        Operator::Specified => filter.specified = Some(operand(field, op, raw)?),
        _ => return Ok(false),
    }
    Ok(true)
}

fn apply_range<T: FilterOperand>(
    filter: &mut RangeFilter<T>,
    field: &str,
    op: Operator,
    raw: &str,
) -> Result<bool, CriteriaError> {
    match op {
        Operator::GreaterThan => filter.greater_than = Some(operand(field, op, raw)?),
        Operator::GreaterThanOrEqual => {
            filter.greater_than_or_equal = Some(operand(field, op, raw)?);
        }
        Operator::LessThan => filter.less_than = Some(operand(field, op, raw)?),
        Operator::LessThanOrEqual => filter.less_than_or_equal = Some(operand(field, op, raw)?),
        _ => return apply_common(&mut filter.filter, field, op, raw),
    }
    Ok(true)
}

fn apply_string(
    filter: &mut StringFilter,
    field: &str,
    op: Operator,
    raw: &str,
) -> Result<bool, CriteriaError> {
    match op {
        Operator::Contains => filter.contains = Some(raw.to_string()),
        Operator::DoesNotContain => filter.does_not_contain = Some(raw.to_string()),
        _ => return apply_common(&mut filter.filter, field, op, raw),
    }
    Ok(true)
}
