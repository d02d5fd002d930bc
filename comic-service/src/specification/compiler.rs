//! Turning criteria into specifications
//!
//! [`compile`] validates a [`Criteria`] against an entity [`Schema`] and
//! emits one [`Condition`] per set operator. It is pure: the same criteria
//! and schema always produce the same specification.
//!
//! # Example
//!
//! ```rust
//! use comic_service::criteria::Criteria;
//! use comic_service::domain::{Comic, Entity};
//! use comic_service::specification::compile;
//!
//! let mut criteria = Criteria::new();
//! criteria.integer("issuenumber").equals = Some(5);
//! criteria.relation("seriesId").in_list = Some(vec![1, 2]);
//! criteria.set_distinct(true);
//!
//! let spec = compile(Comic::schema(), Some(&criteria)).unwrap();
//! assert!(spec.is_distinct());
//! assert_eq!(spec.to_string(), "DISTINCT issuenumber = 5 AND series.id IN (1, 2)");
//!
//! let all = compile(Comic::schema(), None).unwrap();
//! assert!(all.is_unrestricted());
//! ```

use super::predicate::{Condition, Specification, Test};
use super::schema::Schema;
use super::value::Value;
use crate::criteria::{Criteria, CriteriaError, FieldFilter, Filter, RangeFilter, StringFilter};

/// Compile criteria into a specification for `schema`
///
/// `None` yields a specification that matches everything without distinct.
/// Otherwise the distinct flag is taken from the criteria, every named field
/// is checked against the schema, and conditions are emitted field by field
/// in schema order. Empty filters contribute nothing.
///
/// # Errors
///
/// Returns [`CriteriaError::SchemaMismatch`] when the criteria names a field
/// the schema does not declare, or gives a field a filter of the wrong shape.
pub fn compile<E>(
    schema: &Schema<E>,
    criteria: Option<&Criteria>,
) -> Result<Specification<E>, CriteriaError> {
    let mut spec = Specification::always();
    let Some(criteria) = criteria else {
        return Ok(spec);
    };

    if let Some(distinct) = criteria.distinct() {
        spec.set_distinct(distinct);
    }

    for (name, filter) in criteria.fields() {
        let field = schema.field(name).ok_or_else(|| {
            CriteriaError::schema_mismatch(schema.entity(), name, "unknown field")
        })?;
        if !field.kind().accepts(filter) {
            return Err(CriteriaError::schema_mismatch(
                schema.entity(),
                name,
                format!(
                    "expected {} but found {}",
                    field.kind().filter_name(),
                    filter.name()
                ),
            ));
        }
    }

    for field in schema.fields() {
        let Some(filter) = criteria.get(field.name()) else {
            continue;
        };
        if filter.is_empty() {
            continue;
        }
        for test in field_tests(filter) {
            spec.push(Condition::new(field.name(), field.target(), test));
        }
    }

    tracing::trace!(
        entity = schema.entity(),
        conditions = spec.conditions().len(),
        distinct = spec.is_distinct(),
        "Compiled specification"
    );

    Ok(spec)
}

/// Tests for every set operator, in operator order
fn field_tests(filter: &FieldFilter) -> Vec<Test> {
    let mut out = Vec::new();
    match filter {
        FieldFilter::Long(f) => range_tests(f, &mut out),
        FieldFilter::Integer(f) => range_tests(f, &mut out),
        FieldFilter::String(f) => string_tests(f, &mut out),
        FieldFilter::Boolean(f) => common_tests(f, &mut out),
        FieldFilter::Relation(f) => range_tests(&f.filter, &mut out),
    }
    out
}

fn to_values<T: Clone + Into<Value>>(values: &[T]) -> Vec<Value> {
    values.iter().cloned().map(Into::into).collect()
}

fn common_tests<T: Clone + Into<Value>>(filter: &Filter<T>, out: &mut Vec<Test>) {
    if let Some(v) = &filter.equals {
        out.push(Test::Equals(v.clone().into()));
    }
    if let Some(v) = &filter.not_equals {
        out.push(Test::NotEquals(v.clone().into()));
    }
    if let Some(vs) = &filter.in_list {
        out.push(Test::In(to_values(vs)));
    }
    if let Some(vs) = &filter.not_in {
        out.push(Test::NotIn(to_values(vs)));
    }
    if let Some(specified) = filter.specified {
        out.push(Test::Specified(specified));
    }
}

fn range_tests<T: Clone + Into<Value>>(filter: &RangeFilter<T>, out: &mut Vec<Test>) {
    common_tests(&filter.filter, out);
    if let Some(v) = &filter.greater_than {
        out.push(Test::GreaterThan(v.clone().into()));
    }
    if let Some(v) = &filter.greater_than_or_equal {
        out.push(Test::GreaterThanOrEqual(v.clone().into()));
    }
    if let Some(v) = &filter.less_than {
        out.push(Test::LessThan(v.clone().into()));
    }
    if let Some(v) = &filter.less_than_or_equal {
        out.push(Test::LessThanOrEqual(v.clone().into()));
    }
}

fn string_tests(filter: &StringFilter, out: &mut Vec<Test>) {
    common_tests(&filter.filter, out);
    if let Some(needle) = &filter.contains {
        out.push(Test::Contains(needle.clone()));
    }
    if let Some(needle) = &filter.does_not_contain {
        out.push(Test::DoesNotContain(needle.clone()));
    }
}
