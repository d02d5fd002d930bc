//! Compiled predicates and their evaluation
//!
//! A [`Specification`] is a conjunction of [`Condition`]s plus the distinct
//! flag. Conditions on columns gate the entity as a whole. Every condition
//! on a relation gets a join of its own, so two conditions on `comicId` may
//! be satisfied by different comics. The entity contributes one result row
//! per combination of joined rows, one row taken from each join, where
//! every row satisfies its own condition. An entity with no related rows
//! joins a single row whose id is null.
//!
//! [`Specification::multiplicity`] returns that row count; the store repeats
//! each match that many times unless the specification is distinct.

use std::collections::BTreeMap;
use std::fmt;

use super::schema::{JoinResolver, Target};
use super::value::Value;
use crate::criteria::Operator;

/// A single comparison against a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Test {
    /// `= value`
    Equals(Value),
    /// `<> value`
    NotEquals(Value),
    /// `IN (values)`
    In(Vec<Value>),
    /// `NOT IN (values)`
    NotIn(Vec<Value>),
    /// `IS NOT NULL` when true, `IS NULL` when false
    Specified(bool),
    /// `> value`
    GreaterThan(Value),
    /// `>= value`
    GreaterThanOrEqual(Value),
    /// `< value`
    LessThan(Value),
    /// `<= value`
    LessThanOrEqual(Value),
    /// `LIKE '%needle%'`
    Contains(String),
    /// `NOT LIKE '%needle%'`
    DoesNotContain(String),
}

impl Test {
    /// The operator this test was compiled from
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match self {
            Self::Equals(_) => Operator::Equals,
            Self::NotEquals(_) => Operator::NotEquals,
            Self::In(_) => Operator::In,
            Self::NotIn(_) => Operator::NotIn,
            Self::Specified(_) => Operator::Specified,
            Self::GreaterThan(_) => Operator::GreaterThan,
            Self::GreaterThanOrEqual(_) => Operator::GreaterThanOrEqual,
            Self::LessThan(_) => Operator::LessThan,
            Self::LessThanOrEqual(_) => Operator::LessThanOrEqual,
            Self::Contains(_) => Operator::Contains,
            Self::DoesNotContain(_) => Operator::DoesNotContain,
        }
    }

    /// Evaluate against one value
    ///
    /// A null value fails every test except `Specified(false)`, matching SQL
    /// three-valued logic in a WHERE clause.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        if let Self::Specified(specified) = self {
            return value.is_null() != *specified;
        }
        if value.is_null() {
            return false;
        }
        match self {
            Self::Equals(expected) => value == expected,
            Self::NotEquals(expected) => value != expected,
            Self::In(values) => values.contains(value),
            Self::NotIn(values) => !values.contains(value),
            Self::GreaterThan(bound) => value.compare(bound).is_some_and(|o| o.is_gt()),
            Self::GreaterThanOrEqual(bound) => value.compare(bound).is_some_and(|o| o.is_ge()),
            Self::LessThan(bound) => value.compare(bound).is_some_and(|o| o.is_lt()),
            Self::LessThanOrEqual(bound) => value.compare(bound).is_some_and(|o| o.is_le()),
            Self::Contains(needle) => value.as_text().is_some_and(|text| text.contains(needle.as_str())),
            Self::DoesNotContain(needle) => {
                value.as_text().is_some_and(|text| !text.contains(needle.as_str()))
            }
            Self::Specified(_) => false,
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "= {v}"),
            Self::NotEquals(v) => write!(f, "<> {v}"),
            Self::In(vs) => write!(f, "IN ({})", join_values(vs)),
            Self::NotIn(vs) => write!(f, "NOT IN ({})", join_values(vs)),
            Self::Specified(true) => write!(f, "IS NOT NULL"),
            Self::Specified(false) => write!(f, "IS NULL"),
            Self::GreaterThan(v) => write!(f, "> {v}"),
            Self::GreaterThanOrEqual(v) => write!(f, ">= {v}"),
            Self::LessThan(v) => write!(f, "< {v}"),
            Self::LessThanOrEqual(v) => write!(f, "<= {v}"),
            Self::Contains(s) => write!(f, "LIKE '%{s}%'"),
            Self::DoesNotContain(s) => write!(f, "NOT LIKE '%{s}%'"),
        }
    }
}

/// One test applied to one field
pub struct Condition<E> {
    field: &'static str,
    target: Target<E>,
    test: Test,
}

impl<E> Condition<E> {
    /// Create a condition
    #[must_use]
    pub const fn new(field: &'static str, target: Target<E>, test: Test) -> Self {
        Self {
            field,
            target,
            test,
        }
    }

    /// Field name the condition was compiled from
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Where the compared value comes from
    #[must_use]
    pub const fn target(&self) -> Target<E> {
        self.target
    }

    /// The comparison
    #[must_use]
    pub const fn test(&self) -> &Test {
        &self.test
    }
}

impl<E> Clone for Condition<E> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            target: self.target,
            test: self.test.clone(),
        }
    }
}

impl<E> fmt::Debug for Condition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("field", &self.field)
            .field("target", &self.target)
            .field("test", &self.test)
            .finish()
    }
}

impl<E> fmt::Display for Condition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Column(_) => write!(f, "{} {}", self.field, self.test),
            Target::Join(relation) => write!(f, "{relation}.id {}", self.test),
        }
    }
}

/// Joined ids as seen by a LEFT join: no related rows yields one null row
fn left_join(ids: Vec<i64>) -> Vec<Value> {
    if ids.is_empty() {
        vec![Value::Null]
    } else {
        ids.into_iter().map(Value::Long).collect()
    }
}

/// A compiled, storage-independent query predicate
pub struct Specification<E> {
    conditions: Vec<Condition<E>>,
    distinct: bool,
}

impl<E> Default for Specification<E> {
    fn default() -> Self {
        Self::always()
    }
}

impl<E> Clone for Specification<E> {
    fn clone(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
            distinct: self.distinct,
        }
    }
}

impl<E> Specification<E> {
    /// A specification that matches every entity, without distinct
    #[must_use]
    pub const fn always() -> Self {
        Self {
            conditions: Vec::new(),
            distinct: false,
        }
    }

    /// Add a condition
    pub fn push(&mut self, condition: Condition<E>) {
        self.conditions.push(condition);
    }

    /// Builder-style [`Specification::push`]
    #[must_use]
    pub fn and(mut self, condition: Condition<E>) -> Self {
        self.push(condition);
        self
    }

    /// Set the distinct flag
    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    /// Whether duplicate entities produced by joins are collapsed
    #[must_use]
    pub const fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Conditions in evaluation order
    #[must_use]
    pub fn conditions(&self) -> &[Condition<E>] {
        &self.conditions
    }

    /// True when no condition restricts the result
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Number of result rows `entity` produces under this specification
    ///
    /// Zero means the entity does not match.
    pub fn multiplicity<R>(&self, entity: &E, joins: &R) -> u64
    where
        R: JoinResolver<E> + ?Sized,
    {
        let mut joined: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
        let mut rows: u64 = 1;

        for condition in &self.conditions {
            match condition.target {
                Target::Column(column) => {
                    if !condition.test.matches(&column(entity)) {
                        return 0;
                    }
                }
                Target::Join(relation) => {
                    let ids = joined
                        .entry(relation)
                        .or_insert_with(|| left_join(joins.related_ids(entity, relation)));
                    let satisfying = ids.iter().filter(|id| condition.test.matches(id)).count();
                    rows = rows.saturating_mul(satisfying as u64);
                }
            }
            if rows == 0 {
                return 0;
            }
        }
        rows
    }

    /// Whether `entity` matches at all
    pub fn matches<R>(&self, entity: &E, joins: &R) -> bool
    where
        R: JoinResolver<E> + ?Sized,
    {
        self.multiplicity(entity, joins) > 0
    }
}

impl<E> fmt::Debug for Specification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("conditions", &self.conditions)
            .field("distinct", &self.distinct)
            .finish()
    }
}

impl<E> fmt::Display for Specification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        if self.conditions.is_empty() {
            return write!(f, "TRUE");
        }
        let parts: Vec<String> = self.conditions.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}
