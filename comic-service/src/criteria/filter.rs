//! Per-field filters
//!
//! A filter bundles every constraint a caller may place on one field. All
//! operators are optional and independent; a filter with no operator set is
//! empty and imposes nothing. When several operators are set on one filter
//! they combine with AND.
//!
//! - [`Filter`]: `equals`, `notEquals`, `in`, `notIn`, `specified`
//! - [`RangeFilter`]: adds `greaterThan`, `greaterThanOrEqual`, `lessThan`,
//!   `lessThanOrEqual` for ordered types
//! - [`StringFilter`]: adds `contains`, `doesNotContain` for text
//! - [`RelationFilter`]: a [`LongFilter`] on the id of a joined entity
//!
//! # Example
//!
//! ```rust
//! use comic_service::criteria::{BooleanFilter, IntegerFilter};
//!
//! let mut issue = IntegerFilter::default();
//! assert!(issue.is_empty());
//!
//! issue.greater_than_or_equal = Some(2);
//! issue.not_in = Some(vec![3, 4]);
//! assert!(!issue.is_empty());
//! assert_eq!(issue.to_string(), "[notIn=[3, 4], greaterThanOrEqual=2]");
//!
//! let flag = BooleanFilter::default().with_specified(true);
//! assert_eq!(flag.specified, Some(true));
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Filter on a 64-bit integer field
pub type LongFilter = RangeFilter<i64>;

/// Filter on a 32-bit integer field
pub type IntegerFilter = RangeFilter<i32>;

/// Filter on a boolean field
pub type BooleanFilter = Filter<bool>;


/// Operator vocabulary shared by filters, query parameters and predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Value equals the operand
    Equals,
    /// Value differs from the operand
    NotEquals,
    /// Value is one of the operands
    In,
    /// Value is none of the operands
    NotIn,
    /// Value is present (`true`) or absent (`false`)
    Specified,
    /// Value is strictly greater
    GreaterThan,
    /// Value is greater or equal
    GreaterThanOrEqual,
    /// Value is strictly less
    LessThan,
    /// Value is less or equal
    LessThanOrEqual,
    /// Text contains the operand
    Contains,
    /// Text does not contain the operand
    DoesNotContain,
}

impl Operator {
    /// Every operator, in the order conditions are emitted for one field
    pub const ALL: [Self; 11] = [
        Self::Equals,
        Self::NotEquals,
        Self::In,
        Self::NotIn,
        Self::Specified,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::Contains,
        Self::DoesNotContain,
    ];

    /// Wire name of the operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Specified => "specified",
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThan => "lessThan",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::Contains => "contains",
            Self::DoesNotContain => "doesNotContain",
        }
    }

    /// Parse a wire name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// True for operators that take a list of operands
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn push_scalar<T: fmt::Display>(out: &mut Vec<String>, op: Operator, value: Option<&T>) {
    if let Some(value) = value {
        out.push(format!("{op}={value}"));
    }
}

fn push_list<T: fmt::Display>(out: &mut Vec<String>, op: Operator, values: Option<&Vec<T>>) {
    if let Some(values) = values {
        let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
        out.push(format!("{op}=[{}]", joined.join(", ")));
    }
}

/// Equality, membership and presence constraints on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<T> {
    /// `equals`
    pub equals: Option<T>,
    /// `notEquals`
    pub not_equals: Option<T>,
    /// `in`
    pub in_list: Option<Vec<T>>,
    /// `notIn`
    pub not_in: Option<Vec<T>>,
    /// `specified`
    pub specified: Option<bool>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            not_in: None,
            specified: None,
        }
    }
}

impl<T> Filter<T> {
    /// True when no operator is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.in_list.is_none()
            && self.not_in.is_none()
            && self.specified.is_none()
    }

    /// Set `equals`
    #[must_use]
    pub fn with_equals(mut self, value: T) -> Self {
        self.equals = Some(value);
        self
    }

    /// Set `notEquals`
    #[must_use]
    pub fn with_not_equals(mut self, value: T) -> Self {
        self.not_equals = Some(value);
        self
    }

    /// Set `in`
    #[must_use]
    pub fn with_in(mut self, values: Vec<T>) -> Self {
        self.in_list = Some(values);
        self
    }

    /// Set `notIn`
    #[must_use]
    pub fn with_not_in(mut self, values: Vec<T>) -> Self {
        self.not_in = Some(values);
        self
    }

    /// Set `specified`
    #[must_use]
    pub fn with_specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }
}

impl<T: fmt::Display> Filter<T> {
    fn describe(&self, out: &mut Vec<String>) {
        push_scalar(out, Operator::Equals, self.equals.as_ref());
        push_scalar(out, Operator::NotEquals, self.not_equals.as_ref());
        push_list(out, Operator::In, self.in_list.as_ref());
        push_list(out, Operator::NotIn, self.not_in.as_ref());
        push_scalar(out, Operator::Specified, self.specified.as_ref());
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.describe(&mut parts);
        write!(f, "[{}]", parts.join(", "))
    }
}

/// [`Filter`] plus ordering bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter<T> {
    /// Equality, membership and presence operators
    pub filter: Filter<T>,
    /// `greaterThan`
    pub greater_than: Option<T>,
    /// `greaterThanOrEqual`
    pub greater_than_or_equal: Option<T>,
    /// `lessThan`
    pub less_than: Option<T>,
    /// `lessThanOrEqual`
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T> From<Filter<T>> for RangeFilter<T> {
    fn from(filter: Filter<T>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

impl<T> RangeFilter<T> {
    /// True when no operator is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.filter.is_empty()
            && self.greater_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than.is_none()
            && self.less_than_or_equal.is_none()
    }

    /// Set `greaterThan`
    #[must_use]
    pub fn with_greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    /// Set `greaterThanOrEqual`
    #[must_use]
    pub fn with_greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    /// Set `lessThan`
    #[must_use]
    pub fn with_less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    /// Set `lessThanOrEqual`
    #[must_use]
    pub fn with_less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }
}

impl<T> Deref for RangeFilter<T> {
    type Target = Filter<T>;

    fn deref(&self) -> &Self::Target {
        &self.filter
    }
}

impl<T> DerefMut for RangeFilter<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.filter
    }
}

impl<T: fmt::Display> fmt::Display for RangeFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.filter.describe(&mut parts);
        push_scalar(&mut parts, Operator::GreaterThan, self.greater_than.as_ref());
        push_scalar(
            &mut parts,
            Operator::GreaterThanOrEqual,
            self.greater_than_or_equal.as_ref(),
        );
        push_scalar(&mut parts, Operator::LessThan, self.less_than.as_ref());
        push_scalar(
            &mut parts,
            Operator::LessThanOrEqual,
            self.less_than_or_equal.as_ref(),
        );
        write!(f, "[{}]", parts.join(", "))
    }
}

/// [`Filter`] plus substring operators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringFilter {
    /// Equality, membership and presence operators
    pub filter: Filter<String>,
    /// `contains`
    pub contains: Option<String>,
    /// `doesNotContain`
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    /// True when no operator is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.filter.is_empty() && self.contains.is_none() && self.does_not_contain.is_none()
    }

    /// Set `contains`
    #[must_use]
    pub fn with_contains(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    /// Set `doesNotContain`
    #[must_use]
    pub fn with_does_not_contain(mut self, needle: impl Into<String>) -> Self {
        self.does_not_contain = Some(needle.into());
        self
    }
}

impl From<Filter<String>> for StringFilter {
    fn from(filter: Filter<String>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

impl Deref for StringFilter {
    type Target = Filter<String>;

    fn deref(&self) -> &Self::Target {
        &self.filter
    }
}

impl DerefMut for StringFilter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.filter
    }
}

impl fmt::Display for StringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.filter.describe(&mut parts);
        push_scalar(&mut parts, Operator::Contains, self.contains.as_ref());
        push_scalar(&mut parts, Operator::DoesNotContain, self.does_not_contain.as_ref());
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Filter on the id of a related entity
///
/// Accepts the same operators as [`LongFilter`]; the compared value is the
/// id of each joined row rather than a column of the entity itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationFilter {
    /// Operators on the joined id
    pub filter: LongFilter,
}

impl RelationFilter {
    /// True when no operator is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }
}

impl From<LongFilter> for RelationFilter {
    fn from(filter: LongFilter) -> Self {
        Self { filter }
    }
}

impl From<Filter<i64>> for RelationFilter {
    fn from(filter: Filter<i64>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

impl Deref for RelationFilter {
    type Target = LongFilter;

    fn deref(&self) -> &Self::Target {
        &self.filter
    }
}

impl DerefMut for RelationFilter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.filter
    }
}

impl fmt::Display for RelationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.filter.fmt(f)
    }
}

/// A filter of any supported shape, as stored in a criteria set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    /// Filter on a 64-bit integer column
    Long(LongFilter),
    /// Filter on a 32-bit integer column
    Integer(IntegerFilter),
    /// Filter on a text column
    String(StringFilter),
    /// Filter on a boolean column
    Boolean(BooleanFilter),
    /// Filter on the id of a related entity
    Relation(RelationFilter),
}

impl FieldFilter {
    /// True when no operator is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Long(filter) => filter.is_empty(),
            Self::Integer(filter) => filter.is_empty(),
            Self::String(filter) => filter.is_empty(),
            Self::Boolean(filter) => filter.is_empty(),
            Self::Relation(filter) => filter.is_empty(),
        }
    }

    /// Type name of the filter
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Long(_) | Self::Relation(_) => "LongFilter",
            Self::Integer(_) => "IntegerFilter",
            Self::String(_) => "StringFilter",
            Self::Boolean(_) => "BooleanFilter",
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            Self::Long(filter) => write!(f, "{filter}"),
            Self::Integer(filter) => write!(f, "{filter}"),
            Self::String(filter) => write!(f, "{filter}"),
            Self::Boolean(filter) => write!(f, "{filter}"),
            Self::Relation(filter) => write!(f, "{filter}"),
        }
    }
}

/// Typed access to a [`FieldFilter`] slot
///
/// Lets a criteria set hand out `&mut LongFilter`, `&mut StringFilter` and so
/// on without the caller matching on the enum.
pub trait TypedFilter: Default + Sized {
    /// Wrap into the matching [`FieldFilter`] variant
    fn into_field_filter(self) -> FieldFilter;

    /// Borrow from a slot holding the matching variant
    fn from_field_filter(filter: &FieldFilter) -> Option<&Self>;

    /// Mutably borrow from a slot holding the matching variant
    fn from_field_filter_mut(filter: &mut FieldFilter) -> Option<&mut Self>;
}

macro_rules! typed_filter {
    ($ty:ty, $variant:ident) => {
        impl TypedFilter for $ty {
            fn into_field_filter(self) -> FieldFilter {
                FieldFilter::$variant(self)
            }

            fn from_field_filter(filter: &FieldFilter) -> Option<&Self> {
                match filter {
                    FieldFilter::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_field_filter_mut(filter: &mut FieldFilter) -> Option<&mut Self> {
                match filter {
                    FieldFilter::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for FieldFilter {
            fn from(filter: $ty) -> Self {
                FieldFilter::$variant(filter)
            }
        }
    };
}

typed_filter!(LongFilter, Long);
typed_filter!(IntegerFilter, Integer);
typed_filter!(StringFilter, String);
typed_filter!(BooleanFilter, Boolean);
typed_filter!(RelationFilter, Relation);
