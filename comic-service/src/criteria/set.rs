//! Named collections of field filters
//!
//! [`Criteria`] maps field names to [`FieldFilter`]s and carries the
//! `distinct` flag. Accessors create an empty filter on first use and return
//! the same slot afterwards, so callers can build criteria incrementally.
//! `Clone` produces a fully independent copy.
//!
//! # Example
//!
//! ```rust
//! use comic_service::criteria::Criteria;
//!
//! let mut criteria = Criteria::new();
//! criteria.integer("issuenumber").equals = Some(5);
//! criteria.string("title").contains = Some("Bat".to_string());
//! criteria.set_distinct(true);
//!
//! let copy = criteria.clone();
//! criteria.integer("issuenumber").equals = Some(6);
//!
//! assert_eq!(copy.get_as::<comic_service::criteria::IntegerFilter>("issuenumber")
//!     .and_then(|f| f.equals), Some(5));
//! assert_ne!(copy, criteria);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use super::filter::{
    BooleanFilter, FieldFilter, IntegerFilter, LongFilter, RelationFilter, StringFilter,
    TypedFilter,
};

/// Field filters keyed by field name, plus the distinct flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    filters: BTreeMap<String, FieldFilter>,
    distinct: Option<bool>,
}

impl Criteria {
    /// Create an empty criteria set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the filter for `field`
    ///
    /// Repeated calls return the same filter. If the slot holds a filter of a
    /// different shape it is replaced by an empty one of the requested shape.
    pub fn filter<F: TypedFilter>(&mut self, field: &str) -> &mut F {
        let slot = self
            .filters
            .entry(field.to_string())
            .or_insert_with(|| F::default().into_field_filter());
        if F::from_field_filter(slot).is_none() {
            *slot = F::default().into_field_filter();
        }
        match F::from_field_filter_mut(slot) {
            Some(filter) => filter,
            None => unreachable!("slot was just set to the requested filter shape"),
        }
    }

    /// Get or create a [`LongFilter`]
    pub fn long(&mut self, field: &str) -> &mut LongFilter {
        self.filter(field)
    }

    /// Get or create an [`IntegerFilter`]
    pub fn integer(&mut self, field: &str) -> &mut IntegerFilter {
        self.filter(field)
    }

    /// Get or create a [`StringFilter`]
    pub fn string(&mut self, field: &str) -> &mut StringFilter {
        self.filter(field)
    }

    /// Get or create a [`BooleanFilter`]
    pub fn boolean(&mut self, field: &str) -> &mut BooleanFilter {
        self.filter(field)
    }

    /// Get or create a [`RelationFilter`]
    pub fn relation(&mut self, field: &str) -> &mut RelationFilter {
        self.filter(field)
    }

    /// The filter stored for `field`, if any
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldFilter> {
        self.filters.get(field)
    }

    /// The filter stored for `field`, if it has the requested shape
    #[must_use]
    pub fn get_as<F: TypedFilter>(&self, field: &str) -> Option<&F> {
        self.filters.get(field).and_then(F::from_field_filter)
    }

    /// Store a filter for `field`, replacing any previous one
    pub fn insert(&mut self, field: impl Into<String>, filter: impl Into<FieldFilter>) {
        self.filters.insert(field.into(), filter.into());
    }

    pub(crate) fn slot_or_insert_with(
        &mut self,
        field: &str,
        make: impl FnOnce() -> FieldFilter,
    ) -> &mut FieldFilter {
        self.filters.entry(field.to_string()).or_insert_with(make)
    }

    /// Remove and return the filter for `field`
    pub fn remove(&mut self, field: &str) -> Option<FieldFilter> {
        self.filters.remove(field)
    }

    /// Builder-style [`Criteria::insert`]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, filter: impl Into<FieldFilter>) -> Self {
        self.insert(field, filter);
        self
    }

    /// All stored filters, ordered by field name
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldFilter)> {
        self.filters.iter().map(|(name, filter)| (name.as_str(), filter))
    }

    /// The distinct flag, if set
    #[must_use]
    pub const fn distinct(&self) -> Option<bool> {
        self.distinct
    }

    /// Set the distinct flag
    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = Some(distinct);
    }

    /// Builder-style [`Criteria::set_distinct`]
    #[must_use]
    pub const fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = Some(distinct);
        self
    }

    /// True when no filter imposes anything and distinct is unset
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distinct.is_none() && self.filters.values().all(FieldFilter::is_empty)
    }

    /// Write `{field=Filter[...], ..., distinct=...}` using `order` for fields
    ///
    /// Fields named in `order` come first in that order; any others follow by
    /// name.
    pub(crate) fn fmt_fields(&self, f: &mut fmt::Formatter<'_>, order: &[&str]) -> fmt::Result {
        let mut parts = Vec::new();
        for name in order {
            if let Some(filter) = self.filters.get(*name) {
                parts.push(format!("{name}={filter}"));
            }
        }
        for (name, filter) in &self.filters {
            if !order.contains(&name.as_str()) {
                parts.push(format!("{name}={filter}"));
            }
        }
        if let Some(distinct) = self.distinct {
            parts.push(format!("distinct={distinct}"));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Criteria")?;
        self.fmt_fields(f, &[])
    }
}
