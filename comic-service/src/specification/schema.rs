//! Entity schemas: the filterable fields of an entity and how to read them
//!
//! A [`Schema`] is a static, ordered list of [`FieldDescriptor`]s. Scalar
//! fields carry a column accessor; relation fields name a join that the
//! storage layer resolves through a [`JoinResolver`]. Compilation walks the
//! schema in declaration order, so that order is also the order in which
//! conditions appear in a compiled specification.
//!
//! # Example
//!
//! ```rust
//! use comic_service::specification::{Cardinality, FieldKind, Schema};
//!
//! struct Book {
//!     id: Option<i64>,
//!     title: Option<String>,
//! }
//!
//! let schema = Schema::<Book>::new("Book")
//!     .long("id", |book| book.id.into())
//!     .string("title", |book| book.title.clone().into())
//!     .relation("authorId", "author", Cardinality::ToOne);
//!
//! assert_eq!(schema.entity(), "Book");
//! assert_eq!(schema.field("title").map(|f| f.kind()), Some(FieldKind::String));
//! assert!(schema.column("authorId").is_none());
//! ```

use std::fmt;

use super::value::Value;
use crate::criteria::FieldFilter;

/// Reads one column of an entity
pub type Column<E> = fn(&E) -> Value;

/// How many rows a relation joins to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one related row
    ToOne,
    /// Any number of related rows
    ToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToOne => write!(f, "to_one"),
            Self::ToMany => write!(f, "to_many"),
        }
    }
}

/// The kind of a schema field, which fixes the filter type it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit integer column
    Long,
    /// 32-bit integer column
    Integer,
    /// Text column
    String,
    /// Boolean column
    Boolean,
    /// Identifier of a related entity, reached through a join
    Relation(Cardinality),
}

impl FieldKind {
    /// Name of the filter type this field accepts
    #[must_use]
    pub const fn filter_name(self) -> &'static str {
        match self {
            Self::Long | Self::Relation(_) => "LongFilter",
            Self::Integer => "IntegerFilter",
            Self::String => "StringFilter",
            Self::Boolean => "BooleanFilter",
        }
    }

    /// Whether a filter of this shape may be applied to a field of this kind
    #[must_use]
    pub const fn accepts(self, filter: &FieldFilter) -> bool {
        matches!(
            (self, filter),
            (Self::Long, FieldFilter::Long(_))
                | (Self::Integer, FieldFilter::Integer(_))
                | (Self::String, FieldFilter::String(_))
                | (Self::Boolean, FieldFilter::Boolean(_))
                | (Self::Relation(_), FieldFilter::Relation(_))
        )
    }

    /// A fresh, empty filter of the shape this field accepts
    #[must_use]
    pub fn empty_filter(self) -> FieldFilter {
        match self {
            Self::Long => FieldFilter::Long(Default::default()),
            Self::Integer => FieldFilter::Integer(Default::default()),
            Self::String => FieldFilter::String(Default::default()),
            Self::Boolean => FieldFilter::Boolean(Default::default()),
            Self::Relation(_) => FieldFilter::Relation(Default::default()),
        }
    }
}

/// Where a condition reads its value from
pub enum Target<E> {
    /// A column on the entity itself
    Column(Column<E>),
    /// The id column of a joined relation
    Join(&'static str),
}

impl<E> Clone for Target<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Target<E> {}

impl<E> fmt::Debug for Target<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(_) => write!(f, "Column"),
            Self::Join(relation) => write!(f, "Join({relation})"),
        }
    }
}

/// One filterable field of an entity
pub struct FieldDescriptor<E> {
    name: &'static str,
    kind: FieldKind,
    target: Target<E>,
}

impl<E> FieldDescriptor<E> {
    /// Field name as used by criteria and query parameters
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field kind
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Where the field's value is read from
    #[must_use]
    pub const fn target(&self) -> Target<E> {
        self.target
    }
}

impl<E> fmt::Debug for FieldDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("target", &self.target)
            .finish()
    }
}

/// Ordered field list for one entity type
pub struct Schema<E> {
    entity: &'static str,
    fields: Vec<FieldDescriptor<E>>,
}

impl<E> Schema<E> {
    /// Start an empty schema for the named entity
    #[must_use]
    pub const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            fields: Vec::new(),
        }
    }

    fn push(mut self, name: &'static str, kind: FieldKind, target: Target<E>) -> Self {
        self.fields.push(FieldDescriptor { name, kind, target });
        self
    }

    /// Add a 64-bit integer column
    #[must_use]
    pub fn long(self, name: &'static str, column: Column<E>) -> Self {
        self.push(name, FieldKind::Long, Target::Column(column))
    }

    /// Add a 32-bit integer column
    #[must_use]
    pub fn integer(self, name: &'static str, column: Column<E>) -> Self {
        self.push(name, FieldKind::Integer, Target::Column(column))
    }

    /// Add a text column
    #[must_use]
    pub fn string(self, name: &'static str, column: Column<E>) -> Self {
        self.push(name, FieldKind::String, Target::Column(column))
    }

    /// Add a boolean column
    #[must_use]
    pub fn boolean(self, name: &'static str, column: Column<E>) -> Self {
        self.push(name, FieldKind::Boolean, Target::Column(column))
    }

    /// Add a relation field filtered on the related entity's id
    #[must_use]
    pub fn relation(
        self,
        name: &'static str,
        relation: &'static str,
        cardinality: Cardinality,
    ) -> Self {
        self.push(name, FieldKind::Relation(cardinality), Target::Join(relation))
    }

    /// Entity name, used in error messages and logs
    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    /// All fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<E>] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<E>> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Column accessor for a scalar field, used for sorting
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Column<E>> {
        match self.field(name)?.target {
            Target::Column(column) => Some(column),
            Target::Join(_) => None,
        }
    }
}

impl<E> fmt::Debug for Schema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("entity", &self.entity)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Resolves relation joins for one entity type
///
/// Implemented by the storage layer. `related_ids` returns the ids of the
/// rows the named relation joins to; an empty result is treated as a single
/// row whose id is null, as with a LEFT join.
pub trait JoinResolver<E> {
    /// Ids of the rows `relation` joins to for `entity`
    fn related_ids(&self, entity: &E, relation: &str) -> Vec<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{LongFilter, StringFilter};

    struct Widget {
        id: Option<i64>,
        label: Option<String>,
    }

    fn schema() -> Schema<Widget> {
        Schema::<Widget>::new("Widget")
            .long("id", |w| w.id.into())
            .string("label", |w| w.label.clone().into())
            .relation("partsId", "parts", Cardinality::ToMany)
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = schema();
        let names: Vec<_> = schema.fields().iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, vec!["id", "label", "partsId"]);
    }

    #[test]
    fn test_column_reads_entity() {
        let schema = schema();
        let widget = Widget {
            id: Some(9),
            label: None,
        };
        let id = schema.column("id").expect("id column");
        let label = schema.column("label").expect("label column");
        assert_eq!(id(&widget), Value::Long(9));
        assert_eq!(label(&widget), Value::Null);
    }

    #[test]
    fn test_relation_has_no_column() {
        let schema = schema();
        assert!(schema.column("partsId").is_none());
        assert_eq!(
            schema.field("partsId").map(FieldDescriptor::kind),
            Some(FieldKind::Relation(Cardinality::ToMany))
        );
    }

    #[test]
    fn test_kind_accepts_matching_filter_only() {
        let long = FieldFilter::Long(LongFilter::default());
        let text = FieldFilter::String(StringFilter::default());
        assert!(FieldKind::Long.accepts(&long));
        assert!(!FieldKind::Long.accepts(&text));
        assert!(!FieldKind::Relation(Cardinality::ToOne).accepts(&long));
        assert!(FieldKind::String.accepts(&FieldKind::String.empty_filter()));
    }
}
