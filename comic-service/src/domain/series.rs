use std::fmt;
use std::ops::{Deref, DerefMut};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{merge_field, Entity, EntityRef};
use crate::criteria::{Criteria, LongFilter, RelationFilter, StringFilter};
use crate::specification::{Cardinality, Schema};

static SCHEMA: Lazy<Schema<Series>> = Lazy::new(|| {
    Schema::<Series>::new(Series::NAME)
        .long("id", |s| s.id.into())
        .string("name", |s| s.name.clone().into())
        .relation("comicId", "comics", Cardinality::ToMany)
        .relation("charactersId", "characters", Cardinality::ToOne)
});

/// A run of comics
///
/// The comics of a series are not stored on it; they are found through each
/// comic's `series` reference. Filtering on `comicId` therefore joins one
/// row per comic, which is why list queries over series usually want
/// `distinct`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub characters: Option<EntityRef>,
}

impl Series {
    /// Id of the characters this series follows
    #[must_use]
    pub fn characters_id(&self) -> Option<i64> {
        self.characters.map(|characters| characters.id)
    }
}

impl Entity for Series {
    const NAME: &'static str = "Series";
    const COLLECTION: &'static str = "series";
    const FILTERABLE: bool = true;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema() -> &'static Schema<Self> {
        &SCHEMA
    }

    fn merge(&mut self, patch: Self) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.characters, patch.characters);
    }
}

/// Typed criteria over [`Series`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesCriteria(Criteria);

impl SeriesCriteria {
    /// Empty criteria
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&mut self) -> &mut LongFilter {
        self.0.long("id")
    }

    pub fn name(&mut self) -> &mut StringFilter {
        self.0.string("name")
    }

    pub fn comic_id(&mut self) -> &mut RelationFilter {
        self.0.relation("comicId")
    }

    pub fn characters_id(&mut self) -> &mut RelationFilter {
        self.0.relation("charactersId")
    }

    /// Unwrap into the untyped criteria
    #[must_use]
    pub fn into_inner(self) -> Criteria {
        self.0
    }
}

impl Deref for SeriesCriteria {
    type Target = Criteria;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SeriesCriteria {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Criteria> for SeriesCriteria {
    fn from(criteria: Criteria) -> Self {
        Self(criteria)
    }
}

impl fmt::Display for SeriesCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order: Vec<&str> = SCHEMA.fields().iter().map(|field| field.name()).collect();
        f.write_str("SeriesCriteria")?;
        self.0.fmt_fields(f, &order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{compile, FieldKind};

    #[test]
    fn test_schema_relations() {
        let schema = Series::schema();
        assert_eq!(
            schema.field("comicId").map(|f| f.kind()),
            Some(FieldKind::Relation(Cardinality::ToMany))
        );
        assert_eq!(
            schema.field("charactersId").map(|f| f.kind()),
            Some(FieldKind::Relation(Cardinality::ToOne))
        );
    }

    #[test]
    fn test_display_follows_schema_order() {
        let mut criteria = SeriesCriteria::new();
        criteria.characters_id().equals = Some(2);
        criteria.name().contains = Some("Bat".into());
        criteria.set_distinct(true);
        assert_eq!(
            criteria.to_string(),
            "SeriesCriteria{name=StringFilter[contains=Bat], charactersId=LongFilter[equals=2], distinct=true}"
        );
    }

    #[test]
    fn test_criteria_compile_in_schema_order() {
        let mut criteria = SeriesCriteria::new();
        criteria.characters_id().equals = Some(2);
        criteria.comic_id().specified = Some(true);
        criteria.id().greater_than = Some(0);

        let spec = compile(Series::schema(), Some(&*criteria)).expect("compiles");
        let fields: Vec<_> = spec.conditions().iter().map(|c| c.field()).collect();
        assert_eq!(fields, vec!["id", "comicId", "charactersId"]);
    }

    #[test]
    fn test_merge() {
        let mut series = Series {
            id: Some(1),
            name: Some("Batman".into()),
            characters: Some(EntityRef::new(3)),
        };
        series.merge(Series {
            name: None,
            characters: Some(EntityRef::new(4)),
            ..Series::default()
        });
        assert_eq!(series.name.as_deref(), Some("Batman"));
        assert_eq!(series.characters_id(), Some(4));
    }
}
