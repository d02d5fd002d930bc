use std::fmt;
use std::ops::{Deref, DerefMut};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{merge_field, Entity, EntityRef};
use crate::criteria::{Criteria, IntegerFilter, LongFilter, RelationFilter, StringFilter};
use crate::specification::{Cardinality, Schema};

static SCHEMA: Lazy<Schema<Comic>> = Lazy::new(|| {
    Schema::<Comic>::new(Comic::NAME)
        .long("id", |c| c.id.into())
        .integer("issuenumber", |c| c.issuenumber.into())
        .string("location", |c| c.location.clone().into())
        .string("title", |c| c.title.clone().into())
        .string("description", |c| c.description.clone().into())
        .relation("seriesId", "series", Cardinality::ToOne)
});

/// A single comic issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: Option<i64>,
    pub issuenumber: Option<i32>,
    /// Where the physical copy is kept
    pub location: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Base64 image payload
    pub thumbnail: Option<String>,
    pub thumbnail_content_type: Option<String>,
    pub series: Option<EntityRef>,
}

impl Comic {
    /// Id of the series this issue belongs to
    #[must_use]
    pub fn series_id(&self) -> Option<i64> {
        self.series.map(|series| series.id)
    }
}

impl Entity for Comic {
    const NAME: &'static str = "Comic";
    const COLLECTION: &'static str = "comics";
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
        merge_field(&mut self.issuenumber, patch.issuenumber);
        merge_field(&mut self.location, patch.location);
        merge_field(&mut self.title, patch.title);
        merge_field(&mut self.description, patch.description);
        merge_field(&mut self.thumbnail, patch.thumbnail);
        merge_field(&mut self.thumbnail_content_type, patch.thumbnail_content_type);
        merge_field(&mut self.series, patch.series);
    }
}

/// Typed criteria over [`Comic`]
///
/// Accessors create their filter on first use:
///
/// ```rust
/// use comic_service::domain::ComicCriteria;
///
/// let mut criteria = ComicCriteria::new();
/// criteria.issuenumber().equals = Some(5);
/// criteria.series_id().in_list = Some(vec![7]);
///
/// assert_eq!(
///     criteria.to_string(),
///     "ComicCriteria{issuenumber=IntegerFilter[equals=5], seriesId=LongFilter[in=[7]]}"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComicCriteria(Criteria);

impl ComicCriteria {
    /// Empty criteria
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&mut self) -> &mut LongFilter {
        self.0.long("id")
    }

    pub fn issuenumber(&mut self) -> &mut IntegerFilter {
        self.0.integer("issuenumber")
    }

    pub fn location(&mut self) -> &mut StringFilter {
        self.0.string("location")
    }

    pub fn title(&mut self) -> &mut StringFilter {
        self.0.string("title")
    }

    pub fn description(&mut self) -> &mut StringFilter {
        self.0.string("description")
    }

    pub fn series_id(&mut self) -> &mut RelationFilter {
        self.0.relation("seriesId")
    }

    /// Unwrap into the untyped criteria
    #[must_use]
    pub fn into_inner(self) -> Criteria {
        self.0
    }
}

impl Deref for ComicCriteria {
    type Target = Criteria;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ComicCriteria {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Criteria> for ComicCriteria {
    fn from(criteria: Criteria) -> Self {
        Self(criteria)
    }
}

impl fmt::Display for ComicCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order: Vec<&str> = SCHEMA.fields().iter().map(|field| field.name()).collect();
        f.write_str("ComicCriteria")?;
        self.0.fmt_fields(f, &order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{compile, Value};

    #[test]
    fn test_json_uses_camel_case_and_series_ref() {
        let comic = Comic {
            id: Some(1),
            issuenumber: Some(5),
            thumbnail_content_type: Some("image/png".into()),
            series: Some(EntityRef::new(7)),
            ..Comic::default()
        };
        let json = serde_json::to_value(&comic).expect("serialize");
        assert_eq!(json["issuenumber"], 5);
        assert_eq!(json["thumbnailContentType"], "image/png");
        assert_eq!(json["series"]["id"], 7);

        let back: Comic = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, comic);
    }

    #[test]
    fn test_schema_columns() {
        let comic = Comic {
            issuenumber: Some(3),
            title: Some("Hush".into()),
            ..Comic::default()
        };
        let schema = Comic::schema();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["id", "issuenumber", "location", "title", "description", "seriesId"]
        );
        let title = schema.column("title").expect("title column");
        assert_eq!(title(&comic), Value::from("Hush"));
        assert!(schema.column("thumbnail").is_none());
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut comic = Comic {
            id: Some(1),
            title: Some("Old".into()),
            location: Some("Shelf A".into()),
            ..Comic::default()
        };
        comic.merge(Comic {
            id: Some(99),
            title: Some("New".into()),
            ..Comic::default()
        });
        assert_eq!(comic.id, Some(1));
        assert_eq!(comic.title.as_deref(), Some("New"));
        assert_eq!(comic.location.as_deref(), Some("Shelf A"));
    }

    #[test]
    fn test_typed_criteria_compile() {
        let mut criteria = ComicCriteria::new();
        criteria.title().contains = Some("Bat".into());
        criteria.set_distinct(true);

        let spec = compile(Comic::schema(), Some(&*criteria)).expect("compiles");
        assert!(spec.is_distinct());
        assert_eq!(spec.conditions().len(), 1);
    }

    #[test]
    fn test_typed_criteria_copy() {
        let mut criteria = ComicCriteria::new();
        criteria.id().greater_than = Some(2);
        let copy = criteria.clone();
        assert_eq!(copy, criteria);
        assert_eq!(copy.clone().to_string(), criteria.to_string());

        criteria.id().greater_than = Some(3);
        assert_ne!(copy, criteria);
    }

    #[test]
    fn test_display_includes_distinct() {
        let mut criteria = ComicCriteria::new();
        criteria.location().equals = Some("Box 3".into());
        criteria.set_distinct(false);
        assert_eq!(
            criteria.to_string(),
            "ComicCriteria{location=StringFilter[equals=Box 3], distinct=false}"
        );
    }
}
