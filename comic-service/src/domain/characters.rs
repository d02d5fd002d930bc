use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{merge_field, Entity};
use crate::specification::Schema;

// Characters are not filterable; the schema only backs sorting.
static SCHEMA: Lazy<Schema<Characters>> = Lazy::new(|| {
    Schema::<Characters>::new(Characters::NAME)
        .long("id", |c| c.id.into())
        .string("fullName", |c| c.full_name.clone().into())
        .string("description", |c| c.description.clone().into())
});

/// A comic book character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characters {
    pub id: Option<i64>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    /// Base64 image payload
    pub thumbnail: Option<String>,
    pub thumbnail_content_type: Option<String>,
}

impl Entity for Characters {
    const NAME: &'static str = "Characters";
    const COLLECTION: &'static str = "characters";
    const FILTERABLE: bool = false;

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
        merge_field(&mut self.full_name, patch.full_name);
        merge_field(&mut self.description, patch.description);
        merge_field(&mut self.thumbnail, patch.thumbnail);
        merge_field(&mut self.thumbnail_content_type, patch.thumbnail_content_type);
    }
}
