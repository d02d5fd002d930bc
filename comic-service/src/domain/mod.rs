//! Comic collection entities
//!
//! Three entities make up the catalogue:
//!
//! - [`Characters`]: a character a series revolves around
//! - [`Series`]: a run of comics, optionally tied to one [`Characters`]
//! - [`Comic`]: a single issue, optionally part of one [`Series`]
//!
//! Each implements [`Entity`], which ties it to its static query
//! [`Schema`] and its storage collection.

mod characters;
mod comic;
mod series;

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::specification::Schema;

pub use characters::Characters;
pub use comic::{Comic, ComicCriteria};
pub use series::{Series, SeriesCriteria};

/// A persisted entity with a numeric id and a query schema
pub trait Entity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Entity name used in logs and error payloads
    const NAME: &'static str;

    /// Collection name used in URLs
    const COLLECTION: &'static str;

    /// Whether list and count endpoints accept filter criteria
    const FILTERABLE: bool;

    /// Identifier, absent until the entity is stored
    fn id(&self) -> Option<i64>;

    /// Replace the identifier
    fn set_id(&mut self, id: Option<i64>);

    /// Query schema, shared by every instance
    fn schema() -> &'static Schema<Self>;

    /// Copy every field present in `patch` onto `self`
    ///
    /// Fields absent from `patch` are left untouched. The id is never merged.
    fn merge(&mut self, patch: Self);
}

/// Reference to another entity by id, as it appears in JSON bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Referenced id
    pub id: i64,
}

impl EntityRef {
    /// Reference the entity with `id`
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id }
    }
}

pub(crate) fn merge_field<T>(target: &mut Option<T>, patch: Option<T>) {
    if patch.is_some() {
        *target = patch;
    }
}
