//! In-memory relational store
//!
//! One table per entity, keyed by id, behind a single `tokio::sync::RwLock`.
//! Cloning [`InMemoryStore`] shares the tables. Ids for every entity come
//! from one shared sequence.
//!
//! Specification queries evaluate every row of the entity's table against
//! the compiled conditions. Relation conditions are resolved through a
//! [`JoinIndex`] built once per query, which behaves like a LEFT join: a row
//! with no related rows joins a single null row, and a row with several
//! related rows is returned once per satisfying joined row unless the
//! specification is distinct.
//!
//! # Example
//!
//! ```rust
//! use comic_service::domain::{Comic, EntityRef, Series};
//! use comic_service::repository::{InMemoryStore, Repository, SpecificationExecutor, Sort};
//! use comic_service::specification::Specification;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemoryStore::new();
//! let series = store
//!     .series()
//!     .create(Series { name: Some("Sandman".into()), ..Series::default() })
//!     .await
//!     .unwrap();
//! store
//!     .comics()
//!     .create(Comic { series: series.id.map(EntityRef::new), ..Comic::default() })
//!     .await
//!     .unwrap();
//!
//! let all = store.comics().find_all(&Specification::always(), &Sort::unsorted()).await.unwrap();
//! assert_eq!(all.len(), 1);
//! # }
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{OrderDirection, Page, Pagination, Sort};
use super::traits::{Repository, RepositoryResult, SpecificationExecutor};
use crate::domain::{Characters, Comic, Entity, Series};
use crate::specification::{Column, JoinResolver, Specification, Value};

/// Row storage for every entity
#[derive(Debug, Default)]
pub struct Tables {
    characters: BTreeMap<i64, Characters>,
    series: BTreeMap<i64, Series>,
    comics: BTreeMap<i64, Comic>,
    sequence: i64,
}

impl Tables {
    fn next_id(&mut self, operation: RepositoryOperation) -> RepositoryResult<i64> {
        let id = self.sequence.checked_add(1).ok_or_else(|| {
            RepositoryError::constraint_violation(operation, "id sequence exhausted")
        })?;
        self.sequence = id;
        Ok(id)
    }

    fn advance_sequence(&mut self, id: i64) {
        self.sequence = self.sequence.max(id);
    }
}

/// An entity with a table in [`Tables`]
///
/// Ties each entity to its table, its outgoing references, and the relation
/// joins its schema names.
pub trait Stored: Entity {
    /// The entity's table
    fn table(tables: &Tables) -> &BTreeMap<i64, Self>;

    /// The entity's table, mutably
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self>;

    /// Ids of the rows `relation` joins to for `entity`
    fn join(index: &JoinIndex<'_>, entity: &Self, relation: &str) -> Vec<i64>;

    /// First reference that points at a missing row, as `(entity, id)`
    fn missing_reference(&self, tables: &Tables) -> Option<(&'static str, i64)>;
}

impl Stored for Characters {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.characters
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.characters
    }

    fn join(_index: &JoinIndex<'_>, _entity: &Self, _relation: &str) -> Vec<i64> {
        Vec::new()
    }

    fn missing_reference(&self, _tables: &Tables) -> Option<(&'static str, i64)> {
        None
    }
}

impl Stored for Series {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.series
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.series
    }

    fn join(index: &JoinIndex<'_>, entity: &Self, relation: &str) -> Vec<i64> {
        match relation {
            "comics" => entity
                .id
                .and_then(|id| index.comics_by_series.get(&id))
                .cloned()
                .unwrap_or_default(),
            "characters" => entity
                .characters_id()
                .filter(|id| index.tables.characters.contains_key(id))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn missing_reference(&self, tables: &Tables) -> Option<(&'static str, i64)> {
        self.characters_id()
            .filter(|id| !tables.characters.contains_key(id))
            .map(|id| (Characters::NAME, id))
    }
}

impl Stored for Comic {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.comics
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.comics
    }

    fn join(index: &JoinIndex<'_>, entity: &Self, relation: &str) -> Vec<i64> {
        match relation {
            "series" => entity
                .series_id()
                .filter(|id| index.tables.series.contains_key(id))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn missing_reference(&self, tables: &Tables) -> Option<(&'static str, i64)> {
        self.series_id()
            .filter(|id| !tables.series.contains_key(id))
            .map(|id| (Series::NAME, id))
    }
}

/// Relation lookups over one snapshot of the tables
pub struct JoinIndex<'a> {
    tables: &'a Tables,
    comics_by_series: BTreeMap<i64, Vec<i64>>,
}

impl<'a> JoinIndex<'a> {
    /// Index the inverse relations of `tables`
    #[must_use]
    pub fn new(tables: &'a Tables) -> Self {
        let mut comics_by_series: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for (id, comic) in &tables.comics {
            if let Some(series_id) = comic.series_id() {
                comics_by_series.entry(series_id).or_default().push(*id);
            }
        }
        Self {
            tables,
            comics_by_series,
        }
    }
}

impl<E: Stored> JoinResolver<E> for JoinIndex<'_> {
    fn related_ids(&self, entity: &E, relation: &str) -> Vec<i64> {
        E::join(self, entity, relation)
    }
}

/// Initial rows loaded at startup
///
/// Entities keep the ids they carry; entities without one are assigned the
/// next id from the shared sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub characters: Vec<Characters>,
    pub series: Vec<Series>,
    pub comics: Vec<Comic>,
}

impl SeedData {
    /// Read seed data from a JSON file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid seed document.
    pub async fn from_path(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Row counts per table, reported by the readiness check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TableCounts {
    pub characters: usize,
    pub series: usize,
    pub comics: usize,
}

/// Shared in-memory tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository over one entity's table
    #[must_use]
    pub fn repository<E: Stored>(&self) -> EntityRepository<E> {
        EntityRepository {
            tables: Arc::clone(&self.tables),
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn characters(&self) -> EntityRepository<Characters> {
        self.repository()
    }

    #[must_use]
    pub fn series(&self) -> EntityRepository<Series> {
        self.repository()
    }

    #[must_use]
    pub fn comics(&self) -> EntityRepository<Comic> {
        self.repository()
    }

    /// Load seed rows
    ///
    /// Tables are filled in dependency order (characters, series, comics) and
    /// every reference must point at a row that exists by then.
    ///
    /// # Errors
    ///
    /// Fails with `ConstraintViolation` on a dangling reference. Rows loaded
    /// before the failure are kept.
    pub async fn seed(&self, data: SeedData) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        let characters = data.characters.len();
        let series = data.series.len();
        let comics = data.comics.len();

        seed_table(&mut tables, data.characters)?;
        seed_table(&mut tables, data.series)?;
        seed_table(&mut tables, data.comics)?;

        tracing::info!(characters, series, comics, "Seeded store");
        Ok(())
    }

    /// Current row count of each table
    pub async fn counts(&self) -> TableCounts {
        let tables = self.tables.read().await;
        TableCounts {
            characters: tables.characters.len(),
            series: tables.series.len(),
            comics: tables.comics.len(),
        }
    }
}

fn seed_table<E: Stored>(tables: &mut Tables, rows: Vec<E>) -> RepositoryResult<()> {
    for mut row in rows {
        check_references(tables, &row, RepositoryOperation::Create)?;
        let id = match row.id() {
            Some(id) => {
                tables.advance_sequence(id);
                id
            }
            None => tables.next_id(RepositoryOperation::Create)?,
        };
        row.set_id(Some(id));
        E::table_mut(tables).insert(id, row);
    }
    Ok(())
}

fn check_references<E: Stored>(
    tables: &Tables,
    entity: &E,
    operation: RepositoryOperation,
) -> RepositoryResult<()> {
    match entity.missing_reference(tables) {
        Some((target, id)) => Err(RepositoryError::constraint_violation(
            operation,
            format!("{} references {} {} which does not exist", E::NAME, target, id),
        )
        .with_entity(target, id.to_string())),
        None => Ok(()),
    }
}

/// Compares two column values; nulls sort after every non-null value
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.compare(right).unwrap_or(Ordering::Equal),
    }
}

/// Repository over one entity's table
pub struct EntityRepository<E> {
    tables: Arc<RwLock<Tables>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            _entity: PhantomData,
        }
    }
}

impl<E: Stored> EntityRepository<E> {
    fn sort_keys(
        sort: &Sort,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Vec<(Column<E>, OrderDirection)>> {
        let schema = E::schema();
        sort.orders()
            .iter()
            .map(|order| {
                schema
                    .column(&order.property)
                    .map(|column| (column, order.direction))
                    .ok_or_else(|| {
                        RepositoryError::validation_failed(format!(
                            "Cannot sort {} on '{}'",
                            E::NAME,
                            order.property
                        ))
                        .with_operation(operation)
                    })
            })
            .collect()
    }

    /// Matching rows in sort order, each repeated by its join multiplicity
    async fn select(
        &self,
        spec: &Specification<E>,
        sort: &Sort,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Vec<E>> {
        let keys = Self::sort_keys(sort, operation)?;
        let tables = self.tables.read().await;
        let index = JoinIndex::new(&tables);

        let mut matches: Vec<(&E, u64)> = E::table(&tables)
            .values()
            .filter_map(|entity| {
                let rows = spec.multiplicity(entity, &index);
                (rows > 0).then_some((entity, rows))
            })
            .collect();

        matches.sort_by(|&(left, _), &(right, _)| {
            keys.iter()
                .map(|(column, direction)| {
                    let ordering = compare_values(&column(left), &column(right));
                    match direction {
                        OrderDirection::Ascending => ordering,
                        OrderDirection::Descending => ordering.reverse(),
                    }
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| left.id().cmp(&right.id()))
        });

        let distinct = spec.is_distinct();
        let mut rows = Vec::new();
        for (entity, multiplicity) in matches {
            let repeat = if distinct { 1 } else { multiplicity };
            for _ in 0..repeat {
                rows.push(entity.clone());
            }
        }
        Ok(rows)
    }
}

impl<E: Stored> Repository<i64, E> for EntityRepository<E> {
    async fn find_by_id(&self, id: &i64) -> RepositoryResult<Option<E>> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).get(id).cloned())
    }

    async fn find_all_unfiltered(&self, sort: &Sort) -> RepositoryResult<Vec<E>> {
        self.select(&Specification::always(), sort, RepositoryOperation::FindAll)
            .await
    }

    async fn exists(&self, id: &i64) -> RepositoryResult<bool> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).contains_key(id))
    }

    async fn create(&self, mut entity: E) -> RepositoryResult<E> {
        if let Some(id) = entity.id() {
            return Err(RepositoryError::already_exists(E::NAME, id.to_string()));
        }
        let mut tables = self.tables.write().await;
        check_references(&tables, &entity, RepositoryOperation::Create)?;

        let id = tables.next_id(RepositoryOperation::Create)?;
        entity.set_id(Some(id));
        E::table_mut(&mut tables).insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &i64, mut entity: E) -> RepositoryResult<E> {
        let mut tables = self.tables.write().await;
        if !E::table(&tables).contains_key(id) {
            return Err(RepositoryError::not_found(E::NAME, id.to_string())
                .with_operation(RepositoryOperation::Update));
        }
        check_references(&tables, &entity, RepositoryOperation::Update)?;

        entity.set_id(Some(*id));
        E::table_mut(&mut tables).insert(*id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &i64) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(E::table_mut(&mut tables).remove(id).is_some())
    }
}

impl<E: Stored> SpecificationExecutor<E> for EntityRepository<E> {
    async fn find_all(&self, spec: &Specification<E>, sort: &Sort) -> RepositoryResult<Vec<E>> {
        self.select(spec, sort, RepositoryOperation::FindAll).await
    }

    async fn find_page(
        &self,
        spec: &Specification<E>,
        pagination: Pagination,
        sort: &Sort,
    ) -> RepositoryResult<Page<E>> {
        let rows = self.select(spec, sort, RepositoryOperation::FindPage).await?;
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(usize::try_from(pagination.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit).unwrap_or(usize::MAX))
            .collect();
        Ok(Page::new(items, total, pagination))
    }

    async fn count(&self, spec: &Specification<E>) -> RepositoryResult<u64> {
        let tables = self.tables.read().await;
        let index = JoinIndex::new(&tables);
        let distinct = spec.is_distinct();

        let total = E::table(&tables)
            .values()
            .map(|entity| match spec.multiplicity(entity, &index) {
                0 => 0,
                _ if distinct => 1,
                rows => rows,
            })
            .sum();
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use crate::domain::{ComicCriteria, EntityRef, SeriesCriteria};
    use crate::repository::RepositoryErrorKind;
    use crate::specification::compile;

    fn comic(id: i64, issuenumber: Option<i32>, series: Option<i64>) -> Comic {
        Comic {
            id: Some(id),
            issuenumber,
            title: Some(format!("Issue {id}")),
            series: series.map(EntityRef::new),
            ..Comic::default()
        }
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .seed(SeedData {
                characters: vec![Characters {
                    id: Some(1),
                    full_name: Some("Bruce Wayne".into()),
                    ..Characters::default()
                }],
                series: vec![
                    Series {
                        id: Some(7),
                        name: Some("Batman".into()),
                        characters: Some(EntityRef::new(1)),
                    },
                    Series {
                        id: Some(8),
                        name: Some("Detective Comics".into()),
                        characters: None,
                    },
                ],
                comics: vec![
                    comic(10, Some(1), Some(7)),
                    comic(11, Some(2), Some(7)),
                    comic(12, None, Some(8)),
                    comic(13, Some(5), None),
                ],
            })
            .await
            .expect("seed");
        store
    }

    fn comic_spec(criteria: &ComicCriteria) -> Specification<Comic> {
        compile(Comic::schema(), Some(&**criteria)).expect("compiles")
    }

    fn series_spec(criteria: &SeriesCriteria) -> Specification<Series> {
        compile(Series::schema(), Some(&**criteria)).expect("compiles")
    }

    #[tokio::test]
    async fn test_relation_equals_filters_through_join() {
        let store = seeded().await;
        let mut criteria = ComicCriteria::new();
        criteria.series_id().equals = Some(7);
        let found = store
            .comics()
            .find_all(&comic_spec(&criteria), &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 11]);

        assert_eq!(
            store.comics().count(&comic_spec(&criteria)).await.expect("count"),
            2
        );

        let mut missing = ComicCriteria::new();
        missing.series_id().equals = Some(999);
        let found = store
            .comics()
            .find_all(&comic_spec(&missing), &Sort::unsorted())
            .await
            .expect("find");
        assert!(found.is_empty());
        assert_eq!(
            store.comics().count(&comic_spec(&missing)).await.expect("count"),
            0
        );
    }

    #[tokio::test]
    async fn test_issue_number_equals_lists_and_counts() {
        let store = InMemoryStore::new();
        store
            .seed(SeedData {
                comics: vec![
                    comic(1, Some(4), None),
                    comic(2, Some(5), None),
                    comic(3, Some(5), None),
                ],
                ..SeedData::default()
            })
            .await
            .expect("seed");

        let mut criteria = ComicCriteria::new();
        criteria.issuenumber().equals = Some(5);
        let spec = comic_spec(&criteria);
        assert!(!spec.is_distinct());

        let found = store
            .comics()
            .find_all(&spec, &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.comics().count(&spec).await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_relation_conditions_join_separately() {
        let store = seeded().await;
        let mut criteria = SeriesCriteria::new();
        criteria.comic_id().not_equals = Some(11);
        criteria.comic_id().in_list = Some(vec![11]);

        let spec = series_spec(&criteria);
        let found = store
            .series()
            .find_all(&spec, &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|s| s.id).collect();
        assert_eq!(ids, vec![7]);
        assert_eq!(store.series().count(&spec).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_relation_range_on_to_many_join() {
        let store = seeded().await;
        let mut criteria = SeriesCriteria::new();
        criteria.comic_id().greater_than = Some(10);

        let spec = series_spec(&criteria);
        let found = store
            .series()
            .find_all(&spec, &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[tokio::test]
    async fn test_unspecified_relation_matches_left_join_null() {
        let store = seeded().await;
        let mut criteria = ComicCriteria::new();
        criteria.series_id().specified = Some(false);
        let found = store
            .comics()
            .find_all(&comic_spec(&criteria), &Sort::unsorted())
            .await
            .expect("find");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Some(13));
    }

    #[tokio::test]
    async fn test_to_many_join_duplicates_without_distinct() {
        let store = seeded().await;
        let mut criteria = SeriesCriteria::new();
        criteria.comic_id().specified = Some(true);

        let spec = series_spec(&criteria);
        let found = store
            .series()
            .find_all(&spec, &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 7, 8]);
        assert_eq!(store.series().count(&spec).await.expect("count"), 3);

        criteria.set_distinct(true);
        let spec = series_spec(&criteria);
        let found = store
            .series()
            .find_all(&spec, &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 8]);
        assert_eq!(store.series().count(&spec).await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_count_equals_find_all_length() {
        let store = seeded().await;
        let mut criteria = SeriesCriteria::new();
        criteria.comic_id().in_list = Some(vec![10, 11, 12]);
        criteria.name().contains = Some("a".into());

        let spec = series_spec(&criteria);
        let found = store
            .series()
            .find_all(&spec, &Sort::unsorted())
            .await
            .expect("find");
        let count = store.series().count(&spec).await.expect("count");
        assert_eq!(count, found.len() as u64);
    }

    #[tokio::test]
    async fn test_empty_criteria_returns_everything() {
        let store = seeded().await;
        let spec = compile(Comic::schema(), Some(&Criteria::new())).expect("compiles");
        assert_eq!(store.comics().count(&spec).await.expect("count"), 4);
    }

    #[tokio::test]
    async fn test_sort_puts_nulls_last_ascending_and_first_descending() {
        let store = seeded().await;
        let comics = store.comics();

        let ascending = comics
            .find_all_unfiltered(&Sort::by("issuenumber", OrderDirection::Ascending))
            .await
            .expect("find");
        let ids: Vec<_> = ascending.iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 11, 13, 12]);

        let descending = comics
            .find_all_unfiltered(&Sort::by("issuenumber", OrderDirection::Descending))
            .await
            .expect("find");
        let ids: Vec<_> = descending.iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 13, 11, 10]);
    }

    #[tokio::test]
    async fn test_sort_on_unknown_property_is_rejected() {
        let store = seeded().await;
        let error = store
            .comics()
            .find_all_unfiltered(&Sort::by("thumbnail", OrderDirection::Ascending))
            .await
            .expect_err("unsortable");
        assert_eq!(error.kind, RepositoryErrorKind::ValidationFailed);
        assert_eq!(error.operation, RepositoryOperation::FindAll);
    }

    #[tokio::test]
    async fn test_find_page_windows_sorted_rows() {
        let store = seeded().await;
        let page = store
            .comics()
            .find_page(
                &Specification::always(),
                Pagination::page(1, 3),
                &Sort::by("id", OrderDirection::Descending),
            )
            .await
            .expect("page");
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, Some(10));
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_create_assigns_next_id_after_seed() {
        let store = seeded().await;
        let created = store
            .characters()
            .create(Characters {
                full_name: Some("Selina Kyle".into()),
                ..Characters::default()
            })
            .await
            .expect("create");
        assert_eq!(created.id, Some(14));
        assert!(store.characters().exists(&14).await.expect("exists"));
    }

    #[tokio::test]
    async fn test_exhausted_sequence_is_an_error() {
        let store = InMemoryStore::new();
        store
            .seed(SeedData {
                characters: vec![Characters {
                    id: Some(i64::MAX),
                    ..Characters::default()
                }],
                ..SeedData::default()
            })
            .await
            .expect("seed");

        let error = store
            .characters()
            .create(Characters::default())
            .await
            .expect_err("no id left");
        assert_eq!(error.kind, RepositoryErrorKind::ConstraintViolation);
        assert_eq!(error.operation, RepositoryOperation::Create);
        assert_eq!(store.counts().await.characters, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_existing_id() {
        let store = InMemoryStore::new();
        let error = store
            .comics()
            .create(comic(1, None, None))
            .await
            .expect_err("has id");
        assert_eq!(error.kind, RepositoryErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_dangling_reference_is_a_constraint_violation() {
        let store = seeded().await;
        let mut orphan = comic(0, None, Some(404));
        orphan.id = None;
        let error = store.comics().create(orphan).await.expect_err("dangling");
        assert_eq!(error.kind, RepositoryErrorKind::ConstraintViolation);
        assert_eq!(error.entity_type.as_deref(), Some("Series"));
        assert_eq!(error.entity_id.as_deref(), Some("404"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = seeded().await;
        let comics = store.comics();

        let error = comics
            .update(&99, comic(99, None, None))
            .await
            .expect_err("unknown");
        assert_eq!(error.kind, RepositoryErrorKind::NotFound);
        assert_eq!(error.operation, RepositoryOperation::Update);

        let updated = comics
            .update(&13, comic(13, Some(6), Some(8)))
            .await
            .expect("update");
        assert_eq!(updated.series_id(), Some(8));

        assert!(comics.delete(&13).await.expect("delete"));
        assert!(!comics.delete(&13).await.expect("delete"));
        assert_eq!(comics.find_by_id(&13).await.expect("find"), None);
    }

    #[tokio::test]
    async fn test_deleted_parent_joins_nothing() {
        let store = seeded().await;
        assert!(store.series().delete(&8).await.expect("delete"));

        let mut criteria = ComicCriteria::new();
        criteria.series_id().specified = Some(false);
        let found = store
            .comics()
            .find_all(&comic_spec(&criteria), &Sort::unsorted())
            .await
            .expect("find");
        let ids: Vec<_> = found.iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 13]);
    }

    #[tokio::test]
    async fn test_seed_rejects_dangling_reference() {
        let store = InMemoryStore::new();
        let error = store
            .seed(SeedData {
                comics: vec![comic(1, None, Some(2))],
                ..SeedData::default()
            })
            .await
            .expect_err("dangling");
        assert_eq!(error.kind, RepositoryErrorKind::ConstraintViolation);
        assert_eq!(store.counts().await, TableCounts::default());
    }

    #[tokio::test]
    async fn test_seed_data_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{"series":[{"id":3,"name":"Saga"}],"comics":[{"issuenumber":1,"series":{"id":3}}]}"#,
        )
        .expect("write");

        let data = SeedData::from_path(&path).await.expect("read seed");
        assert!(data.characters.is_empty());

        let store = InMemoryStore::new();
        store.seed(data).await.expect("seed");
        let counts = store.counts().await;
        assert_eq!((counts.series, counts.comics), (1, 1));
        let comic = store.comics().find_by_id(&4).await.expect("find");
        assert_eq!(comic.and_then(|c| c.series_id()), Some(3));
    }
}
