//! The repository: criteria-driven reads, by-key writes
//!
//! Reads and aggregates run against the query produced by folding the
//! registered criteria over a fresh query. Writes address rows by primary
//! key through a fresh query and never see the criteria.

use std::sync::Arc;

use serde_json::Value;

use crate::config::PaginationConfig;

use super::criteria::Criterion;
use super::error::{RepositoryError, RepositoryOperation};
use super::model::{into_field_map, Model};
use super::page::{Page, PageMeta, PageRequest};
use super::query::{Aggregate, Column, Columns, FilterValue, Query};
use super::store::{RepositoryResult, Store};

/// Repository managing one [`Model`] over a [`Store`]
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use ship_core::repository::{InMemoryStore, Model, OrderByCriterion, Repository};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Post {
///     id: String,
///     title: String,
/// }
///
/// #[derive(Serialize)]
/// struct CreatePost {
///     title: String,
/// }
///
/// impl Model for Post {
///     const NAME: &'static str = "Post";
///     const TABLE: &'static str = "posts";
///
///     type Fillable = CreatePost;
///     type UpdateFillable = CreatePost;
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ship_core::repository::RepositoryResult<()> {
/// let store = InMemoryStore::new();
/// store.register::<Post>()?;
///
/// let mut posts = Repository::<Post, _>::new(store)?;
/// posts.push_criteria(OrderByCriterion::asc("title"));
///
/// posts.create(CreatePost { title: "b".into() }).await?;
/// posts.create(CreatePost { title: "a".into() }).await?;
///
/// let titles: Vec<String> = posts.all("*").await?.into_iter().map(|p| p.title).collect();
/// assert_eq!(titles, vec!["a", "b"]);
/// # Ok(())
/// # }
/// ```
pub struct Repository<M: Model, S: Store> {
    store: S,
    criteria: Vec<Arc<dyn Criterion<M, S>>>,
    template: Query<M>,
    default_page_size: u32,
    page_name: String,
    path: String,
}

impl<M: Model, S: Store> Repository<M, S> {
    /// Create a repository with the default pagination settings
    ///
    /// Fails with `EntityResolutionFailure` when the store cannot serve `M`.
    pub fn new(store: S) -> RepositoryResult<Self> {
        Self::with_config(store, &PaginationConfig::default())
    }

    /// Create a repository using the given pagination settings
    pub fn with_config(store: S, config: &PaginationConfig) -> RepositoryResult<Self> {
        store.resolve::<M>()?;
        tracing::debug!(model = M::NAME, table = M::TABLE, "Repository created");

        Ok(Self {
            store,
            criteria: Vec::new(),
            template: Query::fresh(),
            default_page_size: config.default_page_size.max(1),
            page_name: config.page_name.clone(),
            path: config.path.clone(),
        })
    }

    /// Append a criterion; it runs after every criterion already registered
    pub fn push_criteria<C>(&mut self, criterion: C) -> &mut Self
    where
        C: Criterion<M, S> + 'static,
    {
        self.criteria.push(Arc::new(criterion));
        self
    }

    /// Number of registered criteria
    pub fn criteria_count(&self) -> usize {
        self.criteria.len()
    }

    /// Page size used when `paginate` is called without one
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A fresh query with no criteria applied
    fn start_conditions(&self) -> Query<M> {
        self.template.clone()
    }

    fn apply_criteria(&self) -> Query<M> {
        self.criteria
            .iter()
            .fold(self.start_conditions(), |query, criterion| {
                criterion.apply(query, self)
            })
    }

    fn require_soft_deletes(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        if M::supports_soft_deletes() {
            return Ok(());
        }
        tracing::warn!(
            model = M::NAME,
            operation = %operation,
            "Model does not support soft deletes"
        );
        Err(RepositoryError::missing_soft_deletes(operation, M::NAME))
    }

    fn trace(&self, operation: RepositoryOperation) {
        tracing::debug!(
            model = M::NAME,
            operation = %operation,
            criteria = self.criteria.len(),
            "Repository operation"
        );
    }

    /// Every row visible through the criteria, restricted to `columns`
    pub async fn all(&self, columns: impl Into<Columns>) -> RepositoryResult<Vec<M>> {
        self.trace(RepositoryOperation::All);
        let query = self.apply_criteria().select(columns);
        self.store.fetch_all(&query).await
    }

    /// First row visible through the criteria with `field = value`
    pub async fn find_by_field(
        &self,
        field: &str,
        value: impl Into<FilterValue>,
        columns: impl Into<Columns>,
    ) -> RepositoryResult<Option<M>> {
        let operation = RepositoryOperation::FindByField;
        self.trace(operation);
        let query = self.apply_criteria().where_eq(field, value).select(columns);
        let found = self.store.first(&query).await?;
        if found.is_none() {
            tracing::debug!(model = M::NAME, operation = %operation, field, "No row matched");
        }
        Ok(found)
    }

    /// Like [`find_by_field`](Self::find_by_field), trashed rows included
    ///
    /// Fails with `MissingSoftDeleteCapability` before touching the store
    /// when `M` does not support soft deletes.
    pub async fn find_by_field_with_trashed(
        &self,
        field: &str,
        value: impl Into<FilterValue>,
        columns: impl Into<Columns>,
    ) -> RepositoryResult<Option<M>> {
        let operation = RepositoryOperation::FindByFieldWithTrashed;
        self.require_soft_deletes(operation)?;
        self.trace(operation);
        let query = self
            .apply_criteria()
            .with_trashed()
            .where_eq(field, value)
            .select(columns);
        let found = self.store.first(&query).await?;
        if found.is_none() {
            tracing::debug!(model = M::NAME, operation = %operation, field, "No row matched");
        }
        Ok(found)
    }

    /// One page of rows visible through the criteria
    ///
    /// `limit` of `None` or `0` uses [`default_page_size`](Self::default_page_size).
    /// The page size never outlives the call.
    pub async fn paginate(
        &self,
        limit: Option<u32>,
        columns: impl Into<Columns>,
        page: u32,
    ) -> RepositoryResult<Page<M>> {
        self.trace(RepositoryOperation::Paginate);
        let per_page = limit
            .filter(|l| *l > 0)
            .unwrap_or(self.default_page_size);
        let request = PageRequest::new(page, per_page);
        let query = self.apply_criteria().select(columns);

        let (items, total) = self.store.paginate(&query, request).await?;
        let meta = PageMeta::new(request, total, &self.path, &self.page_name);
        Ok(Page::new(items, meta))
    }

    /// Insert a new row and return it
    pub async fn create(&self, fields: M::Fillable) -> RepositoryResult<M> {
        let operation = RepositoryOperation::Create;
        self.trace(operation);
        let fields = into_field_map(&fields, operation)?;
        self.store.insert::<M>(fields).await
    }

    /// Apply `fields` to the row with primary key `id`
    ///
    /// `None` when no such row exists; nothing is written in that case.
    pub async fn update(
        &self,
        fields: M::UpdateFillable,
        id: &str,
    ) -> RepositoryResult<Option<bool>> {
        let operation = RepositoryOperation::Update;
        self.trace(operation);
        let fields = into_field_map(&fields, operation)?;
        let updated = self.store.update(&self.start_conditions(), id, fields).await?;
        if updated.is_none() {
            tracing::debug!(model = M::NAME, operation = %operation, id, "No row matched");
        }
        Ok(updated)
    }

    /// Delete the row with primary key `id`
    ///
    /// Soft-deletes when `M` supports soft deletes, removes the row otherwise.
    /// Rows already trashed are not found. `None` when no such row exists.
    pub async fn destroy(&self, id: &str) -> RepositoryResult<Option<bool>> {
        let operation = RepositoryOperation::Destroy;
        self.trace(operation);
        let deleted = self.store.delete(&self.start_conditions(), id).await?;
        if deleted.is_none() {
            tracing::debug!(model = M::NAME, operation = %operation, id, "No row matched");
        }
        Ok(deleted)
    }

    /// Permanently remove the row with primary key `id`, trashed or not
    pub async fn force_destroy(&self, id: &str) -> RepositoryResult<Option<bool>> {
        let operation = RepositoryOperation::ForceDestroy;
        self.require_soft_deletes(operation)?;
        self.trace(operation);
        let query = self.start_conditions().with_trashed();
        let deleted = self.store.force_delete(&query, id).await?;
        if deleted.is_none() {
            tracing::debug!(model = M::NAME, operation = %operation, id, "No row matched");
        }
        Ok(deleted)
    }

    /// Smallest value of `column` among rows visible through the criteria
    pub async fn min(&self, column: impl Into<Column>) -> RepositoryResult<Option<Value>> {
        self.trace(RepositoryOperation::Min);
        self.aggregate(Aggregate::Min, column.into()).await
    }

    /// Largest value of `column` among rows visible through the criteria
    pub async fn max(&self, column: impl Into<Column>) -> RepositoryResult<Option<Value>> {
        self.trace(RepositoryOperation::Max);
        self.aggregate(Aggregate::Max, column.into()).await
    }

    async fn aggregate(
        &self,
        aggregate: Aggregate,
        column: Column,
    ) -> RepositoryResult<Option<Value>> {
        let query = self.apply_criteria();
        self.store.aggregate(&query, aggregate, &column).await
    }
}

impl<M: Model, S: Store> std::fmt::Debug for Repository<M, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("model", &M::NAME)
            .field("criteria", &self.criteria.len())
            .field("default_page_size", &self.default_page_size)
            .finish()
    }
}
