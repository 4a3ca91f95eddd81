//! Persistence client consumed by the repository
//!
//! [`Store`] is the whole surface the repository needs from the storage
//! layer. Reads receive the query produced by the criteria fold; by-key
//! writes receive a fresh root query, so criteria never narrow what they touch.
//!
//! Methods use return-position `impl Future` (Rust 1.75+), so implementations
//! can be written with plain `async fn`.

use std::future::Future;

use serde_json::Value;

use super::error::RepositoryError;
use super::model::{FieldMap, Model};
use super::page::PageRequest;
use super::query::{Aggregate, Column, Query};

/// Result type for repository and store operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage backend for [`Model`] rows
pub trait Store: Send + Sync {
    /// Check that the store can serve `M`
    ///
    /// Fails with an `EntityResolutionFailure` error when it cannot.
    fn resolve<M: Model>(&self) -> RepositoryResult<()>;

    /// Every row matching `query`, in the query's order (natural order otherwise)
    fn fetch_all<M: Model>(
        &self,
        query: &Query<M>,
    ) -> impl Future<Output = RepositoryResult<Vec<M>>> + Send;

    /// First row matching `query`
    fn first<M: Model>(
        &self,
        query: &Query<M>,
    ) -> impl Future<Output = RepositoryResult<Option<M>>> + Send;

    /// One window of rows matching `query`, plus the total number of matches
    fn paginate<M: Model>(
        &self,
        query: &Query<M>,
        request: PageRequest,
    ) -> impl Future<Output = RepositoryResult<(Vec<M>, u64)>> + Send;

    /// Minimum or maximum of `column` over rows matching `query`
    ///
    /// `None` when no row has a value for the column.
    fn aggregate<M: Model>(
        &self,
        query: &Query<M>,
        aggregate: Aggregate,
        column: &Column,
    ) -> impl Future<Output = RepositoryResult<Option<Value>>> + Send;

    /// Insert a new row and return it as stored
    fn insert<M: Model>(
        &self,
        fields: FieldMap,
    ) -> impl Future<Output = RepositoryResult<M>> + Send;

    /// Merge `fields` into the row with primary key `id`
    ///
    /// Only the query's trashed scope applies. `None` when no such row exists.
    fn update<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
        fields: FieldMap,
    ) -> impl Future<Output = RepositoryResult<Option<bool>>> + Send;

    /// Delete the row with primary key `id`
    ///
    /// Marks the row trashed when `M::SOFT_DELETES`, removes it otherwise.
    /// Only the query's trashed scope applies. `None` when no such row exists.
    fn delete<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
    ) -> impl Future<Output = RepositoryResult<Option<bool>>> + Send;

    /// Permanently remove the row with primary key `id`
    ///
    /// Only the query's trashed scope applies. `None` when no such row exists.
    fn force_delete<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
    ) -> impl Future<Output = RepositoryResult<Option<bool>>> + Send;
}
