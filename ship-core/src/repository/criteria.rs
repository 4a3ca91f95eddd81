//! Reusable query rules
//!
//! A [`Criterion`] turns one [`Query`] into the next. The repository folds its
//! registered criteria over a fresh query, in registration order, before
//! every read and aggregate. Criteria may read from the repository they are
//! applied through but cannot change its criteria list: they only ever see a
//! shared reference.

use std::sync::Arc;

use super::base::Repository;
use super::model::Model;
use super::query::{FilterCondition, FilterValue, OrderDirection, Query};
use super::store::Store;

/// A query transformation applied by a [`Repository`] before reads
///
/// # Example
///
/// ```rust
/// use ship_core::repository::{Criterion, Model, Query, Repository, Store};
///
/// /// Only rows that are published
/// struct Published;
///
/// impl<M: Model, S: Store> Criterion<M, S> for Published {
///     fn apply(&self, query: Query<M>, _repository: &Repository<M, S>) -> Query<M> {
///         query.where_eq("status", "published")
///     }
/// }
/// ```
pub trait Criterion<M: Model, S: Store>: Send + Sync {
    fn apply(&self, query: Query<M>, repository: &Repository<M, S>) -> Query<M>;
}

impl<M, S, C> Criterion<M, S> for Arc<C>
where
    M: Model,
    S: Store,
    C: Criterion<M, S> + ?Sized,
{
    fn apply(&self, query: Query<M>, repository: &Repository<M, S>) -> Query<M> {
        (**self).apply(query, repository)
    }
}

/// Adds one filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCriterion {
    condition: FilterCondition,
}

impl WhereCriterion {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(FilterCondition::eq(field, value))
    }
}

impl<M: Model, S: Store> Criterion<M, S> for WhereCriterion {
    fn apply(&self, query: Query<M>, _repository: &Repository<M, S>) -> Query<M> {
        query.filter(self.condition.clone())
    }
}

/// Appends an ordering column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByCriterion {
    column: String,
    direction: OrderDirection,
}

impl OrderByCriterion {
    pub fn new(column: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, OrderDirection::Ascending)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, OrderDirection::Descending)
    }
}

impl<M: Model, S: Store> Criterion<M, S> for OrderByCriterion {
    fn apply(&self, query: Query<M>, _repository: &Repository<M, S>) -> Query<M> {
        query.order_by(self.column.clone(), self.direction)
    }
}

/// Caps the number of rows a read returns
///
/// Pagination windows ignore the cap; it bounds `all` and `find_by_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitCriterion(pub u64);

impl<M: Model, S: Store> Criterion<M, S> for LimitCriterion {
    fn apply(&self, query: Query<M>, _repository: &Repository<M, S>) -> Query<M> {
        query.limit(self.0)
    }
}

/// Criterion backed by a closure, see [`criterion_fn`]
#[derive(Clone)]
pub struct FnCriterion<F> {
    f: F,
}

/// Build a criterion from a closure
///
/// ```rust
/// use ship_core::repository::{criterion_fn, InMemoryStore, Query, Repository};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Serialize, Deserialize)]
/// # struct Post { id: String }
/// # impl ship_core::repository::Model for Post {
/// #     const NAME: &'static str = "Post";
/// #     const TABLE: &'static str = "posts";
/// #     type Fillable = Post;
/// #     type UpdateFillable = Post;
/// # }
///
/// let recent = criterion_fn(|query: Query<Post>, _: &Repository<Post, InMemoryStore>| {
///     query.limit(5)
/// });
/// # let _ = recent;
/// ```
pub fn criterion_fn<M, S, F>(f: F) -> FnCriterion<F>
where
    M: Model,
    S: Store,
    F: Fn(Query<M>, &Repository<M, S>) -> Query<M> + Send + Sync,
{
    FnCriterion { f }
}

impl<M, S, F> Criterion<M, S> for FnCriterion<F>
where
    M: Model,
    S: Store,
    F: Fn(Query<M>, &Repository<M, S>) -> Query<M> + Send + Sync,
{
    fn apply(&self, query: Query<M>, repository: &Repository<M, S>) -> Query<M> {
        (self.f)(query, repository)
    }
}

impl<F> std::fmt::Debug for FnCriterion<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCriterion").finish_non_exhaustive()
    }
}
