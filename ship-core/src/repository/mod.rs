//! Criteria-driven repository over a pluggable store
//!
//! A [`Repository`] manages one [`Model`] type. Reads (`all`, `find_by_field`,
//! `paginate`, `min`, `max`) run against a query assembled by folding the
//! registered [`Criterion`]s, in order, over a fresh [`Query`]. By-key writes
//! (`create`, `update`, `destroy`, `force_destroy`) skip the criteria.
//!
//! # Features
//!
//! - **Criteria**: [`Criterion`] plus ready-made [`WhereCriterion`], [`OrderByCriterion`],
//!   [`LimitCriterion`] and closures via [`criterion_fn`]
//! - **Soft deletes**: declared with [`Model::SOFT_DELETES`] and checked before any store call
//! - **Pagination**: [`Page`] pairs the rows with [`PageMeta`]
//! - **Storage**: any [`Store`]; [`InMemoryStore`] ships with the crate
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use ship_core::repository::{InMemoryStore, Model, Repository, WhereCriterion};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Post {
//!     id: String,
//!     status: String,
//! }
//!
//! #[derive(Serialize)]
//! struct NewPost {
//!     status: String,
//! }
//!
//! impl Model for Post {
//!     const NAME: &'static str = "Post";
//!     const TABLE: &'static str = "posts";
//!     const SOFT_DELETES: bool = true;
//!
//!     type Fillable = NewPost;
//!     type UpdateFillable = NewPost;
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ship_core::repository::RepositoryResult<()> {
//! let store = InMemoryStore::new();
//! store.register::<Post>()?;
//!
//! let mut posts = Repository::<Post, _>::new(store)?;
//! for status in ["draft", "published", "published"] {
//!     posts.create(NewPost { status: status.into() }).await?;
//! }
//!
//! posts.push_criteria(WhereCriterion::eq("status", "published"));
//! let page = posts.paginate(Some(1), "*", 1).await?;
//! assert_eq!(page.meta.total, 2);
//! assert_eq!(page.meta.last_page, 2);
//! # Ok(())
//! # }
//! ```

mod base;
mod criteria;
mod error;
mod memory;
mod model;
mod page;
mod query;
mod store;

pub use base::Repository;
pub use criteria::{
    criterion_fn, Criterion, FnCriterion, LimitCriterion, OrderByCriterion, WhereCriterion,
};
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryStore;
pub use model::{into_field_map, FieldMap, Model};
pub use page::{Page, PageLink, PageLinks, PageMeta, PageRequest};
pub use query::{
    Aggregate, Column, Columns, FilterCondition, FilterOperator, FilterValue, OrderDirection,
    Query, TrashedScope,
};
pub use store::{RepositoryResult, Store};
