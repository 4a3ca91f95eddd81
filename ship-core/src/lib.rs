//! # ship-core
//!
//! Generic repository layer for Rust services: one [`Repository`](repository::Repository)
//! per model, reusable query rules ("criteria") applied in registration order,
//! soft-delete aware reads and deletes, and paginated results with ready-made
//! link metadata.
//!
//! ## Features
//!
//! - **Criteria**: composable query rules folded over a fresh query before every read
//! - **By-key writes**: `create`, `update`, `destroy` and `force_destroy` ignore criteria
//! - **Soft deletes**: an explicit model capability, checked before the store is touched
//! - **Pagination**: per-call page sizes with `current_page` / `last_page` / link metadata
//! - **Pluggable storage**: any [`Store`](repository::Store); an in-memory store is included
//! - **Configuration**: Figment-based loading with XDG discovery and env overrides
//!
//! ## Example
//!
//! ```rust,no_run
//! use ship_core::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Post {
//!     id: String,
//!     title: String,
//! }
//!
//! #[derive(Serialize)]
//! struct NewPost {
//!     title: String,
//! }
//!
//! impl Model for Post {
//!     const NAME: &'static str = "Post";
//!     const TABLE: &'static str = "posts";
//!
//!     type Fillable = NewPost;
//!     type UpdateFillable = NewPost;
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = InMemoryStore::new();
//!     store.register::<Post>()?;
//!
//!     let mut posts = Repository::<Post, _>::with_config(store, &config.pagination)?;
//!     posts.push_criteria(OrderByCriterion::asc("title"));
//!
//!     posts.create(NewPost { title: "Hello".into() }).await?;
//!     let page = posts.paginate(None, "*", 1).await?;
//!     println!("{}", page.links_to_json());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod repository;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, PaginationConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::observability::init_tracing;

    pub use crate::repository::{
        criterion_fn, Column, Columns, Criterion, FilterCondition, FilterValue, InMemoryStore,
        LimitCriterion, Model, OrderByCriterion, OrderDirection, Page, PageMeta, Query, Repository,
        RepositoryError, RepositoryErrorKind, RepositoryResult, Store, WhereCriterion,
    };
}
