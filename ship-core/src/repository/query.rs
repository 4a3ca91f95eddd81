//! Query state threaded through criteria
//!
//! A [`Query`] describes a read that has not run yet: filters, selected
//! columns, ordering, an optional row limit and which rows count as trashed.
//! It is a plain value. Every builder method consumes the query and returns
//! the next one, so a criterion receives one query and hands back another
//! without any shared mutable builder.
//!
//! # Example
//!
//! ```rust
//! use ship_core::repository::{FilterCondition, OrderDirection, Query};
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Serialize, Deserialize)]
//! # struct Post { id: String }
//! # impl ship_core::repository::Model for Post {
//! #     const NAME: &'static str = "Post";
//! #     const TABLE: &'static str = "posts";
//! #     type Fillable = Post;
//! #     type UpdateFillable = Post;
//! # }
//!
//! let query = Query::<Post>::fresh()
//!     .where_eq("status", "published")
//!     .filter(FilterCondition::gte("views", 100_i64))
//!     .order_by("created_at", OrderDirection::Descending)
//!     .limit(5);
//!
//! assert_eq!(query.filters().len(), 2);
//! assert_eq!(query.row_limit(), Some(5));
//! ```

use std::fmt;
use std::marker::PhantomData;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Pattern matching (LIKE)
    Like,
    /// Value is in a list (IN)
    In,
    /// Value is null (IS NULL)
    IsNull,
    /// Value is not null (IS NOT NULL)
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
            Self::In => write!(f, "IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// List of string values (for IN operator)
    StringList(Vec<String>),
    /// List of integer values (for IN operator)
    IntegerList(Vec<i64>),
    /// Null value (for IS NULL / IS NOT NULL)
    Null,
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(list: Vec<i64>) -> Self {
        Self::IntegerList(list)
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a not-equal filter (field != value)
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    /// Create a greater-than filter (field > value)
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    /// Create a greater-than-or-equal filter (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// Create a less-than filter (field < value)
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// Create a less-than-or-equal filter (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// Create a LIKE pattern filter (`%` and `_` wildcards)
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FilterValue::String(pattern.into()))
    }

    /// Create an IN list filter for strings
    pub fn in_strings(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::StringList(values))
    }

    /// Create an IN list filter for integers
    pub fn in_integers(field: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::IntegerList(values))
    }

    /// Create an IS NULL filter
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, FilterValue::Null)
    }

    /// Create an IS NOT NULL filter
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, FilterValue::Null)
    }
}

/// Columns a read returns
///
/// `"*"` anywhere in a column list means every column, matching the
/// `['*']` default of the read operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Columns {
    /// Every column
    #[default]
    All,
    /// Only the listed columns
    Only(Vec<String>),
}

impl Columns {
    /// Build a column list, collapsing to [`Columns::All`] on `"*"` or an empty list
    pub fn list<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() || columns.iter().any(|c| c == "*") {
            Self::All
        } else {
            Self::Only(columns)
        }
    }

    /// Whether every column is selected
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&str> for Columns {
    fn from(column: &str) -> Self {
        Self::list([column])
    }
}

impl From<&[&str]> for Columns {
    fn from(columns: &[&str]) -> Self {
        Self::list(columns.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(columns: [&str; N]) -> Self {
        Self::list(columns)
    }
}

impl From<Vec<&str>> for Columns {
    fn from(columns: Vec<&str>) -> Self {
        Self::list(columns)
    }
}

impl From<Vec<String>> for Columns {
    fn from(columns: Vec<String>) -> Self {
        Self::list(columns)
    }
}

/// Target of an aggregate: a column name or a raw store expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// A named column
    Name(String),
    /// A raw expression passed to the store as-is
    Raw(String),
}

impl Column {
    /// Raw store expression, e.g. `LENGTH(title)`
    pub fn raw(expression: impl Into<String>) -> Self {
        Self::Raw(expression.into())
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Raw(expression) => write!(f, "raw({})", expression),
        }
    }
}

/// Which rows a query sees with respect to soft deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashedScope {
    /// Trashed rows are hidden
    #[default]
    Exclude,
    /// Trashed rows are returned alongside live ones
    Include,
    /// Only trashed rows are returned
    Only,
}

/// Aggregate function run over a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Smallest value
    Min,
    /// Largest value
    Max,
}

/// An in-progress, not-yet-executed read against one model's collection
pub struct Query<M> {
    filters: Vec<FilterCondition>,
    columns: Columns,
    orders: Vec<(String, OrderDirection)>,
    limit: Option<u64>,
    trashed: TrashedScope,
    _model: PhantomData<fn() -> M>,
}

impl<M> Query<M> {
    /// Root query: no filters, every column, trashed rows hidden
    pub fn fresh() -> Self {
        Self {
            filters: Vec::new(),
            columns: Columns::All,
            orders: Vec::new(),
            limit: None,
            trashed: TrashedScope::Exclude,
            _model: PhantomData,
        }
    }

    /// Add an equality filter
    #[must_use]
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(FilterCondition::eq(field, value))
    }

    /// Add a filter condition
    #[must_use]
    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    /// Restrict the returned columns
    #[must_use]
    pub fn select(mut self, columns: impl Into<Columns>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Append an ordering; earlier orderings take precedence
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.orders.push((column.into(), direction));
        self
    }

    /// Cap the number of rows returned by `all`-style reads
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Include trashed rows
    #[must_use]
    pub fn with_trashed(mut self) -> Self {
        self.trashed = TrashedScope::Include;
        self
    }

    /// Return only trashed rows
    #[must_use]
    pub fn only_trashed(mut self) -> Self {
        self.trashed = TrashedScope::Only;
        self
    }

    pub fn filters(&self) -> &[FilterCondition] {
        &self.filters
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn orders(&self) -> &[(String, OrderDirection)] {
        &self.orders
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn trashed(&self) -> TrashedScope {
        self.trashed
    }
}

impl<M> Default for Query<M> {
    fn default() -> Self {
        Self::fresh()
    }
}

impl<M> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            columns: self.columns.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            trashed: self.trashed,
            _model: PhantomData,
        }
    }
}

impl<M> PartialEq for Query<M> {
    fn eq(&self, other: &Self) -> bool {
        self.filters == other.filters
            && self.columns == other.columns
            && self.orders == other.orders
            && self.limit == other.limit
            && self.trashed == other.trashed
    }
}

impl<M> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters)
            .field("columns", &self.columns)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("trashed", &self.trashed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row;

    #[test]
    fn test_order_direction_display() {
        assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
        assert_eq!(format!("{}", OrderDirection::Descending), "desc");
        assert_eq!(OrderDirection::default(), OrderDirection::Ascending);
    }

    #[test]
    fn test_filter_operator_display() {
        assert_eq!(format!("{}", FilterOperator::Equal), "=");
        assert_eq!(format!("{}", FilterOperator::GreaterThanOrEqual), ">=");
        assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
        assert_eq!(format!("{}", FilterOperator::IsNotNull), "IS NOT NULL");
    }

    #[test]
    fn test_filter_value_conversions() {
        assert_eq!(FilterValue::from("a"), FilterValue::String("a".to_string()));
        assert_eq!(FilterValue::from(7_i32), FilterValue::Integer(7));
        assert_eq!(FilterValue::from(7_u32), FilterValue::Integer(7));
        assert_eq!(FilterValue::from(true), FilterValue::Boolean(true));
        assert_eq!(
            FilterValue::from(vec![1_i64, 2]),
            FilterValue::IntegerList(vec![1, 2])
        );
    }

    #[test]
    fn test_filter_condition_constructors() {
        let filter = FilterCondition::eq("status", "active");
        assert_eq!(filter.field, "status");
        assert_eq!(filter.operator, FilterOperator::Equal);

        assert_eq!(FilterCondition::lt("qty", 3_i64).operator, FilterOperator::LessThan);
        assert_eq!(FilterCondition::is_null("deleted_at").value, FilterValue::Null);
        assert_eq!(
            FilterCondition::like("email", "%@example.com").value,
            FilterValue::String("%@example.com".to_string())
        );
    }

    #[test]
    fn test_columns_star_means_all() {
        assert!(Columns::from(["*"]).is_all());
        assert!(Columns::from(["id", "*"]).is_all());
        assert!(Columns::list(Vec::<String>::new()).is_all());
        assert_eq!(
            Columns::from(["id", "title"]),
            Columns::Only(vec!["id".to_string(), "title".to_string()])
        );
    }

    #[test]
    fn test_column_display() {
        assert_eq!(Column::from("views").to_string(), "views");
        assert_eq!(Column::raw("LENGTH(title)").to_string(), "raw(LENGTH(title))");
    }

    #[test]
    fn test_fresh_query_defaults() {
        let query = Query::<Row>::fresh();
        assert!(query.filters().is_empty());
        assert!(query.columns().is_all());
        assert!(query.orders().is_empty());
        assert_eq!(query.row_limit(), None);
        assert_eq!(query.trashed(), TrashedScope::Exclude);
    }

    #[test]
    fn test_builder_keeps_filter_order() {
        let query = Query::<Row>::fresh()
            .where_eq("a", 1_i64)
            .where_eq("b", 2_i64)
            .with_trashed();
        let fields: Vec<&str> = query.filters().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b"]);
        assert_eq!(query.trashed(), TrashedScope::Include);
        assert_eq!(query.clone().only_trashed().trashed(), TrashedScope::Only);
    }

    #[test]
    fn test_clone_is_independent() {
        let root = Query::<Row>::fresh();
        let derived = root.clone().where_eq("status", "draft");
        assert!(root.filters().is_empty());
        assert_eq!(derived.filters().len(), 1);
        assert_ne!(root, derived);
    }
}
