//! InMemoryStore - HashMap-backed store for tests and development
//!
//! Rows are kept as [`FieldMap`]s per collection, in insertion order, behind
//! an `Arc<RwLock<..>>` so clones share the same data.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation};
use super::model::{from_row, FieldMap, Model};
use super::page::PageRequest;
use super::query::{
    Aggregate, Column, Columns, FilterCondition, FilterOperator, FilterValue, OrderDirection,
    Query, TrashedScope,
};
use super::store::{RepositoryResult, Store};

type Collections = HashMap<String, Vec<FieldMap>>;

/// In-memory store backed by a HashMap of collections
///
/// Collections must be registered before a repository can resolve their
/// model. Clone-friendly via Arc.
///
/// # Example
///
/// ```rust
/// use ship_core::repository::InMemoryStore;
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
/// let store = InMemoryStore::new();
/// store.register::<Post>()?;
/// assert!(store.is_registered::<Post>());
/// # Ok::<(), ship_core::repository::RepositoryError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<Collections>>,
    operations: Arc<AtomicU64>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the collection for `M` if it does not exist yet
    pub fn register<M: Model>(&self) -> RepositoryResult<&Self> {
        self.write(RepositoryOperation::Resolve)?
            .entry(M::TABLE.to_string())
            .or_default();
        Ok(self)
    }

    pub fn is_registered<M: Model>(&self) -> bool {
        self.collections
            .read()
            .map(|collections| collections.contains_key(M::TABLE))
            .unwrap_or(false)
    }

    /// Number of data operations that reached a collection
    pub fn executed_operations(&self) -> u64 {
        self.operations.load(AtomicOrdering::SeqCst)
    }

    /// Raw rows of `M`'s collection, trashed ones included
    pub fn raw_rows<M: Model>(&self) -> RepositoryResult<Vec<FieldMap>> {
        let collections = self.read(RepositoryOperation::All)?;
        collections
            .get(M::TABLE)
            .cloned()
            .ok_or_else(|| unregistered::<M>(RepositoryOperation::All))
    }

    fn read(
        &self,
        operation: RepositoryOperation,
    ) -> RepositoryResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| RepositoryError::other(operation, "store lock poisoned"))
    }

    fn write(
        &self,
        operation: RepositoryOperation,
    ) -> RepositoryResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| RepositoryError::other(operation, "store lock poisoned"))
    }

    fn record_operation(&self) {
        self.operations.fetch_add(1, AtomicOrdering::SeqCst);
    }

    /// Matching rows in query order, before limit and projection
    fn select_rows<M: Model>(
        &self,
        query: &Query<M>,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Vec<FieldMap>> {
        self.record_operation();
        let collections = self.read(operation)?;
        let rows = collections
            .get(M::TABLE)
            .ok_or_else(|| unregistered::<M>(operation))?;

        let mut selected: Vec<FieldMap> = rows
            .iter()
            .filter(|row| visible::<M>(row, query.trashed()))
            .filter(|row| query.filters().iter().all(|c| matches_condition(row, c)))
            .cloned()
            .collect();
        drop(collections);

        if !query.orders().is_empty() {
            selected.sort_by(|a, b| compare_rows(a, b, query.orders()));
        }
        Ok(selected)
    }

    fn fetch_rows<M: Model>(
        &self,
        query: &Query<M>,
        operation: RepositoryOperation,
        cap: Option<u64>,
    ) -> RepositoryResult<Vec<M>> {
        let rows = self.select_rows(query, operation)?;
        let limit = match (query.row_limit(), cap) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        rows.into_iter()
            .take(take)
            .map(|row| from_row(project(row, query.columns()), operation))
            .collect()
    }

    fn paginate_rows<M: Model>(
        &self,
        query: &Query<M>,
        request: PageRequest,
    ) -> RepositoryResult<(Vec<M>, u64)> {
        let rows = self.select_rows(query, RepositoryOperation::Paginate)?;
        let total = rows.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = rows
            .into_iter()
            .skip(skip)
            .take(request.per_page as usize)
            .map(|row| from_row(project(row, query.columns()), RepositoryOperation::Paginate))
            .collect::<RepositoryResult<Vec<M>>>()?;
        Ok((items, total))
    }

    fn aggregate_rows<M: Model>(
        &self,
        query: &Query<M>,
        aggregate: Aggregate,
        column: &Column,
    ) -> RepositoryResult<Option<Value>> {
        let operation = match aggregate {
            Aggregate::Min => RepositoryOperation::Min,
            Aggregate::Max => RepositoryOperation::Max,
        };
        let name = match column {
            Column::Name(name) => name,
            Column::Raw(expression) => {
                return Err(RepositoryError::other(
                    operation,
                    format!(
                        "raw expression {} is not supported by the in-memory store",
                        expression
                    ),
                )
                .with_entity_type(M::NAME));
            }
        };

        let rows = self.select_rows(query, operation)?;
        let values = rows
            .into_iter()
            .filter_map(|mut row| row.remove(name.as_str()))
            .filter(|value| !value.is_null());

        let picked = match aggregate {
            Aggregate::Min => values.min_by(compare_values),
            Aggregate::Max => values.max_by(compare_values),
        };
        Ok(picked)
    }

    fn insert_row<M: Model>(&self, mut fields: FieldMap) -> RepositoryResult<M> {
        let operation = RepositoryOperation::Create;
        self.record_operation();

        let id = match fields.get(M::PRIMARY_KEY) {
            None | Some(Value::Null) => Uuid::now_v7().to_string(),
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(RepositoryError::constraint_violation(
                    operation,
                    format!("primary key {} must be a string, got {}", M::PRIMARY_KEY, other),
                )
                .with_entity_type(M::NAME));
            }
        };
        fields.insert(M::PRIMARY_KEY.to_string(), Value::String(id.clone()));

        if M::TIMESTAMPS {
            let now = Value::String(Utc::now().to_rfc3339());
            fields.entry("created_at").or_insert_with(|| now.clone());
            fields.entry("updated_at").or_insert(now);
        }

        let mut collections = self.write(operation)?;
        let rows = collections
            .get_mut(M::TABLE)
            .ok_or_else(|| unregistered::<M>(operation))?;
        if position_of::<M>(rows, &id, TrashedScope::Include).is_some() {
            return Err(RepositoryError::already_exists(operation, M::NAME, id));
        }
        rows.push(fields.clone());
        drop(collections);

        from_row(fields, operation)
    }

    fn update_row<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
        mut fields: FieldMap,
    ) -> RepositoryResult<Option<bool>> {
        let operation = RepositoryOperation::Update;
        self.record_operation();
        let mut collections = self.write(operation)?;
        let rows = collections
            .get_mut(M::TABLE)
            .ok_or_else(|| unregistered::<M>(operation))?;
        let Some(index) = position_of::<M>(rows, id, query.trashed()) else {
            return Ok(None);
        };

        match fields.get(M::PRIMARY_KEY) {
            None => {}
            Some(Value::String(new_id)) if new_id == id => {}
            Some(Value::String(new_id)) => {
                if position_of::<M>(rows, new_id, TrashedScope::Include).is_some() {
                    return Err(RepositoryError::already_exists(operation, M::NAME, new_id.clone()));
                }
            }
            Some(other) => {
                return Err(RepositoryError::constraint_violation(
                    operation,
                    format!("primary key {} must be a string, got {}", M::PRIMARY_KEY, other),
                )
                .with_entity(M::NAME, id));
            }
        }

        if M::TIMESTAMPS {
            fields
                .entry("updated_at")
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        }
        rows[index].extend(fields);
        Ok(Some(true))
    }

    fn delete_row<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
        force: bool,
    ) -> RepositoryResult<Option<bool>> {
        let operation = if force {
            RepositoryOperation::ForceDestroy
        } else {
            RepositoryOperation::Destroy
        };
        self.record_operation();
        let mut collections = self.write(operation)?;
        let rows = collections
            .get_mut(M::TABLE)
            .ok_or_else(|| unregistered::<M>(operation))?;
        let Some(index) = position_of::<M>(rows, id, query.trashed()) else {
            return Ok(None);
        };

        if M::SOFT_DELETES && !force {
            let now = Value::String(Utc::now().to_rfc3339());
            let row = &mut rows[index];
            if M::TIMESTAMPS {
                row.insert("updated_at".to_string(), now.clone());
            }
            row.insert(M::DELETED_AT.to_string(), now);
        } else {
            rows.remove(index);
        }
        Ok(Some(true))
    }
}

impl Store for InMemoryStore {
    fn resolve<M: Model>(&self) -> RepositoryResult<()> {
        if self.read(RepositoryOperation::Resolve)?.contains_key(M::TABLE) {
            Ok(())
        } else {
            Err(unregistered::<M>(RepositoryOperation::Resolve))
        }
    }

    async fn fetch_all<M: Model>(&self, query: &Query<M>) -> RepositoryResult<Vec<M>> {
        self.fetch_rows(query, RepositoryOperation::All, None)
    }

    async fn first<M: Model>(&self, query: &Query<M>) -> RepositoryResult<Option<M>> {
        let mut rows = self.fetch_rows(query, RepositoryOperation::FindByField, Some(1))?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    async fn paginate<M: Model>(
        &self,
        query: &Query<M>,
        request: PageRequest,
    ) -> RepositoryResult<(Vec<M>, u64)> {
        self.paginate_rows(query, request)
    }

    async fn aggregate<M: Model>(
        &self,
        query: &Query<M>,
        aggregate: Aggregate,
        column: &Column,
    ) -> RepositoryResult<Option<Value>> {
        self.aggregate_rows(query, aggregate, column)
    }

    async fn insert<M: Model>(&self, fields: FieldMap) -> RepositoryResult<M> {
        self.insert_row(fields)
    }

    async fn update<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
        fields: FieldMap,
    ) -> RepositoryResult<Option<bool>> {
        self.update_row(query, id, fields)
    }

    async fn delete<M: Model>(&self, query: &Query<M>, id: &str) -> RepositoryResult<Option<bool>> {
        self.delete_row(query, id, false)
    }

    async fn force_delete<M: Model>(
        &self,
        query: &Query<M>,
        id: &str,
    ) -> RepositoryResult<Option<bool>> {
        self.delete_row(query, id, true)
    }
}

fn unregistered<M: Model>(operation: RepositoryOperation) -> RepositoryError {
    RepositoryError::entity_resolution(
        M::NAME,
        format!("collection {} is not registered with the store", M::TABLE),
    )
    .with_operation(operation)
}

fn is_trashed<M: Model>(row: &FieldMap) -> bool {
    M::SOFT_DELETES && row.get(M::DELETED_AT).is_some_and(|v| !v.is_null())
}

fn visible<M: Model>(row: &FieldMap, scope: TrashedScope) -> bool {
    match scope {
        TrashedScope::Exclude => !is_trashed::<M>(row),
        TrashedScope::Include => true,
        TrashedScope::Only => is_trashed::<M>(row),
    }
}

fn position_of<M: Model>(rows: &[FieldMap], id: &str, scope: TrashedScope) -> Option<usize> {
    rows.iter().position(|row| {
        visible::<M>(row, scope) && row.get(M::PRIMARY_KEY).and_then(Value::as_str) == Some(id)
    })
}

fn project(row: FieldMap, columns: &Columns) -> FieldMap {
    match columns {
        Columns::All => row,
        Columns::Only(names) => row
            .into_iter()
            .filter(|(key, _)| names.iter().any(|n| n == key))
            .collect(),
    }
}

fn compare_rows(a: &FieldMap, b: &FieldMap, orders: &[(String, OrderDirection)]) -> Ordering {
    for (column, direction) in orders {
        let ordering = compare_values(
            a.get(column).unwrap_or(&Value::Null),
            b.get(column).unwrap_or(&Value::Null),
        );
        let ordering = match direction {
            OrderDirection::Ascending => ordering,
            OrderDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array < object
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn filter_value_to_json(value: &FilterValue) -> Value {
    match value {
        FilterValue::String(s) => Value::String(s.clone()),
        FilterValue::Integer(n) => Value::from(*n),
        FilterValue::Float(n) => Value::from(*n),
        FilterValue::Boolean(b) => Value::Bool(*b),
        FilterValue::StringList(list) => Value::from(list.clone()),
        FilterValue::IntegerList(list) => Value::from(list.clone()),
        FilterValue::Null => Value::Null,
    }
}

/// SQL-style comparison: `None` when either side is null or the types differ
fn compare_sql(field: &Value, operand: &Value) -> Option<Ordering> {
    if field.is_null() || operand.is_null() || type_rank(field) != type_rank(operand) {
        return None;
    }
    Some(compare_values(field, operand))
}

fn matches_condition(row: &FieldMap, condition: &FilterCondition) -> bool {
    let field = row.get(&condition.field).unwrap_or(&Value::Null);
    let operand = filter_value_to_json(&condition.value);

    match condition.operator {
        FilterOperator::Equal => compare_sql(field, &operand) == Some(Ordering::Equal),
        FilterOperator::NotEqual => {
            matches!(compare_sql(field, &operand), Some(o) if o != Ordering::Equal)
        }
        FilterOperator::GreaterThan => compare_sql(field, &operand) == Some(Ordering::Greater),
        FilterOperator::GreaterThanOrEqual => matches!(
            compare_sql(field, &operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOperator::LessThan => compare_sql(field, &operand) == Some(Ordering::Less),
        FilterOperator::LessThanOrEqual => matches!(
            compare_sql(field, &operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOperator::Like => {
            let text = match field {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return false,
            };
            match &condition.value {
                FilterValue::String(pattern) => like_match(&text, pattern),
                _ => false,
            }
        }
        FilterOperator::In => match operand {
            Value::Array(items) => items
                .iter()
                .any(|item| compare_sql(field, item) == Some(Ordering::Equal)),
            _ => false,
        },
        FilterOperator::IsNull => field.is_null(),
        FilterOperator::IsNotNull => !field.is_null(),
    }
}

/// Case-sensitive LIKE with `%` (any run) and `_` (one character)
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matched[j]: pattern[..j] matches the text consumed so far
    let mut matched = vec![false; pattern.len() + 1];
    matched[0] = true;
    for j in 1..=pattern.len() {
        matched[j] = matched[j - 1] && pattern[j - 1] == '%';
    }

    for &c in &text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || matched[j],
                '_' => matched[j - 1],
                p => matched[j - 1] && p == c,
            };
        }
        matched = next;
    }
    matched[pattern.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        rank: i64,
    }

    impl Model for Note {
        const NAME: &'static str = "Note";
        const TABLE: &'static str = "notes";
        const SOFT_DELETES: bool = true;
        const TIMESTAMPS: bool = true;

        type Fillable = FieldMap;
        type UpdateFillable = FieldMap;
    }

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.register::<Note>().unwrap();
        for (id, body, rank) in [("a", "alpha", 3), ("b", "beta", 1), ("c", "gamma", 2)] {
            store
                .insert_row::<Note>(fields(json!({ "id": id, "body": body, "rank": rank })))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("alpha", "al%"));
        assert!(like_match("alpha", "%ph%"));
        assert!(like_match("alpha", "_lpha"));
        assert!(like_match("", "%"));
        assert!(!like_match("alpha", "Al%"));
        assert!(!like_match("alpha", "_pha"));
    }

    #[test]
    fn test_compare_values_orders_types() {
        assert_eq!(compare_values(&json!(1), &json!(2.5)), Ordering::Less);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&Value::Null, &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!("1")), Ordering::Less);
    }

    #[test]
    fn test_condition_null_semantics() {
        let row = fields(json!({ "rank": null }));
        assert!(!matches_condition(&row, &FilterCondition::eq("rank", 1_i64)));
        assert!(!matches_condition(&row, &FilterCondition::ne("rank", 1_i64)));
        assert!(matches_condition(&row, &FilterCondition::is_null("rank")));
        assert!(matches_condition(&row, &FilterCondition::is_null("missing")));
    }

    #[test]
    fn test_condition_in_and_numeric() {
        let row = fields(json!({ "rank": 2, "body": "beta" }));
        assert!(matches_condition(&row, &FilterCondition::in_integers("rank", vec![1, 2])));
        assert!(matches_condition(&row, &FilterCondition::gte("rank", 2.0_f64)));
        assert!(!matches_condition(&row, &FilterCondition::eq("rank", "2")));
        assert!(matches_condition(
            &row,
            &FilterCondition::in_strings("body", vec!["beta".to_string()])
        ));
    }

    #[test]
    fn test_unregistered_collection_fails_resolution() {
        let store = InMemoryStore::new();
        let err = store.resolve::<Note>().unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::EntityResolutionFailure);
        assert!(err.message.contains("notes"));
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = InMemoryStore::new();
        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.collections.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        let err = store.register::<Note>().unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::Other);
        assert_eq!(err.operation, RepositoryOperation::Resolve);
        assert!(err.message.contains("poisoned"));

        let err = store.resolve::<Note>().unwrap_err();
        assert!(err.message.contains("poisoned"));
    }

    #[test]
    fn test_insert_generates_id_and_timestamps() {
        let store = InMemoryStore::new();
        store.register::<Note>().unwrap();
        let note: Note = store.insert_row(fields(json!({ "body": "x" }))).unwrap();
        assert!(!note.id.is_empty());

        let raw = store.raw_rows::<Note>().unwrap();
        assert!(raw[0].get("created_at").is_some());
        assert!(raw[0].get("updated_at").is_some());
    }

    #[test]
    fn test_insert_duplicate_key_is_rejected() {
        let store = seeded();
        let err = store
            .insert_row::<Note>(fields(json!({ "id": "a" })))
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(err.entity_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_natural_order_is_insertion_order() {
        let store = seeded();
        let rows: Vec<Note> = store
            .fetch_rows(&Query::fresh(), RepositoryOperation::All, None)
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_order_limit_and_projection() {
        let store = seeded();
        let query = Query::<Note>::fresh()
            .order_by("rank", OrderDirection::Descending)
            .select(["id"])
            .limit(2);
        let rows = store
            .fetch_rows(&query, RepositoryOperation::All, None)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[0].body, "");
        assert_eq!(rows[1].id, "c");
    }

    #[test]
    fn test_soft_delete_hides_row() {
        let store = seeded();
        assert_eq!(store.delete_row::<Note>(&Query::fresh(), "b", false).unwrap(), Some(true));

        let live: Vec<Note> = store
            .fetch_rows(&Query::fresh(), RepositoryOperation::All, None)
            .unwrap();
        assert_eq!(live.len(), 2);

        let trashed: Vec<Note> = store
            .fetch_rows(&Query::fresh().only_trashed(), RepositoryOperation::All, None)
            .unwrap();
        assert_eq!(trashed.len(), 1);
        assert_eq!(trashed[0].id, "b");
        assert_eq!(store.raw_rows::<Note>().unwrap().len(), 3);
    }

    #[test]
    fn test_force_delete_removes_trashed_row() {
        let store = seeded();
        store.delete_row::<Note>(&Query::fresh(), "b", false).unwrap();
        assert_eq!(store.delete_row::<Note>(&Query::fresh(), "b", true).unwrap(), None);
        assert_eq!(
            store
                .delete_row::<Note>(&Query::fresh().with_trashed(), "b", true)
                .unwrap(),
            Some(true)
        );
        assert_eq!(store.raw_rows::<Note>().unwrap().len(), 2);
    }

    #[test]
    fn test_update_rejects_colliding_primary_key() {
        let store = seeded();
        let err = store
            .update_row::<Note>(&Query::fresh(), "a", fields(json!({ "id": "b" })))
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
    }

    #[test]
    fn test_aggregate_skips_nulls_and_rejects_raw() {
        let store = seeded();
        store
            .insert_row::<Note>(fields(json!({ "id": "d", "body": "delta", "rank": null })))
            .unwrap();
        let min = store
            .aggregate_rows::<Note>(&Query::fresh(), Aggregate::Min, &Column::from("rank"))
            .unwrap();
        assert_eq!(min, Some(json!(1)));

        let err = store
            .aggregate_rows::<Note>(&Query::fresh(), Aggregate::Max, &Column::raw("rank * 2"))
            .unwrap_err();
        assert!(err.message.contains("rank * 2"));
    }

    #[test]
    fn test_clone_shares_storage() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        store.register::<Note>().unwrap();
        assert!(clone.is_registered::<Note>());
        clone.insert_row::<Note>(fields(json!({ "id": "z" }))).unwrap();
        assert_eq!(store.raw_rows::<Note>().unwrap().len(), 1);
        assert_eq!(store.executed_operations(), 1);
    }
}
