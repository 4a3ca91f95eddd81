//! Model contract
//!
//! A [`Model`] is the record type one repository manages. The repository never
//! inspects a model beyond what this trait declares: its collection, its
//! primary key column, whether it supports soft deletes, and the shapes used
//! to create and update it.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::error::{RepositoryError, RepositoryOperation};

/// Column values of one row, keyed by column name
pub type FieldMap = serde_json::Map<String, Value>;

/// A persisted record type managed by a [`Repository`](super::Repository)
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use ship_core::repository::Model;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
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
/// #[derive(Serialize)]
/// struct UpdatePost {
///     title: Option<String>,
/// }
///
/// impl Model for Post {
///     const NAME: &'static str = "Post";
///     const TABLE: &'static str = "posts";
///     const SOFT_DELETES: bool = true;
///
///     type Fillable = CreatePost;
///     type UpdateFillable = UpdatePost;
/// }
///
/// assert!(Post::supports_soft_deletes());
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the model, used in errors and logs
    const NAME: &'static str;

    /// Collection (table) the model is stored in
    const TABLE: &'static str;

    /// Primary key column, holding a string value
    const PRIMARY_KEY: &'static str = "id";

    /// Whether deletes only mark rows as trashed
    const SOFT_DELETES: bool = false;

    /// Column holding the soft-delete marker
    const DELETED_AT: &'static str = "deleted_at";

    /// Whether the store maintains `created_at` / `updated_at`
    const TIMESTAMPS: bool = false;

    /// Field shape accepted by `create`
    type Fillable: Serialize + Send;

    /// Field shape accepted by `update`
    type UpdateFillable: Serialize + Send;

    /// Runtime capability query for soft deletes
    fn supports_soft_deletes() -> bool {
        Self::SOFT_DELETES
    }
}

/// Serialize a create or update shape into a field map
///
/// Keys whose value serializes to `null` are dropped, so an unset optional
/// field means "not provided" rather than "clear this column".
pub fn into_field_map<T: Serialize>(
    value: &T,
    operation: RepositoryOperation,
) -> Result<FieldMap, RepositoryError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        Ok(other) => Err(RepositoryError::serialization_error(
            operation,
            format!("field shape must serialize to an object, got {}", kind_of(&other)),
        )),
        Err(e) => Err(RepositoryError::serialization_error(operation, e.to_string())),
    }
}

/// Deserialize a stored row into its model
pub(crate) fn from_row<M: Model>(
    row: FieldMap,
    operation: RepositoryOperation,
) -> Result<M, RepositoryError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        RepositoryError::serialization_error(operation, e.to_string()).with_entity_type(M::NAME)
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Tag {
        id: String,
        label: String,
    }

    #[derive(Serialize)]
    struct UpdateTag {
        label: Option<String>,
        color: Option<String>,
    }

    impl Model for Tag {
        const NAME: &'static str = "Tag";
        const TABLE: &'static str = "tags";

        type Fillable = Tag;
        type UpdateFillable = UpdateTag;
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Tag::PRIMARY_KEY, "id");
        assert_eq!(Tag::DELETED_AT, "deleted_at");
        assert!(!Tag::supports_soft_deletes());
        assert!(!Tag::TIMESTAMPS);
    }

    #[test]
    fn test_into_field_map_drops_nulls() {
        let update = UpdateTag {
            label: Some("rust".to_string()),
            color: None,
        };
        let map = into_field_map(&update, RepositoryOperation::Update).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("label"), Some(&json!("rust")));
        assert!(!map.contains_key("color"));
    }

    #[test]
    fn test_into_field_map_rejects_non_objects() {
        let err = into_field_map(&vec![1, 2], RepositoryOperation::Create).unwrap_err();
        assert_eq!(err.operation, RepositoryOperation::Create);
        assert!(err.message.contains("an array"));
    }

    #[test]
    fn test_from_row_reports_model() {
        let mut row = FieldMap::new();
        row.insert("id".to_string(), json!("t1"));
        let err = from_row::<Tag>(row, RepositoryOperation::All).unwrap_err();
        assert_eq!(err.entity_type.as_deref(), Some("Tag"));
    }

    #[test]
    fn test_from_row_ignores_unknown_columns() {
        let row = json!({ "id": "t1", "label": "db", "deleted_at": null })
            .as_object()
            .cloned()
            .unwrap();
        let tag = from_row::<Tag>(row, RepositoryOperation::All).unwrap();
        assert_eq!(tag.label, "db");
    }
}
