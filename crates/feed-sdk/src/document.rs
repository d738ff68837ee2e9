//! Document, collection and query types
//!
//! These are the shapes the gateway passes between callers and the
//! document store. The gateway never inspects a [`QuerySpec`]; only
//! store implementations interpret it.

use crate::error::{GatewayError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Field name → value mapping of a stored document
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Field holding the creation timestamp
pub const CREATED_AT: &str = "createdAt";

/// Field holding the last-update timestamp
pub const UPDATED_AT: &str = "updatedAt";

/// Named partition of documents, e.g. `posts` or `users/u1/followers`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionRef(String);

impl CollectionRef {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(GatewayError::InvalidInput("collection path is empty".into()));
        }
        if path.split('/').any(|segment| segment.trim().is_empty()) {
            return Err(GatewayError::InvalidInput(format!(
                "collection path has an empty segment: {:?}",
                path
            )));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CollectionRef {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored document: its store-assigned ID plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: String,
    pub fields: Fields,
}

impl DocumentRecord {
    /// Build a record; a field named `id` is dropped in favour of the store ID
    pub fn new(id: impl Into<String>, mut fields: Fields) -> Self {
        fields.remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }

    /// Flatten into a single JSON object with `id` merged into the fields
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = self.fields.clone();
        object.insert("id".into(), serde_json::Value::String(self.id.clone()));
        serde_json::Value::Object(object)
    }
}

impl Serialize for DocumentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Result of a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResult {
    pub id: String,
    pub success: bool,
}

/// Comparison used by a `where` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "array-contains")]
    ArrayContains,
}

impl FromStr for FilterOp {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "==" | "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "in" => Ok(Self::In),
            "array-contains" => Ok(Self::ArrayContains),
            other => Err(GatewayError::InvalidInput(format!("unknown filter op: {}", other))),
        }
    }
}

/// Sort direction for an `orderBy` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// A single filter, sort or limit clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QueryClause {
    Where {
        field: String,
        op: FilterOp,
        value: serde_json::Value,
    },
    OrderBy {
        field: String,
        direction: Direction,
    },
    Limit {
        count: usize,
    },
}

/// Ordered list of query clauses, forwarded verbatim to the store
///
/// # Example
///
/// ```rust
/// use feed_sdk::{Direction, FilterOp, QuerySpec};
///
/// let query = QuerySpec::new()
///     .filter("authorId", FilterOp::Eq, "u1")
///     .order_by("createdAt", Direction::Desc)
///     .limit(20);
/// assert_eq!(query.clauses().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySpec(Vec<QueryClause>);

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.0.push(QueryClause::Where {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.0.push(QueryClause::OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.0.push(QueryClause::Limit { count });
        self
    }

    pub fn clauses(&self) -> &[QueryClause] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<QueryClause>> for QuerySpec {
    fn from(clauses: Vec<QueryClause>) -> Self {
        Self(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_ref_validation() {
        assert!(CollectionRef::new("posts").is_ok());
        assert!(CollectionRef::new("users/u1/followers").is_ok());
        assert!(CollectionRef::new("").is_err());
        assert!(CollectionRef::new("/posts").is_err());
        assert!(CollectionRef::new("users//followers").is_err());
    }

    #[test]
    fn test_record_flattens_with_store_id() {
        let fields = json!({"text": "hi", "id": "spoofed"}).as_object().cloned().unwrap();
        let record = DocumentRecord::new("doc-1", fields);

        assert_eq!(record.to_json(), json!({"id": "doc-1", "text": "hi"}));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": "doc-1", "text": "hi"})
        );
    }

    #[test]
    fn test_query_clause_wire_format() {
        let query = QuerySpec::new()
            .filter("likes", FilterOp::Ge, 3)
            .order_by("createdAt", Direction::Desc)
            .limit(5);

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!([
                {"kind": "where", "field": "likes", "op": ">=", "value": 3},
                {"kind": "orderBy", "field": "createdAt", "direction": "desc"},
                {"kind": "limit", "count": 5}
            ])
        );
    }

    #[test]
    fn test_filter_op_parse() {
        assert_eq!("=".parse::<FilterOp>().unwrap(), FilterOp::Eq);
        assert_eq!("array-contains".parse::<FilterOp>().unwrap(), FilterOp::ArrayContains);
        assert!("~".parse::<FilterOp>().is_err());
    }
}
