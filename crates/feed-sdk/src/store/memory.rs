//! In-process document store
//!
//! Evaluates the full query clause language locally. Results without an
//! `orderBy` come back in document-ID order.

use super::DocumentStore;
use crate::auth::Identity;
use crate::document::{CollectionRef, Direction, DocumentRecord, Fields, FilterOp, QueryClause, QuerySpec};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

type Collection = BTreeMap<String, Fields>;

/// Document store held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionRef, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one document by ID, bypassing identity checks
    pub async fn get(&self, collection: &CollectionRef, id: &str) -> Option<DocumentRecord> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| DocumentRecord::new(id, fields.clone()))
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: &CollectionRef) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |docs| docs.len())
    }

    pub async fn is_empty(&self, collection: &CollectionRef) -> bool {
        self.len(collection).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(
        &self,
        _actor: &Identity,
        collection: &CollectionRef,
        query: &QuerySpec,
    ) -> Result<Vec<DocumentRecord>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let matched = docs
            .iter()
            .map(|(id, fields)| DocumentRecord::new(id.clone(), fields.clone()))
            .collect();
        Ok(apply_query(matched, query))
    }

    async fn create(&self, _actor: &Identity, collection: &CollectionRef, mut fields: Fields) -> Result<String> {
        fields.remove("id");
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.clone())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(
        &self,
        _actor: &Identity,
        collection: &CollectionRef,
        id: &str,
        fields: Fields,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| GatewayError::OperationFailed(format!("no document {}/{}", collection, id)))?;

        for (key, value) in fields {
            if key != "id" {
                existing.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, _actor: &Identity, collection: &CollectionRef, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

/// Apply filters, then ordering, then the tightest limit
fn apply_query(mut docs: Vec<DocumentRecord>, query: &QuerySpec) -> Vec<DocumentRecord> {
    let mut order = Vec::new();
    let mut limit: Option<usize> = None;

    for clause in query.clauses() {
        match clause {
            QueryClause::Where { field, op, value } => {
                docs.retain(|doc| doc.get(field).is_some_and(|actual| matches(actual, *op, value)));
            }
            QueryClause::OrderBy { field, direction } => {
                // Documents lacking an ordered field are excluded
                docs.retain(|doc| doc.get(field).is_some());
                order.push((field.as_str(), *direction));
            }
            QueryClause::Limit { count } => {
                limit = Some(limit.map_or(*count, |current| current.min(*count)));
            }
        }
    }

    if !order.is_empty() {
        docs.sort_by(|a, b| {
            for (field, direction) in &order {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => compare_values(x, y),
                    _ => Ordering::Equal,
                };
                let ordering = match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.id.cmp(&b.id)
        });
    }

    if let Some(limit) = limit {
        docs.truncate(limit);
    }
    docs
}

fn matches(actual: &Value, op: FilterOp, expected: &Value) -> bool {
    match op {
        FilterOp::Eq => compare_values(actual, expected) == Ordering::Equal,
        FilterOp::Ne => compare_values(actual, expected) != Ordering::Equal,
        FilterOp::Lt => same_kind(actual, expected) && compare_values(actual, expected) == Ordering::Less,
        FilterOp::Le => same_kind(actual, expected) && compare_values(actual, expected) != Ordering::Greater,
        FilterOp::Gt => same_kind(actual, expected) && compare_values(actual, expected) == Ordering::Greater,
        FilterOp::Ge => same_kind(actual, expected) && compare_values(actual, expected) != Ordering::Less,
        FilterOp::In => match expected {
            Value::Array(candidates) => candidates
                .iter()
                .any(|candidate| compare_values(actual, candidate) == Ordering::Equal),
            _ => false,
        },
        FilterOp::ArrayContains => match actual {
            Value::Array(items) => items
                .iter()
                .any(|item| compare_values(item, expected) == Ordering::Equal),
            _ => false,
        },
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

// Range filters only match values of the same type
fn same_kind(a: &Value, b: &Value) -> bool {
    kind_rank(a) == kind_rank(b)
}

/// Total order over JSON values: by type first, then by value
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ordering = compare_values(left, right);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => a.to_string().cmp(&b.to_string()),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    async fn seeded() -> (MemoryStore, CollectionRef, Identity) {
        let store = MemoryStore::new();
        let posts = CollectionRef::new("posts").unwrap();
        let actor = Identity::new("u1");
        for (author, likes, tags) in [
            ("u1", 5, json!(["rust"])),
            ("u2", 12, json!(["rust", "web"])),
            ("u1", 1, json!([])),
            ("u3", 7, json!(["web"])),
        ] {
            store
                .create(&actor, &posts, fields(json!({"authorId": author, "likes": likes, "tags": tags})))
                .await
                .unwrap();
        }
        (store, posts, actor)
    }

    fn likes(docs: &[DocumentRecord]) -> Vec<i64> {
        docs.iter().map(|d| d.get("likes").and_then(Value::as_i64).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_filter_order_limit() {
        let (store, posts, actor) = seeded().await;
        let query = QuerySpec::new()
            .filter("likes", FilterOp::Gt, 2)
            .order_by("likes", Direction::Desc)
            .limit(2);

        let docs = store.query(&actor, &posts, &query).await.unwrap();
        assert_eq!(likes(&docs), vec![12, 7]);
    }

    #[tokio::test]
    async fn test_equality_and_membership_filters() {
        let (store, posts, actor) = seeded().await;

        let by_author = QuerySpec::new()
            .filter("authorId", FilterOp::Eq, "u1")
            .order_by("likes", Direction::Asc);
        assert_eq!(likes(&store.query(&actor, &posts, &by_author).await.unwrap()), vec![1, 5]);

        let tagged = QuerySpec::new()
            .filter("tags", FilterOp::ArrayContains, "web")
            .order_by("likes", Direction::Asc);
        assert_eq!(likes(&store.query(&actor, &posts, &tagged).await.unwrap()), vec![7, 12]);

        let either = QuerySpec::new()
            .filter("authorId", FilterOp::In, json!(["u2", "u3"]))
            .order_by("likes", Direction::Asc);
        assert_eq!(likes(&store.query(&actor, &posts, &either).await.unwrap()), vec![7, 12]);
    }

    #[tokio::test]
    async fn test_range_filter_skips_other_types_and_missing_fields() {
        let store = MemoryStore::new();
        let posts = CollectionRef::new("posts").unwrap();
        let actor = Identity::new("u1");
        store.create(&actor, &posts, fields(json!({"likes": "many"}))).await.unwrap();
        store.create(&actor, &posts, fields(json!({"text": "no likes"}))).await.unwrap();
        store.create(&actor, &posts, fields(json!({"likes": 3}))).await.unwrap();

        let docs = store
            .query(&actor, &posts, &QuerySpec::new().filter("likes", FilterOp::Ge, 0))
            .await
            .unwrap();
        assert_eq!(likes(&docs), vec![3]);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let actor = Identity::new("u1");
        let docs = store
            .query(&actor, &CollectionRef::new("nothing").unwrap(), &QuerySpec::new())
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_missing_update_fails() {
        let store = MemoryStore::new();
        let posts = CollectionRef::new("posts").unwrap();
        let actor = Identity::new("u1");
        let id = store
            .create(&actor, &posts, fields(json!({"text": "hi", "likes": 0})))
            .await
            .unwrap();

        store
            .update(&actor, &posts, &id, fields(json!({"likes": 1})))
            .await
            .unwrap();
        let doc = store.get(&posts, &id).await.unwrap();
        assert_eq!(doc.get("text"), Some(&json!("hi")));
        assert_eq!(doc.get("likes"), Some(&json!(1)));

        let err = store
            .update(&actor, &posts, "missing", fields(json!({"likes": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::OperationFailed(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let (store, posts, actor) = seeded().await;
        store.delete(&actor, &posts, "missing-id").await.unwrap();
        assert_eq!(store.len(&posts).await, 4);
    }

    #[test]
    fn test_compare_values_ranks_types() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(1), &json!(1.0)), Ordering::Equal);
        assert_eq!(compare_values(&json!("a"), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1, 3])), Ordering::Less);
    }
}
