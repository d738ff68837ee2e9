//! Gateway subcommands

use anyhow::{anyhow, bail, Context};
use clap::Subcommand;
use feed_sdk::{
    run_guarded, Backend, CollectionRef, Direction, DocumentRecord, Fields, FilterOp, QuerySpec,
};
use serde_json::Value;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List documents in a collection
    List {
        /// Collection path, e.g. "posts"
        collection: String,

        /// Filter as "field=value" or "field OP value" (OP: == != < <= > >= in array-contains)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,

        /// Sort field, optionally suffixed with ":desc"
        #[arg(short, long)]
        order_by: Option<String>,

        /// Maximum number of documents
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Add a document from a JSON object
    Add {
        collection: String,
        /// Fields as a JSON object
        fields: String,
    },

    /// Merge a JSON object into an existing document
    Update {
        collection: String,
        id: String,
        /// Fields as a JSON object
        fields: String,
    },

    /// Delete a document
    Delete { collection: String, id: String },

    /// Publish a post to the feed
    Post {
        /// Post text
        text: String,
    },

    /// Show who is signed in
    Whoami,
}

/// Run a command, returning what to print
pub async fn execute(backend: &Backend, command: Command) -> anyhow::Result<String> {
    let gateway = backend.gateway();

    match command {
        Command::List {
            collection,
            filters,
            order_by,
            limit,
        } => {
            let collection = CollectionRef::new(collection)?;
            let query = build_query(&filters, order_by.as_deref(), limit)?;
            let docs: Vec<DocumentRecord> = run_guarded(
                backend.environment(),
                gateway.fetch_many(&collection, &query),
                Some(Vec::new()),
            )
            .await?;
            Ok(serde_json::to_string_pretty(&docs)?)
        }
        Command::Add { collection, fields } => {
            let collection = CollectionRef::new(collection)?;
            let result = gateway.add_one(&collection, parse_fields(&fields)?).await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Update {
            collection,
            id,
            fields,
        } => {
            let collection = CollectionRef::new(collection)?;
            gateway
                .update_one(&collection, &id, parse_fields(&fields)?)
                .await?;
            Ok(format!("Updated {}/{}", collection, id))
        }
        Command::Delete { collection, id } => {
            let collection = CollectionRef::new(collection)?;
            gateway.delete_one(&collection, &id).await?;
            Ok(format!("Deleted {}/{}", collection, id))
        }
        Command::Post { text } => {
            let publisher = backend
                .publisher()
                .ok_or_else(|| anyhow!("no [posts] section configured"))?;
            publisher.publish(&text).await?;
            Ok("Post published".to_string())
        }
        Command::Whoami => match gateway.resolve_identity().await {
            Some(identity) => Ok(serde_json::to_string_pretty(&identity)?),
            None => Ok("Not signed in".to_string()),
        },
    }
}

fn parse_fields(raw: &str) -> anyhow::Result<Fields> {
    match serde_json::from_str::<Value>(raw).context("fields must be valid JSON")? {
        Value::Object(fields) => Ok(fields),
        other => bail!("fields must be a JSON object, got {}", other),
    }
}

fn build_query(filters: &[String], order_by: Option<&str>, limit: Option<usize>) -> anyhow::Result<QuerySpec> {
    let mut query = QuerySpec::new();

    for filter in filters {
        let (field, op, value) = parse_filter(filter)?;
        query = query.filter(field, op, value);
    }

    if let Some(order_by) = order_by {
        query = match order_by.rsplit_once(':') {
            Some((field, "desc")) => query.order_by(field, Direction::Desc),
            Some((field, "asc")) => query.order_by(field, Direction::Asc),
            _ => query.order_by(order_by, Direction::Asc),
        };
    }

    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    Ok(query)
}

fn parse_filter(raw: &str) -> anyhow::Result<(String, FilterOp, Value)> {
    let raw = raw.trim();

    // "field OP value", only when the middle word is an operator
    if let Some((field, rest)) = raw.split_once(char::is_whitespace) {
        let rest = rest.trim_start();
        let (op, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if let Ok(op) = op.parse::<FilterOp>() {
            return Ok((field.to_string(), op, parse_value(value.trim())));
        }
    }

    // "field=value", "likes>=3" and the other compact comparisons
    let Some(at) = raw.find(|c| matches!(c, '=' | '!' | '<' | '>')) else {
        bail!("invalid filter {:?}, expected \"field=value\" or \"field OP value\"", raw);
    };
    let (field, rest) = raw.split_at(at);
    let field = field.trim();
    if field.is_empty() {
        bail!("invalid filter {:?}, missing field name", raw);
    }

    let op_len = ["==", "!=", "<=", ">="]
        .iter()
        .find(|op| rest.starts_with(*op))
        .map_or(1, |op| op.len());
    let op: FilterOp = rest[..op_len].parse()?;
    Ok((field.to_string(), op, parse_value(rest[op_len..].trim())))
}

// Bare words are strings; anything that parses as JSON keeps its type
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_sdk::QueryClause;
    use serde_json::json;

    #[test]
    fn test_parse_filter_forms() {
        assert_eq!(
            parse_filter("authorId=u1").unwrap(),
            ("authorId".to_string(), FilterOp::Eq, json!("u1"))
        );
        assert_eq!(
            parse_filter("likes >= 3").unwrap(),
            ("likes".to_string(), FilterOp::Ge, json!(3))
        );
        assert_eq!(
            parse_filter("authorId in [\"u1\", \"u2\"]").unwrap(),
            ("authorId".to_string(), FilterOp::In, json!(["u1", "u2"]))
        );
        assert!(parse_filter("nonsense").is_err());
    }

    #[test]
    fn test_parse_filter_compact_comparisons() {
        assert_eq!(
            parse_filter("likes>=3").unwrap(),
            ("likes".to_string(), FilterOp::Ge, json!(3))
        );
        assert_eq!(
            parse_filter("likes<10").unwrap(),
            ("likes".to_string(), FilterOp::Lt, json!(10))
        );
        assert_eq!(
            parse_filter("authorId!=u1").unwrap(),
            ("authorId".to_string(), FilterOp::Ne, json!("u1"))
        );
        assert_eq!(
            parse_filter("authorId==u1").unwrap(),
            ("authorId".to_string(), FilterOp::Eq, json!("u1"))
        );
        assert!(parse_filter("=3").is_err());
        assert!(parse_filter(">=3").is_err());
    }

    #[test]
    fn test_parse_filter_value_with_spaces() {
        assert_eq!(
            parse_filter("title=a b c").unwrap(),
            ("title".to_string(), FilterOp::Eq, json!("a b c"))
        );
        assert_eq!(
            parse_filter("title == a b c").unwrap(),
            ("title".to_string(), FilterOp::Eq, json!("a b c"))
        );
    }

    #[test]
    fn test_build_query_keeps_clause_order() {
        let query = build_query(&["likes > 1".to_string()], Some("createdAt:desc"), Some(10)).unwrap();
        assert_eq!(
            query.clauses(),
            &[
                QueryClause::Where {
                    field: "likes".into(),
                    op: FilterOp::Gt,
                    value: json!(1)
                },
                QueryClause::OrderBy {
                    field: "createdAt".into(),
                    direction: Direction::Desc
                },
                QueryClause::Limit { count: 10 },
            ]
        );
    }

    #[test]
    fn test_parse_fields_requires_object() {
        assert!(parse_fields("{\"text\": \"hi\"}").is_ok());
        assert!(parse_fields("[1, 2]").is_err());
        assert!(parse_fields("not json").is_err());
    }
}
