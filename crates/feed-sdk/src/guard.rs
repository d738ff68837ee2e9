//! Failure containment for gateway calls

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// Whether the process runs as a development build or in production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    Development,
    #[default]
    Production,
}

impl ExecutionContext {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for ExecutionContext {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(GatewayError::Config(format!("unknown environment: {}", other))),
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Await `operation`, substituting `fallback` for a failure in development
///
/// Failures are always logged. In production, or without a fallback,
/// the error is returned unchanged. Success values pass through as-is.
///
/// # Example
///
/// ```rust
/// use feed_sdk::{run_guarded, ExecutionContext, GatewayError};
///
/// # async fn example() {
/// let posts: Vec<String> = run_guarded(
///     ExecutionContext::Development,
///     async { Err(GatewayError::OperationFailed("offline".into())) },
///     Some(Vec::new()),
/// )
/// .await
/// .unwrap();
/// assert!(posts.is_empty());
/// # }
/// ```
pub async fn run_guarded<T, F>(context: ExecutionContext, operation: F, fallback: Option<T>) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match operation.await {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!("Gateway operation failed: {}", e);
            match fallback {
                Some(value) if context.is_development() => {
                    tracing::warn!("Returning fallback data");
                    Ok(value)
                }
                _ => Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> impl Future<Output = Result<u32>> {
        async { Err(GatewayError::StoreUnavailable("down".into())) }
    }

    #[tokio::test]
    async fn test_production_propagates_and_ignores_fallback() {
        let result = run_guarded(ExecutionContext::Production, failing(), Some(7)).await;
        assert_eq!(result, Err(GatewayError::StoreUnavailable("down".into())));
    }

    #[tokio::test]
    async fn test_development_substitutes_fallback() {
        let result = run_guarded(ExecutionContext::Development, failing(), Some(7)).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_development_without_fallback_propagates() {
        let result = run_guarded(ExecutionContext::Development, failing(), None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_success_is_unmodified() {
        for context in [ExecutionContext::Development, ExecutionContext::Production] {
            let result = run_guarded(context, async { Ok(3) }, Some(7)).await;
            assert_eq!(result, Ok(3));
        }
    }

    #[test]
    fn test_parse_context() {
        assert_eq!("Development".parse::<ExecutionContext>().unwrap(), ExecutionContext::Development);
        assert_eq!("prod".parse::<ExecutionContext>().unwrap(), ExecutionContext::Production);
        assert!("staging".parse::<ExecutionContext>().is_err());
    }
}
