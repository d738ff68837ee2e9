//! Feed SDK - authenticated document access
//!
//! Mediates every read and write against the feed's document store:
//! the current identity is resolved first, then the operation runs.
//!
//! # Architecture
//!
//! - [`DocumentGateway`]: identity gate, write timestamps, failure logging
//! - [`DocumentStore`]: backend seam ([`MemoryStore`], `RemoteStore`)
//! - [`AuthSession`]: identity state with change notification
//! - [`run_guarded`]: development-only fallback substitution
//! - [`Backend`]: the service handles built once at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use feed_sdk::{Backend, CollectionRef, FeedConfig, QuerySpec};
//!
//! let backend = Backend::connect(FeedConfig::load("feed.toml")?)?;
//! if let Some(sign_in) = backend.remote_sign_in() {
//!     sign_in.sign_in_with_password("ada@example.com", "secret").await?;
//! }
//!
//! let gateway = backend.gateway();
//! let posts = CollectionRef::new("posts")?;
//! let feed = gateway.fetch_many(&posts, &QuerySpec::new().limit(20)).await?;
//! ```

pub mod auth;
pub mod backend;
pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod store;

// Post publishing via the REST backend
#[cfg(feature = "client")]
pub mod publish;

pub use auth::{AuthSession, AuthState, Identity, IdentityProvider};
pub use backend::Backend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FeedConfig, StoreBackend};
pub use document::{
    AddResult, CollectionRef, Direction, DocumentRecord, Fields, FilterOp, QueryClause, QuerySpec,
    CREATED_AT, UPDATED_AT,
};
pub use error::{GatewayError, Result};
pub use gateway::{DocumentGateway, ReadPolicy};
pub use guard::{run_guarded, ExecutionContext};
pub use store::{DocumentStore, MemoryStore};

#[cfg(feature = "client")]
pub use auth::RemoteSignIn;
#[cfg(feature = "client")]
pub use publish::FeedPublisher;
#[cfg(feature = "client")]
pub use store::RemoteStore;
