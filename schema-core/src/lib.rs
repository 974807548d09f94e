//! schema-core: Shared infrastructure for the user schema tooling.
pub mod config;
pub mod error;
pub mod observability;

pub use reqwest;
pub use secrecy;
pub use serde;
pub use serde_json;
pub use tracing;
pub use validator;
