pub mod existence;
pub mod identity_api;
pub mod locator;
pub mod okta;
pub mod property;
pub mod resolver;
pub mod sweeper;

pub use existence::ExistenceChecker;
pub use identity_api::IdentityApi;
pub use okta::OktaClient;
pub use property::{CustomPropertyConfig, CustomPropertyResource, OneOfEntry, PropertyState};
pub use sweeper::{sweep_custom_properties, SweepReport, SweptProperty};
