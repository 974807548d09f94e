//! user-schema: custom profile property management against the identity
//! API's user type and user schema endpoints.
pub mod dtos;
pub mod models;
pub mod services;

pub use services::{existence, locator, property, resolver, sweeper};
pub use services::{
    CustomPropertyConfig, CustomPropertyResource, ExistenceChecker, IdentityApi, OktaClient,
    OneOfEntry, PropertyState, SweepReport,
};
