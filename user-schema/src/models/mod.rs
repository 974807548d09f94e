pub mod attribute;
pub mod schema;
pub mod user_type;

pub use attribute::{
    render_value, ArrayItems, AttributeDefinition, AttributeType, Master, MasterPriority,
    MasterType, OneOf, Permission, PermissionAction, PropertyScope, Uniqueness,
};
pub use schema::{AttributeGroup, ResolutionScope, SchemaDefinitions, SchemaDocument};
pub use user_type::{Link, UserType, UserTypeLinks, SCHEMA_PATH_PREFIX};
