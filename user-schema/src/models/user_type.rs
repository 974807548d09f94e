use schema_core::error::{Result, SchemaError};
use serde::{Deserialize, Serialize};

/// Path prefix of schema document URLs.
pub const SCHEMA_PATH_PREFIX: &str = "/api/v1/meta/schemas/user/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTypeLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Link>,
}

/// A category of user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserType {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Set on the tenant's default user type.
    #[serde(default)]
    pub default: bool,
    #[serde(rename = "_links", default)]
    pub links: UserTypeLinks,
}

impl UserType {
    /// Identifier of this type's schema document, taken from its schema link.
    pub fn schema_id(&self) -> Result<String> {
        let href = self
            .links
            .schema
            .as_ref()
            .map(|link| link.href.as_str())
            .ok_or_else(|| {
                SchemaError::InvalidLink(format!("user type {} has no schema link", self.id))
            })?;

        let url = reqwest::Url::parse(href)
            .map_err(|e| SchemaError::InvalidLink(format!("{}: {}", href, e)))?;

        match url.path().strip_prefix(SCHEMA_PATH_PREFIX) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(SchemaError::InvalidLink(format!(
                "{} is not a user schema link",
                href
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_type(href: Option<&str>) -> UserType {
        UserType {
            id: "oty1".to_string(),
            name: "user".to_string(),
            display_name: None,
            description: None,
            default: true,
            links: UserTypeLinks {
                schema: href.map(|h| Link { href: h.to_string() }),
            },
        }
    }

    #[test]
    fn schema_id_is_last_path_segment() {
        let ut = user_type(Some("https://dev.okta.com/api/v1/meta/schemas/user/osc1abc"));
        assert_eq!(ut.schema_id().unwrap(), "osc1abc");
    }

    #[test]
    fn schema_id_requires_link() {
        assert!(matches!(
            user_type(None).schema_id(),
            Err(SchemaError::InvalidLink(_))
        ));
        assert!(matches!(
            user_type(Some("https://dev.okta.com/api/v1/users/00u1")).schema_id(),
            Err(SchemaError::InvalidLink(_))
        ));
        assert!(matches!(
            user_type(Some("not a url")).schema_id(),
            Err(SchemaError::InvalidLink(_))
        ));
    }

    #[test]
    fn deserializes_api_shape() {
        let ut: UserType = serde_json::from_value(json!({
            "id": "oty1",
            "name": "user",
            "displayName": "User",
            "default": true,
            "_links": {
                "schema": {"href": "https://dev.okta.com/api/v1/meta/schemas/user/osc1"},
                "self": {"href": "https://dev.okta.com/api/v1/meta/types/user/oty1"}
            }
        }))
        .unwrap();

        assert!(ut.default);
        assert_eq!(ut.display_name.as_deref(), Some("User"));
        assert_eq!(ut.schema_id().unwrap(), "osc1");
    }
}
