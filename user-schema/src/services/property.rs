//! Custom schema property resource: desired configuration in, flattened
//! state out.

use super::identity_api::IdentityApi;
use super::locator::{self, DEFAULT_USER_TYPE};
use super::resolver;
use crate::models::{
    render_value, ArrayItems, AttributeDefinition, AttributeType, Master, MasterPriority,
    MasterType, OneOf, Permission, PermissionAction, PropertyScope, Uniqueness,
};
use schema_core::error::{Result, SchemaError};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

/// One `{const, title}` choice, kept textual until it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOfEntry {
    pub const_value: String,
    pub title: String,
}

impl OneOfEntry {
    pub fn new(const_value: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            const_value: const_value.into(),
            title: title.into(),
        }
    }
}

/// Desired state of one custom property.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CustomPropertyConfig {
    #[validate(length(min = 1))]
    pub index: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub attr_type: AttributeType,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub permissions: Option<PermissionAction>,
    pub master: Option<MasterType>,
    pub master_override_priority: Option<Vec<MasterPriority>>,
    pub enum_values: Option<Vec<String>>,
    pub one_of: Option<Vec<OneOfEntry>>,
    pub array_type: Option<AttributeType>,
    pub array_enum: Option<Vec<String>>,
    pub array_one_of: Option<Vec<OneOfEntry>>,
    pub pattern: Option<String>,
    pub scope: Option<PropertyScope>,
    pub unique: Option<Uniqueness>,
    pub external_name: Option<String>,
    pub external_namespace: Option<String>,
    /// User type whose schema holds the property; `None` means the default.
    pub user_type: Option<String>,
}

impl CustomPropertyConfig {
    pub fn user_type_name(&self) -> &str {
        self.user_type.as_deref().unwrap_or(DEFAULT_USER_TYPE)
    }

    /// `self` on top of `prior`: optional fields left unset keep their prior
    /// values. Type-specific constraints are dropped when the type or the
    /// array item type changes.
    pub fn overlay(&self, prior: &CustomPropertyConfig) -> CustomPropertyConfig {
        let mut prior = if self.attr_type == prior.attr_type {
            prior.clone()
        } else {
            prior.without_type_constraints()
        };
        // Item values were coerced for the old item type.
        if self.array_type.is_some() && self.array_type != prior.array_type {
            prior.array_enum = None;
            prior.array_one_of = None;
        }

        CustomPropertyConfig {
            index: self.index.clone(),
            title: self.title.clone(),
            attr_type: self.attr_type,
            description: self.description.clone().or_else(|| prior.description.clone()),
            required: self.required.or(prior.required),
            min_length: self.min_length.or(prior.min_length),
            max_length: self.max_length.or(prior.max_length),
            permissions: self.permissions.or(prior.permissions),
            master: self.master.or(prior.master),
            master_override_priority: self
                .master_override_priority
                .clone()
                .or_else(|| prior.master_override_priority.clone()),
            enum_values: self.enum_values.clone().or_else(|| prior.enum_values.clone()),
            one_of: self.one_of.clone().or_else(|| prior.one_of.clone()),
            array_type: self.array_type.or(prior.array_type),
            array_enum: self.array_enum.clone().or_else(|| prior.array_enum.clone()),
            array_one_of: self.array_one_of.clone().or_else(|| prior.array_one_of.clone()),
            pattern: self.pattern.clone().or_else(|| prior.pattern.clone()),
            scope: self.scope.or(prior.scope),
            unique: self.unique.or(prior.unique),
            external_name: self.external_name.clone().or_else(|| prior.external_name.clone()),
            external_namespace: self
                .external_namespace
                .clone()
                .or_else(|| prior.external_namespace.clone()),
            user_type: self.user_type.clone(),
        }
    }

    fn without_type_constraints(&self) -> CustomPropertyConfig {
        CustomPropertyConfig {
            min_length: None,
            max_length: None,
            enum_values: None,
            one_of: None,
            array_type: None,
            array_enum: None,
            array_one_of: None,
            pattern: None,
            ..self.clone()
        }
    }

    /// Field validation plus the cross-field rules of the schema API.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(invalid(format!(
                    "min_length ({}) must not exceed max_length ({})",
                    min, max
                )));
            }
        }

        match self.attr_type {
            AttributeType::Array => {
                if self.array_type.is_none() {
                    return Err(invalid("array_type is required when type is array"));
                }
                if self.array_type == Some(AttributeType::Array) {
                    return Err(invalid("array_type cannot be array"));
                }
                if self.enum_values.is_some() || self.one_of.is_some() {
                    return Err(invalid(
                        "use array_enum and array_one_of for array attributes",
                    ));
                }
            }
            _ => {
                if self.array_type.is_some()
                    || self.array_enum.is_some()
                    || self.array_one_of.is_some()
                {
                    return Err(invalid(format!(
                        "array fields are only valid when type is array, not {}",
                        self.attr_type
                    )));
                }
            }
        }

        let has_priority = self
            .master_override_priority
            .as_ref()
            .is_some_and(|p| !p.is_empty());
        match (self.master, has_priority) {
            (Some(MasterType::Override), false) => {
                Err(invalid("master OVERRIDE requires master_override_priority"))
            }
            (Some(MasterType::Override), true) | (_, false) => Ok(()),
            (_, true) => Err(invalid(
                "master_override_priority is only valid with master OVERRIDE",
            )),
        }
    }

    /// Wire definition of this configuration.
    pub fn to_definition(&self) -> Result<AttributeDefinition> {
        self.check()?;

        let mut def = AttributeDefinition::new(self.attr_type, self.title.clone());
        def.description = self.description.clone();
        def.required = self.required;
        def.min_length = self.min_length;
        def.max_length = self.max_length;
        def.pattern = self.pattern.clone();
        def.scope = self.scope;
        def.unique = self.unique;
        def.external_name = self.external_name.clone();
        def.external_namespace = self.external_namespace.clone();

        if let Some(action) = self.permissions {
            def.permissions = vec![Permission::for_self(action)];
        }
        def.master = self.master.map(|kind| Master {
            kind,
            priority: self.master_override_priority.clone().unwrap_or_default(),
        });

        if let Some(item_type) = self.array_type {
            def.items = Some(ArrayItems {
                item_type,
                enum_values: coerce_all(item_type, self.array_enum.as_deref(), "array_enum")?,
                one_of: coerce_one_of(item_type, self.array_one_of.as_deref(), "array_one_of")?,
            });
        } else {
            def.enum_values = coerce_all(self.attr_type, self.enum_values.as_deref(), "enum")?;
            def.one_of = coerce_one_of(self.attr_type, self.one_of.as_deref(), "one_of")?;
        }

        Ok(def)
    }

    /// Rebuild a configuration from what the API reports.
    pub fn from_definition(
        index: &str,
        user_type: Option<String>,
        def: &AttributeDefinition,
    ) -> Self {
        let items = def.items.as_ref();

        CustomPropertyConfig {
            index: index.to_string(),
            title: def.title.clone(),
            attr_type: def.attr_type,
            description: def.description.clone(),
            required: def.required,
            min_length: def.min_length,
            max_length: def.max_length,
            permissions: def.self_permission(),
            master: def.master.as_ref().map(|m| m.kind),
            master_override_priority: def
                .master
                .as_ref()
                .filter(|m| !m.priority.is_empty())
                .map(|m| m.priority.clone()),
            enum_values: def.enum_values.as_deref().map(render_all),
            one_of: def.one_of.as_deref().map(render_one_of),
            array_type: items.map(|i| i.item_type),
            array_enum: items.and_then(|i| i.enum_values.as_deref()).map(render_all),
            array_one_of: items.and_then(|i| i.one_of.as_deref()).map(render_one_of),
            pattern: def.pattern.clone(),
            scope: def.scope,
            unique: def.unique,
            external_name: def.external_name.clone(),
            external_namespace: def.external_namespace.clone(),
            user_type,
        }
    }
}

fn invalid(msg: impl Into<String>) -> SchemaError {
    SchemaError::InvalidConfig(msg.into())
}

fn coerce_all(
    attr_type: AttributeType,
    raw: Option<&[String]>,
    field: &str,
) -> Result<Option<Vec<serde_json::Value>>> {
    raw.map(|values| {
        values
            .iter()
            .map(|v| {
                attr_type
                    .coerce(v)
                    .ok_or_else(|| invalid(format!("{} value '{}' is not a {}", field, v, attr_type)))
            })
            .collect()
    })
    .transpose()
}

fn coerce_one_of(
    attr_type: AttributeType,
    raw: Option<&[OneOfEntry]>,
    field: &str,
) -> Result<Option<Vec<OneOf>>> {
    raw.map(|entries| {
        entries
            .iter()
            .map(|e| -> Result<OneOf> {
                let value = attr_type.coerce(&e.const_value).ok_or_else(|| {
                    invalid(format!(
                        "{} const '{}' is not a {}",
                        field, e.const_value, attr_type
                    ))
                })?;
                Ok(OneOf {
                    value,
                    title: e.title.clone(),
                })
            })
            .collect()
    })
    .transpose()
}

fn render_all(values: &[serde_json::Value]) -> Vec<String> {
    values.iter().map(render_value).collect()
}

fn render_one_of(entries: &[OneOf]) -> Vec<OneOfEntry> {
    entries
        .iter()
        .map(|o| OneOfEntry::new(render_value(&o.value), o.title.clone()))
        .collect()
}

/// A property as last read from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyState {
    /// Resource id; equal to the property index.
    pub id: String,
    pub schema_id: String,
    pub property: CustomPropertyConfig,
}

impl PropertyState {
    pub fn index(&self) -> &str {
        &self.id
    }

    pub fn user_type_name(&self) -> &str {
        self.property.user_type_name()
    }

    /// `index` for the default user type, `user_type.index` otherwise.
    pub fn import_id(&self) -> String {
        match self.property.user_type.as_deref() {
            Some(user_type) if user_type != DEFAULT_USER_TYPE => {
                format!("{}.{}", user_type, self.id)
            }
            _ => self.id.clone(),
        }
    }

    /// Flat `key -> value` view; lists become `key.#` plus `key.N` entries.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let p = &self.property;
        let mut attrs = BTreeMap::new();

        attrs.insert("id".to_string(), self.id.clone());
        attrs.insert("index".to_string(), p.index.clone());
        attrs.insert("title".to_string(), p.title.clone());
        attrs.insert("type".to_string(), p.attr_type.as_str().to_string());

        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                attrs.insert(key.to_string(), value);
            }
        };
        put("description", p.description.clone());
        put("required", p.required.map(|r| r.to_string()));
        put("min_length", p.min_length.map(|v| v.to_string()));
        put("max_length", p.max_length.map(|v| v.to_string()));
        put("permissions", p.permissions.map(|a| a.as_str().to_string()));
        put("master", p.master.map(|m| m.as_str().to_string()));
        put("array_type", p.array_type.map(|t| t.as_str().to_string()));
        put("pattern", p.pattern.clone());
        put("scope", p.scope.map(|s| s.as_str().to_string()));
        put("unique", p.unique.map(|u| u.as_str().to_string()));
        put("external_name", p.external_name.clone());
        put("external_namespace", p.external_namespace.clone());
        put("user_type", p.user_type.clone());

        flatten_list(&mut attrs, "enum", p.enum_values.as_deref());
        flatten_list(&mut attrs, "array_enum", p.array_enum.as_deref());
        flatten_one_of(&mut attrs, "one_of", p.one_of.as_deref());
        flatten_one_of(&mut attrs, "array_one_of", p.array_one_of.as_deref());

        if let Some(priority) = &p.master_override_priority {
            attrs.insert(
                "master_override_priority.#".to_string(),
                priority.len().to_string(),
            );
            for (i, entry) in priority.iter().enumerate() {
                attrs.insert(format!("master_override_priority.{}.type", i), entry.kind.clone());
                attrs.insert(format!("master_override_priority.{}.value", i), entry.value.clone());
            }
        }

        attrs
    }
}

fn flatten_list(attrs: &mut BTreeMap<String, String>, key: &str, values: Option<&[String]>) {
    if let Some(values) = values {
        attrs.insert(format!("{}.#", key), values.len().to_string());
        for (i, value) in values.iter().enumerate() {
            attrs.insert(format!("{}.{}", key, i), value.clone());
        }
    }
}

fn flatten_one_of(attrs: &mut BTreeMap<String, String>, key: &str, entries: Option<&[OneOfEntry]>) {
    if let Some(entries) = entries {
        attrs.insert(format!("{}.#", key), entries.len().to_string());
        for (i, entry) in entries.iter().enumerate() {
            attrs.insert(format!("{}.{}.const", key, i), entry.const_value.clone());
            attrs.insert(format!("{}.{}.title", key, i), entry.title.clone());
        }
    }
}

/// User type as recorded in state: the default type is always `None`, however
/// it was spelled in the configuration.
fn stored_user_type(user_type: Option<&str>) -> Option<String> {
    user_type
        .filter(|name| *name != DEFAULT_USER_TYPE)
        .map(str::to_string)
}

/// Split an import id into `(user_type, index)`.
pub fn parse_import_id(id: &str) -> Result<(Option<String>, String)> {
    match id.split_once('.') {
        None if !id.is_empty() => Ok((None, id.to_string())),
        Some((user_type, index)) if !user_type.is_empty() && !index.is_empty() => {
            Ok((Some(user_type.to_string()), index.to_string()))
        }
        _ => Err(invalid(format!(
            "invalid import id '{}', expected <index> or <user_type>.<index>",
            id
        ))),
    }
}

/// Create / read / update / delete / import for custom properties.
#[derive(Clone)]
pub struct CustomPropertyResource {
    api: Arc<dyn IdentityApi>,
}

impl CustomPropertyResource {
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        Self { api }
    }

    pub async fn create(&self, config: &CustomPropertyConfig) -> Result<PropertyState> {
        let schema_id = self.write(config).await?;
        tracing::info!(index = %config.index, user_type = %config.user_type_name(), "custom property created");
        self.read_back(config, &schema_id).await
    }

    /// Current state, or `None` if the property (or its user type) is gone.
    pub async fn read(&self, user_type: Option<&str>, index: &str) -> Result<Option<PropertyState>> {
        let name = user_type.unwrap_or(DEFAULT_USER_TYPE);
        let schema_id = match locator::resolve_schema_id(self.api.as_ref(), name).await {
            Ok(id) => id,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let doc = self.api.get_user_schema(&schema_id).await?;
        Ok(resolver::find_custom(&doc, index).map(|def| PropertyState {
            id: index.to_string(),
            schema_id: schema_id.clone(),
            property: CustomPropertyConfig::from_definition(
                index,
                stored_user_type(user_type),
                def,
            ),
        }))
    }

    /// In-place update; fields missing from `config` keep their prior values.
    pub async fn update(
        &self,
        prior: &PropertyState,
        config: &CustomPropertyConfig,
    ) -> Result<PropertyState> {
        if Self::requires_replacement(prior, config) {
            return Err(invalid(format!(
                "changing index or user type of {} requires replacement",
                prior.id
            )));
        }

        let merged = config.overlay(&prior.property);
        let schema_id = self.write(&merged).await?;
        tracing::info!(index = %merged.index, user_type = %merged.user_type_name(), "custom property updated");
        self.read_back(&merged, &schema_id).await
    }

    /// Create, update or replace depending on `prior`.
    pub async fn apply(
        &self,
        prior: Option<&PropertyState>,
        config: &CustomPropertyConfig,
    ) -> Result<PropertyState> {
        match prior {
            None => self.create(config).await,
            Some(prior) if Self::requires_replacement(prior, config) => {
                config.check()?;
                self.delete(prior).await?;
                self.create(config).await
            }
            Some(prior) => self.update(prior, config).await,
        }
    }

    pub async fn delete(&self, state: &PropertyState) -> Result<()> {
        self.api
            .remove_custom_property(&state.schema_id, &state.id)
            .await?;
        tracing::info!(index = %state.id, schema_id = %state.schema_id, "custom property deleted");
        Ok(())
    }

    /// Hydrate state from an import id alone. Zero or one instance.
    pub async fn import(&self, id: &str) -> Result<Vec<PropertyState>> {
        let (user_type, index) = parse_import_id(id)?;
        let state = self.read(user_type.as_deref(), &index).await?;
        Ok(state.into_iter().collect())
    }

    pub fn requires_replacement(prior: &PropertyState, config: &CustomPropertyConfig) -> bool {
        prior.id != config.index || prior.user_type_name() != config.user_type_name()
    }

    async fn write(&self, config: &CustomPropertyConfig) -> Result<String> {
        let definition = config.to_definition()?;
        let schema_id =
            locator::resolve_schema_id(self.api.as_ref(), config.user_type_name()).await?;
        self.api
            .update_custom_property(&schema_id, &config.index, &definition)
            .await?;
        Ok(schema_id)
    }

    async fn read_back(&self, config: &CustomPropertyConfig, schema_id: &str) -> Result<PropertyState> {
        let doc = self.api.get_user_schema(schema_id).await?;
        let def = resolver::find_custom(&doc, &config.index).ok_or_else(|| {
            SchemaError::NotFound(format!(
                "custom property {} missing from schema {} after write",
                config.index, schema_id
            ))
        })?;

        Ok(PropertyState {
            id: config.index.clone(),
            schema_id: schema_id.to_string(),
            property: CustomPropertyConfig::from_definition(
                &config.index,
                stored_user_type(config.user_type.as_deref()),
                def,
            ),
        })
    }
}
