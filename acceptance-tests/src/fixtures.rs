//! Named step configurations, parameterized by the run's random integer.

use crate::TEST_RESOURCE_PREFIX;
use user_schema::models::{AttributeType, MasterType, PermissionAction, PropertyScope, Uniqueness};
use user_schema::{CustomPropertyConfig, OneOfEntry};

pub fn resource_index(ri: u32) -> String {
    format!("{}_{}", TEST_RESOURCE_PREFIX, ri)
}

fn sizes(last: (&str, &str)) -> (Vec<String>, Vec<OneOfEntry>) {
    let entries = [("S", "Small"), ("M", "Medium"), ("L", "Large"), last];
    (
        entries.iter().map(|(c, _)| c.to_string()).collect(),
        entries.iter().map(|(c, t)| OneOfEntry::new(*c, *t)).collect(),
    )
}

/// `basic`: string property with a four-value enum.
pub fn basic(ri: u32) -> CustomPropertyConfig {
    let (enum_values, one_of) = sizes(("XL", "Extra Large"));
    CustomPropertyConfig {
        index: resource_index(ri),
        title: "terraform acceptance test".to_string(),
        attr_type: AttributeType::String,
        description: Some("terraform acceptance test".to_string()),
        required: Some(false),
        min_length: Some(1),
        max_length: Some(50),
        permissions: Some(PermissionAction::ReadOnly),
        master: Some(MasterType::ProfileMaster),
        enum_values: Some(enum_values),
        one_of: Some(one_of),
        scope: Some(PropertyScope::SelfOnly),
        ..Default::default()
    }
}

/// `updated`: longer limit, writable, OKTA-mastered, XXL, pattern, unscoped.
pub fn updated(ri: u32) -> CustomPropertyConfig {
    let (enum_values, one_of) = sizes(("XXL", "Extra Extra Large"));
    CustomPropertyConfig {
        index: resource_index(ri),
        title: "terraform acceptance test updated".to_string(),
        attr_type: AttributeType::String,
        description: Some("terraform acceptance test updated".to_string()),
        required: Some(true),
        min_length: Some(1),
        max_length: Some(70),
        permissions: Some(PermissionAction::ReadWrite),
        master: Some(MasterType::Okta),
        enum_values: Some(enum_values),
        one_of: Some(one_of),
        pattern: Some(".+".to_string()),
        scope: Some(PropertyScope::Unscoped),
        ..Default::default()
    }
}

/// `unique`: sets the uniqueness constraint.
pub fn unique(ri: u32) -> CustomPropertyConfig {
    let title = "terraform acceptance test setting unique attribute to UNIQUE_VALIDATED";
    CustomPropertyConfig {
        index: resource_index(ri),
        title: title.to_string(),
        attr_type: AttributeType::String,
        description: Some(title.to_string()),
        required: Some(true),
        min_length: Some(1),
        max_length: Some(70),
        permissions: Some(PermissionAction::ReadWrite),
        master: Some(MasterType::Okta),
        unique: Some(Uniqueness::UniqueValidated),
        ..Default::default()
    }
}

/// Name of the user type used by [`non_default_user_type`].
pub fn user_type_name(ri: u32) -> String {
    resource_index(ri)
}

/// `non_default_user_type`: `basic` moved to a dedicated user type.
pub fn non_default_user_type(ri: u32) -> CustomPropertyConfig {
    CustomPropertyConfig {
        user_type: Some(user_type_name(ri)),
        ..basic(ri)
    }
}

fn array_base(ri: u32, title: &str, description: &str) -> CustomPropertyConfig {
    CustomPropertyConfig {
        index: resource_index(ri),
        title: title.to_string(),
        attr_type: AttributeType::Array,
        array_type: Some(AttributeType::String),
        description: Some(description.to_string()),
        required: Some(false),
        ..Default::default()
    }
}

pub fn array_string(ri: u32) -> CustomPropertyConfig {
    CustomPropertyConfig {
        permissions: Some(PermissionAction::ReadOnly),
        master: Some(MasterType::ProfileMaster),
        ..array_base(ri, "terraform acceptance test", "terraform acceptance test")
    }
}

pub fn array_string_updated(ri: u32) -> CustomPropertyConfig {
    CustomPropertyConfig {
        required: Some(true),
        permissions: Some(PermissionAction::ReadWrite),
        master: Some(MasterType::Okta),
        ..array_base(
            ri,
            "terraform acceptance test updated",
            "terraform acceptance test updated",
        )
    }
}

pub fn array_enum(ri: u32) -> CustomPropertyConfig {
    CustomPropertyConfig {
        master: Some(MasterType::Okta),
        scope: Some(PropertyScope::Unscoped),
        array_enum: Some(vec!["test".into(), "1".into(), "2".into()]),
        array_one_of: Some(vec![
            OneOfEntry::new("test", "test"),
            OneOfEntry::new("1", "1"),
            OneOfEntry::new("2", "2"),
        ]),
        ..array_base(ri, "terraform acceptance test", "testing")
    }
}

pub fn array_number(ri: u32) -> CustomPropertyConfig {
    CustomPropertyConfig {
        array_type: Some(AttributeType::Number),
        master: Some(MasterType::Okta),
        scope: Some(PropertyScope::SelfOnly),
        array_enum: Some(vec!["0.01".into(), "0.02".into(), "0.03".into()]),
        array_one_of: Some(vec![
            OneOfEntry::new("0.01", "one"),
            OneOfEntry::new("0.02", "two"),
            OneOfEntry::new("0.03", "three"),
        ]),
        ..array_base(ri, "terraform acceptance test", "testing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_passes_config_checks() {
        let ri = 4242;
        for config in [
            basic(ri),
            updated(ri),
            unique(ri),
            non_default_user_type(ri),
            array_string(ri),
            array_string_updated(ri),
            array_enum(ri),
            array_number(ri),
        ] {
            assert!(config.check().is_ok(), "{} failed checks", config.title);
            assert!(config.to_definition().is_ok());
            assert_eq!(config.index, "testAcc_4242");
        }
    }

    #[test]
    fn non_default_fixture_targets_its_own_type() {
        let config = non_default_user_type(7);
        assert_eq!(config.user_type_name(), "testAcc_7");
        assert_eq!(config.enum_values, basic(7).enum_values);
    }
}
