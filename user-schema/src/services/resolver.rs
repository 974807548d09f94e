//! Scope-qualified attribute lookups. Never touches the network.

use crate::models::{AttributeDefinition, ResolutionScope, SchemaDocument};

pub fn find_base<'a>(doc: &'a SchemaDocument, index: &str) -> Option<&'a AttributeDefinition> {
    doc.definitions.base.properties.get(index)
}

pub fn find_custom<'a>(doc: &'a SchemaDocument, index: &str) -> Option<&'a AttributeDefinition> {
    doc.definitions.custom.properties.get(index)
}

pub fn find<'a>(
    doc: &'a SchemaDocument,
    scope: ResolutionScope,
    index: &str,
) -> Option<&'a AttributeDefinition> {
    match scope {
        ResolutionScope::Base => find_base(doc, index),
        ResolutionScope::Custom => find_custom(doc, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeType;

    fn document() -> SchemaDocument {
        let mut doc = SchemaDocument::default();
        doc.definitions.base.properties.insert(
            "login".to_string(),
            AttributeDefinition::new(AttributeType::String, "Username"),
        );
        doc.definitions.custom.properties.insert(
            "shirtSize".to_string(),
            AttributeDefinition::new(AttributeType::String, "Shirt size"),
        );
        doc.definitions.custom.properties.insert(
            "login".to_string(),
            AttributeDefinition::new(AttributeType::String, "Custom login"),
        );
        doc
    }

    #[test]
    fn lookups_stay_in_their_partition() {
        let doc = document();

        assert!(find_custom(&doc, "shirtSize").is_some());
        assert!(find_base(&doc, "shirtSize").is_none());
        assert_eq!(find_base(&doc, "login").unwrap().title, "Username");
        assert_eq!(find_custom(&doc, "login").unwrap().title, "Custom login");
    }

    #[test]
    fn find_dispatches_on_scope() {
        let doc = document();

        assert_eq!(
            find(&doc, ResolutionScope::Base, "login").unwrap().title,
            "Username"
        );
        assert!(find(&doc, ResolutionScope::Custom, "missing").is_none());
    }
}
