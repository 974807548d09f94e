//! Create / update / replace / import / destroy of a string custom property.
//!
//! Run with: cargo test -p acceptance-tests --test user_schema_crud_test

mod common;

use acceptance_tests::fixtures;
use acceptance_tests::memory::DEFAULT_TYPE_NAME;
use acceptance_tests::verifier::{attr, exists, list, no_attr};
use acceptance_tests::{ApiCall, TestCase, TestStep};
use user_schema::models::ResolutionScope;

#[tokio::test]
async fn test_string_property_full_lifecycle() {
    let (ctx, api) = common::setup_with_user_type();
    let ri = ctx.ri;
    let index = ctx.resource_index();

    let mut basic_checks = vec![
        exists(),
        attr("index", &index),
        attr("title", "terraform acceptance test"),
        attr("type", "string"),
        attr("description", "terraform acceptance test"),
        attr("required", "false"),
        attr("min_length", "1"),
        attr("max_length", "50"),
        attr("permissions", "READ_ONLY"),
        attr("master", "PROFILE_MASTER"),
        attr("scope", "SELF"),
        attr("one_of.0.const", "S"),
        attr("one_of.0.title", "Small"),
        attr("one_of.3.const", "XL"),
        attr("one_of.3.title", "Extra Large"),
        no_attr("pattern"),
    ];
    basic_checks.extend(list("enum", &["S", "M", "L", "XL"]));

    let mut updated_checks = vec![
        exists(),
        attr("title", "terraform acceptance test updated"),
        attr("required", "true"),
        attr("min_length", "1"),
        attr("max_length", "70"),
        attr("permissions", "READ_WRITE"),
        attr("master", "OKTA"),
        attr("pattern", ".+"),
        attr("scope", "NONE"),
        attr("one_of.3.const", "XXL"),
        attr("one_of.3.title", "Extra Extra Large"),
    ];
    updated_checks.extend(list("enum", &["S", "M", "L", "XXL"]));

    let unique_checks = vec![
        exists(),
        attr(
            "title",
            "terraform acceptance test setting unique attribute to UNIQUE_VALIDATED",
        ),
        attr("unique", "UNIQUE_VALIDATED"),
        attr("max_length", "70"),
        // Omitted from the unique step, so the prior values stay.
        attr("pattern", ".+"),
        attr("enum.3", "XXL"),
    ];

    let moved_checks = vec![
        exists(),
        attr("user_type", fixtures::user_type_name(ri)),
        attr("max_length", "50"),
        attr("permissions", "READ_ONLY"),
        no_attr("unique"),
    ];

    let case = TestCase::new(vec![
        TestStep::Apply {
            config: fixtures::basic(ri),
            checks: basic_checks,
        },
        TestStep::Apply {
            config: fixtures::updated(ri),
            checks: updated_checks,
        },
        TestStep::Apply {
            config: fixtures::unique(ri),
            checks: unique_checks,
        },
        TestStep::import(),
        TestStep::Apply {
            config: fixtures::non_default_user_type(ri),
            checks: moved_checks,
        },
        TestStep::import(),
    ]);

    let report = ctx.verifier().run(&case).await.expect("lifecycle failed");

    assert_eq!(report.steps_run, 6);
    assert_eq!(report.applied.len(), 4);
    assert_eq!(report.imported.len(), 2);
    assert_eq!(report.destroyed.as_deref(), Some(index.as_str()));

    // Moving to another user type removed it from the default schema first.
    assert!(api.custom_property(DEFAULT_TYPE_NAME, &index).is_none());
    assert!(api
        .custom_property(&fixtures::user_type_name(ri), &index)
        .is_none());
    assert!(api.calls().contains(&ApiCall::RemoveCustomProperty {
        schema_id: format!("osc_{}", DEFAULT_TYPE_NAME),
        index: index.clone(),
    }));

    let gone = ctx
        .checker()
        .exists(&fixtures::user_type_name(ri), &index, ResolutionScope::Custom)
        .await
        .unwrap();
    assert!(!gone);
}

#[tokio::test]
async fn test_create_then_update_transitions_each_field() {
    let (ctx, _api) = common::setup();
    let resource = ctx.resource();

    let created = resource.create(&fixtures::basic(ctx.ri)).await.unwrap();
    let updated = resource
        .apply(Some(&created), &fixtures::updated(ctx.ri))
        .await
        .unwrap();

    let before = created.attributes();
    let after = updated.attributes();
    for (key, old, new) in [
        ("max_length", "50", "70"),
        ("permissions", "READ_ONLY", "READ_WRITE"),
        ("master", "PROFILE_MASTER", "OKTA"),
        ("enum.3", "XL", "XXL"),
        ("scope", "SELF", "NONE"),
    ] {
        assert_eq!(before.get(key).map(String::as_str), Some(old), "{}", key);
        assert_eq!(after.get(key).map(String::as_str), Some(new), "{}", key);
    }
    assert!(!before.contains_key("pattern"));
    assert_eq!(after.get("pattern").map(String::as_str), Some(".+"));

    resource.delete(&updated).await.unwrap();
    let exists = ctx
        .checker()
        .exists("default", &ctx.resource_index(), ResolutionScope::Custom)
        .await
        .unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn test_failed_step_still_destroys() {
    let (ctx, api) = common::setup();
    let index = ctx.resource_index();

    let case = TestCase::new(vec![TestStep::Apply {
        config: fixtures::basic(ctx.ri),
        checks: vec![exists(), attr("max_length", "51")],
    }]);

    let err = ctx.verifier().run(&case).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&index), "{}", message);
    assert!(message.contains("max_length"), "{}", message);

    assert!(api.custom_property(DEFAULT_TYPE_NAME, &index).is_none());
}
