//! Import by id alone.
//!
//! Run with: cargo test -p acceptance-tests --test import_test

mod common;

use acceptance_tests::fixtures;
use acceptance_tests::memory::DEFAULT_TYPE_NAME;
use acceptance_tests::verifier::{exists, first_difference};
use acceptance_tests::{TestCase, TestStep, VerifyError};
use user_schema::CustomPropertyConfig;

#[tokio::test]
async fn test_import_twice_is_attribute_equal() {
    let (ctx, _api) = common::setup();
    let resource = ctx.resource();

    let state = resource.create(&fixtures::updated(ctx.ri)).await.unwrap();

    let first = resource.import(&state.import_id()).await.unwrap();
    let second = resource.import(&state.import_id()).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0].attributes(), second[0].attributes());
    assert_eq!(first_difference(&state.attributes(), &first[0].attributes()), None);

    resource.delete(&state).await.unwrap();
}

#[tokio::test]
async fn test_import_from_non_default_user_type() {
    let (ctx, _api) = common::setup_with_user_type();
    let resource = ctx.resource();

    let state = resource
        .create(&fixtures::non_default_user_type(ctx.ri))
        .await
        .unwrap();
    let id = state.import_id();
    assert_eq!(
        id,
        format!("{}.{}", fixtures::user_type_name(ctx.ri), ctx.resource_index())
    );

    let imported = resource.import(&id).await.unwrap();
    assert_eq!(imported, vec![state.clone()]);

    resource.delete(&state).await.unwrap();
}

#[tokio::test]
async fn test_import_of_missing_property_yields_nothing() {
    let (ctx, _api) = common::setup();

    let imported = ctx.resource().import(&ctx.resource_index()).await.unwrap();
    assert!(imported.is_empty());
}

#[tokio::test]
async fn test_malformed_import_id_is_rejected() {
    let (ctx, _api) = common::setup();

    for id in ["", ".index", "user_type."] {
        assert!(ctx.resource().import(id).await.is_err(), "accepted {:?}", id);
    }
}

#[tokio::test]
async fn test_zero_imported_instances_fail_the_step() {
    let (ctx, api) = common::setup();
    let index = ctx.resource_index();
    let missing = format!("{}_missing", index);

    let case = TestCase::new(vec![
        TestStep::Apply {
            config: fixtures::basic(ctx.ri),
            checks: vec![],
        },
        TestStep::Import {
            id: Some(missing.clone()),
            verify: false,
        },
    ]);

    let err = ctx.verifier().run(&case).await.unwrap_err();
    match err {
        VerifyError::ImportCount { step, id, count } => {
            assert_eq!(step, 2);
            assert_eq!(id, missing);
            assert_eq!(count, 0);
        }
        other => panic!("unexpected error: {}", other),
    }

    // The applied property is still torn down.
    assert!(api.custom_property(DEFAULT_TYPE_NAME, &index).is_none());
}

#[tokio::test]
async fn test_import_before_any_apply_fails() {
    let (ctx, _api) = common::setup();

    let err = ctx
        .verifier()
        .run(&TestCase::new(vec![TestStep::import()]))
        .await
        .unwrap_err();
    assert!(matches!(err, VerifyError::NothingToImport { step: 1 }));
}

#[tokio::test]
async fn test_explicit_default_user_type_round_trips() {
    let (ctx, _api) = common::setup();

    let config = CustomPropertyConfig {
        user_type: Some("default".to_string()),
        ..fixtures::basic(ctx.ri)
    };

    let report = ctx
        .verifier()
        .run(&TestCase::new(vec![
            TestStep::Apply {
                config,
                checks: vec![exists()],
            },
            TestStep::import(),
            // Same property spelled without the user type: no replacement.
            TestStep::Apply {
                config: fixtures::basic(ctx.ri),
                checks: vec![exists()],
            },
            TestStep::import(),
        ]))
        .await
        .expect("explicit default user type drifted on import");

    assert_eq!(report.applied[0].import_id(), ctx.resource_index());
    assert_eq!(report.applied[0].property.user_type, None);
    assert_eq!(report.imported[0], vec![report.applied[0].clone()]);
}
