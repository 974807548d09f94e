//! Lifecycle against a real tenant.
//!
//! Skipped unless OKTA_ACC=1. Needs OKTA_ORG_NAME / OKTA_BASE_URL (or
//! OKTA_ENDPOINT) and OKTA_API_TOKEN.
//!
//! Run with: OKTA_ACC=1 cargo test -p acceptance-tests --test live_test

mod common;

use acceptance_tests::fixtures;
use acceptance_tests::verifier::{attr, exists, list};
use acceptance_tests::{TestCase, TestStep, TEST_RESOURCE_PREFIX};
use serial_test::serial;
use user_schema::models::ResolutionScope;
use user_schema::sweeper::sweep_custom_properties;

#[tokio::test]
#[serial]
async fn test_live_base_attribute_exists() {
    skip_unless_live!();
    let ctx = common::setup_live();

    let found = ctx
        .checker()
        .exists("default", "login", ResolutionScope::Base)
        .await
        .expect("schema fetch failed");
    assert!(found);
}

#[tokio::test]
#[serial]
async fn test_live_string_property_lifecycle() {
    skip_unless_live!();
    let ctx = common::setup_live();
    let ri = ctx.ri;

    let mut basic_checks = vec![
        exists(),
        attr("type", "string"),
        attr("max_length", "50"),
        attr("permissions", "READ_ONLY"),
        attr("master", "PROFILE_MASTER"),
        attr("scope", "SELF"),
    ];
    basic_checks.extend(list("enum", &["S", "M", "L", "XL"]));

    let mut updated_checks = vec![
        exists(),
        attr("max_length", "70"),
        attr("permissions", "READ_WRITE"),
        attr("master", "OKTA"),
        attr("pattern", ".+"),
        attr("scope", "NONE"),
    ];
    updated_checks.extend(list("enum", &["S", "M", "L", "XXL"]));

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
            checks: vec![exists(), attr("unique", "UNIQUE_VALIDATED")],
        },
        TestStep::import(),
    ]);

    ctx.verifier().run(&case).await.expect("live lifecycle failed");
}

#[tokio::test]
#[serial]
async fn test_live_array_property_lifecycle() {
    skip_unless_live!();
    let ctx = common::setup_live();
    let ri = ctx.ri;

    let case = TestCase::new(vec![
        TestStep::Apply {
            config: fixtures::array_string(ri),
            checks: vec![exists(), attr("array_type", "string")],
        },
        TestStep::Apply {
            config: fixtures::array_enum(ri),
            checks: list("array_enum", &["test", "1", "2"]),
        },
        TestStep::import(),
    ]);

    ctx.verifier().run(&case).await.expect("live array lifecycle failed");
}

#[tokio::test]
#[serial]
async fn test_live_sweep() {
    skip_unless_live!();
    let ctx = common::setup_live();

    let report = sweep_custom_properties(ctx.api.as_ref(), TEST_RESOURCE_PREFIX)
        .await
        .expect("sweep failed");
    tracing::info!(removed = report.removed.len(), "live sweep done");
    assert!(report.user_types_scanned >= 1);
}
