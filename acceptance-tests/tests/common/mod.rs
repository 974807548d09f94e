//! Common test utilities for acceptance suites.
#![allow(dead_code)]

use acceptance_tests::{AcceptanceContext, InMemoryIdentityApi};
use std::sync::Arc;

/// Context over a fresh in-memory tenant. The tenant handle is returned too
/// so tests can seed state and inspect recorded calls.
pub fn setup() -> (AcceptanceContext, Arc<InMemoryIdentityApi>) {
    let api = Arc::new(InMemoryIdentityApi::new());
    let ctx = AcceptanceContext::new(api.clone());
    (ctx, api)
}

/// Same as [`setup`], with a non-default user type named after the run.
pub fn setup_with_user_type() -> (AcceptanceContext, Arc<InMemoryIdentityApi>) {
    let (ctx, api) = setup();
    api.add_user_type(&acceptance_tests::fixtures::user_type_name(ctx.ri));
    (ctx, api)
}

/// Context over the live tenant.
pub fn setup_live() -> AcceptanceContext {
    AcceptanceContext::live().expect("Failed to create live context - check OKTA_* settings")
}

/// Macro to skip live tests unless `OKTA_ACC` is set.
#[macro_export]
macro_rules! skip_unless_live {
    () => {
        if !acceptance_tests::should_run_live() {
            eprintln!("Skipping live test (set OKTA_ACC=1 to run)");
            return;
        }
    };
}
