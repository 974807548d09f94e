//! Lifecycle acceptance tests for custom user schema properties.
//!
//! Suites run against [`memory::InMemoryIdentityApi`] by default. Setting
//! `OKTA_ACC=1` (plus the `OKTA_*` connection settings) runs the live suite
//! against a real tenant.
//!
//! ## Usage
//!
//! ```bash
//! # Offline suites
//! cargo test -p acceptance-tests
//!
//! # Live suite
//! OKTA_ACC=1 OKTA_ORG_NAME=... OKTA_API_TOKEN=... cargo test -p acceptance-tests --test live_test
//! ```

use anyhow::{Context, Result};
use rand::Rng;
use schema_core::config::Config;
use std::sync::{Arc, Once};
use user_schema::{CustomPropertyResource, ExistenceChecker, IdentityApi, OktaClient};

pub mod fixtures;
pub mod memory;
pub mod verifier;

pub use memory::{ApiCall, InMemoryIdentityApi};
pub use verifier::{Check, LifecycleVerifier, TestCase, TestStep, VerifyError};

/// Prefix of every resource index created by these suites. The sweeper
/// removes leftovers carrying it.
pub const TEST_RESOURCE_PREFIX: &str = "testAcc";

/// Env var that enables the live suite.
pub const LIVE_ENV: &str = "OKTA_ACC";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,acceptance_tests=debug,user_schema=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Random integer that keeps resource names unique per run.
pub fn random_int() -> u32 {
    rand::thread_rng().gen_range(100_000..1_000_000)
}

/// True when the live suite was requested.
pub fn should_run_live() -> bool {
    matches!(
        std::env::var(LIVE_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

/// One test run: an API, and the random integer naming its resources.
pub struct AcceptanceContext {
    pub api: Arc<dyn IdentityApi>,
    pub ri: u32,
}

impl AcceptanceContext {
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        Self::with_ri(api, random_int())
    }

    pub fn with_ri(api: Arc<dyn IdentityApi>, ri: u32) -> Self {
        init_tracing();
        Self { api, ri }
    }

    /// Context backed by the tenant described by `OKTA_*` settings.
    pub fn live() -> Result<Self> {
        let config = Config::load().context("Failed to load OKTA_* configuration")?;
        let client = OktaClient::from_config(&config).context("Failed to build API client")?;
        tracing::info!(api_url = %client.api_url(), "running against live tenant");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn resource_index(&self) -> String {
        fixtures::resource_index(self.ri)
    }

    pub fn verifier(&self) -> LifecycleVerifier {
        LifecycleVerifier::new(self.api.clone())
    }

    pub fn checker(&self) -> ExistenceChecker {
        ExistenceChecker::new(self.api.clone())
    }

    pub fn resource(&self) -> CustomPropertyResource {
        CustomPropertyResource::new(self.api.clone())
    }
}
