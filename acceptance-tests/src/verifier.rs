//! Step-sequenced lifecycle verification for one custom property.
//!
//! A [`TestCase`] applies configurations in order, checks the re-read state
//! after each apply, optionally imports by id, and always tears the property
//! down at the end, confirming it is gone.

use schema_core::error::SchemaError;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use user_schema::models::ResolutionScope;
use user_schema::{
    CustomPropertyConfig, CustomPropertyResource, ExistenceChecker, IdentityApi, PropertyState,
};

/// An assertion evaluated after an apply step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// The property is present in its user type's custom schema.
    Exists,
    /// Flattened attribute `key` equals `expected`.
    Attr { key: String, expected: String },
    /// Flattened attribute `key` is not set.
    NoAttr { key: String },
}

pub fn exists() -> Check {
    Check::Exists
}

pub fn attr(key: impl Into<String>, expected: impl Into<String>) -> Check {
    Check::Attr {
        key: key.into(),
        expected: expected.into(),
    }
}

pub fn no_attr(key: impl Into<String>) -> Check {
    Check::NoAttr { key: key.into() }
}

/// Positional checks for a list attribute, including its `.#` count.
pub fn list<S: AsRef<str>>(key: &str, values: &[S]) -> Vec<Check> {
    let mut checks = vec![attr(format!("{}.#", key), values.len().to_string())];
    checks.extend(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| attr(format!("{}.{}", key, i), v.as_ref())),
    );
    checks
}

#[derive(Debug, Clone)]
pub enum TestStep {
    Apply {
        config: CustomPropertyConfig,
        checks: Vec<Check>,
    },
    /// Import by id; `None` uses the current resource's id. With `verify`,
    /// the imported attributes must equal the applied ones.
    Import { id: Option<String>, verify: bool },
}

impl TestStep {
    /// Import the current resource and compare it with the applied state.
    pub fn import() -> Self {
        TestStep::Import {
            id: None,
            verify: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub steps: Vec<TestStep>,
    pub check_destroy: bool,
}

impl TestCase {
    pub fn new(steps: Vec<TestStep>) -> Self {
        Self {
            steps,
            check_destroy: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("step {step}: {resource}: attribute '{key}' expected {expected:?}, got {actual:?}")]
    AttributeMismatch {
        step: usize,
        resource: String,
        key: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("step {step}: {resource}: attribute '{key}' should not be set, got {actual:?}")]
    UnexpectedAttribute {
        step: usize,
        resource: String,
        key: String,
        actual: String,
    },

    #[error("step {step}: custom property {index} does not exist in user type {user_type} schema")]
    Missing {
        step: usize,
        index: String,
        user_type: String,
    },

    #[error("step {step}: import of {id} produced {count} instances, expected 1")]
    ImportCount { step: usize, id: String, count: usize },

    #[error("step {step}: imported {id} differs at '{key}': applied {applied:?}, imported {imported:?}")]
    ImportDrift {
        step: usize,
        id: String,
        key: String,
        applied: Option<String>,
        imported: Option<String>,
    },

    #[error("step {step}: nothing has been applied yet, cannot import")]
    NothingToImport { step: usize },

    #[error("resource still exists, ID: {0}")]
    StillExists(String),

    #[error("step {step}: {source}")]
    Schema {
        step: usize,
        #[source]
        source: SchemaError,
    },

    #[error("destroy of {id} failed: {source}")]
    Destroy {
        id: String,
        #[source]
        source: SchemaError,
    },
}

impl VerifyError {
    fn schema(step: usize) -> impl FnOnce(SchemaError) -> VerifyError {
        move |source| VerifyError::Schema { step, source }
    }
}

/// What a successful run observed.
#[derive(Debug, Clone, Default)]
pub struct CaseReport {
    pub steps_run: usize,
    /// State after each apply step, in order.
    pub applied: Vec<PropertyState>,
    /// Instances returned by each import step, in order.
    pub imported: Vec<Vec<PropertyState>>,
    pub destroyed: Option<String>,
}

pub struct LifecycleVerifier {
    resource: CustomPropertyResource,
    checker: ExistenceChecker,
}

impl LifecycleVerifier {
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        Self {
            resource: CustomPropertyResource::new(api.clone()),
            checker: ExistenceChecker::new(api),
        }
    }

    pub fn resource(&self) -> &CustomPropertyResource {
        &self.resource
    }

    /// Run every step, then destroy. The first failure wins; destroy runs
    /// even when a step failed.
    pub async fn run(&self, case: &TestCase) -> Result<CaseReport, VerifyError> {
        let mut report = CaseReport::default();
        let mut state: Option<PropertyState> = None;

        let outcome = self.run_steps(case, &mut state, &mut report).await;
        let teardown = self.destroy(case, state.as_ref()).await;

        outcome?;
        report.destroyed = teardown?;
        Ok(report)
    }

    async fn run_steps(
        &self,
        case: &TestCase,
        state: &mut Option<PropertyState>,
        report: &mut CaseReport,
    ) -> Result<(), VerifyError> {
        for (i, step) in case.steps.iter().enumerate() {
            let step_no = i + 1;
            match step {
                TestStep::Apply { config, checks } => {
                    let applied = self
                        .resource
                        .apply(state.as_ref(), config)
                        .await
                        .map_err(VerifyError::schema(step_no))?;
                    tracing::debug!(step = step_no, index = %applied.id, "applied configuration");
                    *state = Some(applied.clone());
                    report.applied.push(applied.clone());

                    self.check(step_no, &applied, checks).await?;
                }
                TestStep::Import { id, verify } => {
                    let current = state
                        .as_ref()
                        .ok_or(VerifyError::NothingToImport { step: step_no })?;
                    let id = id.clone().unwrap_or_else(|| current.import_id());
                    let imported = self.import(step_no, current, id, *verify).await?;
                    report.imported.push(imported);
                }
            }
            report.steps_run = step_no;
        }
        Ok(())
    }

    /// Evaluate `checks` against `state`.
    pub async fn check(
        &self,
        step: usize,
        state: &PropertyState,
        checks: &[Check],
    ) -> Result<(), VerifyError> {
        let attrs = state.attributes();

        for check in checks {
            match check {
                Check::Exists => {
                    let found = self
                        .checker
                        .exists(state.user_type_name(), &state.id, ResolutionScope::Custom)
                        .await
                        .map_err(VerifyError::schema(step))?;
                    if !found {
                        return Err(VerifyError::Missing {
                            step,
                            index: state.id.clone(),
                            user_type: state.user_type_name().to_string(),
                        });
                    }
                }
                Check::Attr { key, expected } => {
                    let actual = attrs.get(key);
                    if actual != Some(expected) {
                        return Err(VerifyError::AttributeMismatch {
                            step,
                            resource: state.id.clone(),
                            key: key.clone(),
                            expected: expected.clone(),
                            actual: actual.cloned(),
                        });
                    }
                }
                Check::NoAttr { key } => {
                    if let Some(actual) = attrs.get(key) {
                        return Err(VerifyError::UnexpectedAttribute {
                            step,
                            resource: state.id.clone(),
                            key: key.clone(),
                            actual: actual.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    async fn import(
        &self,
        step: usize,
        current: &PropertyState,
        id: String,
        verify: bool,
    ) -> Result<Vec<PropertyState>, VerifyError> {
        let imported = self
            .resource
            .import(&id)
            .await
            .map_err(VerifyError::schema(step))?;

        if imported.len() != 1 {
            return Err(VerifyError::ImportCount {
                step,
                id,
                count: imported.len(),
            });
        }

        if verify {
            if let Some((key, applied, found)) =
                first_difference(&current.attributes(), &imported[0].attributes())
            {
                return Err(VerifyError::ImportDrift {
                    step,
                    id,
                    key,
                    applied,
                    imported: found,
                });
            }
        }

        tracing::debug!(step, id = %id, "import verified");
        Ok(imported)
    }

    async fn destroy(
        &self,
        case: &TestCase,
        state: Option<&PropertyState>,
    ) -> Result<Option<String>, VerifyError> {
        let Some(state) = state else {
            return Ok(None);
        };

        self.resource
            .delete(state)
            .await
            .map_err(|source| VerifyError::Destroy {
                id: state.id.clone(),
                source,
            })?;

        if case.check_destroy {
            let still_there = self
                .checker
                .exists(state.user_type_name(), &state.id, ResolutionScope::Custom)
                .await
                .map_err(|source| VerifyError::Destroy {
                    id: state.id.clone(),
                    source,
                })?;
            if still_there {
                return Err(VerifyError::StillExists(state.id.clone()));
            }
        }

        tracing::debug!(id = %state.id, "destroyed");
        Ok(Some(state.id.clone()))
    }
}

/// First key whose values differ between two flattened states.
pub fn first_difference(
    left: &BTreeMap<String, String>,
    right: &BTreeMap<String, String>,
) -> Option<(String, Option<String>, Option<String>)> {
    left.keys()
        .chain(right.keys())
        .find(|key| left.get(*key) != right.get(*key))
        .map(|key| (key.clone(), left.get(key).cloned(), right.get(key).cloned()))
}
