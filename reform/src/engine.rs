//! Lookup task spawning for asynchronous rules.
//!
//! One task per committed field value. The task carries the edit
//! generation it was started for; the field discards the result if the
//! generation moved on while the lookup was in flight.

use std::sync::Arc;

use crate::control::FieldControl;
use crate::validate::{LookupFailurePolicy, ValidateAsync, ValidationErrors, keys};
use crate::value::Value;

pub(crate) struct LookupJob {
    pub field: FieldControl,
    pub generation: u64,
    pub value: Value,
    pub validators: Vec<Arc<dyn ValidateAsync>>,
    pub policy: LookupFailurePolicy,
}

pub(crate) fn spawn(job: LookupJob) {
    tokio::spawn(async move {
        let mut errors = ValidationErrors::new();
        for validator in &job.validators {
            match validator.check(job.value.clone()).await {
                Ok(Some(failure)) => errors.merge(failure),
                Ok(None) => {}
                Err(err) => match job.policy {
                    LookupFailurePolicy::TreatAsValid => {
                        log::warn!("lookup '{}' failed, treating as valid: {err}", validator.key());
                    }
                    LookupFailurePolicy::Report => {
                        errors.insert(
                            keys::LOOKUP_FAILED,
                            serde_json::json!({
                                "validator": validator.key(),
                                "message": err.to_string(),
                            }),
                        );
                    }
                },
            }
        }
        job.field.apply_lookup_result(job.generation, errors);
    });
}
