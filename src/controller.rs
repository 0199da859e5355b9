use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;

use crate::errors::{PredictError, SubmitRejected, ValidationError};
use crate::form::{FormState, PredictionRequest};
use crate::models::{FieldEdit, Phase, Prediction};
use crate::network::PredictionClient;

/// One accepted submit: the request body plus the sequence number that must
/// come back with the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub seq: u64,
    pub payload: PredictionRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// A newer submission started since; the outcome was dropped.
    Stale,
}

/// Owns the form, the request lifecycle and the last settled price.
#[derive(Debug)]
pub struct Controller {
    form: FormState,
    result: Option<Prediction>,
    phase: Phase,
    issues: Vec<ValidationError>,
    next_seq: u64,
    conversion_rate: f64,
}

impl Controller {
    pub fn new(conversion_rate: f64) -> Self {
        Self::with_form(FormState::default(), conversion_rate)
    }

    pub fn with_form(form: FormState, conversion_rate: f64) -> Self {
        Self {
            form,
            result: None,
            phase: Phase::Idle,
            issues: Vec::new(),
            next_seq: 1,
            conversion_rate,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn result(&self) -> Option<&Prediction> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Validation problems from the last rejected submit.
    pub fn issues(&self) -> &[ValidationError] {
        &self.issues
    }

    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn update(&mut self, edit: FieldEdit) {
        self.form = std::mem::take(&mut self.form).with(edit);
        self.issues.clear();
    }

    /// Validates the form and, if it may be sent, enters `Submitting`.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.is_loading() {
            return Err(SubmitRejected::Busy);
        }
        let payload = match self.form.to_request() {
            Ok(payload) => payload,
            Err(errors) => {
                self.issues = errors.clone();
                return Err(SubmitRejected::Invalid(errors));
            }
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.issues.clear();
        self.phase = Phase::Submitting { seq };
        tracing::info!(seq, "submission started");
        Ok(Submission { seq, payload })
    }

    /// Records the outcome of submission `seq`. Outcomes of anything but the
    /// in-flight submission are ignored.
    pub fn settle(&mut self, seq: u64, outcome: Result<f64, PredictError>) -> Settlement {
        if self.phase != (Phase::Submitting { seq }) {
            tracing::warn!(seq, phase = ?self.phase, "dropping stale prediction outcome");
            return Settlement::Stale;
        }
        let outcome = outcome.and_then(|base_price| {
            let local_price = base_price * self.conversion_rate;
            if local_price.is_finite() {
                Ok((base_price, local_price))
            } else {
                Err(PredictError::PriceOutOfRange { base_price })
            }
        });
        match outcome {
            Ok((base_price, local_price)) => {
                tracing::info!(seq, base_price, local_price, "prediction received");
                self.result = Some(Prediction {
                    base_price,
                    local_price,
                    settled_at: Local::now(),
                });
                self.phase = Phase::Succeeded;
            }
            Err(err) => {
                tracing::error!(seq, error = %err, "prediction failed");
                self.result = None;
                self.phase = Phase::Failed {
                    reason: err.to_string(),
                };
            }
        }
        Settlement::Applied
    }
}

/// Sends one submission and settles it on the shared controller.
/// The lock is only taken after the response is in.
pub async fn run_submission(
    controller: Arc<Mutex<Controller>>,
    client: PredictionClient,
    submission: Submission,
) -> Settlement {
    let outcome = client.predict(&submission.payload).await;
    lock(&controller).settle(submission.seq, outcome)
}

/// Locks the shared controller, recovering from poisoning.
pub fn lock(controller: &Mutex<Controller>) -> MutexGuard<'_, Controller> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}
