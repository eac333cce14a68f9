//! The session context: one explicit value holding everything a user session knows.
//!
//! A `Session` owns the parameter store, the optional model metadata, the most
//! recent prediction, and the submission state machine:
//!
//! ```text
//! Idle -> Submitting -> Succeeded(result) | Failed(error) -> Idle
//! ```
//!
//! `Succeeded` and `Failed` are idle states that still show the last outcome.
//! They return to `Idle` on `dismiss`, and a new submission from either one
//! behaves exactly as from `Idle`. `Submitting` is the only state that refuses a
//! new submission. Field edits are accepted in every state; the snapshot sent
//! with a request is the one captured when the submission began.
//!
//! Model metadata loads independently of the state machine. Neither its fetch
//! nor its failure holds up edits or submissions.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::client::{PredictionService, RequestError};
use crate::curve::{GradationCurve, project_curve};
use crate::domain::{Field, ModelInfo, ParameterSet, PredictionResult};
use crate::store::ParameterStore;
use crate::validate::ValidationError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(PredictionResult),
    Failed(RequestError),
}

impl SubmissionState {
    /// `true` in `Idle` and in the settled states, which re-arm like `Idle`.
    pub fn accepts_submission(&self) -> bool {
        !matches!(self, SubmissionState::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a prediction request is already in flight")]
    InFlight,

    #[error(transparent)]
    Request(#[from] RequestError),
}

type Outcome = Result<PredictionResult, RequestError>;
type InfoOutcome = Result<Option<ModelInfo>, RequestError>;

#[derive(Default)]
pub struct Session {
    store: ParameterStore,
    model_info: Option<ModelInfo>,
    prediction: Option<PredictionResult>,
    state: SubmissionState,
    pending: Option<Receiver<Outcome>>,
    model_info_pending: Option<Receiver<InfoOutcome>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> ParameterSet {
        self.store.get()
    }

    /// The gradation curve for the current parameters, derived on every call.
    pub fn curve(&self) -> GradationCurve {
        project_curve(&self.store.get())
    }

    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<ParameterSet, ValidationError> {
        self.store.set(field, raw)
    }

    pub fn step_field(&mut self, field: Field, steps: i32) -> Result<ParameterSet, ValidationError> {
        self.store.step(field, steps)
    }

    pub fn reset_fields(&mut self) -> ParameterSet {
        self.store.reset()
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref()
    }

    /// Latest successful prediction; survives later failed submissions.
    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        !self.state.accepts_submission()
    }

    pub fn is_loading_model_info(&self) -> bool {
        self.model_info_pending.is_some()
    }

    /// Fetch model metadata on the calling thread. Failures are logged and otherwise ignored.
    pub fn load_model_info(&mut self, service: &dyn PredictionService) -> Option<&ModelInfo> {
        let outcome = service.fetch_model_info();
        self.apply_model_info(outcome);
        self.model_info.as_ref()
    }

    /// Fetch model metadata on a worker thread; collect it with `poll_model_info`.
    pub fn load_model_info_in_background(&mut self, service: Arc<dyn PredictionService>) {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(service.fetch_model_info());
        });
        self.model_info_pending = Some(rx);
    }

    /// Apply fetched metadata if it has arrived. Returns `true` once the fetch settled.
    pub fn poll_model_info(&mut self) -> bool {
        let Some(rx) = &self.model_info_pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(RequestError::Unreachable(
                "model info worker exited without a result".to_string(),
            )),
        };
        self.model_info_pending = None;
        self.apply_model_info(outcome);
        true
    }

    fn apply_model_info(&mut self, outcome: InfoOutcome) {
        match outcome {
            Ok(Some(info)) => {
                tracing::info!(model_type = %info.model_type, r2 = info.r2_score, "model info loaded");
                self.model_info = Some(info);
            }
            Ok(None) => tracing::info!("backend offered no model info"),
            Err(err) => tracing::warn!(error = %err, "model info unavailable"),
        }
    }

    /// Enter `Submitting` and capture the snapshot to send.
    pub fn begin_submission(&mut self) -> Result<ParameterSet, SubmitError> {
        if self.is_submitting() {
            tracing::debug!("submission refused: request in flight");
            return Err(SubmitError::InFlight);
        }
        self.state = SubmissionState::Submitting;
        Ok(self.store.get())
    }

    /// Settle the outstanding submission.
    pub fn complete_submission(&mut self, outcome: Outcome) {
        self.pending = None;
        match outcome {
            Ok(result) => {
                self.prediction = Some(result.clone());
                self.state = SubmissionState::Succeeded(result);
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction failed");
                self.state = SubmissionState::Failed(err);
            }
        }
    }

    /// Return a settled state to `Idle`. No effect while submitting.
    pub fn dismiss(&mut self) {
        if !self.is_submitting() {
            self.state = SubmissionState::Idle;
        }
    }

    /// Submit and wait for the outcome on the calling thread.
    pub fn submit(&mut self, service: &dyn PredictionService) -> Result<PredictionResult, SubmitError> {
        let snapshot = self.begin_submission()?;
        let outcome = service.predict(&snapshot);
        self.complete_submission(outcome.clone());
        Ok(outcome?)
    }

    /// Submit on a worker thread; collect the outcome with `poll_submission`.
    pub fn submit_in_background(&mut self, service: Arc<dyn PredictionService>) -> Result<(), SubmitError> {
        let snapshot = self.begin_submission()?;
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            // The receiver may be gone if the session ended first; nothing to do then.
            let _ = tx.send(service.predict(&snapshot));
        });
        self.pending = Some(rx);
        Ok(())
    }

    /// Apply a finished background outcome, if any. Returns `true` when the state changed.
    pub fn poll_submission(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.complete_submission(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.complete_submission(Err(RequestError::Unreachable(
                    "prediction worker exited without a result".to_string(),
                )));
                true
            }
        }
    }
}
