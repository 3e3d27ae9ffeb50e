//! Request lifecycle controller.
//!
//! A [`Session`] owns the one [`Snapshot`] the presenter draws from and
//! moves it through [`transition`]. Every change is published on a
//! `watch` channel; observers get a receiver from [`Session::subscribe`].

use serde::Serialize;
use tokio::sync::watch;

use crate::errors::PlanError;
use crate::form::LessonRequest;
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{GenerateRequest, Payload};

/// Shown instead of any underlying failure detail.
pub const USER_ERROR_MESSAGE: &str =
    "Đã xảy ra lỗi khi kết nối với Gemini. Vui lòng kiểm tra API Key hoặc thử lại sau.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoadingState {
    #[default]
    Idle,
    Thinking,
    /// Never entered; counted as busy alongside `Thinking`.
    #[allow(dead_code)]
    Generating,
    Complete,
    Error,
}

impl LoadingState {
    pub fn is_busy(self) -> bool {
        matches!(self, LoadingState::Thinking | LoadingState::Generating)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, LoadingState::Complete | LoadingState::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Submit,
    Succeeded,
    Failed,
}

pub fn transition(from: LoadingState, event: Event) -> Result<LoadingState, PlanError> {
    use LoadingState::*;
    match (from, event) {
        (Idle | Complete | Error, Event::Submit) => Ok(Thinking),
        (Thinking | Generating, Event::Submit) => Err(PlanError::Busy),
        (Thinking | Generating, Event::Succeeded) => Ok(Complete),
        (Thinking | Generating, Event::Failed) => Ok(Error),
        (from, event) => Err(PlanError::InvalidTransition { from, event }),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: LoadingState,
    /// Model text, verbatim. Empty unless `state` is `Complete`.
    pub result: String,
    pub error: Option<String>,
}

pub struct Session {
    tx: watch::Sender<Snapshot>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> LoadingState {
        self.tx.borrow().state
    }

    /// Runs one generation. Only `Busy` is returned as an error; model
    /// failures end in the `Error` state with [`USER_ERROR_MESSAGE`].
    pub async fn submit(
        &mut self,
        request: &LessonRequest,
        provider: &dyn Provider,
    ) -> Result<LoadingState, PlanError> {
        let next = transition(self.state(), Event::Submit)?;
        self.tx.send_modify(|s| {
            s.state = next;
            s.result.clear();
            s.error = None;
        });

        let outcome = generate_plan(provider, request).await;
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Result<String, PlanError>) -> Result<LoadingState, PlanError> {
        match outcome {
            Ok(text) => {
                let next = transition(self.state(), Event::Succeeded)?;
                self.tx.send_modify(|s| {
                    s.state = next;
                    s.result = text;
                });
            }
            Err(e) => {
                log::error!("lesson plan generation failed: {e}");
                let next = transition(self.state(), Event::Failed)?;
                self.tx.send_modify(|s| {
                    s.state = next;
                    s.error = Some(USER_ERROR_MESSAGE.to_string());
                });
            }
        }
        Ok(self.state())
    }
}

pub fn build_request(request: &LessonRequest) -> GenerateRequest {
    let text = prompt::build_instruction(request);
    GenerateRequest::new(Payload::new(text, request.attachment.as_ref()))
}

/// Exactly one model call, no retry. Only an empty reply counts as a failure.
pub async fn generate_plan(provider: &dyn Provider, request: &LessonRequest) -> Result<String, PlanError> {
    let wire = build_request(request);
    let text = provider
        .generate(&wire)
        .await
        .map_err(|e| PlanError::Request(format!("{e:#}")))?;
    if text.is_empty() {
        return Err(PlanError::EmptyResponse);
    }
    Ok(text)
}
