use thiserror::Error;

use crate::session::{Event, LoadingState};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("attachment {name} is {size} bytes, limit is {limit} bytes")]
    AttachmentTooLarge { name: String, size: u64, limit: u64 },
    #[error("unsupported attachment type {mime} for {name}")]
    UnsupportedAttachment { name: String, mime: String },
    #[error("subject is required")]
    MissingSubject,
    #[error("period count must be a positive integer, got {0:?}")]
    InvalidPeriods(String),
    #[error("input closed before the form was complete")]
    InputClosed,
    #[error("a request is already in flight")]
    Busy,
    #[error("no transition from {from:?} on {event:?}")]
    InvalidTransition { from: LoadingState, event: Event },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("model request failed: {0}")]
    Request(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
