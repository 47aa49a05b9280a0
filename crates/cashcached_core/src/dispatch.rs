//! Dispatch capability
//!
//! A [`Dispatcher`] delivers a form bundle to an external service. Calling
//! `dispatch` starts the attempt right away and hands back a
//! [`DispatchFuture`] that resolves exactly once to a [`DispatchOutcome`].

use crate::form::FormFields;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Deferred result of one dispatch attempt
pub type DispatchFuture = BoxFuture<'static, DispatchOutcome>;

/// External delivery service
pub trait Dispatcher: Send + Sync {
    /// Start delivering `request`. Invoked once per attempt.
    fn dispatch(&self, request: DispatchRequest) -> DispatchFuture;
}

/// Public key or token handed to the delivery service.
///
/// Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Where a form is delivered
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchTarget {
    pub service_id: String,
    pub template_id: String,
    pub credential: Credential,
}

impl DispatchTarget {
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        credential: Credential,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            credential,
        }
    }

    /// Names of the identifiers that are still empty
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.service_id.is_empty() {
            missing.push("service_id");
        }
        if self.template_id.is_empty() {
            missing.push("template_id");
        }
        if self.credential.is_empty() {
            missing.push("public_key");
        }
        missing
    }
}

/// One delivery attempt: identifiers plus a snapshot of the field values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRequest {
    pub service_id: String,
    pub template_id: String,
    pub params: FormFields,
    pub credential: Credential,
}

impl DispatchRequest {
    pub fn new(target: &DispatchTarget, params: FormFields) -> Self {
        Self {
            service_id: target.service_id.clone(),
            template_id: target.template_id.clone(),
            params,
            credential: target.credential.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    Failed(DispatchFailure),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Why an attempt failed. Used for logs only; users see one generic message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("dispatch abandoned before an outcome was reported")]
    Abandoned,
}

/// Dispatcher whose outcomes are supplied by hand, oldest attempt first.
///
/// Used by headless runs and tests to drive the deferred path deterministically.
#[derive(Default)]
pub struct ManualDispatcher {
    requests: Mutex<Vec<DispatchRequest>>,
    pending: Mutex<VecDeque<oneshot::Sender<DispatchOutcome>>>,
}

impl ManualDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the oldest unresolved attempt. Returns `false` if none is pending.
    pub fn resolve_next(&self, outcome: DispatchOutcome) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match sender {
            Some(sender) => {
                // A dropped receiver means nobody is waiting for this attempt any more.
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Number of times `dispatch` was invoked
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every request received so far, in call order
    pub fn requests(&self) -> Vec<DispatchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Dispatcher for ManualDispatcher {
    fn dispatch(&self, request: DispatchRequest) -> DispatchFuture {
        let (tx, rx) = oneshot::channel();
        debug!(template = %request.template_id, "manual dispatch queued");
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(tx);

        Box::pin(async move {
            rx.await
                .unwrap_or(DispatchOutcome::Failed(DispatchFailure::Abandoned))
        })
    }
}
