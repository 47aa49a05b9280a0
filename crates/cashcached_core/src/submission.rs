//! Form submission lifecycle
//!
//! ```text
//! Idle ──submit──▶ Sending ──Delivered──▶ Success
//!                     └─────Failed─────▶ Failure
//! Success / Failure ──submit──▶ Sending
//! ```
//!
//! A remote controller hands the field snapshot to its [`Dispatcher`] and
//! waits for the outcome, which arrives later through [`SubmissionController::complete`].
//! A local controller has no dispatcher: `submit` moves straight to
//! [`SubmissionState::Accepted`].

use crate::dispatch::{
    DispatchFuture, DispatchOutcome, DispatchRequest, DispatchTarget, Dispatcher,
};
use crate::form::{FormError, FormFields, FormSchema};
use crate::fsm::StateMachine;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    #[default]
    Idle,
    Sending,
    Success,
    Failure,
    /// Accepted without external delivery
    Accepted,
}

impl SubmissionState {
    /// No further automatic transition from this state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SubmissionState::Success | SubmissionState::Failure | SubmissionState::Accepted
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionEvent {
    Submit,
    Delivered,
    Failed,
}

/// User-visible text for a form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionCopy {
    pub submit_label: String,
    pub sending_label: String,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for SubmissionCopy {
    fn default() -> Self {
        Self {
            submit_label: "Submit".to_string(),
            sending_label: "Sending...".to_string(),
            success_message: "Submitted.".to_string(),
            failure_message: "Submission failed. Please try again.".to_string(),
        }
    }
}

/// Correlates an outcome with the attempt that produced it.
///
/// Not `Clone`: an attempt can be completed at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    controller: u64,
    attempt: u64,
}

impl Ticket {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

/// A dispatched attempt awaiting its outcome
pub struct InFlight {
    ticket: Ticket,
    outcome: DispatchFuture,
}

impl InFlight {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn into_parts(self) -> (Ticket, DispatchFuture) {
        (self.ticket, self.outcome)
    }

    /// Wait for the outcome and apply it to `controller`
    pub async fn settle(self, controller: &mut SubmissionController) -> SubmissionState {
        let outcome = self.outcome.await;
        controller.complete(self.ticket, outcome)
    }
}

impl fmt::Debug for InFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlight")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Result of calling [`SubmissionController::submit`]
#[must_use]
#[derive(Debug)]
pub enum Submission {
    /// Handed to the dispatcher; apply the outcome with `complete` or `settle`
    Dispatched(InFlight),
    /// Accepted locally, no delivery involved
    Accepted,
    /// Ignored because an attempt is already in flight
    Suppressed,
}

enum Delivery {
    Remote {
        target: DispatchTarget,
        dispatcher: Arc<dyn Dispatcher>,
    },
    Local,
}

/// Field values and submission state of one form
pub struct SubmissionController {
    id: u64,
    name: String,
    schema: FormSchema,
    fields: FormFields,
    copy: SubmissionCopy,
    fsm: StateMachine<SubmissionState, SubmissionEvent>,
    delivery: Delivery,
    attempts: u64,
}

impl SubmissionController {
    /// Form whose success depends on an external delivery
    pub fn remote(
        name: impl Into<String>,
        schema: FormSchema,
        target: DispatchTarget,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        use SubmissionEvent::*;
        use SubmissionState::*;

        let fsm = StateMachine::builder(Idle)
            .on_any(&[Idle, Success, Failure], Submit, Sending)
            .on(Sending, Delivered, Success)
            .on(Sending, Failed, Failure)
            .build();

        Self::with_parts(name, schema, fsm, Delivery::Remote { target, dispatcher })
    }

    /// Form that is accepted on submit without any external call
    pub fn local(name: impl Into<String>, schema: FormSchema) -> Self {
        use SubmissionEvent::*;
        use SubmissionState::*;

        let fsm = StateMachine::builder(Idle)
            .on_any(&[Idle, Accepted], Submit, Accepted)
            .build();

        Self::with_parts(name, schema, fsm, Delivery::Local)
    }

    fn with_parts(
        name: impl Into<String>,
        schema: FormSchema,
        fsm: StateMachine<SubmissionState, SubmissionEvent>,
        delivery: Delivery,
    ) -> Self {
        Self {
            id: NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            fields: schema.empty_values(),
            schema,
            copy: SubmissionCopy::default(),
            fsm,
            delivery,
            attempts: 0,
        }
    }

    /// Replace the user-visible text
    pub fn with_copy(mut self, copy: SubmissionCopy) -> Self {
        self.copy = copy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> SubmissionState {
        self.fsm.current_state()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.delivery, Delivery::Remote { .. })
    }

    /// Submissions that reached `Sending` or `Accepted`
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// State transitions taken so far
    pub fn history(&self) -> &[(SubmissionState, SubmissionEvent, SubmissionState)] {
        self.fsm.history()
    }

    /// Overwrite one field.
    ///
    /// Allowed in every state. While sending, the in-flight attempt keeps the
    /// values it was started with.
    pub fn update_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        if !self.fields.set(name, value.into()) {
            return Err(FormError::UnknownField {
                form: self.name.clone(),
                field: name.to_string(),
            });
        }
        if self.fsm.is_in(SubmissionState::Sending) {
            debug!(form = %self.name, field = name, "field edited while a submission is in flight");
        }
        Ok(())
    }

    /// Required fields that are still empty
    pub fn missing_required(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .filter(|spec| spec.required)
            .filter(|spec| self.fields.get(&spec.name).map_or(true, str::is_empty))
            .map(|spec| spec.name.as_str())
            .collect()
    }

    /// Submit the current field values.
    ///
    /// A remote form moves to `Sending` and invokes its dispatcher exactly
    /// once. A second submit while `Sending` is suppressed.
    pub fn submit(&mut self) -> Submission {
        let from = self.fsm.current_state();
        let Some(to) = self.fsm.send(SubmissionEvent::Submit) else {
            debug!(form = %self.name, state = ?from, "submit suppressed");
            return Submission::Suppressed;
        };
        self.attempts += 1;
        debug!(form = %self.name, ?from, ?to, attempt = self.attempts, "submit");

        match &self.delivery {
            Delivery::Local => {
                info!(form = %self.name, "submission accepted");
                Submission::Accepted
            }
            Delivery::Remote { target, dispatcher } => {
                let request = DispatchRequest::new(target, self.fields.clone());
                let outcome = dispatcher.dispatch(request);
                Submission::Dispatched(InFlight {
                    ticket: Ticket {
                        controller: self.id,
                        attempt: self.attempts,
                    },
                    outcome,
                })
            }
        }
    }

    /// Apply the outcome of a dispatched attempt.
    ///
    /// Tickets from another controller or an earlier attempt are ignored.
    pub fn complete(&mut self, ticket: Ticket, outcome: DispatchOutcome) -> SubmissionState {
        let current = self.fsm.current_state();
        if ticket.controller != self.id
            || ticket.attempt != self.attempts
            || current != SubmissionState::Sending
        {
            warn!(
                form = %self.name,
                attempt = ticket.attempt,
                state = ?current,
                "ignoring outcome for a stale submission"
            );
            return current;
        }

        match outcome {
            DispatchOutcome::Delivered => {
                self.fsm.send(SubmissionEvent::Delivered);
                self.fields.clear_values();
                info!(form = %self.name, attempt = ticket.attempt, "submission delivered");
            }
            DispatchOutcome::Failed(reason) => {
                self.fsm.send(SubmissionEvent::Failed);
                warn!(form = %self.name, attempt = ticket.attempt, %reason, "submission failed");
            }
        }

        self.fsm.current_state()
    }

    /// Status line shown under the form
    pub fn status_message(&self) -> Option<&str> {
        match self.state() {
            SubmissionState::Success | SubmissionState::Accepted => {
                Some(self.copy.success_message.as_str())
            }
            SubmissionState::Failure => Some(self.copy.failure_message.as_str()),
            SubmissionState::Idle | SubmissionState::Sending => None,
        }
    }

    /// Text of the submit button
    pub fn submit_label(&self) -> &str {
        if self.state() == SubmissionState::Sending {
            self.copy.sending_label.as_str()
        } else {
            self.copy.submit_label.as_str()
        }
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.state() != SubmissionState::Sending
    }
}

impl fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionController")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("fields", &self.fields)
            .field("remote", &self.is_remote())
            .field("attempts", &self.attempts)
            .finish()
    }
}
