//! EmailJS delivery
//!
//! Sends a form bundle through the EmailJS REST API. The service, template and
//! public key come from the caller's configuration; nothing is built in.
//!
//! ```ignore
//! let dispatcher = EmailJsDispatcher::new(DEFAULT_ENDPOINT, Duration::from_secs(15))?;
//! let form = SubmissionController::remote("contact", schema, target, Arc::new(dispatcher));
//! ```

use std::time::Duration;

use cashcached_core::{
    DispatchFailure, DispatchFuture, DispatchOutcome, DispatchRequest, Dispatcher, FormFields,
};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// EmailJS send endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Response bodies longer than this are cut before they reach logs
const MAX_ERROR_BODY_BYTES: usize = 512;

#[derive(Debug, Error)]
pub enum EmailJsError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("endpoint must be an http(s) URL, got `{0}`")]
    InvalidEndpoint(String),
}

/// JSON body accepted by the send endpoint
#[derive(Debug, Serialize)]
pub struct SendBody<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: &'a FormFields,
}

impl<'a> From<&'a DispatchRequest> for SendBody<'a> {
    fn from(request: &'a DispatchRequest) -> Self {
        Self {
            service_id: &request.service_id,
            template_id: &request.template_id,
            user_id: request.credential.expose(),
            template_params: &request.params,
        }
    }
}

/// [`Dispatcher`] backed by the EmailJS REST API. One POST per attempt, no retries.
///
/// The submission controller itself waits for an outcome indefinitely. The
/// timeout given to [`new`](Self::new) bounds the HTTP exchange only; when it
/// expires the attempt resolves as a transport failure.
#[derive(Clone, Debug)]
pub struct EmailJsDispatcher {
    client: Client,
    endpoint: String,
}

impl EmailJsDispatcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, EmailJsError> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(EmailJsError::InvalidEndpoint(endpoint));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Dispatcher for EmailJsDispatcher {
    fn dispatch(&self, request: DispatchRequest) -> DispatchFuture {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        debug!(
            service = %request.service_id,
            template = %request.template_id,
            "dispatching form through EmailJS"
        );

        Box::pin(async move {
            match send(&client, &endpoint, &request).await {
                Ok(()) => DispatchOutcome::Delivered,
                Err(failure) => {
                    warn!(%failure, "EmailJS delivery failed");
                    DispatchOutcome::Failed(failure)
                }
            }
        })
    }
}

async fn send(
    client: &Client,
    endpoint: &str,
    request: &DispatchRequest,
) -> Result<(), DispatchFailure> {
    let response = client
        .post(endpoint)
        .json(&SendBody::from(request))
        .send()
        .await
        .map_err(|e| DispatchFailure::Transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let mut body = response.text().await.unwrap_or_default();
    truncate_utf8(&mut body, MAX_ERROR_BODY_BYTES);
    Err(DispatchFailure::Rejected {
        status: status.as_u16(),
        body,
    })
}

fn truncate_utf8(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
