#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! Pushwoosh is a blocking wrapper of the Pushwoosh `createMessage` API in Rust 2021 edition.

use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub use config::{Config, ConfigBuilder, DEFAULT_HOST};
pub use message::{
    build_request, Auth, MessageOptions, MessageRequest, NotificationPayload, PushDescriptor,
    SEND_NOW,
};

use message::Envelope;

mod config;
mod message;

const API_VERSION: &str = "1.3";

/// `status_code` of an accepted request.
pub const STATUS_OK: i64 = 200;

/// Message error.
///
/// A request the service answers with a non-200 `status_code` is not an error,
/// see [`Pushwoosh::create_message`].
#[derive(Error, Debug)]
pub enum MessageError {
    /// Request could not be sent: DNS, connection, TLS or timeout failure.
    #[error("problem with {url}: {source}")]
    Transport {
        /// URL attempted.
        url: String,
        /// Error from [`ureq`] crate.
        source: Box<ureq::Transport>,
    },
    /// Connected, but the response body could not be read.
    #[error("failed to read response from {url}: {source}")]
    Read {
        /// URL attempted.
        url: String,
        /// IO error.
        source: std::io::Error,
    },
    /// Response body is not JSON or lacks `status_code`.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    /// Request payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Configured host is not a valid base URL.
    #[error("invalid host: {0}")]
    Url(#[from] url::ParseError),
}

/// Shorthand function to create messages with default [`MessageOptions`].
/// ```no_run
/// use pushwoosh::{create_message, Config, PushDescriptor};
/// let config = Config::with_token("XXXXX-XXXXX", "token");
/// create_message(config, &[PushDescriptor::new("Hello")]);
/// ```
pub fn create_message(
    config: Config<'_>,
    pushes: &[PushDescriptor<'_>],
) -> Result<bool, MessageError> {
    Pushwoosh::new(config).create_message(pushes, &MessageOptions::default())
}

/// Pushwoosh client.
///
/// Calls block the current thread for one HTTP round trip. Without
/// [`ConfigBuilder::timeout`] a call waits as long as ureq lets it,
/// which is indefinitely for a server that stops sending.
#[derive(Debug)]
pub struct Pushwoosh<'a> {
    config: Config<'a>,
    agent: ureq::Agent,
}

impl<'a> Pushwoosh<'a> {
    /// Creates a [`Pushwoosh`] client.
    ///
    /// ```rust
    /// # use pushwoosh::{Config, Pushwoosh};
    /// let client = Pushwoosh::new(Config::with_token("XXXXX-XXXXX", "token"));
    /// assert_eq!("XXXXX-XXXXX", client.config().application());
    /// ```
    pub fn new(config: Config<'a>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Self {
            config,
            agent: builder.build(),
        }
    }

    /// [`Config`] this client was created with.
    pub fn config(&self) -> &Config<'a> {
        &self.config
    }

    /// `createMessage` URL on the configured host. The host's path, if any, is dropped.
    pub fn endpoint(&self) -> Result<Url, MessageError> {
        let host = Url::parse(self.config.host())?;
        Ok(host.join(&format!("/json/{API_VERSION}/createMessage"))?)
    }

    /// Sends one `createMessage` request and returns the service response as is.
    pub fn send(
        &self,
        pushes: &[PushDescriptor<'_>],
        options: &MessageOptions<'_>,
    ) -> Result<Response, MessageError> {
        let url = self.endpoint()?;
        let request = build_request(&self.config, pushes, options);
        let body = serde_json::to_string(&Envelope { request: &request })
            .map_err(MessageError::Serialize)?;

        debug!(
            "create {} notification(s) via {url}",
            request.notifications.len()
        );
        let response = match self
            .agent
            .post(url.as_str())
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(response) => response,
            // service errors come with a JSON body as well
            Err(ureq::Error::Status(code, response)) => {
                debug!("{url} responded with HTTP {code}");
                response
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(MessageError::Transport {
                    url: url.to_string(),
                    source: Box::new(t),
                })
            }
        };

        let body = response.into_string().map_err(|source| MessageError::Read {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(MessageError::MalformedResponse)
    }

    /// Creates one notification per [`PushDescriptor`].
    ///
    /// Returns `Ok(true)` when Pushwoosh answers with [`STATUS_OK`]. Any other
    /// status is logged as `Could not send push - <status_message>` and
    /// returns `Ok(false)`.
    pub fn create_message(
        &self,
        pushes: &[PushDescriptor<'_>],
        options: &MessageOptions<'_>,
    ) -> Result<bool, MessageError> {
        let response = self.send(pushes, options)?;
        if !response.is_success() {
            error!("Could not send push - {}", response.status_message);
            return Ok(false);
        }
        debug!("message codes: {:?}", response.message_codes());
        Ok(true)
    }
}

/// Pushwoosh API response.
#[derive(Debug, Deserialize, Serialize)]
pub struct Response {
    /// [`STATUS_OK`] when the request was accepted.
    pub status_code: i64,
    /// Human readable status, the reason of a rejection.
    #[serde(default)]
    pub status_message: String,
    /// Method specific payload, `{"Messages": [...]}` for `createMessage`.
    #[serde(default)]
    pub response: Option<Value>,
}

impl Response {
    /// Whether the request was accepted.
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Codes of the created messages, empty unless the service returned them.
    pub fn message_codes(&self) -> Vec<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.get("Messages"))
            .and_then(Value::as_array)
            .map(|codes| codes.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
