//! Blocking HTTP implementation of the model transport seam.
//!
//! Wire contract with the hosted model endpoint: one POST carrying
//! `{"prompt": <instruction>, "stream": false}`, one text body back, no
//! session state. The deadline configured here is the caller-imposed bound
//! the invoker itself deliberately does not define.

use std::time::Duration;

use cloudguard_analysis::{ModelTransport, ModelTransportError};
use serde_json::json;

/// HTTP transport over a pooled blocking client.
pub struct HttpModelTransport {
    client: reqwest::blocking::Client,
}

impl HttpModelTransport {
    /// Builds a transport with the given request deadline.
    ///
    /// # Errors
    /// Returns a message when the underlying client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| format!("http client build failed: {error}"))?;

        Ok(Self { client })
    }
}

impl ModelTransport for HttpModelTransport {
    fn complete(&self, endpoint: &str, instruction: &str) -> Result<String, ModelTransportError> {
        let response = self
            .client
            .post(endpoint)
            .json(&json!({ "prompt": instruction, "stream": false }))
            .send()
            .map_err(|error| {
                if error.is_timeout() {
                    ModelTransportError::Timeout
                } else {
                    ModelTransportError::Connect(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelTransportError::Status(status.as_u16()));
        }

        response
            .text()
            .map_err(|error| ModelTransportError::Connect(error.to_string()))
    }
}
