#![warn(missing_docs)]
//! # cloudguard-analysis
//!
//! ## Purpose
//! Turns a validated analysis request into a validated risk assessment by
//! delegating to an external generative-model endpoint.
//!
//! ## Responsibilities
//! - Validate model endpoint policy (HTTPS, loopback exception).
//! - Assemble the single natural-language instruction for one request.
//! - Execute the call through an injectable transport abstraction.
//! - Parse and validate the reply before returning it to the caller.
//!
//! ## Data flow
//! Caller JSON value -> request validation -> [`build_instruction`] ->
//! [`ModelTransport`] -> reply parsing/validation -> typed
//! [`AnalysisResult`].
//!
//! ## Ownership and lifetimes
//! The client holds no per-call state; each invocation is stateless
//! start-to-finish, so concurrent invocations share nothing mutable.
//!
//! ## Error model
//! Failures surface as one of three typed outcomes: [`AnalysisError::InvalidInput`]
//! (no network call performed), [`AnalysisError::ServiceUnavailable`]
//! (transport-level failure, caller may retry manually), and
//! [`AnalysisError::MalformedModelOutput`] (reply failed the response
//! contract; raw output retained for diagnostics). No retry, no field
//! defaulting, no placeholder results.
//!
//! ## Security and privacy notes
//! Uploaded log text travels only inside the assembled instruction; it is
//! never copied into error messages or logs by this crate.
//!
//! ## Example
//! ```rust
//! use cloudguard_analysis::validate_model_endpoint;
//!
//! assert!(validate_model_endpoint("https://model.example.test/v1/generate").is_ok());
//! assert!(validate_model_endpoint("http://model.example.test/v1/generate").is_err());
//! ```

use std::sync::Arc;

use cloudguard_analysis_contract::{
    AnalysisRequest, AnalysisResult, ContractError, ValidationError, parse_analysis_result,
    validate_request,
};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Abstract transport used to reach the model endpoint.
///
/// The wire contract is deliberately minimal: one instruction string out,
/// one text blob back, no session state.
pub trait ModelTransport: Send + Sync {
    /// Submits one instruction and returns the raw reply text.
    fn complete(&self, endpoint: &str, instruction: &str) -> Result<String, ModelTransportError>;
}

/// Transport-level failures reported by [`ModelTransport`] implementations.
#[derive(Debug, Error)]
pub enum ModelTransportError {
    /// The call exceeded the transport's own deadline.
    #[error("model call timed out")]
    Timeout,
    /// The endpoint could not be reached.
    #[error("model endpoint unreachable: {0}")]
    Connect(String),
    /// The endpoint answered with a non-success status.
    #[error("model endpoint returned status {0}")]
    Status(u16),
}

/// Caller-facing disposition of one failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Manual retry may succeed without changing the input.
    Retriable,
    /// Retrying the same call will not help.
    Permanent,
}

/// Maps an analysis failure onto retry guidance for the caller.
///
/// Only service-level failures are worth a manual retry; invalid input must
/// be corrected first, and a malformed reply is terminal for that call.
pub fn classify_failure(error: &AnalysisError) -> FailureClass {
    match error {
        AnalysisError::ServiceUnavailable(_) => FailureClass::Retriable,
        AnalysisError::InvalidInput(_)
        | AnalysisError::InvalidEndpoint(_)
        | AnalysisError::MalformedModelOutput { .. } => FailureClass::Permanent,
    }
}

/// Validates model endpoint constraints.
///
/// HTTPS is required; plain HTTP is tolerated only for loopback hosts so a
/// local inference runtime can be targeted during development.
///
/// # Errors
/// Returns [`AnalysisError::InvalidEndpoint`] for unparseable URLs and
/// non-HTTPS remote endpoints.
pub fn validate_model_endpoint(endpoint: &str) -> Result<(), AnalysisError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| AnalysisError::InvalidEndpoint(format!("invalid model url: {error}")))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            let host = parsed.host_str().unwrap_or_default();
            if host == "localhost" || host == "127.0.0.1" || host == "::1" {
                Ok(())
            } else {
                Err(AnalysisError::InvalidEndpoint(
                    "model endpoint must use https for non-loopback hosts".to_string(),
                ))
            }
        }
        other => Err(AnalysisError::InvalidEndpoint(format!(
            "unsupported model endpoint scheme '{other}'"
        ))),
    }
}

/// Assembles the single instruction submitted for one request.
///
/// The instruction states the evaluator role, embeds the declared format and
/// the full log text verbatim, pins the exact three-field JSON reply shape,
/// and lists the risk factors the model must weigh.
pub fn build_instruction(request: &AnalysisRequest) -> String {
    format!(
        "You are a security expert analyzing log data for anomalies and determining the risk level.\n\
         \n\
         You will receive log data in either JSON or CSV format. Your task is to identify any anomalies,\n\
         determine the risk level (Low, Medium, or High), and provide a summary of your analysis.\n\
         \n\
         Log Data ({file_type} format):\n\
         {log_data}\n\
         \n\
         Respond in the following JSON format:\n\
         {{\n\
         \x20 \"riskLevel\": \"The risk level (Low, Medium, or High)\",\n\
         \x20 \"anomalies\": [\"List of anomalies found\"],\n\
         \x20 \"summary\": \"A summary of the analysis\"\n\
         }}\n\
         \n\
         Consider the following factors when determining the risk level and identifying anomalies:\n\
         - Unusual patterns or events\n\
         - Suspicious IP addresses or user accounts\n\
         - Error messages or exceptions\n\
         - Security vulnerabilities\n\
         - Compliance violations",
        file_type = request.file_type,
        log_data = request.log_data,
    )
}

/// Analysis client that validates inputs and executes one model round trip
/// per invocation.
#[derive(Clone)]
pub struct AnalysisClient {
    endpoint: String,
    transport: Arc<dyn ModelTransport>,
}

impl AnalysisClient {
    /// Creates a validated analysis client.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidEndpoint`] when the endpoint violates
    /// policy.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn ModelTransport>,
    ) -> Result<Self, AnalysisError> {
        let endpoint = endpoint.into();
        validate_model_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Runs one analysis round trip.
    ///
    /// The candidate must pass request validation before any network
    /// activity occurs. On success exactly one [`AnalysisResult`] is
    /// returned; nothing is cached across calls, so identical input
    /// re-executes the full round trip.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidInput`] for structural request
    /// failures (zero network calls performed).
    /// Returns [`AnalysisError::ServiceUnavailable`] when the transport
    /// fails; no automatic retry is attempted.
    /// Returns [`AnalysisError::MalformedModelOutput`] when the reply fails
    /// parsing or response validation; the raw reply is carried for
    /// diagnostics.
    pub fn analyze(&self, candidate: &Value) -> Result<AnalysisResult, AnalysisError> {
        let request = validate_request(candidate).map_err(AnalysisError::InvalidInput)?;

        let instruction = build_instruction(&request);
        let reply = self
            .transport
            .complete(&self.endpoint, &instruction)
            .map_err(AnalysisError::ServiceUnavailable)?;

        parse_analysis_result(&reply).map_err(|cause| AnalysisError::MalformedModelOutput {
            raw: reply,
            cause,
        })
    }

    /// Returns the configured model endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Errors produced by the analysis invoker.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Endpoint violates transport security policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Request failed structural validation; the external service was never
    /// reached.
    #[error("invalid analysis input: {0}")]
    InvalidInput(ValidationError),
    /// The external call failed at the transport/service level.
    #[error("analysis service unavailable: {0}")]
    ServiceUnavailable(#[source] ModelTransportError),
    /// The call succeeded but the reply violates the response contract.
    #[error("malformed model output: {cause}")]
    MalformedModelOutput {
        /// Raw reply text, retained for diagnostics only.
        raw: String,
        /// Underlying parse/validation failure.
        #[source]
        cause: ContractError,
    },
}

#[cfg(test)]
mod tests {
    //! Unit tests for endpoint policy and invocation outcomes.

    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct CountingTransport {
        calls: Mutex<u32>,
        reply: Result<String, ()>,
    }

    impl ModelTransport for CountingTransport {
        fn complete(
            &self,
            _endpoint: &str,
            _instruction: &str,
        ) -> Result<String, ModelTransportError> {
            let mut calls = self.calls.lock().expect("call counter lock");
            *calls += 1;
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(ModelTransportError::Timeout),
            }
        }
    }

    #[test]
    fn invalid_input_performs_zero_network_calls() {
        let transport = Arc::new(CountingTransport {
            calls: Mutex::new(0),
            reply: Ok("{}".to_string()),
        });
        let client = AnalysisClient::new("https://model.example.test/generate", transport.clone())
            .expect("client should build");

        let error = client
            .analyze(&json!({ "logData": "x" }))
            .expect_err("missing fileType should be rejected");
        assert!(matches!(error, AnalysisError::InvalidInput(_)));
        assert_eq!(*transport.calls.lock().expect("call counter lock"), 0);
    }

    #[test]
    fn instruction_embeds_format_and_log_text_verbatim() {
        let request = validate_request(&json!({
            "logData": "2024-01-01 ERROR failed login",
            "fileType": "csv"
        }))
        .expect("request should validate");

        let instruction = build_instruction(&request);
        assert!(instruction.contains("Log Data (csv format):"));
        assert!(instruction.contains("2024-01-01 ERROR failed login"));
        assert!(instruction.contains("\"riskLevel\""));
        assert!(instruction.contains("Compliance violations"));
    }

    #[test]
    fn loopback_http_endpoint_is_tolerated() {
        validate_model_endpoint("http://127.0.0.1:11434/api/generate")
            .expect("loopback http should pass");
        assert!(validate_model_endpoint("http://model.example.test/generate").is_err());
    }

    #[test]
    fn transport_failure_classifies_as_retriable() {
        let transport = Arc::new(CountingTransport {
            calls: Mutex::new(0),
            reply: Err(()),
        });
        let client = AnalysisClient::new("https://model.example.test/generate", transport)
            .expect("client should build");

        let error = client
            .analyze(&json!({ "logData": "x", "fileType": "json" }))
            .expect_err("timeout should surface");
        assert!(matches!(error, AnalysisError::ServiceUnavailable(_)));
        assert_eq!(classify_failure(&error), FailureClass::Retriable);
    }
}
