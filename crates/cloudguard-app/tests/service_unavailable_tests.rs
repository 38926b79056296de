//! Integration tests for transport-level failure propagation.

mod common;

use cloudguard_analysis::{AnalysisError, FailureClass, classify_failure};
use serde_json::json;

#[test]
fn service_unavailable_tests_surface_transport_failures_without_partial_results() {
    let transport = common::ScriptedTransport::timing_out();
    let client = common::fixture_client(transport.clone());

    let error = client
        .analyze(&json!({ "logData": "entry", "fileType": "csv" }))
        .expect_err("transport failure should surface");

    assert!(matches!(error, AnalysisError::ServiceUnavailable(_)));
    assert_eq!(classify_failure(&error), FailureClass::Retriable);
    // Exactly one attempt: the invoker never retries on its own.
    assert_eq!(transport.call_count(), 1);
}
