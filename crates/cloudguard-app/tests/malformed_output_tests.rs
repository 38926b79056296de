//! Integration tests for malformed model reply handling.

mod common;

use cloudguard_analysis::{AnalysisError, FailureClass, classify_failure};
use serde_json::json;

#[test]
fn malformed_output_tests_attach_raw_non_json_reply() {
    let transport = common::ScriptedTransport::replying("I cannot analyze this.");
    let client = common::fixture_client(transport);

    let error = client
        .analyze(&json!({ "logData": "entry", "fileType": "csv" }))
        .expect_err("non-JSON reply should fail");

    match &error {
        AnalysisError::MalformedModelOutput { raw, .. } => {
            assert_eq!(raw, "I cannot analyze this.");
        }
        other => panic!("expected MalformedModelOutput, got {other:?}"),
    }
    assert_eq!(classify_failure(&error), FailureClass::Permanent);
}

#[test]
fn malformed_output_tests_reject_out_of_enumeration_risk_level() {
    let transport = common::ScriptedTransport::replying(
        r#"{"riskLevel":"Critical","anomalies":["well formed"],"summary":"well formed"}"#,
    );
    let client = common::fixture_client(transport);

    let error = client
        .analyze(&json!({ "logData": "entry", "fileType": "json" }))
        .expect_err("unknown risk level should fail validation");
    assert!(matches!(error, AnalysisError::MalformedModelOutput { .. }));
}

#[test]
fn malformed_output_tests_tolerate_prose_around_the_object() {
    let transport = common::ScriptedTransport::replying(
        "Here is my assessment:\n{\"riskLevel\":\"Low\",\"anomalies\":[],\"summary\":\"Quiet logs.\"}\nLet me know if you need more.",
    );
    let client = common::fixture_client(transport);

    let result = client
        .analyze(&json!({ "logData": "entry", "fileType": "json" }))
        .expect("embedded object should be extracted");
    assert!(result.anomalies.is_empty());
    assert_eq!(result.summary, "Quiet logs.");
}
