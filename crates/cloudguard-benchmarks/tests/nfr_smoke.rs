//! Benchmark smoke test for the deterministic validate/assemble/parse loop.

use std::time::Instant;

use cloudguard_analysis::build_instruction;
use cloudguard_analysis_contract::{parse_analysis_result, validate_request};
use serde_json::json;

#[test]
fn benchmark_contract_loop_prints_latency() {
    let candidate = json!({
        "logData": "2024-01-01 ERROR failed login from 10.0.0.5\n".repeat(200),
        "fileType": "csv"
    });
    let reply = r#"{"riskLevel":"Medium","anomalies":["repeated failed logins"],"summary":"Suspicious login churn."}"#;

    let start = Instant::now();
    let mut instruction_lengths = 0usize;

    for _ in 0..100 {
        let request = validate_request(&candidate).expect("request should validate");
        instruction_lengths += build_instruction(&request).len();
        let result = parse_analysis_result(reply).expect("reply should parse");
        assert_eq!(result.anomalies.len(), 1);
    }

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_contract_loop_elapsed_ms={elapsed_ms}");
    println!("benchmark_instruction_total_len={instruction_lengths}");

    // This is a lightweight guardrail; strict NFR checks are environment-specific.
    assert!(
        elapsed_ms < 5_000,
        "contract loop smoke benchmark should stay bounded"
    );
}
