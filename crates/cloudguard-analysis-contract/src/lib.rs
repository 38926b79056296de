#![warn(missing_docs)]
//! # cloudguard-analysis-contract
//!
//! ## Purpose
//! Defines the analysis request/response schema and its validation entry
//! points.
//!
//! ## Responsibilities
//! - Validate candidate request values before any model invocation.
//! - Validate decoded model replies against the response contract.
//! - Extract the JSON object from replies that wrap it in prose.
//!
//! ## Data flow
//! Caller-assembled JSON value -> [`validate_request`] -> prompt assembly.
//! Raw model reply -> [`parse_analysis_result`] -> [`AnalysisResult`] handed
//! back to the UI layer.
//!
//! ## Ownership and lifetimes
//! Validated values are owned structs to avoid borrowing from transient
//! request or network buffers.
//!
//! ## Error model
//! Structural mismatches return [`ValidationError`] listing every
//! nonconforming field, not just the first. Validation is pure and
//! idempotent; nothing is defaulted or coerced.
//!
//! ## Security and privacy notes
//! Validation errors name fields only; uploaded log text is never echoed
//! into error messages.

use cloudguard_core::{LogFormat, RiskLevel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One validated log-analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Raw uploaded log text, embedded verbatim into the model instruction.
    pub log_data: String,
    /// Declared format of the uploaded file.
    pub file_type: LogFormat,
}

/// One validated model risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Assessed risk level for the submitted log data.
    pub risk_level: RiskLevel,
    /// Anomalies found, in model-reported order; may be empty.
    pub anomalies: Vec<String>,
    /// Free-text summary of the analysis outcome.
    pub summary: String,
}

/// One field that failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Human-readable reason the field did not conform.
    pub reason: String,
}

/// Structural validation failure listing every nonconforming field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// All detected violations, in field order.
    pub violations: Vec<FieldViolation>,
}

impl std::error::Error for ValidationError {}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema validation failed:")?;
        for violation in &self.violations {
            write!(f, " [{}: {}]", violation.field, violation.reason)?;
        }
        Ok(())
    }
}

/// Validates one candidate request value.
///
/// Succeeds only when `logData` is a string and `fileType` equals `"json"`
/// or `"csv"`. `logData` emptiness is enforced by the upload surface before
/// this point and is intentionally not re-checked here.
///
/// # Errors
/// Returns [`ValidationError`] listing every field that did not conform.
pub fn validate_request(candidate: &Value) -> Result<AnalysisRequest, ValidationError> {
    let mut violations = Vec::new();

    let log_data = match candidate.get("logData") {
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            violations.push(FieldViolation {
                field: "logData",
                reason: format!("expected string, got {}", json_kind(other)),
            });
            None
        }
        None => {
            violations.push(FieldViolation {
                field: "logData",
                reason: "field is missing".to_string(),
            });
            None
        }
    };

    let file_type = match candidate.get("fileType") {
        Some(Value::String(label)) => match LogFormat::parse(label) {
            Some(format) => Some(format),
            None => {
                violations.push(FieldViolation {
                    field: "fileType",
                    reason: format!("'{label}' is not one of json, csv"),
                });
                None
            }
        },
        Some(other) => {
            violations.push(FieldViolation {
                field: "fileType",
                reason: format!("expected string, got {}", json_kind(other)),
            });
            None
        }
        None => {
            violations.push(FieldViolation {
                field: "fileType",
                reason: "field is missing".to_string(),
            });
            None
        }
    };

    match (log_data, file_type) {
        (Some(log_data), Some(file_type)) => Ok(AnalysisRequest {
            log_data,
            file_type,
        }),
        _ => Err(ValidationError { violations }),
    }
}

/// Validates one decoded model reply value.
///
/// Succeeds only when `riskLevel` is one of `Low`, `Medium`, `High`,
/// `anomalies` is an array of strings (possibly empty), and `summary` is a
/// string. An out-of-enumeration `riskLevel` is a validation failure, never
/// a silently-accepted default.
///
/// # Errors
/// Returns [`ValidationError`] listing every field that did not conform.
pub fn validate_response(candidate: &Value) -> Result<AnalysisResult, ValidationError> {
    let mut violations = Vec::new();

    let risk_level = match candidate.get("riskLevel") {
        Some(Value::String(label)) => match RiskLevel::parse(label) {
            Some(level) => Some(level),
            None => {
                violations.push(FieldViolation {
                    field: "riskLevel",
                    reason: format!("'{label}' is not one of Low, Medium, High"),
                });
                None
            }
        },
        Some(other) => {
            violations.push(FieldViolation {
                field: "riskLevel",
                reason: format!("expected string, got {}", json_kind(other)),
            });
            None
        }
        None => {
            violations.push(FieldViolation {
                field: "riskLevel",
                reason: "field is missing".to_string(),
            });
            None
        }
    };

    let anomalies = match candidate.get("anomalies") {
        Some(Value::Array(entries)) => {
            let mut collected = Vec::with_capacity(entries.len());
            let mut all_strings = true;
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    Value::String(text) => collected.push(text.clone()),
                    other => {
                        all_strings = false;
                        violations.push(FieldViolation {
                            field: "anomalies",
                            reason: format!(
                                "entry {index} expected string, got {}",
                                json_kind(other)
                            ),
                        });
                    }
                }
            }
            all_strings.then_some(collected)
        }
        Some(other) => {
            violations.push(FieldViolation {
                field: "anomalies",
                reason: format!("expected array of strings, got {}", json_kind(other)),
            });
            None
        }
        None => {
            violations.push(FieldViolation {
                field: "anomalies",
                reason: "field is missing".to_string(),
            });
            None
        }
    };

    let summary = match candidate.get("summary") {
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            violations.push(FieldViolation {
                field: "summary",
                reason: format!("expected string, got {}", json_kind(other)),
            });
            None
        }
        None => {
            violations.push(FieldViolation {
                field: "summary",
                reason: "field is missing".to_string(),
            });
            None
        }
    };

    match (risk_level, anomalies, summary) {
        (Some(risk_level), Some(anomalies), Some(summary)) => Ok(AnalysisResult {
            risk_level,
            anomalies,
            summary,
        }),
        _ => Err(ValidationError { violations }),
    }
}

/// Locates the JSON object embedded in a raw model reply.
///
/// Strict whole-string JSON is preferred. When the model wrapped the object
/// in prose, the first balanced top-level `{...}` region is returned instead.
/// Brace balancing ignores braces inside string literals.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses a raw model reply into a validated [`AnalysisResult`].
///
/// # Errors
/// Returns [`ContractError::NoJsonObject`] when no JSON object can be
/// located in the reply.
/// Returns [`ContractError::Decode`] when the located region is not valid
/// JSON.
/// Returns [`ContractError::Invalid`] when the decoded object violates the
/// response contract.
pub fn parse_analysis_result(raw: &str) -> Result<AnalysisResult, ContractError> {
    let region = extract_json_object(raw).ok_or(ContractError::NoJsonObject)?;
    let decoded: Value = serde_json::from_str(region).map_err(ContractError::Decode)?;
    validate_response(&decoded).map_err(ContractError::Invalid)
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Reply contains no JSON object at all.
    #[error("model reply contains no JSON object")]
    NoJsonObject,
    /// Located region failed to decode as JSON.
    #[error("model reply decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Decoded object violates the response contract.
    #[error("model reply contract violation: {0}")]
    Invalid(#[from] ValidationError),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
