#![warn(missing_docs)]
//! # cloudguard-core
//!
//! ## Purpose
//! Defines the pure data model used across the `cloudguard` workspace.
//!
//! ## Responsibilities
//! - Represent risk levels and recognized log formats.
//! - Represent alert records keyed by an owning user.
//! - Encode/decode alert records for transport to the hosted document store.
//!
//! ## Data flow
//! Analysis results are projected into [`AlertDraft`] values, validated into
//! [`Alert`] records, and handed to the alert store for persistence and
//! live-query fan-out.
//!
//! ## Ownership and lifetimes
//! Alerts own their backing strings (`String`) to avoid hidden borrow/lifetime
//! coupling between the analysis pipeline and store subscribers.
//!
//! ## Error model
//! Validation failures (blank owner, blank description) return [`CoreError`]
//! variants with caller-actionable categorization.
//!
//! ## Security and privacy notes
//! This crate treats user identifiers as opaque values and never transforms
//! them. Raw uploaded log text never enters alert records.
//!
//! ## Example
//! ```rust
//! use cloudguard_core::{Alert, RiskLevel};
//!
//! let alert = Alert::new("alert-1", "uid-1", RiskLevel::High, "Brute force", 1_000).unwrap();
//! assert_eq!(alert.risk_level, RiskLevel::High);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical schema tag for v1 analysis payloads.
pub const SCHEMA_VERSION_V1: &str = "v1";

/// Ordinal risk category assessed for uploaded log data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// No concerning activity.
    Low,
    /// Irregularities that warrant attention.
    Medium,
    /// Active or likely compromise indicators.
    High,
}

impl RiskLevel {
    /// Returns ordering priority, higher means more severe.
    pub fn priority(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    /// Returns the wire/display label for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Parses a wire label into a risk level.
    ///
    /// Any value outside the three-member enumeration is rejected, never
    /// mapped to a default.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized uploaded log file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON log payload.
    Json,
    /// CSV log payload.
    Csv,
}

impl LogFormat {
    /// Returns the wire label (`json` / `csv`).
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Csv => "csv",
        }
    }

    /// Parses a wire label into a log format.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "json" => Some(LogFormat::Json),
            "csv" => Some(LogFormat::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated alert fields produced by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    /// Owning user identifier.
    pub owner_uid: String,
    /// Assessed severity.
    pub risk_level: RiskLevel,
    /// Human-readable alert description.
    pub description: String,
    /// Creation time in Unix epoch milliseconds.
    pub timestamp_ms: u64,
}

/// One persisted security alert record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Store-assigned record identifier.
    pub id: String,
    /// Owning user identifier used for range queries.
    pub owner_uid: String,
    /// Assessed severity.
    pub risk_level: RiskLevel,
    /// Human-readable alert description.
    pub description: String,
    /// Creation time in Unix epoch milliseconds.
    pub timestamp_ms: u64,
}

impl Alert {
    /// Constructs a validated alert record.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidOwner`] when the owner uid is blank.
    /// Returns [`CoreError::InvalidDescription`] when the description is blank.
    pub fn new(
        id: impl Into<String>,
        owner_uid: impl Into<String>,
        risk_level: RiskLevel,
        description: impl Into<String>,
        timestamp_ms: u64,
    ) -> Result<Self, CoreError> {
        let owner_uid = owner_uid.into();
        if owner_uid.trim().is_empty() {
            return Err(CoreError::InvalidOwner);
        }

        let description = description.into();
        if description.trim().is_empty() {
            return Err(CoreError::InvalidDescription);
        }

        Ok(Self {
            id: id.into(),
            owner_uid,
            risk_level,
            description,
            timestamp_ms,
        })
    }

    /// Serializes the alert to compact JSON bytes for store transport.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }

    /// Deserializes an alert from JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON decoding fails.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }
}

/// Sorts alerts newest-first, the canonical feed order.
///
/// Ties on timestamp fall back to record id so repeated sorts of the same
/// snapshot are stable.
pub fn sort_newest_first(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.timestamp_ms
            .cmp(&a.timestamp_ms)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Error type for core domain validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Owner uid cannot be blank.
    #[error("alert owner uid is empty")]
    InvalidOwner,
    /// Description cannot be blank.
    #[error("alert description is empty")]
    InvalidDescription,
    /// JSON encoding/decoding error.
    #[error("alert codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
