#![warn(missing_docs)]
//! # cloudguard-ingest
//!
//! ## Purpose
//! Implements the file upload surface that gates what reaches the analysis
//! invoker.
//!
//! ## Responsibilities
//! - Enforce the upload size ceiling and recognized media types.
//! - Decode uploaded bytes into text and resolve the declared log format.
//! - Attach a content digest for traceability in run logs.
//!
//! ## Data flow
//! Picked file (name, declared media type, bytes) -> [`stage_upload`] ->
//! [`StagedUpload`] consumed by request assembly.
//!
//! ## Ownership and lifetimes
//! Staged uploads own their decoded text so the picker buffer can be
//! released immediately.
//!
//! ## Error model
//! Oversized, unsupported, empty, or non-UTF-8 uploads fail with
//! [`IngestError`] before any network activity.
//!
//! ## Security and privacy notes
//! Only the digest and byte count of an upload are log-safe; the decoded
//! text itself must never be written to run logs.

use cloudguard_core::LogFormat;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Upload size ceiling in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5_000_000;

/// Declared media types recognized by the upload surface.
pub const SUPPORTED_MEDIA_TYPES: [&str; 2] = ["application/json", "text/csv"];

/// One upload accepted by the surface and ready for request assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    /// Original file name, for result labeling only.
    pub file_name: String,
    /// Resolved log format.
    pub format: LogFormat,
    /// Decoded UTF-8 log text.
    pub log_data: String,
    /// Hex SHA-256 digest of the raw bytes.
    pub content_digest: String,
    /// Raw upload size in bytes.
    pub byte_len: usize,
}

/// Resolves the log format from a declared media type.
pub fn format_for_media_type(media_type: &str) -> Option<LogFormat> {
    match media_type {
        "application/json" => Some(LogFormat::Json),
        "text/csv" => Some(LogFormat::Csv),
        _ => None,
    }
}

/// Resolves the log format from a file extension.
///
/// Fallback for pickers that report no media type; matching is
/// case-insensitive.
pub fn format_for_extension(file_name: &str) -> Option<LogFormat> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "json" => Some(LogFormat::Json),
        "csv" => Some(LogFormat::Csv),
        _ => None,
    }
}

/// Validates and stages one uploaded file.
///
/// Every rejection here happens before the analysis invoker is reached; the
/// staged text is guaranteed non-empty, so request validation does not
/// re-check it.
///
/// # Errors
/// Returns [`IngestError::Oversized`] above [`MAX_UPLOAD_BYTES`].
/// Returns [`IngestError::UnsupportedMediaType`] for declared types outside
/// [`SUPPORTED_MEDIA_TYPES`] (with extension fallback for empty
/// declarations).
/// Returns [`IngestError::Empty`] for zero-length or whitespace-only files.
/// Returns [`IngestError::InvalidEncoding`] for non-UTF-8 content.
pub fn stage_upload(
    file_name: &str,
    declared_media_type: &str,
    bytes: Vec<u8>,
) -> Result<StagedUpload, IngestError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(IngestError::Oversized {
            max: MAX_UPLOAD_BYTES,
            actual: bytes.len(),
        });
    }

    let format = if declared_media_type.is_empty() {
        format_for_extension(file_name)
    } else {
        format_for_media_type(declared_media_type)
    }
    .ok_or_else(|| IngestError::UnsupportedMediaType(declared_media_type.to_string()))?;

    let byte_len = bytes.len();
    let content_digest = {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    };

    let log_data = String::from_utf8(bytes).map_err(|_| IngestError::InvalidEncoding)?;
    if log_data.trim().is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(StagedUpload {
        file_name: file_name.to_string(),
        format,
        log_data,
        content_digest,
        byte_len,
    })
}

/// Upload surface error type.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Upload exceeds the size ceiling.
    #[error("upload is {actual} bytes; ceiling is {max}")]
    Oversized {
        /// Configured ceiling.
        max: usize,
        /// Actual upload size.
        actual: usize,
    },
    /// Declared media type is not recognized.
    #[error("unsupported media type '{0}'; only .json and .csv files are supported")]
    UnsupportedMediaType(String),
    /// Upload contains no usable text.
    #[error("uploaded file is empty")]
    Empty,
    /// Upload is not valid UTF-8 text.
    #[error("uploaded file is not valid UTF-8 text")]
    InvalidEncoding,
}

#[cfg(test)]
mod tests {
    //! Unit tests for the upload gate.

    use super::*;

    #[test]
    fn stages_csv_upload_with_digest() {
        let staged = stage_upload("access.csv", "text/csv", b"a,b,c\n1,2,3\n".to_vec())
            .expect("upload should stage");

        assert_eq!(staged.format, LogFormat::Csv);
        assert_eq!(staged.byte_len, 12);
        assert_eq!(staged.content_digest.len(), 64);
    }

    #[test]
    fn rejects_oversized_uploads_before_decoding() {
        let error = stage_upload("big.json", "application/json", vec![b'x'; MAX_UPLOAD_BYTES + 1])
            .expect_err("oversized upload should be rejected");
        assert!(matches!(error, IngestError::Oversized { .. }));
    }

    #[test]
    fn unknown_media_type_falls_back_to_extension_only_when_blank() {
        assert!(stage_upload("notes.txt", "text/plain", b"data".to_vec()).is_err());

        let staged =
            stage_upload("events.JSON", "", b"{}".to_vec()).expect("extension fallback should work");
        assert_eq!(staged.format, LogFormat::Json);
    }

    #[test]
    fn whitespace_only_uploads_are_empty() {
        let error = stage_upload("blank.csv", "text/csv", b"  \n  ".to_vec())
            .expect_err("blank upload should be rejected");
        assert!(matches!(error, IngestError::Empty));
    }
}
