// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Parameter Validation
//!
//! Parsers for the string-typed knobs that arrive through claim annotations,
//! storage-class parameters and process defaults.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Bounds-checks directory mode, owner ids and boolean flags

use thiserror::Error;

/// Prefix shared by all claim annotations the provisioner reads
pub const ANNOTATION_PREFIX: &str = "k8s-sigs.io";

/// Claim annotation overriding the directory permission mode (octal)
pub const DIRECTORY_MODE_ANNOTATION: &str = "k8s-sigs.io/nfs-directory-mode";

/// Claim annotation overriding the directory owner uid (decimal)
pub const DIRECTORY_UID_ANNOTATION: &str = "k8s-sigs.io/nfs-directory-uid";

/// Claim annotation overriding the directory owner gid (decimal)
pub const DIRECTORY_GID_ANNOTATION: &str = "k8s-sigs.io/nfs-directory-gid";

/// Mode applied when neither the claim nor the process configures one
pub const DEFAULT_DIRECTORY_MODE: u32 = 0o777;

/// Largest accepted permission mode
pub const MAX_DIRECTORY_MODE: u32 = 0o777;

/// Largest accepted uid/gid
pub const MAX_OWNER_ID: u32 = 65535;

/// Parameter validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("invalid mode {value}: {reason}")]
    InvalidMode { value: String, reason: String },

    #[error("mode must be between 0 and 0777, got {0}")]
    ModeOutOfRange(String),

    #[error("invalid id {value}: {reason}")]
    InvalidId { value: String, reason: String },

    #[error("id must be between 0 and 65535, got {0}")]
    IdOutOfRange(String),

    #[error("invalid boolean {0}")]
    InvalidBool(String),

    #[error("path {0} escapes the volume root")]
    PathTraversal(String),
}

/// Parse an octal permission mode.
///
/// Empty input yields `0777`.
pub fn parse_mode(mode: &str) -> Result<u32, ParameterError> {
    if mode.is_empty() {
        return Ok(DEFAULT_DIRECTORY_MODE);
    }

    let parsed = i64::from_str_radix(mode, 8).map_err(|e| ParameterError::InvalidMode {
        value: mode.to_string(),
        reason: e.to_string(),
    })?;

    if !(0..=i64::from(MAX_DIRECTORY_MODE)).contains(&parsed) {
        return Err(ParameterError::ModeOutOfRange(mode.to_string()));
    }

    Ok(parsed as u32)
}

/// Parse a decimal uid or gid.
///
/// Empty input yields `0` (root).
pub fn parse_id(id: &str) -> Result<u32, ParameterError> {
    if id.is_empty() {
        return Ok(0);
    }

    let parsed: i64 = id.parse().map_err(|e: std::num::ParseIntError| ParameterError::InvalidId {
        value: id.to_string(),
        reason: e.to_string(),
    })?;

    if !(0..=i64::from(MAX_OWNER_ID)).contains(&parsed) {
        return Err(ParameterError::IdOutOfRange(id.to_string()));
    }

    Ok(parsed as u32)
}

/// Parse a boolean flag, accepting the usual spellings of true and false.
pub fn parse_bool(value: &str) -> Result<bool, ParameterError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParameterError::InvalidBool(value.to_string())),
    }
}
