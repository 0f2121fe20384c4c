//! Stable error codes and the process-wide error catalog.
//!
//! Every [`crate::TutorlinkError`] maps to an [`ErrorCode`]. The catalog maps
//! each code to the message, remediation hint and HTTP status a boundary layer
//! would report for it.
//!
//! | Code                  | HTTP | Meaning                                         |
//! |-----------------------|------|-------------------------------------------------|
//! | `MISSING_ARGUMENTS`   | 400  | A required argument was absent or blank         |
//! | `SAME_PARTY`          | 400  | Requester and provider are the same user        |
//! | `NOT_FOUND`           | 404  | A user or relationship does not exist           |
//! | `ROLE_MISMATCH`       | 403  | The target user is not a provider               |
//! | `SUBJECT_NOT_OFFERED` | 422  | A requested subject is not offered              |
//! | `CAPACITY_EXCEEDED`   | 409  | The provider is at its capacity limit           |
//! | `DUPLICATE_REQUEST`   | 409  | The identical request already exists            |
//! | `PARTIAL_FAILURE`     | 207  | Some items of a bulk operation failed           |
//! | `STORAGE_FAILURE`     | 503  | The store could not complete the operation      |
//! | `CONFIGURATION_ERROR` | 500  | The engine is misconfigured                     |
//! | `INTERNAL_FAULT`      | 500  | Unexpected internal fault                       |

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Machine-readable error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingArguments,
    SameParty,
    NotFound,
    RoleMismatch,
    SubjectNotOffered,
    CapacityExceeded,
    DuplicateRequest,
    PartialFailure,
    StorageFailure,
    ConfigurationError,
    InternalFault,
}

impl ErrorCode {
    /// Every code in the catalog
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::MissingArguments,
        ErrorCode::SameParty,
        ErrorCode::NotFound,
        ErrorCode::RoleMismatch,
        ErrorCode::SubjectNotOffered,
        ErrorCode::CapacityExceeded,
        ErrorCode::DuplicateRequest,
        ErrorCode::PartialFailure,
        ErrorCode::StorageFailure,
        ErrorCode::ConfigurationError,
        ErrorCode::InternalFault,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingArguments => "MISSING_ARGUMENTS",
            Self::SameParty => "SAME_PARTY",
            Self::NotFound => "NOT_FOUND",
            Self::RoleMismatch => "ROLE_MISMATCH",
            Self::SubjectNotOffered => "SUBJECT_NOT_OFFERED",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::DuplicateRequest => "DUPLICATE_REQUEST",
            Self::PartialFailure => "PARTIAL_FAILURE",
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::InternalFault => "INTERNAL_FAULT",
        }
    }

    /// Catalog entry for this code
    pub fn metadata(self) -> &'static ErrorMetadata {
        resolve(self.as_str())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown error code: {}", s))
    }
}

/// Catalog entry describing how an error code is reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMetadata {
    pub code: ErrorCode,
    pub message: &'static str,
    pub remediation: &'static str,
    pub http_status: u16,
}

fn entry(
    code: ErrorCode,
    http_status: u16,
    message: &'static str,
    remediation: &'static str,
) -> (&'static str, ErrorMetadata) {
    (
        code.as_str(),
        ErrorMetadata {
            code,
            message,
            remediation,
            http_status,
        },
    )
}

lazy_static! {
    static ref CATALOG: HashMap<&'static str, ErrorMetadata> = HashMap::from([
        entry(
            ErrorCode::MissingArguments,
            400,
            "A required argument is missing or blank",
            "Supply every required field and a non-empty reason where one is asked for.",
        ),
        entry(
            ErrorCode::SameParty,
            400,
            "A user cannot request a relationship with themselves",
            "Choose a different provider.",
        ),
        entry(
            ErrorCode::NotFound,
            404,
            "The user or relationship does not exist",
            "Check the id. The relationship may already have been rejected, removed or expired.",
        ),
        entry(
            ErrorCode::RoleMismatch,
            403,
            "The target user does not accept relationship requests",
            "Send the request to a user with the provider role.",
        ),
        entry(
            ErrorCode::SubjectNotOffered,
            422,
            "A requested subject is not offered by the provider",
            "Limit the request to subjects the provider offers.",
        ),
        entry(
            ErrorCode::CapacityExceeded,
            409,
            "The provider has no free capacity",
            "Wait for the provider to free a slot or choose another provider.",
        ),
        entry(
            ErrorCode::DuplicateRequest,
            409,
            "An identical request already exists",
            "Wait for the provider to respond, or change the requested subjects.",
        ),
        entry(
            ErrorCode::PartialFailure,
            207,
            "Some relationships could not be removed",
            "Inspect the failed ids and retry the removal for those relationships.",
        ),
        entry(
            ErrorCode::StorageFailure,
            503,
            "The store could not complete the operation",
            "Check the storage backend and retry.",
        ),
        entry(
            ErrorCode::ConfigurationError,
            500,
            "The engine is misconfigured",
            "Fix the configuration value and restart.",
        ),
        entry(
            ErrorCode::InternalFault,
            500,
            "An unexpected internal fault occurred",
            "Collect the logs around the failure and report it.",
        ),
    ]);
}

/// Look up a code in the catalog
pub fn lookup(code: &str) -> Option<&'static ErrorMetadata> {
    CATALOG.get(code)
}

/// Look up a code, falling back to the internal-fault entry for unknown codes
pub fn resolve(code: &str) -> &'static ErrorMetadata {
    match CATALOG.get(code) {
        Some(metadata) => metadata,
        None => {
            tracing::warn!(code, "Unknown error code, reporting as internal fault");
            &CATALOG[ErrorCode::InternalFault.as_str()]
        }
    }
}
