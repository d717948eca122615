//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StoreError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StoreError(StoreError::NotFound(subject)) => {
            format!("Error: not found: {}", subject)
        }
        ApiError::StoreError(StoreError::AccessDenied(subject)) => {
            format!("Error: access denied: {}", subject)
        }
        ApiError::StoreError(StoreError::NotEmpty(subject)) => {
            format!(
                "Error: {} has subkeys; delete them first",
                subject
            )
        }
        ApiError::StoreError(other) => format!("Error ({}): {}", other.kind(), other),
        other => format!("Error: {}", other),
    }
}
