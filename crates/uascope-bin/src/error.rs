// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the uascope binary.
//!
//! Only usage errors surface to `main` and exit non-zero. Connection and
//! traversal failures are logged where they occur and the process exits
//! normally, so a partial tree remains valid output.

use thiserror::Error;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the uascope binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// A required flag is missing for the selected mode.
    #[error("{0}")]
    Usage(String),
}

impl BinError {
    /// Creates a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 1,
        }
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error() {
        let err = BinError::usage("--nodeid is required for show-object mode");
        assert_eq!(err.to_string(), "--nodeid is required for show-object mode");
        assert_eq!(err.exit_code(), 1);
    }
}
