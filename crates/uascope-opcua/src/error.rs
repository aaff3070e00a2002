// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for address-space enumeration.
//!
//! # Error Categories
//!
//! ```text
//! UaError
//! ├── Connection    - Session and endpoint issues (fatal to the run)
//! ├── Browse        - Node metadata and child enumeration failures
//! ├── Operation     - Value read failures
//! └── Configuration - Invalid node IDs and settings
//! ```
//!
//! Every error maps to an explicit [`Recovery`] policy. The tree walker
//! pattern-matches on it to decide whether a failure aborts the run, skips
//! a subtree, or skips a single output field, which keeps the recovery
//! behavior testable instead of being implied by catch scope.
//!
//! # Examples
//!
//! ```
//! use uascope_opcua::error::{BrowseError, Recovery, UaError};
//!
//! let error = UaError::browse(BrowseError::attribute_read("ns=2;i=1", "NodeClass", "timeout"));
//! assert_eq!(error.recovery(), Recovery::SkipSubtree);
//! ```

use std::io;

use thiserror::Error;

/// Result type alias for enumeration operations.
pub type UaResult<T> = Result<T, UaError>;

// =============================================================================
// Recovery
// =============================================================================

/// What the traversal does when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recovery {
    /// The whole run stops (connection-level failures).
    AbortRun,

    /// Only the failing node's subtree is abandoned; siblings continue.
    SkipSubtree,

    /// Only one output field is replaced by a warning or placeholder.
    SkipField,

    /// Reported once, no traversal is performed.
    Report,
}

// =============================================================================
// UaError - Main Error Type
// =============================================================================

/// The main error type for enumeration operations.
#[derive(Debug, Error)]
pub enum UaError {
    /// Connection-related errors.
    #[error("{0}")]
    Connection(#[from] ConnectionError),

    /// Node browsing errors.
    #[error("{0}")]
    Browse(#[from] BrowseError),

    /// Value read errors.
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl UaError {
    /// Creates a connection error.
    #[inline]
    pub fn connection(error: ConnectionError) -> Self {
        Self::Connection(error)
    }

    /// Creates a browse error.
    #[inline]
    pub fn browse(error: BrowseError) -> Self {
        Self::Browse(error)
    }

    /// Creates an operation error.
    #[inline]
    pub fn operation(error: OperationError) -> Self {
        Self::Operation(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    /// Creates a not connected error.
    pub fn not_connected() -> Self {
        Self::Connection(ConnectionError::NotConnected)
    }

    /// Creates a node not found error.
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::Browse(BrowseError::node_not_found(node_id))
    }

    /// Creates a value read failure.
    pub fn read_failed(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Operation(OperationError::read_failed(node_id, reason))
    }

    /// Returns the recovery policy for this error.
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Connection(_) => Recovery::AbortRun,
            Self::Browse(e) => e.recovery(),
            Self::Operation(_) => Recovery::SkipField,
            Self::Configuration(_) => Recovery::Report,
        }
    }

    /// Returns `true` if this error ends the whole run.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.recovery() == Recovery::AbortRun
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Browse(_) => "browse",
            Self::Operation(_) => "operation",
            Self::Configuration(_) => "configuration",
        }
    }
}

// =============================================================================
// ConnectionError
// =============================================================================

/// Connection-related errors. All of these are fatal to the run.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Connection refused by the server.
    #[error("Connection refused to '{endpoint}'")]
    Refused {
        /// Target endpoint.
        endpoint: String,
        /// Underlying error.
        #[source]
        source: Option<io::Error>,
    },

    /// The endpoint URL is invalid or unreachable.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Target endpoint.
        endpoint: String,
        /// Why the endpoint was rejected.
        reason: String,
    },

    /// The server offered no endpoint matching the configured security mode.
    #[error("No suitable endpoint found: {detail}")]
    NoSuitableEndpoint {
        /// Security settings that could not be matched.
        detail: String,
    },

    /// An operation was attempted without an active session.
    #[error("Not connected to server")]
    NotConnected,
}

impl ConnectionError {
    /// Creates a connection refused error.
    pub fn refused(endpoint: impl Into<String>) -> Self {
        Self::Refused {
            endpoint: endpoint.into(),
            source: None,
        }
    }

    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Creates a no suitable endpoint error.
    pub fn no_suitable_endpoint(detail: impl Into<String>) -> Self {
        Self::NoSuitableEndpoint {
            detail: detail.into(),
        }
    }
}

// =============================================================================
// BrowseError
// =============================================================================

/// Node browsing errors.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// A node attribute (class, browse name, identifier) could not be read.
    #[error("Could not read {attribute} of node '{node_id}': {reason}")]
    AttributeRead {
        /// The node whose attribute failed.
        node_id: String,
        /// Which attribute was requested.
        attribute: String,
        /// Failure detail.
        reason: String,
    },

    /// The children of a node could not be enumerated.
    #[error("Could not enumerate children of node '{node_id}': {reason}")]
    ChildrenUnavailable {
        /// The node whose children failed.
        node_id: String,
        /// Failure detail.
        reason: String,
    },

    /// The methods of a node could not be enumerated.
    #[error("Could not enumerate methods of node '{node_id}': {reason}")]
    MethodsUnavailable {
        /// The node whose methods failed.
        node_id: String,
        /// Failure detail.
        reason: String,
    },

    /// The node does not exist on the server.
    #[error("Node '{node_id}' not found")]
    NodeNotFound {
        /// The missing node.
        node_id: String,
    },

    /// A show-object target resolved neither as identifier nor as name.
    #[error("Object '{target}' not found")]
    TargetNotFound {
        /// The requested identifier or name.
        target: String,
    },
}

impl BrowseError {
    /// Creates an attribute read error.
    pub fn attribute_read(
        node_id: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AttributeRead {
            node_id: node_id.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Creates a children enumeration error.
    pub fn children_unavailable(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ChildrenUnavailable {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a method enumeration error.
    pub fn methods_unavailable(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MethodsUnavailable {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a node not found error.
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    /// Creates a target not found error.
    pub fn target_not_found(target: impl Into<String>) -> Self {
        Self::TargetNotFound {
            target: target.into(),
        }
    }

    /// Returns the recovery policy for this browse error.
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::AttributeRead { .. } | Self::NodeNotFound { .. } => Recovery::SkipSubtree,
            Self::ChildrenUnavailable { .. } | Self::MethodsUnavailable { .. } => {
                Recovery::SkipField
            }
            Self::TargetNotFound { .. } => Recovery::Report,
        }
    }
}

// =============================================================================
// OperationError
// =============================================================================

/// Value read errors. Recovered by replacing one output field.
#[derive(Debug, Error)]
pub enum OperationError {
    /// A Variable's current value could not be read.
    #[error("Read failed for node '{node_id}': {reason}")]
    ReadFailed {
        /// The node whose value failed.
        node_id: String,
        /// Failure detail.
        reason: String,
    },

    /// The server returned a bad status code for a read.
    #[error("Bad status {status_code:#010x} reading node '{node_id}'")]
    BadStatus {
        /// The node whose read returned the status.
        node_id: String,
        /// The raw OPC UA status code.
        status_code: u32,
    },
}

impl OperationError {
    /// Creates a read failed error.
    pub fn read_failed(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a bad status error.
    pub fn bad_status(node_id: impl Into<String>, status_code: u32) -> Self {
        Self::BadStatus {
            node_id: node_id.into(),
            status_code,
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A node ID string could not be parsed.
    #[error("Invalid node ID '{input}': {reason}")]
    InvalidNodeId {
        /// The offending input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The endpoint setting is invalid.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The offending endpoint.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid node ID error.
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_policy() {
        assert_eq!(
            UaError::connection(ConnectionError::refused("opc.tcp://x:4840")).recovery(),
            Recovery::AbortRun
        );
        assert_eq!(
            UaError::browse(BrowseError::attribute_read("i=85", "BrowseName", "timeout"))
                .recovery(),
            Recovery::SkipSubtree
        );
        assert_eq!(
            UaError::node_not_found("ns=2;i=99").recovery(),
            Recovery::SkipSubtree
        );
        assert_eq!(
            UaError::read_failed("ns=2;i=1", "bad status").recovery(),
            Recovery::SkipField
        );
        assert_eq!(
            UaError::browse(BrowseError::target_not_found("Boiler")).recovery(),
            Recovery::Report
        );
    }

    #[test]
    fn test_fatality() {
        assert!(UaError::not_connected().is_fatal());
        assert!(!UaError::read_failed("i=1", "oops").is_fatal());
    }

    #[test]
    fn test_display() {
        let err = UaError::browse(BrowseError::target_not_found("DoesNotExist"));
        assert_eq!(err.to_string(), "Object 'DoesNotExist' not found");

        let err = UaError::read_failed("ns=2;s=Temp", "Bad_AttributeIdInvalid");
        assert_eq!(
            err.to_string(),
            "Read failed for node 'ns=2;s=Temp': Bad_AttributeIdInvalid"
        );
    }

    #[test]
    fn test_category() {
        assert_eq!(UaError::not_connected().category(), "connection");
        assert_eq!(UaError::node_not_found("i=1").category(), "browse");
        assert_eq!(UaError::read_failed("i=1", "x").category(), "operation");
    }
}
