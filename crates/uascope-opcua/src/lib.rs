// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA address-space enumeration for the uascope tool.
//!
//! This crate provides everything the `uascope` binary needs to walk a
//! server's address space: the node/value type vocabulary, an error
//! hierarchy with explicit recovery policies, the abstract session trait
//! delegating protocol work to an external client library, the browse
//! engine (tree walker, node formatter, access classifier, mode selector),
//! and a real session implementation behind the `real-transport` feature.
//!
//! # Error Handling
//!
//! ```text
//! UaError
//! ├── Connection    - Session and endpoint issues (fatal to the run)
//! ├── Browse        - Node metadata and child enumeration failures
//! ├── Operation     - Value read failures
//! └── Configuration - Invalid node IDs and settings
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use uascope_opcua::{run_browse, BrowseRequest, RealSession, SessionConfig, TracingSink};
//! use uascope_opcua::session::UaSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::builder()
//!         .endpoint("opc.tcp://localhost:4840")
//!         .build()?;
//!
//!     let mut session = RealSession::new(config);
//!     session.connect().await?;
//!
//!     let mut sink = TracingSink;
//!     run_browse(&session, &mut sink, &BrowseRequest::FullTree).await?;
//!
//!     session.disconnect().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod browse;
pub mod error;
pub mod session;
pub mod types;

#[cfg(feature = "real-transport")]
pub mod real;

// Re-export commonly used types
pub use error::{
    BrowseError, ConfigurationError, ConnectionError, OperationError, Recovery, UaError, UaResult,
};

pub use types::{
    AccessFlag, AccessLabel, AccessLevel, NodeClass, NodeId, NodeIdentifier, QualifiedName,
    SecurityMode, SessionConfig, SessionConfigBuilder, UaValue,
};

pub use session::UaSession;

pub use browse::{
    resolve_type_name, run_browse, BrowseRequest, BrowseSink, NodeDescriptor, TracingSink,
    TreeWalker, VariableFacts,
};

#[cfg(feature = "real-transport")]
pub use real::RealSession;
