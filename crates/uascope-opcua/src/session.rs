// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session abstraction over the external OPC UA client library.
//!
//! The enumerator never touches the wire itself. Everything it needs from a
//! server is expressed by the [`UaSession`] trait: connect/disconnect plus a
//! handful of per-node attribute reads and reference enumerations. The tree
//! walker awaits these strictly sequentially, so a session implementation
//! sees at most one in-flight request at any time.

use async_trait::async_trait;

use crate::error::UaResult;
use crate::types::{AccessLevel, NodeClass, NodeId, QualifiedName, UaValue};

// =============================================================================
// UaSession Trait
// =============================================================================

/// Abstract interface to an OPC UA server session.
///
/// Implementations own the session lifecycle and all protocol details.
/// Nodes are identified purely by [`NodeId`]; the trait exposes exactly the
/// attribute reads the enumerator consumes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The enumerator itself issues
/// requests from a single task, one at a time.
#[async_trait]
pub trait UaSession: Send + Sync {
    /// Establishes the connection and activates the session.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the server is unreachable or no
    /// endpoint matches the configured security settings. Connection
    /// failures are fatal to the run.
    async fn connect(&mut self) -> UaResult<()>;

    /// Closes the session and releases the connection.
    ///
    /// Called unconditionally on every exit path, including after
    /// traversal errors.
    async fn disconnect(&mut self) -> UaResult<()>;

    /// Returns the server endpoint URL.
    fn endpoint(&self) -> &str;

    /// Reads the node class of a node.
    ///
    /// `Ok(None)` means the node exists but the server reported a class
    /// value outside the standard set; such nodes are still printed, with
    /// an `Unknown` class label.
    async fn node_class(&self, node: &NodeId) -> UaResult<Option<NodeClass>>;

    /// Reads the browse name of a node.
    ///
    /// Also used to probe whether a parsed identifier denotes an existing
    /// node when resolving a show-object target.
    async fn browse_name(&self, node: &NodeId) -> UaResult<QualifiedName>;

    /// Reads the localized display name of a node.
    ///
    /// Used to render data-type nodes by name.
    async fn display_name(&self, node: &NodeId) -> UaResult<String>;

    /// Enumerates the structural (non-method) hierarchical children of a
    /// node, in server order.
    async fn children(&self, node: &NodeId) -> UaResult<Vec<NodeId>>;

    /// Enumerates the method children of a node, in server order.
    async fn methods(&self, node: &NodeId) -> UaResult<Vec<NodeId>>;

    /// Reads the access level of a Variable node.
    async fn access_level(&self, node: &NodeId) -> UaResult<AccessLevel>;

    /// Reads the data-type reference of a Variable node.
    async fn data_type(&self, node: &NodeId) -> UaResult<NodeId>;

    /// Reads the current value of a Variable node.
    async fn read_value(&self, node: &NodeId) -> UaResult<UaValue>;
}
