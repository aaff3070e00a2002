// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock implementations for testing the browse engine in isolation.
//!
//! ## Design Principles
//!
//! - Configurable per-node failure injection
//! - Recording of emitted output for verification
//! - Thread-safe, usable from async tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use uascope_opcua::error::{BrowseError, ConnectionError, OperationError, UaError, UaResult};
use uascope_opcua::types::{AccessLevel, NodeClass, NodeId, QualifiedName, UaValue};
use uascope_opcua::{BrowseSink, UaSession};

// =============================================================================
// MockNodeSpec
// =============================================================================

/// One node of a mock address space.
#[derive(Debug, Clone)]
pub struct MockNodeSpec {
    /// Node class; `None` simulates an unrecognized class value.
    pub node_class: Option<NodeClass>,

    /// Browse name.
    pub browse_name: QualifiedName,

    /// Display name (used when the node serves as a data type).
    pub display_name: String,

    /// Structural children, in enumeration order.
    pub children: Vec<NodeId>,

    /// Method children, in enumeration order.
    pub methods: Vec<NodeId>,

    /// Access level, for Variable nodes.
    pub access_level: Option<AccessLevel>,

    /// Data-type reference, for Variable nodes.
    pub data_type: Option<NodeId>,

    /// Current value, for Variable nodes.
    pub value: Option<UaValue>,
}

impl MockNodeSpec {
    /// Creates an Object node.
    pub fn object(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            node_class: Some(NodeClass::Object),
            browse_name: QualifiedName::standard(&name),
            display_name: name,
            children: Vec::new(),
            methods: Vec::new(),
            access_level: None,
            data_type: None,
            value: None,
        }
    }

    /// Creates a Variable node.
    pub fn variable(
        name: impl Into<String>,
        data_type: NodeId,
        access_level: AccessLevel,
        value: UaValue,
    ) -> Self {
        let name = name.into();
        Self {
            node_class: Some(NodeClass::Variable),
            browse_name: QualifiedName::standard(&name),
            display_name: name,
            children: Vec::new(),
            methods: Vec::new(),
            access_level: Some(access_level),
            data_type: Some(data_type),
            value: Some(value),
        }
    }

    /// Creates a Method node.
    pub fn method(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            node_class: Some(NodeClass::Method),
            browse_name: QualifiedName::standard(&name),
            display_name: name,
            children: Vec::new(),
            methods: Vec::new(),
            access_level: None,
            data_type: None,
            value: None,
        }
    }

    /// Creates a DataType node with the given display name.
    pub fn data_type_node(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            node_class: Some(NodeClass::DataType),
            browse_name: QualifiedName::standard(&name),
            display_name: name,
            children: Vec::new(),
            methods: Vec::new(),
            access_level: None,
            data_type: None,
            value: None,
        }
    }

    /// Sets the structural children.
    pub fn with_children(mut self, children: Vec<NodeId>) -> Self {
        self.children = children;
        self
    }

    /// Sets the method children.
    pub fn with_methods(mut self, methods: Vec<NodeId>) -> Self {
        self.methods = methods;
        self
    }

    /// Clears the node class, simulating an unrecognized class value.
    pub fn with_unknown_class(mut self) -> Self {
        self.node_class = None;
        self
    }

    /// Clears the access level, so access reads fail.
    pub fn without_access_level(mut self) -> Self {
        self.access_level = None;
        self
    }
}

// =============================================================================
// MockSession
// =============================================================================

/// A configurable in-memory session for testing.
#[derive(Debug)]
pub struct MockSession {
    /// Nodes keyed by stringified node ID.
    nodes: RwLock<HashMap<String, MockNodeSpec>>,

    /// Connection state.
    connected: AtomicBool,

    /// Force connection to fail.
    fail_connection: AtomicBool,

    /// Nodes whose value reads fail.
    fail_value_reads: Mutex<HashSet<String>>,

    /// Nodes whose attribute reads (class, browse name) fail.
    fail_attributes: Mutex<HashSet<String>>,

    /// Nodes whose method enumeration fails.
    fail_methods: Mutex<HashSet<String>>,

    /// Attribute/value read count for verification.
    read_count: AtomicU64,

    /// Child/method enumeration count for verification.
    browse_count: AtomicU64,

    /// After this many reads the connection is considered lost (0 = never).
    lose_connection_after: AtomicU64,
}

impl MockSession {
    /// Creates an empty mock session.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            connected: AtomicBool::new(true),
            fail_connection: AtomicBool::new(false),
            fail_value_reads: Mutex::new(HashSet::new()),
            fail_attributes: Mutex::new(HashSet::new()),
            fail_methods: Mutex::new(HashSet::new()),
            read_count: AtomicU64::new(0),
            browse_count: AtomicU64::new(0),
            lose_connection_after: AtomicU64::new(0),
        }
    }

    /// Inserts a node into the address space.
    pub async fn insert(&self, node_id: NodeId, spec: MockNodeSpec) {
        self.nodes.write().await.insert(node_id.to_opc_string(), spec);
    }

    /// Force connection attempts to fail.
    pub fn fail_connection(&self, fail: bool) {
        self.fail_connection.store(fail, Ordering::SeqCst);
    }

    /// Make value reads fail for a node.
    pub async fn fail_value_read(&self, node_id: &NodeId) {
        self.fail_value_reads
            .lock()
            .await
            .insert(node_id.to_opc_string());
    }

    /// Make attribute reads fail for a node.
    pub async fn fail_attribute_reads(&self, node_id: &NodeId) {
        self.fail_attributes
            .lock()
            .await
            .insert(node_id.to_opc_string());
    }

    /// Make method enumeration fail for a node.
    pub async fn fail_method_enumeration(&self, node_id: &NodeId) {
        self.fail_methods
            .lock()
            .await
            .insert(node_id.to_opc_string());
    }

    /// Simulate losing the connection after `reads` successful reads.
    pub fn lose_connection_after(&self, reads: u64) {
        self.lose_connection_after.store(reads, Ordering::SeqCst);
    }

    /// Returns `true` once the simulated connection loss has kicked in.
    fn connection_lost(&self) -> bool {
        let threshold = self.lose_connection_after.load(Ordering::SeqCst);
        threshold > 0 && self.read_count.load(Ordering::SeqCst) >= threshold
    }

    /// Returns the attribute/value read count.
    pub fn read_count(&self) -> u64 {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Returns the child/method enumeration count.
    pub fn browse_count(&self) -> u64 {
        self.browse_count.load(Ordering::SeqCst)
    }

    /// Looks up a node spec, failing like a real session would.
    async fn lookup(&self, node: &NodeId, attribute: &str) -> UaResult<MockNodeSpec> {
        if self.connection_lost() {
            return Err(UaError::not_connected());
        }

        self.read_count.fetch_add(1, Ordering::SeqCst);

        let key = node.to_opc_string();

        if self.fail_attributes.lock().await.contains(&key) {
            return Err(UaError::browse(BrowseError::attribute_read(
                key,
                attribute,
                "Injected attribute failure",
            )));
        }

        self.nodes
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| UaError::browse(BrowseError::node_not_found(key)))
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UaSession for MockSession {
    async fn connect(&mut self) -> UaResult<()> {
        if self.fail_connection.load(Ordering::SeqCst) {
            return Err(UaError::connection(ConnectionError::refused(
                self.endpoint(),
            )));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> UaResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "opc.tcp://mock:4840"
    }

    async fn node_class(&self, node: &NodeId) -> UaResult<Option<NodeClass>> {
        Ok(self.lookup(node, "NodeClass").await?.node_class)
    }

    async fn browse_name(&self, node: &NodeId) -> UaResult<QualifiedName> {
        Ok(self.lookup(node, "BrowseName").await?.browse_name)
    }

    async fn display_name(&self, node: &NodeId) -> UaResult<String> {
        Ok(self.lookup(node, "DisplayName").await?.display_name)
    }

    async fn children(&self, node: &NodeId) -> UaResult<Vec<NodeId>> {
        self.browse_count.fetch_add(1, Ordering::SeqCst);

        let key = node.to_opc_string();
        self.nodes
            .read()
            .await
            .get(&key)
            .map(|spec| spec.children.clone())
            .ok_or_else(|| {
                UaError::browse(BrowseError::children_unavailable(key, "No such node"))
            })
    }

    async fn methods(&self, node: &NodeId) -> UaResult<Vec<NodeId>> {
        self.browse_count.fetch_add(1, Ordering::SeqCst);

        let key = node.to_opc_string();

        if self.fail_methods.lock().await.contains(&key) {
            return Err(UaError::browse(BrowseError::methods_unavailable(
                key,
                "Injected method failure",
            )));
        }

        self.nodes
            .read()
            .await
            .get(&key)
            .map(|spec| spec.methods.clone())
            .ok_or_else(|| {
                UaError::browse(BrowseError::methods_unavailable(key, "No such node"))
            })
    }

    async fn access_level(&self, node: &NodeId) -> UaResult<AccessLevel> {
        let spec = self.lookup(node, "AccessLevel").await?;
        spec.access_level.ok_or_else(|| {
            UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "AccessLevel",
                "Attribute not set",
            ))
        })
    }

    async fn data_type(&self, node: &NodeId) -> UaResult<NodeId> {
        let spec = self.lookup(node, "DataType").await?;
        spec.data_type.ok_or_else(|| {
            UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "DataType",
                "Attribute not set",
            ))
        })
    }

    async fn read_value(&self, node: &NodeId) -> UaResult<UaValue> {
        if self.connection_lost() {
            return Err(UaError::not_connected());
        }

        self.read_count.fetch_add(1, Ordering::SeqCst);

        let key = node.to_opc_string();

        if self.fail_value_reads.lock().await.contains(&key) {
            return Err(UaError::operation(OperationError::read_failed(
                key,
                "Injected read failure",
            )));
        }

        let spec = self
            .nodes
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| UaError::browse(BrowseError::node_not_found(key.clone())))?;

        spec.value
            .ok_or_else(|| UaError::operation(OperationError::read_failed(key, "No value set")))
    }
}

// =============================================================================
// RecordingSink
// =============================================================================

/// Severity of a recorded output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    /// Normal output.
    Info,
    /// Recoverable issue.
    Warn,
    /// Failure.
    Error,
    /// Diagnostic.
    Debug,
}

/// Sink that records every emitted line for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// All recorded lines, in emission order.
    pub lines: Vec<(LineLevel, String)>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all INFO lines in order.
    pub fn infos(&self) -> Vec<&str> {
        self.lines_at(LineLevel::Info)
    }

    /// Returns all WARN lines in order.
    pub fn warns(&self) -> Vec<&str> {
        self.lines_at(LineLevel::Warn)
    }

    /// Returns all ERROR lines in order.
    pub fn errors(&self) -> Vec<&str> {
        self.lines_at(LineLevel::Error)
    }

    /// Returns lines of one level in order.
    pub fn lines_at(&self, level: LineLevel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, s)| s.as_str())
            .collect()
    }

    /// Returns `true` if any line (any level) contains the fragment.
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|(_, s)| s.contains(fragment))
    }
}

impl BrowseSink for RecordingSink {
    fn info(&mut self, line: String) {
        self.lines.push((LineLevel::Info, line));
    }

    fn warn(&mut self, line: String) {
        self.lines.push((LineLevel::Warn, line));
    }

    fn error(&mut self, line: String) {
        self.lines.push((LineLevel::Error, line));
    }

    fn debug(&mut self, line: String) {
        self.lines.push((LineLevel::Debug, line));
    }
}
