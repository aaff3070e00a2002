// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space browsing.
//!
//! This module is the heart of the enumerator: the depth-first tree walker,
//! the per-node line formatter, the data-type resolver, and the mode
//! selector that ties a [`BrowseRequest`] to a traversal entry point.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BrowseRequest                            │
//! │           (FullTree / EnumerateObjects / ShowObject)            │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ run_browse
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TreeWalker                              │
//! │        (explicit-stack DFS with hard depth cutoff)              │
//! └──────────┬──────────────────┬───────────────────┬───────────────┘
//!            ▼                  ▼                   ▼
//!      NodeDescriptor    resolve_type_name     BrowseSink
//!      (line format)     (placeholder on       (streamed output)
//!                         failure)
//! ```
//!
//! Output is streamed line by line as the traversal proceeds; nothing is
//! buffered. The walker recovers from per-node failures according to the
//! [`Recovery`](crate::error::Recovery) policy of each error: a node whose
//! metadata cannot be read loses only its subtree, a failed value read
//! loses only the value line.

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::error::{Recovery, UaResult};
use crate::session::UaSession;
use crate::types::{AccessLabel, NodeClass, NodeId};

// =============================================================================
// BrowseSink
// =============================================================================

/// Destination for browse output lines.
///
/// The production sink forwards to `tracing` (INFO for normal lines, WARN
/// for recoverable issues, ERROR for failures); tests capture lines for
/// assertion.
pub trait BrowseSink: Send {
    /// Emits a normal output line.
    fn info(&mut self, line: String);

    /// Emits a recoverable-issue line.
    fn warn(&mut self, line: String);

    /// Emits a failure line.
    fn error(&mut self, line: String);

    /// Emits a diagnostic line. Ignored by default.
    fn debug(&mut self, line: String) {
        let _ = line;
    }
}

/// Sink that forwards lines to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl BrowseSink for TracingSink {
    fn info(&mut self, line: String) {
        info!("{}", line);
    }

    fn warn(&mut self, line: String) {
        warn!("{}", line);
    }

    fn error(&mut self, line: String) {
        error!("{}", line);
    }

    fn debug(&mut self, line: String) {
        tracing::debug!("{}", line);
    }
}

// =============================================================================
// NodeDescriptor
// =============================================================================

/// Everything needed to print one node's line.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    /// The node's browse name.
    pub browse_name: String,

    /// The node class, `None` when the server reported an unrecognized one.
    pub node_class: Option<NodeClass>,

    /// Stringified node identifier.
    pub node_id: String,

    /// Variable-specific metadata, present iff the class is Variable.
    pub variable: Option<VariableFacts>,
}

/// Metadata printed for Variable nodes only.
#[derive(Debug, Clone)]
pub struct VariableFacts {
    /// Display name of the variable's data type, or a placeholder.
    pub data_type_name: String,

    /// Normalized access label.
    pub access: AccessLabel,
}

impl NodeDescriptor {
    /// Returns `true` if this describes a Variable node.
    pub fn is_variable(&self) -> bool {
        self.variable.is_some()
    }

    /// Returns the class display name, `Unknown` for unrecognized classes.
    pub fn class_name(&self) -> &'static str {
        self.node_class.map_or("Unknown", |c| c.name())
    }

    /// Renders the node line with the given indent prefix.
    pub fn render(&self, indent: &str) -> String {
        match &self.variable {
            Some(facts) => format!(
                "{}- {} ({}) | NodeId: {} | DataType: {} | Access: {}",
                indent,
                self.browse_name,
                self.class_name(),
                self.node_id,
                facts.data_type_name,
                facts.access,
            ),
            None => format!(
                "{}- {} ({}) | NodeId: {}",
                indent,
                self.browse_name,
                self.class_name(),
                self.node_id,
            ),
        }
    }
}

// =============================================================================
// Data-Type Resolution
// =============================================================================

/// Resolves the display name of a variable's data type.
///
/// Any failure (missing reference, session error, unresolvable node) is
/// embedded as a placeholder so the traversal keeps going.
pub async fn resolve_type_name(session: &dyn UaSession, node: &NodeId) -> String {
    let type_id = match session.data_type(node).await {
        Ok(id) => id,
        Err(e) => return format!("Unknown type ({})", e),
    };

    match session.display_name(&type_id).await {
        Ok(name) => name,
        Err(e) => format!("Unknown type ({})", e),
    }
}

// =============================================================================
// TreeWalker
// =============================================================================

/// How a stacked node is treated when popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkKind {
    /// Full treatment: line, value, methods, children.
    Structural,

    /// Listed only; methods are never descended into.
    MethodLeaf,
}

/// Depth-first walker over the remote address space.
///
/// Iterative DFS over an explicit work stack, so call-stack depth does not
/// track tree depth. A per-walk visited set terminates traversal on nodes
/// reachable via more than one path (or genuine cycles) instead of
/// revisiting them.
///
/// Children are visited in server enumeration order; method children of a
/// node are listed before its structural children, one level deeper than
/// their parent.
#[derive(Debug)]
pub struct TreeWalker {
    /// Inclusive depth limit; `None` means unbounded.
    max_depth: Option<u32>,

    /// Stringified node IDs already visited in this walk.
    visited: HashSet<String>,
}

impl TreeWalker {
    /// Creates a walker with an optional depth limit.
    ///
    /// Nodes at depth exactly `max_depth` are still printed; their children
    /// are not.
    pub fn new(max_depth: Option<u32>) -> Self {
        Self {
            max_depth,
            visited: HashSet::new(),
        }
    }

    /// Walks the subtree rooted at `start`, streaming lines into `sink`.
    ///
    /// Failures are handled according to their [`Recovery`] policy: a node
    /// whose metadata cannot be read gets one error line and loses its
    /// subtree, a failed value read gets a warning line in place of the
    /// value, sibling subtrees continue. Only a connection-level failure
    /// ends the walk itself.
    pub async fn walk(
        &mut self,
        session: &dyn UaSession,
        sink: &mut dyn BrowseSink,
        start: NodeId,
    ) {
        let mut stack: Vec<(NodeId, u32, WorkKind)> = vec![(start, 0, WorkKind::Structural)];

        while let Some((node, depth, kind)) = stack.pop() {
            if let Some(limit) = self.max_depth {
                if depth > limit {
                    continue;
                }
            }

            if !self.visited.insert(node.to_opc_string()) {
                sink.debug(format!("Already visited node {}, skipping", node));
                continue;
            }

            let indent = "  ".repeat(depth as usize);

            let descriptor = match self.describe(session, &node).await {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    sink.error(format!("{}Error browsing node: {}", indent, e));
                    if e.recovery() == Recovery::AbortRun {
                        break;
                    }
                    continue;
                }
            };

            sink.info(descriptor.render(&indent));

            if descriptor.is_variable() {
                match session.read_value(&node).await {
                    Ok(value) => sink.info(format!("{}  Value: {}", indent, value)),
                    Err(e) if e.recovery() == Recovery::AbortRun => {
                        sink.error(format!("{}Error browsing node: {}", indent, e));
                        break;
                    }
                    Err(e) => sink.warn(format!("{}  Could not read value: {}", indent, e)),
                }
            }

            if kind == WorkKind::MethodLeaf {
                continue;
            }

            // Push children first so methods, pushed last, pop first.
            match session.children(&node).await {
                Ok(children) => {
                    for child in children.into_iter().rev() {
                        stack.push((child, depth + 1, WorkKind::Structural));
                    }
                }
                Err(e) => {
                    sink.error(format!("{}Error browsing node: {}", indent, e));
                    if e.recovery() == Recovery::AbortRun {
                        break;
                    }
                }
            }

            match session.methods(&node).await {
                Ok(methods) => {
                    for method in methods.into_iter().rev() {
                        stack.push((method, depth + 1, WorkKind::MethodLeaf));
                    }
                }
                Err(e) if e.recovery() == Recovery::AbortRun => {
                    sink.error(format!("{}Error browsing node: {}", indent, e));
                    break;
                }
                Err(e) => sink.warn(format!("{}  Could not fetch methods: {}", indent, e)),
            }
        }
    }

    /// Reads the metadata needed to print one node.
    ///
    /// A failure here aborts only this node's subtree.
    async fn describe(
        &self,
        session: &dyn UaSession,
        node: &NodeId,
    ) -> UaResult<NodeDescriptor> {
        let node_class = session.node_class(node).await?;
        let browse_name = session.browse_name(node).await?;
        let node_id = node.to_opc_string();

        let variable = if node_class.is_some_and(|c| c.has_value()) {
            let access = match session.access_level(node).await {
                Ok(level) => level.classify(),
                Err(_) => AccessLabel::Unknown,
            };
            let data_type_name = resolve_type_name(session, node).await;
            Some(VariableFacts {
                data_type_name,
                access,
            })
        } else {
            None
        };

        Ok(NodeDescriptor {
            browse_name: browse_name.name,
            node_class,
            node_id,
            variable,
        })
    }
}

// =============================================================================
// BrowseRequest
// =============================================================================

/// One requested enumeration, as selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseRequest {
    /// Walk the entire tree from the Objects folder, unbounded.
    FullTree,

    /// Walk each direct child of the Objects folder independently, with the
    /// given depth limit and depth restarting at 0 per child.
    EnumerateObjects {
        /// Inclusive depth limit per top-level child.
        depth_limit: u32,
    },

    /// Walk a single object resolved by identifier or browse name.
    ShowObject {
        /// Serialized node identifier or plain browse name.
        target: String,
    },
}

// =============================================================================
// Mode Selector
// =============================================================================

/// Runs one browse request against a connected session.
///
/// Holds no state across invocations; each call performs exactly one mode's
/// traversal.
///
/// # Errors
///
/// Returns an error only when the traversal entry point itself is
/// unreachable (e.g. the Objects folder cannot be enumerated). Per-node
/// failures inside a walk are recovered and reported through the sink.
pub async fn run_browse(
    session: &dyn UaSession,
    sink: &mut dyn BrowseSink,
    request: &BrowseRequest,
) -> UaResult<()> {
    match request {
        BrowseRequest::FullTree => {
            sink.info("Browsing all from root...".to_string());
            TreeWalker::new(None)
                .walk(session, sink, NodeId::OBJECTS_FOLDER)
                .await;
            Ok(())
        }

        BrowseRequest::EnumerateObjects { depth_limit } => {
            sink.info(format!("Enumerating Objects (depth {}):", depth_limit));

            let children = session.children(&NodeId::OBJECTS_FOLDER).await?;
            for child in children {
                // Probe the child before committing to a walk so one broken
                // top-level entry cannot end the enumeration.
                if let Err(e) = session.browse_name(&child).await {
                    sink.warn(format!("Could not browse child node: {}", e));
                    continue;
                }

                TreeWalker::new(Some(*depth_limit))
                    .walk(session, sink, child)
                    .await;
            }
            Ok(())
        }

        BrowseRequest::ShowObject { target } => show_object(session, sink, target).await,
    }
}

/// Resolves and walks a single object.
///
/// Resolution order: the target is first interpreted as a literal node
/// identifier (validity probed by reading its browse name); only if that
/// fails is it matched against the browse names of the Objects folder's
/// direct children. An identifier match always wins over a name match.
async fn show_object(
    session: &dyn UaSession,
    sink: &mut dyn BrowseSink,
    target: &str,
) -> UaResult<()> {
    let by_identifier = match target.parse::<NodeId>() {
        Ok(node) => match session.browse_name(&node).await {
            Ok(_) => Some(node),
            Err(_) => None,
        },
        Err(_) => None,
    };

    let resolved = match by_identifier {
        Some(node) => Some(node),
        None => find_object_by_name(session, target).await?,
    };

    let Some(node) = resolved else {
        sink.error(format!("Object '{}' not found.", target));
        return Ok(());
    };

    let name = match session.browse_name(&node).await {
        Ok(qualified) => qualified.name,
        Err(_) => node.to_opc_string(),
    };
    sink.info(format!("Browsing object: {} | NodeId: {}", name, node));

    TreeWalker::new(None).walk(session, sink, node).await;
    Ok(())
}

/// Scans the Objects folder's direct children for a matching browse name.
///
/// Exact comparison, first match in server order wins.
async fn find_object_by_name(
    session: &dyn UaSession,
    target: &str,
) -> UaResult<Option<NodeId>> {
    for child in session.children(&NodeId::OBJECTS_FOLDER).await? {
        if let Ok(qualified) = session.browse_name(&child).await {
            if qualified.name == target {
                return Ok(Some(child));
            }
        }
    }
    Ok(None)
}

// =============================================================================
// Tests
// =============================================================================
