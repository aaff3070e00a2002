// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Real session implementation using the `opcua` crate.
//!
//! This module wraps the `opcua` client library behind the [`UaSession`]
//! trait. It performs endpoint discovery filtered by the configured
//! security mode, connects anonymously, and serves every attribute read
//! and reference enumeration the walker issues.
//!
//! # Example
//!
//! ```rust,ignore
//! use uascope_opcua::real::RealSession;
//! use uascope_opcua::types::SessionConfig;
//!
//! let config = SessionConfig::builder()
//!     .endpoint("opc.tcp://localhost:4840")
//!     .build()?;
//!
//! let mut session = RealSession::new(config);
//! session.connect().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use opcua::client::prelude::*;
use opcua::sync::RwLock as OpcUaRwLock;
use opcua::types::{MessageSecurityMode, Variant};

use crate::error::{
    BrowseError, ConnectionError, OperationError, UaError, UaResult,
};
use crate::session::UaSession;
use crate::types::{
    AccessLevel, NodeClass, NodeId as UaNodeId, NodeIdentifier, QualifiedName as UaQualifiedName,
    SecurityMode, SessionConfig, UaValue,
};

/// Node-class mask covering every class except Method.
const STRUCTURAL_CLASS_MASK: u32 = 0xFF & !NodeClass::Method.mask_bit();

/// Node-class mask selecting Method references only.
const METHOD_CLASS_MASK: u32 = NodeClass::Method.mask_bit();

// =============================================================================
// RealSession
// =============================================================================

/// Session over a live OPC UA server.
pub struct RealSession {
    /// Connection configuration.
    config: SessionConfig,

    /// The underlying OPC UA session, present while connected.
    session: RwLock<Option<Arc<OpcUaRwLock<Session>>>>,
}

impl RealSession {
    /// Creates a new, unconnected session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            session: RwLock::new(None),
        }
    }

    /// Builds the OPC UA client from configuration.
    fn build_client(&self) -> UaResult<Client> {
        let mut builder = ClientBuilder::new()
            .application_name(&self.config.application_name)
            .application_uri(&self.config.effective_application_uri())
            .session_timeout(self.config.session_timeout.as_millis() as u32);

        if self.config.trust_server_certs {
            builder = builder.trust_server_certs(true);
        }

        builder.client().ok_or_else(|| {
            UaError::connection(ConnectionError::invalid_endpoint(
                &self.config.endpoint,
                "Failed to build OPC UA client",
            ))
        })
    }

    /// Returns the security policy matching the configured mode.
    fn security_policy(&self) -> SecurityPolicy {
        match self.config.security_mode {
            SecurityMode::None => SecurityPolicy::None,
            SecurityMode::Sign | SecurityMode::SignAndEncrypt => SecurityPolicy::Basic256Sha256,
        }
    }

    /// Returns the message security mode for endpoint matching.
    fn message_security_mode(&self) -> MessageSecurityMode {
        match self.config.security_mode {
            SecurityMode::None => MessageSecurityMode::None,
            SecurityMode::Sign => MessageSecurityMode::Sign,
            SecurityMode::SignAndEncrypt => MessageSecurityMode::SignAndEncrypt,
        }
    }

    /// Gets the session, returning an error if not connected.
    async fn get_session(&self) -> UaResult<Arc<OpcUaRwLock<Session>>> {
        let guard = self.session.read().await;
        guard
            .clone()
            .ok_or_else(|| UaError::connection(ConnectionError::NotConnected))
    }

    /// Converts our NodeId to an opcua NodeId.
    fn to_opcua_node_id(node: &UaNodeId) -> opcua::types::NodeId {
        match &node.identifier {
            NodeIdentifier::Numeric(v) => opcua::types::NodeId::new(node.namespace_index, *v),
            NodeIdentifier::String(v) => {
                opcua::types::NodeId::new(node.namespace_index, v.clone())
            }
            NodeIdentifier::Guid(v) => {
                opcua::types::NodeId::new(node.namespace_index, opcua::types::Guid::from(*v))
            }
            NodeIdentifier::Opaque(v) => opcua::types::NodeId::new(
                node.namespace_index,
                opcua::types::ByteString::from(v.as_slice()),
            ),
        }
    }

    /// Converts an opcua NodeId back to ours.
    fn from_opcua_node_id(node: &opcua::types::NodeId) -> UaNodeId {
        let namespace_index = node.namespace;
        match &node.identifier {
            opcua::types::Identifier::Numeric(v) => UaNodeId::numeric(namespace_index, *v),
            opcua::types::Identifier::String(v) => {
                UaNodeId::string(namespace_index, v.as_ref())
            }
            opcua::types::Identifier::Guid(v) => {
                UaNodeId::guid(namespace_index, uuid::Uuid::from_bytes(*v.as_bytes()))
            }
            opcua::types::Identifier::ByteString(v) => {
                UaNodeId::opaque(namespace_index, v.value.clone().unwrap_or_default())
            }
        }
    }

    /// Converts an opcua Variant to a UaValue.
    fn from_variant(variant: &Variant) -> UaValue {
        match variant {
            Variant::Empty => UaValue::Null,
            Variant::Boolean(v) => UaValue::Boolean(*v),
            Variant::SByte(v) => UaValue::SByte(*v),
            Variant::Byte(v) => UaValue::Byte(*v),
            Variant::Int16(v) => UaValue::Int16(*v),
            Variant::UInt16(v) => UaValue::UInt16(*v),
            Variant::Int32(v) => UaValue::Int32(*v),
            Variant::UInt32(v) => UaValue::UInt32(*v),
            Variant::Int64(v) => UaValue::Int64(*v),
            Variant::UInt64(v) => UaValue::UInt64(*v),
            Variant::Float(v) => UaValue::Float(*v),
            Variant::Double(v) => UaValue::Double(*v),
            Variant::String(v) => UaValue::String(v.as_ref().to_string()),
            Variant::DateTime(v) => {
                let dt = chrono::DateTime::from_timestamp(
                    v.as_chrono().timestamp(),
                    v.as_chrono().timestamp_subsec_nanos(),
                )
                .unwrap_or_else(chrono::Utc::now);
                UaValue::DateTime(dt)
            }
            Variant::Guid(v) => UaValue::Guid(uuid::Uuid::from_bytes(*v.as_bytes())),
            Variant::ByteString(v) => UaValue::ByteString(v.value.clone().unwrap_or_default()),
            Variant::Array(arr) => {
                let values: Vec<UaValue> = arr.values.iter().map(Self::from_variant).collect();
                UaValue::Array(values)
            }
            other => UaValue::Unsupported(format!("{:?}", other)),
        }
    }

    /// Reads a single attribute of a node.
    async fn read_attribute(
        &self,
        node: &UaNodeId,
        attribute: AttributeId,
    ) -> UaResult<Variant> {
        let session = self.get_session().await?;
        let opcua_node_id = Self::to_opcua_node_id(node);

        trace!(node_id = %node, attribute = ?attribute, "Reading node attribute");

        let read_value_id = ReadValueId {
            node_id: opcua_node_id,
            attribute_id: attribute as u32,
            index_range: opcua::types::UAString::null(),
            data_encoding: opcua::types::QualifiedName::null(),
        };

        let results = {
            let session_locked = session.read();
            session_locked
                .read(&[read_value_id], TimestampsToReturn::Neither, 0.0)
                .map_err(|e| {
                    UaError::operation(OperationError::read_failed(
                        node.to_opc_string(),
                        format!("{:?}", e),
                    ))
                })?
        };

        let data_value = results.into_iter().next().ok_or_else(|| {
            UaError::operation(OperationError::read_failed(
                node.to_opc_string(),
                "Empty read response",
            ))
        })?;

        let status = data_value.status.map(|s| s.bits()).unwrap_or(0);
        match data_value.value {
            Some(variant) => Ok(variant),
            None => Err(UaError::operation(OperationError::bad_status(
                node.to_opc_string(),
                status,
            ))),
        }
    }

    /// Browses forward hierarchical references filtered by node-class mask.
    async fn browse_references(
        &self,
        node: &UaNodeId,
        node_class_mask: u32,
    ) -> UaResult<Vec<UaNodeId>> {
        let session = self.get_session().await?;
        let opcua_node_id = Self::to_opcua_node_id(node);

        trace!(node_id = %node, mask = node_class_mask, "Browsing node references");

        let browse_description = BrowseDescription {
            node_id: opcua_node_id,
            browse_direction: BrowseDirection::Forward,
            reference_type_id: ReferenceTypeId::HierarchicalReferences.into(),
            include_subtypes: true,
            node_class_mask,
            result_mask: BrowseDescriptionResultMask::all().bits(),
        };

        let browse_results = {
            let session_locked = session.read();
            session_locked.browse(&[browse_description]).map_err(|e| {
                UaError::browse(BrowseError::children_unavailable(
                    node.to_opc_string(),
                    format!("{:?}", e),
                ))
            })?
        };

        let browse_results = browse_results.ok_or_else(|| {
            UaError::browse(BrowseError::children_unavailable(
                node.to_opc_string(),
                "No browse results returned",
            ))
        })?;

        let Some(result) = browse_results.first() else {
            return Ok(Vec::new());
        };

        match &result.references {
            Some(refs) => Ok(refs
                .iter()
                .map(|r| Self::from_opcua_node_id(&r.node_id.node_id))
                .collect()),
            None => Ok(Vec::new()),
        }
    }
}

// =============================================================================
// UaSession Implementation
// =============================================================================

#[async_trait]
impl UaSession for RealSession {
    async fn connect(&mut self) -> UaResult<()> {
        info!(endpoint = %self.config.endpoint, "Connecting to OPC UA server");

        let client = self.build_client()?;

        let endpoints = client
            .get_server_endpoints_from_url(&self.config.endpoint)
            .map_err(|e| {
                UaError::connection(ConnectionError::invalid_endpoint(
                    &self.config.endpoint,
                    format!("{:?}", e),
                ))
            })?;

        let security_policy = self.security_policy();
        let message_security_mode = self.message_security_mode();

        let endpoint = endpoints
            .iter()
            .find(|e| {
                e.security_policy_uri.as_ref() == security_policy.to_uri()
                    && e.security_mode == message_security_mode
            })
            .cloned()
            .ok_or_else(|| {
                UaError::connection(ConnectionError::no_suitable_endpoint(format!(
                    "{:?}/{:?}",
                    security_policy, message_security_mode
                )))
            })?;

        debug!(
            security_policy = %endpoint.security_policy_uri,
            security_mode = ?endpoint.security_mode,
            "Found matching endpoint"
        );

        let mut client = client;
        let session = client
            .connect_to_endpoint(endpoint, IdentityToken::Anonymous)
            .map_err(|_| UaError::connection(ConnectionError::refused(&self.config.endpoint)))?;

        {
            let mut guard = self.session.write().await;
            *guard = Some(session);
        }

        info!(endpoint = %self.config.endpoint, "Connected to OPC UA server");
        Ok(())
    }

    async fn disconnect(&mut self) -> UaResult<()> {
        let session_opt = {
            let mut guard = self.session.write().await;
            guard.take()
        };

        if let Some(session) = session_opt {
            let session_locked = session.read();
            session_locked.disconnect();
            info!(endpoint = %self.config.endpoint, "Disconnected from OPC UA server");
        }

        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    async fn node_class(&self, node: &UaNodeId) -> UaResult<Option<NodeClass>> {
        let variant = self
            .read_attribute(node, AttributeId::NodeClass)
            .await
            .map_err(|e| {
                UaError::browse(BrowseError::attribute_read(
                    node.to_opc_string(),
                    "NodeClass",
                    e.to_string(),
                ))
            })?;

        match variant {
            Variant::Int32(v) => Ok(NodeClass::from_mask(v as u32)),
            other => Err(UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "NodeClass",
                format!("Unexpected value {:?}", other),
            ))),
        }
    }

    async fn browse_name(&self, node: &UaNodeId) -> UaResult<UaQualifiedName> {
        let variant = self
            .read_attribute(node, AttributeId::BrowseName)
            .await
            .map_err(|e| {
                UaError::browse(BrowseError::attribute_read(
                    node.to_opc_string(),
                    "BrowseName",
                    e.to_string(),
                ))
            })?;

        match variant {
            Variant::QualifiedName(q) => Ok(UaQualifiedName::new(
                q.namespace_index,
                q.name.as_ref(),
            )),
            other => Err(UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "BrowseName",
                format!("Unexpected value {:?}", other),
            ))),
        }
    }

    async fn display_name(&self, node: &UaNodeId) -> UaResult<String> {
        let variant = self
            .read_attribute(node, AttributeId::DisplayName)
            .await
            .map_err(|e| {
                UaError::browse(BrowseError::attribute_read(
                    node.to_opc_string(),
                    "DisplayName",
                    e.to_string(),
                ))
            })?;

        match variant {
            Variant::LocalizedText(text) => Ok(text.text.as_ref().to_string()),
            other => Err(UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "DisplayName",
                format!("Unexpected value {:?}", other),
            ))),
        }
    }

    async fn children(&self, node: &UaNodeId) -> UaResult<Vec<UaNodeId>> {
        self.browse_references(node, STRUCTURAL_CLASS_MASK).await
    }

    async fn methods(&self, node: &UaNodeId) -> UaResult<Vec<UaNodeId>> {
        self.browse_references(node, METHOD_CLASS_MASK)
            .await
            .map_err(|e| {
                UaError::browse(BrowseError::methods_unavailable(
                    node.to_opc_string(),
                    e.to_string(),
                ))
            })
    }

    async fn access_level(&self, node: &UaNodeId) -> UaResult<AccessLevel> {
        let variant = self.read_attribute(node, AttributeId::AccessLevel).await?;
        let value = Self::from_variant(&variant);

        AccessLevel::try_from_value(&value).ok_or_else(|| {
            UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "AccessLevel",
                format!("Uninterpretable value {}", value),
            ))
        })
    }

    async fn data_type(&self, node: &UaNodeId) -> UaResult<UaNodeId> {
        let variant = self
            .read_attribute(node, AttributeId::DataType)
            .await
            .map_err(|e| {
                UaError::browse(BrowseError::attribute_read(
                    node.to_opc_string(),
                    "DataType",
                    e.to_string(),
                ))
            })?;

        match variant {
            Variant::NodeId(id) => Ok(Self::from_opcua_node_id(&id)),
            other => Err(UaError::browse(BrowseError::attribute_read(
                node.to_opc_string(),
                "DataType",
                format!("Unexpected value {:?}", other),
            ))),
        }
    }

    async fn read_value(&self, node: &UaNodeId) -> UaResult<UaValue> {
        let variant = self.read_attribute(node, AttributeId::Value).await?;
        Ok(Self::from_variant(&variant))
    }
}

impl std::fmt::Debug for RealSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealSession")
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}
