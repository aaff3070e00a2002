// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA types used throughout the enumerator.
//!
//! This module provides the type vocabulary for address-space browsing:
//!
//! - **NodeId**: all four OPC UA node identifier kinds with parsing and rendering
//! - **NodeClass**: node categories with node-class-mask conversion
//! - **AccessLevel**: mask or flag-set access rights with a tri-state classifier
//! - **UaValue**: closed variant over the protocol's primitive value kinds
//! - **SessionConfig**: client connection configuration with builder
//!
//! # Examples
//!
//! ```
//! use uascope_opcua::types::{NodeId, SessionConfig};
//!
//! // Parse a node ID from its OPC UA string form
//! let node_id: NodeId = "ns=2;s=Device.Temperature".parse().unwrap();
//!
//! // Build a connection configuration
//! let config = SessionConfig::builder()
//!     .endpoint("opc.tcp://localhost:4840")
//!     .build()
//!     .unwrap();
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigurationError, UaError};

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A NodeId uniquely identifies a node within an OPC UA server. It consists
/// of a namespace index and an identifier which can be numeric, string,
/// GUID, or opaque (byte string).
///
/// # Examples
///
/// ```
/// use uascope_opcua::types::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// let string = NodeId::string(2, "Line1.Conveyor.Speed");
///
/// let parsed: NodeId = "ns=2;s=Line1.Conveyor.Speed".parse().unwrap();
/// assert_eq!(parsed, string);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    /// Creates a numeric node ID.
    #[inline]
    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    /// Root folder node (ns=0, i=84).
    pub const ROOT_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(84),
    };

    /// Objects folder node (ns=0, i=85), the entry point for enumeration.
    pub const OBJECTS_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(85),
    };

    /// Returns `true` if this is in the standard namespace (ns=0).
    #[inline]
    pub const fn is_standard(&self) -> bool {
        self.namespace_index == 0
    }

    /// Converts to the OPC UA string format.
    ///
    /// Format: `ns=<namespace>;{i|s|g|b}=<identifier>`, with the namespace
    /// prefix omitted for namespace 0.
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = UaError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported forms:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=Line1.Speed` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64)
    /// - `i=1001`, `s=MyNode` (namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace_index, identifier_part) = if let Some(rest) = s.strip_prefix("ns=") {
            let (ns_str, id_part) = rest.split_once(';').ok_or_else(|| {
                UaError::configuration(ConfigurationError::invalid_node_id(
                    s,
                    "Missing identifier after namespace",
                ))
            })?;
            let ns: u16 = ns_str.parse().map_err(|_| {
                UaError::configuration(ConfigurationError::invalid_node_id(
                    s,
                    "Invalid namespace index",
                ))
            })?;
            (ns, id_part)
        } else {
            (0, s)
        };

        let identifier = if let Some(id) = identifier_part.strip_prefix("i=") {
            let value: u32 = id.parse().map_err(|_| {
                UaError::configuration(ConfigurationError::invalid_node_id(
                    s,
                    "Invalid numeric identifier",
                ))
            })?;
            NodeIdentifier::Numeric(value)
        } else if let Some(id) = identifier_part.strip_prefix("s=") {
            NodeIdentifier::String(id.to_string())
        } else if let Some(id) = identifier_part.strip_prefix("g=") {
            let uuid = Uuid::parse_str(id).map_err(|e| {
                UaError::configuration(ConfigurationError::invalid_node_id(
                    s,
                    format!("Invalid GUID: {}", e),
                ))
            })?;
            NodeIdentifier::Guid(uuid)
        } else if let Some(id) = identifier_part.strip_prefix("b=") {
            let bytes = BASE64.decode(id).map_err(|e| {
                UaError::configuration(ConfigurationError::invalid_node_id(
                    s,
                    format!("Invalid base64: {}", e),
                ))
            })?;
            NodeIdentifier::Opaque(bytes)
        } else {
            return Err(UaError::configuration(ConfigurationError::invalid_node_id(
                s,
                "Unknown identifier type. Expected i=, s=, g=, or b=",
            )));
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// The four OPC UA node identifier kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier (standard nodes, most compact).
    Numeric(u32),

    /// String identifier (human-readable, common for custom nodes).
    String(String),

    /// GUID identifier (globally unique).
    Guid(Uuid),

    /// Opaque identifier (application-specific byte array).
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// OPC UA qualified name (namespace index + name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,

    /// The name string.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Creates a qualified name in namespace 0.
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace_index, self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        if let Some((ns, name)) = s.split_once(':') {
            if let Ok(ns_idx) = ns.parse::<u16>() {
                return Self::new(ns_idx, name);
            }
        }
        Self::standard(s)
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// OPC UA node classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Object node (container).
    Object,
    /// Variable node (has a value).
    Variable,
    /// Method node (invocable).
    Method,
    /// Object type node.
    ObjectType,
    /// Variable type node.
    VariableType,
    /// Reference type node.
    ReferenceType,
    /// Data type node.
    DataType,
    /// View node.
    View,
}

impl NodeClass {
    /// Returns the OPC UA node-class mask bit.
    pub const fn mask_bit(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }

    /// Creates from a node-class mask value, `None` for unrecognized values.
    pub fn from_mask(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Object),
            2 => Some(Self::Variable),
            4 => Some(Self::Method),
            8 => Some(Self::ObjectType),
            16 => Some(Self::VariableType),
            32 => Some(Self::ReferenceType),
            64 => Some(Self::DataType),
            128 => Some(Self::View),
            _ => None,
        }
    }

    /// Returns the display name used in browse output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::ReferenceType => "ReferenceType",
            Self::DataType => "DataType",
            Self::View => "View",
        }
    }

    /// Returns `true` for Variable nodes.
    #[inline]
    pub const fn has_value(&self) -> bool {
        matches!(self, Self::Variable)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// AccessLevel
// =============================================================================

/// A single access-level capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessFlag {
    /// The value is currently readable.
    CurrentRead,
    /// The value is currently writable.
    CurrentWrite,
    /// The value history is readable.
    HistoryRead,
    /// The value history is writable.
    HistoryWrite,
}

impl AccessFlag {
    /// Returns the OPC UA AccessLevel bit for this flag.
    pub const fn bit(&self) -> u8 {
        match self {
            Self::CurrentRead => 0x01,
            Self::CurrentWrite => 0x02,
            Self::HistoryRead => 0x04,
            Self::HistoryWrite => 0x08,
        }
    }
}

/// Per-variable access rights.
///
/// Client libraries report the AccessLevel attribute in one of two shapes:
/// the raw protocol bitmask or an already-decoded set of named flags. Both
/// are accepted transparently and normalized by [`AccessLevel::classify`].
///
/// # Examples
///
/// ```
/// use uascope_opcua::types::{AccessFlag, AccessLabel, AccessLevel};
///
/// let mask = AccessLevel::Mask(0x03);
/// let flags = AccessLevel::flags([AccessFlag::CurrentRead, AccessFlag::CurrentWrite]);
/// assert_eq!(mask.classify(), AccessLabel::Writable);
/// assert_eq!(mask.classify(), flags.classify());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Raw protocol bitmask.
    Mask(u8),

    /// Decoded flag set.
    Flags(HashSet<AccessFlag>),
}

impl AccessLevel {
    /// Creates a flag-set access level.
    pub fn flags(flags: impl IntoIterator<Item = AccessFlag>) -> Self {
        Self::Flags(flags.into_iter().collect())
    }

    /// Returns `true` if the value is currently writable.
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Mask(bits) => bits & AccessFlag::CurrentWrite.bit() != 0,
            Self::Flags(set) => set.contains(&AccessFlag::CurrentWrite),
        }
    }

    /// Classifies the access level into the tri-state browse label.
    ///
    /// Both representations yield the same label for semantically equal
    /// inputs. Classification itself cannot fail; inputs the session layer
    /// could not interpret never reach this point and are labelled
    /// [`AccessLabel::Unknown`] instead.
    pub fn classify(&self) -> AccessLabel {
        if self.is_writable() {
            AccessLabel::Writable
        } else {
            AccessLabel::ReadOnly
        }
    }

    /// Decodes an access level from a raw attribute value.
    ///
    /// Servers report the attribute as a byte-sized integer; anything else
    /// is unsupported and yields `None`, which callers render as
    /// [`AccessLabel::Unknown`].
    pub fn try_from_value(value: &UaValue) -> Option<Self> {
        match value {
            UaValue::Byte(b) => Some(Self::Mask(*b)),
            UaValue::SByte(b) => Some(Self::Mask(*b as u8)),
            UaValue::UInt16(v) if *v <= u8::MAX as u16 => Some(Self::Mask(*v as u8)),
            UaValue::UInt32(v) if *v <= u8::MAX as u32 => Some(Self::Mask(*v as u8)),
            UaValue::Int32(v) if (0..=u8::MAX as i32).contains(v) => Some(Self::Mask(*v as u8)),
            _ => None,
        }
    }
}

/// Tri-state access label shown in browse output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLabel {
    /// The value is currently writable.
    Writable,
    /// The value is readable but not writable.
    ReadOnly,
    /// The access level could not be determined.
    Unknown,
}

impl AccessLabel {
    /// Returns the display string used in browse output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Writable => "Writable",
            Self::ReadOnly => "Read-only",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AccessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// UaValue
// =============================================================================

/// A value read from a Variable node.
///
/// Closed variant over the protocol's primitive value kinds. Kinds the
/// session layer cannot map are carried as [`UaValue::Unsupported`] and
/// render as an explicit placeholder instead of failing the traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum UaValue {
    /// Boolean value.
    Boolean(bool),

    /// Signed byte.
    SByte(i8),

    /// Unsigned byte.
    Byte(u8),

    /// 16-bit signed integer.
    Int16(i16),

    /// 16-bit unsigned integer.
    UInt16(u16),

    /// 32-bit signed integer.
    Int32(i32),

    /// 32-bit unsigned integer.
    UInt32(u32),

    /// 64-bit signed integer.
    Int64(i64),

    /// 64-bit unsigned integer.
    UInt64(u64),

    /// 32-bit float.
    Float(f32),

    /// 64-bit double.
    Double(f64),

    /// String value.
    String(String),

    /// Date/time value.
    DateTime(chrono::DateTime<chrono::Utc>),

    /// GUID value.
    Guid(Uuid),

    /// Byte string.
    ByteString(Vec<u8>),

    /// Array of values.
    Array(Vec<UaValue>),

    /// Null value.
    Null,

    /// A value kind the session layer could not map, with a description.
    Unsupported(String),
}

impl UaValue {
    /// Returns `true` if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for UaValue {
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for UaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{}", v),
            Self::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Null => write!(f, "null"),
            Self::Unsupported(kind) => write!(f, "<unsupported: {}>", kind),
        }
    }
}

// =============================================================================
// SecurityMode
// =============================================================================

/// OPC UA message security mode, passed through to the client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecurityMode {
    /// No security (messages are neither signed nor encrypted).
    #[default]
    None,

    /// Messages are signed but not encrypted.
    Sign,

    /// Messages are signed and encrypted.
    SignAndEncrypt,
}

impl SecurityMode {
    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Sign => "Sign",
            Self::SignAndEncrypt => "SignAndEncrypt",
        }
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// SessionConfig
// =============================================================================

/// Client connection configuration.
///
/// # Examples
///
/// ```
/// use uascope_opcua::types::SessionConfig;
///
/// let config = SessionConfig::builder()
///     .endpoint("opc.tcp://192.168.1.50:4840")
///     .application_name("uascope")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Server endpoint URL (e.g., "opc.tcp://localhost:4840").
    pub endpoint: String,

    /// Application name announced to the server.
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Application URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_uri: Option<String>,

    /// Message security mode.
    #[serde(default)]
    pub security_mode: SecurityMode,

    /// Session timeout.
    #[serde(default = "default_session_timeout")]
    #[serde(with = "humantime_serde")]
    pub session_timeout: Duration,

    /// Whether to trust all server certificates (testing only).
    #[serde(default)]
    pub trust_server_certs: bool,
}

fn default_application_name() -> String {
    "uascope".to_string()
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(60)
}

impl SessionConfig {
    /// Returns a new configuration builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Returns the effective application URI.
    pub fn effective_application_uri(&self) -> String {
        self.application_uri
            .clone()
            .unwrap_or_else(|| format!("urn:{}", self.application_name))
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    endpoint: Option<String>,
    application_name: Option<String>,
    application_uri: Option<String>,
    security_mode: SecurityMode,
    session_timeout: Option<Duration>,
    trust_server_certs: bool,
}

impl SessionConfigBuilder {
    /// Sets the server endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the application name.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Sets the application URI.
    pub fn application_uri(mut self, uri: impl Into<String>) -> Self {
        self.application_uri = Some(uri.into());
        self
    }

    /// Sets the message security mode.
    pub fn security_mode(mut self, mode: SecurityMode) -> Self {
        self.security_mode = mode;
        self
    }

    /// Sets the session timeout.
    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = Some(timeout);
        self
    }

    /// Sets whether to trust all server certificates.
    pub fn trust_server_certs(mut self, trust: bool) -> Self {
        self.trust_server_certs = trust;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is missing or not an `opc.tcp://`
    /// URL.
    pub fn build(self) -> Result<SessionConfig, UaError> {
        let endpoint = self.endpoint.ok_or_else(|| {
            UaError::configuration(ConfigurationError::invalid_endpoint(
                "",
                "Endpoint is required",
            ))
        })?;

        if !endpoint.starts_with("opc.tcp://") {
            return Err(UaError::configuration(ConfigurationError::invalid_endpoint(
                &endpoint,
                "Endpoint must start with opc.tcp://",
            )));
        }

        Ok(SessionConfig {
            endpoint,
            application_name: self.application_name.unwrap_or_else(default_application_name),
            application_uri: self.application_uri,
            security_mode: self.security_mode,
            session_timeout: self.session_timeout.unwrap_or_else(default_session_timeout),
            trust_server_certs: self.trust_server_certs,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_to_string() {
        assert_eq!(NodeId::numeric(2, 1001).to_opc_string(), "ns=2;i=1001");
        assert_eq!(NodeId::string(2, "MyNode").to_opc_string(), "ns=2;s=MyNode");
        assert_eq!(NodeId::numeric(0, 85).to_opc_string(), "i=85");
    }

    #[test]
    fn test_node_id_parse_roundtrip() {
        for input in ["ns=2;i=1001", "ns=2;s=Line1.Speed", "i=85", "s=Controller"] {
            let parsed: NodeId = input.parse().unwrap();
            assert_eq!(parsed.to_opc_string(), input);
        }
    }

    #[test]
    fn test_node_id_parse_guid_and_opaque() {
        let parsed: NodeId = "ns=3;g=550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert!(matches!(parsed.identifier, NodeIdentifier::Guid(_)));

        let parsed: NodeId = "ns=3;b=SGVsbG8=".parse().unwrap();
        assert_eq!(parsed.identifier, NodeIdentifier::Opaque(b"Hello".to_vec()));
    }

    #[test]
    fn test_node_id_parse_rejects_garbage() {
        assert!("Controller".parse::<NodeId>().is_err());
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("ns=x;i=5".parse::<NodeId>().is_err());
        assert!("ns=2;i=notanumber".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_objects_folder_constant() {
        assert!(NodeId::OBJECTS_FOLDER.is_standard());
        assert_eq!(NodeId::OBJECTS_FOLDER.to_opc_string(), "i=85");
    }

    #[test]
    fn test_qualified_name_parsing() {
        let qn = QualifiedName::from("2:Temperature");
        assert_eq!(qn.namespace_index, 2);
        assert_eq!(qn.name, "Temperature");

        let qn = QualifiedName::from("Temperature");
        assert_eq!(qn.namespace_index, 0);
        assert_eq!(qn.to_string(), "Temperature");
    }

    #[test]
    fn test_node_class_mask() {
        assert_eq!(NodeClass::from_mask(2), Some(NodeClass::Variable));
        assert_eq!(NodeClass::from_mask(4), Some(NodeClass::Method));
        assert_eq!(NodeClass::from_mask(3), None);
        assert_eq!(NodeClass::Variable.mask_bit(), 2);
        assert!(NodeClass::Variable.has_value());
        assert!(!NodeClass::Object.has_value());
    }

    #[test]
    fn test_access_level_mask_and_flags_agree() {
        let cases: [(u8, &[AccessFlag]); 4] = [
            (0x01, &[AccessFlag::CurrentRead]),
            (0x03, &[AccessFlag::CurrentRead, AccessFlag::CurrentWrite]),
            (0x02, &[AccessFlag::CurrentWrite]),
            (0x05, &[AccessFlag::CurrentRead, AccessFlag::HistoryRead]),
        ];

        for (mask, flags) in cases {
            let from_mask = AccessLevel::Mask(mask);
            let from_flags = AccessLevel::flags(flags.iter().copied());
            assert_eq!(
                from_mask.classify(),
                from_flags.classify(),
                "mask {:#04x} disagrees with its flag set",
                mask
            );
        }
    }

    #[test]
    fn test_access_level_classify() {
        assert_eq!(AccessLevel::Mask(0x03).classify(), AccessLabel::Writable);
        assert_eq!(AccessLevel::Mask(0x01).classify(), AccessLabel::ReadOnly);
        assert_eq!(AccessLevel::Mask(0x00).classify(), AccessLabel::ReadOnly);
        assert_eq!(
            AccessLevel::flags([AccessFlag::CurrentWrite]).classify(),
            AccessLabel::Writable
        );
    }

    #[test]
    fn test_access_level_from_unsupported_value() {
        assert!(AccessLevel::try_from_value(&UaValue::String("rw".into())).is_none());
        assert!(AccessLevel::try_from_value(&UaValue::Double(1.5)).is_none());
        assert!(AccessLevel::try_from_value(&UaValue::Null).is_none());
        assert_eq!(
            AccessLevel::try_from_value(&UaValue::Byte(0x03)),
            Some(AccessLevel::Mask(0x03))
        );
    }

    #[test]
    fn test_access_label_display() {
        assert_eq!(AccessLabel::Writable.to_string(), "Writable");
        assert_eq!(AccessLabel::ReadOnly.to_string(), "Read-only");
        assert_eq!(AccessLabel::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(UaValue::Double(21.5).to_string(), "21.5");
        assert_eq!(UaValue::Boolean(true).to_string(), "true");
        assert_eq!(UaValue::ByteString(vec![1, 2, 3]).to_string(), "<3 bytes>");
        assert_eq!(
            UaValue::Array(vec![UaValue::Int32(1), UaValue::Int32(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(UaValue::Null.to_string(), "null");
        assert_eq!(
            UaValue::Unsupported("ExtensionObject".into()).to_string(),
            "<unsupported: ExtensionObject>"
        );
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::builder()
            .endpoint("opc.tcp://localhost:4840")
            .application_name("uascope")
            .build()
            .unwrap();

        assert_eq!(config.endpoint, "opc.tcp://localhost:4840");
        assert_eq!(config.security_mode, SecurityMode::None);
        assert_eq!(config.effective_application_uri(), "urn:uascope");
    }

    #[test]
    fn test_session_config_rejects_bad_endpoint() {
        assert!(SessionConfig::builder().build().is_err());
        assert!(SessionConfig::builder()
            .endpoint("http://localhost:4840")
            .build()
            .is_err());
    }
}
