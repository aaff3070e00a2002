// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing.
//!
//! The tool takes the server address as two positionals and selects one of
//! three enumeration modes:
//!
//! - `all`: walk the whole tree from the Objects folder (default)
//! - `enum-objects`: walk each top-level object with a depth limit
//! - `show-object`: walk a single object by node ID or browse name

use clap::{Parser, ValueEnum};

use uascope_opcua::BrowseRequest;

use crate::error::BinError;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// uascope - OPC UA address space enumeration tool
///
/// Connects to an OPC UA server and prints its exposed address space as an
/// indented tree with node identifiers, data types, access rights and
/// current values.
#[derive(Parser, Debug)]
#[command(
    name = "uascope",
    version = crate::VERSION,
    about = "OPC UA address space enumeration tool",
    long_about = None
)]
pub struct Cli {
    /// Server IP address or hostname
    pub ip: String,

    /// Server port
    pub port: u16,

    /// Enumeration mode
    #[arg(long, value_enum, default_value_t = Mode::All)]
    pub mode: Mode,

    /// Depth limit for enum-objects mode
    #[arg(long, default_value_t = 0)]
    pub depth: u32,

    /// NodeId or object name for show-object mode
    #[arg(long)]
    pub nodeid: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Enumeration mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Browse the entire tree from the Objects folder
    #[default]
    All,
    /// Enumerate top-level objects with a depth limit
    EnumObjects,
    /// Browse a single object selected with --nodeid
    ShowObject,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the connection target URL.
    pub fn endpoint_url(&self) -> String {
        format!("opc.tcp://{}:{}", self.ip, self.port)
    }

    /// Builds the browse request for the selected mode.
    ///
    /// # Errors
    ///
    /// Returns a usage error when `show-object` is selected without
    /// `--nodeid`.
    pub fn browse_request(&self) -> Result<BrowseRequest, BinError> {
        match self.mode {
            Mode::All => Ok(BrowseRequest::FullTree),
            Mode::EnumObjects => Ok(BrowseRequest::EnumerateObjects {
                depth_limit: self.depth,
            }),
            Mode::ShowObject => {
                let target = self.nodeid.clone().ok_or_else(|| {
                    BinError::usage("--nodeid is required for show-object mode")
                })?;
                Ok(BrowseRequest::ShowObject { target })
            }
        }
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
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
    fn test_default_mode() {
        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840"]);
        assert_eq!(cli.mode, Mode::All);
        assert_eq!(cli.browse_request().unwrap(), BrowseRequest::FullTree);
    }

    #[test]
    fn test_endpoint_url() {
        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840"]);
        assert_eq!(cli.endpoint_url(), "opc.tcp://10.0.0.5:4840");
    }

    #[test]
    fn test_enum_objects_mode() {
        let cli = Cli::parse_from([
            "uascope", "10.0.0.5", "4840", "--mode", "enum-objects", "--depth", "2",
        ]);
        assert_eq!(
            cli.browse_request().unwrap(),
            BrowseRequest::EnumerateObjects { depth_limit: 2 }
        );
    }

    #[test]
    fn test_depth_defaults_to_zero() {
        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840", "--mode", "enum-objects"]);
        assert_eq!(
            cli.browse_request().unwrap(),
            BrowseRequest::EnumerateObjects { depth_limit: 0 }
        );
    }

    #[test]
    fn test_show_object_mode() {
        let cli = Cli::parse_from([
            "uascope", "10.0.0.5", "4840", "--mode", "show-object", "--nodeid", "ns=2;s=Boiler",
        ]);
        assert_eq!(
            cli.browse_request().unwrap(),
            BrowseRequest::ShowObject {
                target: "ns=2;s=Boiler".to_string()
            }
        );
    }

    #[test]
    fn test_show_object_requires_nodeid() {
        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840", "--mode", "show-object"]);
        let err = cli.browse_request().unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_quiet_and_verbose() {
        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840", "-q"]);
        assert_eq!(cli.effective_log_level(), "warn");

        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840", "-v"]);
        assert_eq!(cli.effective_log_level(), "debug");

        let cli = Cli::parse_from(["uascope", "10.0.0.5", "4840", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(), "trace");
    }
}
