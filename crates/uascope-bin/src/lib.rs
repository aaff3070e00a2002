// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uascope-bin
//!
//! CLI binary for the uascope OPC UA address space enumerator.
//!
//! This crate provides the binary entry point:
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Run orchestration (connect, browse, tear down)
//!
//! ## Usage
//!
//! ```bash
//! # Walk the whole tree
//! uascope 192.168.1.50 4840
//!
//! # List top-level objects two levels deep
//! uascope 192.168.1.50 4840 --mode enum-objects --depth 2
//!
//! # Inspect one object by node ID or browse name
//! uascope 192.168.1.50 4840 --mode show-object --nodeid "ns=2;s=Boiler"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod run;

pub use cli::{Cli, LogFormat, Mode};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
