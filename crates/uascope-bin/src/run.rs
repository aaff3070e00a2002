// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Run orchestration: connect, browse, tear down.
//!
//! The session is acquired once and released on every exit path, including
//! after traversal errors. Apart from usage errors, failures are logged and
//! the run ends normally so everything resolved so far remains on screen.

use tracing::{error, info, warn};

use uascope_opcua::{run_browse, RealSession, SessionConfig, TracingSink, UaSession};

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes one enumeration run for the parsed CLI arguments.
///
/// # Errors
///
/// Returns an error only for usage problems (missing `--nodeid` in
/// show-object mode). All other failures are logged and swallowed.
pub async fn execute(cli: &Cli) -> BinResult<()> {
    let request = cli.browse_request()?;
    let url = cli.endpoint_url();

    info!("Connecting to OPC UA server at {}...", url);

    let config = match SessionConfig::builder()
        .endpoint(&url)
        .application_name("uascope")
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            error!("Failed during browsing: {}", e);
            return Ok(());
        }
    };

    let mut session = RealSession::new(config);
    if let Err(e) = session.connect().await {
        error!("Failed during browsing: {}", e);
        return Ok(());
    }

    info!("Connected successfully.");

    let mut sink = TracingSink;
    let result = run_browse(&session, &mut sink, &request).await;

    if let Err(e) = session.disconnect().await {
        warn!("Error while disconnecting: {}", e);
    }

    if let Err(e) = result {
        error!("Failed during browsing: {}", e);
    }

    Ok(())
}
