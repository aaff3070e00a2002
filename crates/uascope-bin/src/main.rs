// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! uascope - OPC UA address space enumeration tool
//!
//! Main binary entry point.

use uascope_bin::{cli::Cli, error, logging, run};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    logging::init_logging(cli.effective_log_level(), cli.log_format);

    if let Err(e) = run::execute(&cli).await {
        error::report_error_and_exit(e);
    }
}
