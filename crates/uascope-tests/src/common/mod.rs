// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared test infrastructure.
//!
//! - [`mocks`]: mock session with error injection, recording sink
//! - [`fixtures`]: reference address spaces for integration tests

pub mod fixtures;
pub mod mocks;

pub use fixtures::{cyclic_address_space, deep_chains, reference_address_space};
pub use mocks::{LineLevel, MockNodeSpec, MockSession, RecordingSink};
