// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uascope-tests
//!
//! Integration test support for uascope: a configurable mock session, a
//! recording output sink, and fixtures building reference address spaces.

pub mod common;
