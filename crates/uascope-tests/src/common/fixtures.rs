// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Reference address spaces for integration tests.

use uascope_opcua::types::{AccessLevel, NodeId, UaValue};

use super::mocks::{MockNodeSpec, MockSession};

/// Standard DataType node for Boolean (ns=0, i=1).
pub fn boolean_type_id() -> NodeId {
    NodeId::numeric(0, 1)
}

/// Standard DataType node for Double (ns=0, i=11).
pub fn double_type_id() -> NodeId {
    NodeId::numeric(0, 11)
}

/// Builds the reference address space:
///
/// ```text
/// Objects
/// ├── Temperature   (Variable, Double, Read-only, 21.5)
/// └── Controller    (Object)
///     ├── Start     (Method)
///     └── Status    (Variable, Boolean, Writable, true)
/// ```
pub async fn reference_address_space() -> MockSession {
    let session = MockSession::new();

    let temperature = NodeId::string(2, "Temperature");
    let controller = NodeId::string(2, "Controller");
    let start = NodeId::string(2, "Controller.Start");
    let status = NodeId::string(2, "Controller.Status");

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects")
                .with_children(vec![temperature.clone(), controller.clone()]),
        )
        .await;

    session
        .insert(
            temperature,
            MockNodeSpec::variable(
                "Temperature",
                double_type_id(),
                AccessLevel::Mask(0x01),
                UaValue::Double(21.5),
            ),
        )
        .await;

    session
        .insert(
            controller,
            MockNodeSpec::object("Controller")
                .with_children(vec![status.clone()])
                .with_methods(vec![start.clone()]),
        )
        .await;

    session.insert(start, MockNodeSpec::method("Start")).await;

    session
        .insert(
            status,
            MockNodeSpec::variable(
                "Status",
                boolean_type_id(),
                AccessLevel::Mask(0x03),
                UaValue::Boolean(true),
            ),
        )
        .await;

    session
        .insert(double_type_id(), MockNodeSpec::data_type_node("Double"))
        .await;
    session
        .insert(boolean_type_id(), MockNodeSpec::data_type_node("Boolean"))
        .await;

    session
}

/// Builds two independent object chains under Objects:
///
/// ```text
/// Objects
/// ├── LineA → LineA.Seg1 → LineA.Seg2 → LineA.Seg3
/// └── LineB → LineB.Seg1
/// ```
///
/// Used to verify depth limiting and the per-child depth reset of
/// enum-objects mode.
pub async fn deep_chains() -> MockSession {
    let session = MockSession::new();

    let line_a = NodeId::string(2, "LineA");
    let a1 = NodeId::string(2, "LineA.Seg1");
    let a2 = NodeId::string(2, "LineA.Seg2");
    let a3 = NodeId::string(2, "LineA.Seg3");
    let line_b = NodeId::string(2, "LineB");
    let b1 = NodeId::string(2, "LineB.Seg1");

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects")
                .with_children(vec![line_a.clone(), line_b.clone()]),
        )
        .await;

    session
        .insert(
            line_a,
            MockNodeSpec::object("LineA").with_children(vec![a1.clone()]),
        )
        .await;
    session
        .insert(a1, MockNodeSpec::object("Seg1").with_children(vec![a2.clone()]))
        .await;
    session
        .insert(a2, MockNodeSpec::object("Seg2").with_children(vec![a3.clone()]))
        .await;
    session.insert(a3, MockNodeSpec::object("Seg3")).await;

    session
        .insert(
            line_b,
            MockNodeSpec::object("LineB").with_children(vec![b1.clone()]),
        )
        .await;
    session.insert(b1, MockNodeSpec::object("Seg1")).await;

    session
}

/// Builds an address space with a back-reference cycle:
///
/// ```text
/// Objects → Plant → Objects (again)
/// ```
pub async fn cyclic_address_space() -> MockSession {
    let session = MockSession::new();

    let plant = NodeId::string(2, "Plant");

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects").with_children(vec![plant.clone()]),
        )
        .await;

    session
        .insert(
            plant,
            MockNodeSpec::object("Plant").with_children(vec![NodeId::OBJECTS_FOLDER]),
        )
        .await;

    session
}
