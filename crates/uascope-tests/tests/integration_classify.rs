// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for access-level classification, including the
//! walker-visible behavior when the attribute cannot be interpreted.

use uascope_opcua::types::{AccessFlag, AccessLabel, AccessLevel, NodeId, UaValue};
use uascope_opcua::{run_browse, BrowseRequest};

use uascope_tests::common::{fixtures::double_type_id, MockNodeSpec, MockSession, RecordingSink};

// =============================================================================
// Representation equivalence
// =============================================================================

#[test]
fn mask_and_flag_set_classify_identically() {
    let equivalents: [(u8, Vec<AccessFlag>); 5] = [
        (0x00, vec![]),
        (0x01, vec![AccessFlag::CurrentRead]),
        (0x02, vec![AccessFlag::CurrentWrite]),
        (0x03, vec![AccessFlag::CurrentRead, AccessFlag::CurrentWrite]),
        (
            0x0B,
            vec![
                AccessFlag::CurrentRead,
                AccessFlag::CurrentWrite,
                AccessFlag::HistoryWrite,
            ],
        ),
    ];

    for (mask, flags) in equivalents {
        let from_mask = AccessLevel::Mask(mask).classify();
        let from_flags = AccessLevel::flags(flags).classify();
        assert_eq!(
            from_mask, from_flags,
            "mask {:#04x} must classify like its flag set",
            mask
        );
    }
}

#[test]
fn write_bit_alone_decides_writability() {
    assert_eq!(AccessLevel::Mask(0x02).classify(), AccessLabel::Writable);
    assert_eq!(AccessLevel::Mask(0x01).classify(), AccessLabel::ReadOnly);
    // History bits do not grant current write access.
    assert_eq!(AccessLevel::Mask(0x0C).classify(), AccessLabel::ReadOnly);
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn malformed_attribute_values_are_not_interpretable() {
    let malformed = [
        UaValue::String("writable".to_string()),
        UaValue::Double(3.0),
        UaValue::Boolean(true),
        UaValue::Null,
        UaValue::Array(vec![UaValue::Byte(3)]),
        UaValue::Int32(-1),
        UaValue::UInt32(4096),
    ];

    for value in malformed {
        assert!(
            AccessLevel::try_from_value(&value).is_none(),
            "{} must not decode as an access level",
            value
        );
    }
}

#[tokio::test]
async fn uninterpretable_access_level_renders_unknown() {
    let session = MockSession::new();
    let gauge = NodeId::string(2, "Gauge");

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects").with_children(vec![gauge.clone()]),
        )
        .await;
    session
        .insert(
            gauge,
            MockNodeSpec::variable(
                "Gauge",
                double_type_id(),
                AccessLevel::Mask(0x01),
                UaValue::Double(7.25),
            )
            .without_access_level(),
        )
        .await;
    session
        .insert(double_type_id(), MockNodeSpec::data_type_node("Double"))
        .await;

    let mut sink = RecordingSink::new();
    run_browse(&session, &mut sink, &BrowseRequest::FullTree)
        .await
        .unwrap();

    // The variable line is still printed, with the Unknown label, and the
    // value read proceeds normally.
    assert!(sink.infos().contains(
        &"  - Gauge (Variable) | NodeId: ns=2;s=Gauge | DataType: Double | Access: Unknown"
    ));
    assert!(sink.infos().contains(&"    Value: 7.25"));
}

// =============================================================================
// Type resolution fallback
// =============================================================================

#[tokio::test]
async fn unresolvable_data_type_renders_placeholder() {
    let session = MockSession::new();
    let gauge = NodeId::string(2, "Gauge");

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects").with_children(vec![gauge.clone()]),
        )
        .await;
    // The data-type reference points at a node that does not exist.
    session
        .insert(
            gauge,
            MockNodeSpec::variable(
                "Gauge",
                NodeId::numeric(0, 99999),
                AccessLevel::Mask(0x01),
                UaValue::Double(7.25),
            ),
        )
        .await;

    let mut sink = RecordingSink::new();
    run_browse(&session, &mut sink, &BrowseRequest::FullTree)
        .await
        .unwrap();

    let gauge_line = sink
        .infos()
        .iter()
        .find(|line| line.contains("- Gauge (Variable)"))
        .copied()
        .expect("the variable line must be printed");

    assert!(
        gauge_line.contains("| DataType: Unknown type ("),
        "placeholder expected in: {}",
        gauge_line
    );
    assert!(sink.infos().contains(&"    Value: 7.25"));
}
