// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for the browse engine: traversal order, depth
//! limiting, target resolution, and failure recovery.

use uascope_opcua::types::NodeId;
use uascope_opcua::{run_browse, BrowseRequest};

use uascope_tests::common::{
    cyclic_address_space, deep_chains, reference_address_space, MockNodeSpec, MockSession,
    RecordingSink,
};

async fn browse(session: &MockSession, request: BrowseRequest) -> RecordingSink {
    let mut sink = RecordingSink::new();
    run_browse(session, &mut sink, &request)
        .await
        .expect("browse entry point should be reachable");
    sink
}

// =============================================================================
// Full tree
// =============================================================================

#[tokio::test]
async fn full_tree_prints_reference_space_in_order() {
    let session = reference_address_space().await;
    let sink = browse(&session, BrowseRequest::FullTree).await;

    let expected = vec![
        "Browsing all from root...",
        "- Objects (Object) | NodeId: i=85",
        "  - Temperature (Variable) | NodeId: ns=2;s=Temperature \
         | DataType: Double | Access: Read-only",
        "    Value: 21.5",
        "  - Controller (Object) | NodeId: ns=2;s=Controller",
        "    - Start (Method) | NodeId: ns=2;s=Controller.Start",
        "    - Status (Variable) | NodeId: ns=2;s=Controller.Status \
         | DataType: Boolean | Access: Writable",
        "      Value: true",
    ];

    assert_eq!(sink.infos(), expected);
    assert!(sink.warns().is_empty());
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn full_tree_terminates_on_cycles() {
    let session = cyclic_address_space().await;
    let sink = browse(&session, BrowseRequest::FullTree).await;

    let objects_lines = sink
        .infos()
        .iter()
        .filter(|line| line.contains("- Objects (Object)"))
        .count();
    assert_eq!(objects_lines, 1, "Objects must be printed exactly once");

    let plant_lines = sink
        .infos()
        .iter()
        .filter(|line| line.contains("- Plant (Object)"))
        .count();
    assert_eq!(plant_lines, 1);
}

// =============================================================================
// Depth limiting
// =============================================================================

#[tokio::test]
async fn enum_objects_depth_zero_prints_only_top_level() {
    let session = reference_address_space().await;
    let sink = browse(&session, BrowseRequest::EnumerateObjects { depth_limit: 0 }).await;

    let expected = vec![
        "Enumerating Objects (depth 0):",
        "- Temperature (Variable) | NodeId: ns=2;s=Temperature \
         | DataType: Double | Access: Read-only",
        "  Value: 21.5",
        "- Controller (Object) | NodeId: ns=2;s=Controller",
    ];

    assert_eq!(sink.infos(), expected);
    assert!(!sink.contains("Start"), "depth 1 nodes must not appear");
    assert!(!sink.contains("Status"), "depth 1 nodes must not appear");
}

#[tokio::test]
async fn enum_objects_depth_is_exact() {
    let session = deep_chains().await;
    let sink = browse(&session, BrowseRequest::EnumerateObjects { depth_limit: 1 }).await;

    let expected = vec![
        "Enumerating Objects (depth 1):",
        "- LineA (Object) | NodeId: ns=2;s=LineA",
        "  - Seg1 (Object) | NodeId: ns=2;s=LineA.Seg1",
        "- LineB (Object) | NodeId: ns=2;s=LineB",
        "  - Seg1 (Object) | NodeId: ns=2;s=LineB.Seg1",
    ];

    // Nodes at depth exactly 1 are printed, their children are not.
    assert_eq!(sink.infos(), expected);
    assert!(!sink.contains("Seg2"));
}

#[tokio::test]
async fn depth_cutoff_suppresses_reads_beyond_limit() {
    let session = deep_chains().await;
    let sink = browse(&session, BrowseRequest::EnumerateObjects { depth_limit: 0 }).await;

    assert!(!sink.contains("Seg1"));

    // One browse-name probe plus class and name per top-level child; the
    // segments past the cutoff are never read at all.
    assert_eq!(session.read_count(), 6);
}

#[tokio::test]
async fn enum_objects_resets_depth_per_top_level_child() {
    let session = deep_chains().await;
    let sink = browse(&session, BrowseRequest::EnumerateObjects { depth_limit: 1 }).await;

    // LineB's Seg1 sits deeper in absolute terms than LineA's tail, but it
    // is depth 1 under its own enumerated parent and must be indented as
    // such.
    assert!(sink
        .infos()
        .contains(&"  - Seg1 (Object) | NodeId: ns=2;s=LineB.Seg1"));
}

#[tokio::test]
async fn enum_objects_skips_broken_top_level_child() {
    let session = deep_chains().await;
    session
        .fail_attribute_reads(&NodeId::string(2, "LineA"))
        .await;

    let sink = browse(&session, BrowseRequest::EnumerateObjects { depth_limit: 1 }).await;

    assert_eq!(sink.warns().len(), 1);
    assert!(sink.warns()[0].starts_with("Could not browse child node:"));
    assert!(
        sink.contains("- LineB (Object)"),
        "enumeration must continue with the next child"
    );
}

// =============================================================================
// Show object
// =============================================================================

#[tokio::test]
async fn show_object_by_name_prints_only_that_subtree() {
    let session = reference_address_space().await;
    let sink = browse(
        &session,
        BrowseRequest::ShowObject {
            target: "Controller".to_string(),
        },
    )
    .await;

    let expected = vec![
        "Browsing object: Controller | NodeId: ns=2;s=Controller",
        "- Controller (Object) | NodeId: ns=2;s=Controller",
        "  - Start (Method) | NodeId: ns=2;s=Controller.Start",
        "  - Status (Variable) | NodeId: ns=2;s=Controller.Status \
         | DataType: Boolean | Access: Writable",
        "    Value: true",
    ];

    assert_eq!(sink.infos(), expected);
    assert!(!sink.contains("Temperature"));
}

#[tokio::test]
async fn show_object_by_identifier() {
    let session = reference_address_space().await;
    let sink = browse(
        &session,
        BrowseRequest::ShowObject {
            target: "ns=2;s=Temperature".to_string(),
        },
    )
    .await;

    assert_eq!(
        sink.infos()[0],
        "Browsing object: Temperature | NodeId: ns=2;s=Temperature"
    );
    assert!(sink.contains("Value: 21.5"));
}

#[tokio::test]
async fn show_object_identifier_wins_over_name() {
    let session = MockSession::new();

    // A real node addressed ns=9;i=7, and an Objects child whose browse
    // name is the same text. The identifier lookup must win.
    let hidden = NodeId::numeric(9, 7);
    let decoy = NodeId::string(2, "Decoy");

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects").with_children(vec![decoy.clone()]),
        )
        .await;
    session.insert(hidden, MockNodeSpec::object("Hidden")).await;
    session.insert(decoy, MockNodeSpec::object("ns=9;i=7")).await;

    let sink = browse(
        &session,
        BrowseRequest::ShowObject {
            target: "ns=9;i=7".to_string(),
        },
    )
    .await;

    assert_eq!(
        sink.infos()[0],
        "Browsing object: Hidden | NodeId: ns=9;i=7"
    );
    assert!(!sink.contains("Decoy"));
}

#[tokio::test]
async fn show_object_falls_back_to_name_when_identifier_is_stale() {
    let session = reference_address_space().await;

    // Parses as a node ID but no such node exists; the browse-name probe
    // fails and resolution falls through to the name search (which also
    // finds nothing here).
    let sink = browse(
        &session,
        BrowseRequest::ShowObject {
            target: "ns=5;i=4242".to_string(),
        },
    )
    .await;

    assert_eq!(sink.errors(), vec!["Object 'ns=5;i=4242' not found."]);
}

#[tokio::test]
async fn show_object_not_found_reports_once() {
    let session = reference_address_space().await;
    let sink = browse(
        &session,
        BrowseRequest::ShowObject {
            target: "DoesNotExist".to_string(),
        },
    )
    .await;

    assert_eq!(sink.errors(), vec!["Object 'DoesNotExist' not found."]);
    assert!(sink.infos().is_empty(), "no traversal output is produced");
}

// =============================================================================
// Failure recovery
// =============================================================================

#[tokio::test]
async fn value_read_failure_keeps_metadata_line_and_siblings() {
    let session = reference_address_space().await;
    session
        .fail_value_read(&NodeId::string(2, "Temperature"))
        .await;

    let sink = browse(&session, BrowseRequest::FullTree).await;

    // The metadata line survives.
    assert!(sink.infos().iter().any(|line| line.starts_with(
        "  - Temperature (Variable) | NodeId: ns=2;s=Temperature"
    )));

    // The value line is replaced by a warning at the value line's indent.
    assert_eq!(sink.warns().len(), 1);
    assert!(sink.warns()[0].starts_with("    Could not read value:"));

    // The next sibling subtree is unaffected.
    assert!(sink.contains("- Controller (Object)"));
    assert!(sink.contains("Value: true"));
}

#[tokio::test]
async fn node_access_failure_aborts_only_that_subtree() {
    let session = reference_address_space().await;
    session
        .fail_attribute_reads(&NodeId::string(2, "Controller"))
        .await;

    let sink = browse(&session, BrowseRequest::FullTree).await;

    assert_eq!(sink.errors().len(), 1);
    assert!(sink.errors()[0].starts_with("  Error browsing node:"));

    // The sibling printed before the failure is intact.
    assert!(sink.contains("- Temperature (Variable)"));
    assert!(sink.contains("Value: 21.5"));

    // Nothing below the failed node appears.
    assert!(!sink.contains("Start"));
    assert!(!sink.contains("Status"));
}

#[tokio::test]
async fn method_enumeration_failure_degrades_to_warning() {
    let session = reference_address_space().await;
    session
        .fail_method_enumeration(&NodeId::string(2, "Controller"))
        .await;

    let sink = browse(&session, BrowseRequest::FullTree).await;

    assert!(sink
        .warns()
        .iter()
        .any(|line| line.contains("Could not fetch methods:")));

    // Structural children still browse.
    assert!(sink.contains("- Status (Variable)"));
    assert!(!sink.contains("- Start (Method)"));
}

#[tokio::test]
async fn connection_loss_aborts_the_walk() {
    let session = reference_address_space().await;

    // Objects resolves (2 reads), Temperature's class resolves (1 read),
    // then the connection drops: one error line, nothing after it.
    session.lose_connection_after(3);

    let sink = browse(&session, BrowseRequest::FullTree).await;

    assert_eq!(sink.errors().len(), 1);
    assert!(sink.errors()[0].contains("Not connected to server"));

    // Pending siblings are not visited once the run is dead.
    assert!(!sink.contains("- Controller (Object)"));
}

#[tokio::test]
async fn unknown_node_class_is_printed_not_skipped() {
    let session = MockSession::new();
    let oddity = NodeId::numeric(7, 42);

    session
        .insert(
            NodeId::OBJECTS_FOLDER,
            MockNodeSpec::object("Objects").with_children(vec![oddity.clone()]),
        )
        .await;
    session
        .insert(oddity, MockNodeSpec::object("Oddity").with_unknown_class())
        .await;

    let sink = browse(&session, BrowseRequest::FullTree).await;

    assert!(sink
        .infos()
        .contains(&"  - Oddity (Unknown) | NodeId: ns=7;i=42"));
}
