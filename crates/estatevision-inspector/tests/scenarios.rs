use estatevision_core::{AssetRecord, EdgeKind, NodeId, NodeKind};
use estatevision_events::Event;
use estatevision_graph::UboTarget;
use estatevision_graph::viewport::{MAX_SCALE, MIN_SCALE};
use estatevision_inspector::{InspectorSettings, OwnershipInspector};
use serde_json::json;

fn inspector() -> OwnershipInspector {
    OwnershipInspector::default().with_font(None)
}

fn mounted() -> OwnershipInspector {
    let mut inspector = inspector();
    inspector.mount(800, 600);
    inspector
}

fn record(value: serde_json::Value) -> anyhow::Result<AssetRecord> {
    Ok(AssetRecord::from_value(value)?)
}

fn scenario_a() -> anyhow::Result<AssetRecord> {
    record(json!({
        "id": "P1",
        "ownership": {
            "type": "individual",
            "name": "Mario",
            "surname": "Rossi",
            "ssn": "RSSMRA80A01H501U"
        }
    }))
}

fn scenario_c() -> anyhow::Result<AssetRecord> {
    record(json!({
        "id": "C1",
        "ownership": { "type": "company", "vatNumber": "IT12345678901" }
    }))
}

fn node_kinds(inspector: &OwnershipInspector) -> Vec<(String, NodeKind)> {
    inspector
        .graph()
        .nodes()
        .iter()
        .map(|node| (node.label.clone(), node.kind))
        .collect()
}

#[test]
fn test_scenario_a_individual_depth_one() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.set_depth(1);
    inspector.inspect(scenario_a()?);

    let graph = inspector.graph();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        node_kinds(&inspector),
        vec![
            ("Asset Unknown".to_string(), NodeKind::ASSET),
            ("Mario Rossi".to_string(), NodeKind::PERSON),
        ]
    );
    let edge = &graph.edges()[0];
    assert_eq!(edge.kind, EdgeKind::OWNS);
    assert_eq!(edge.label, "100% ownership");
    assert_eq!(inspector.positions().len(), 2);
    Ok(())
}

#[test]
fn test_scenario_b_individual_depth_two() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.inspect(scenario_a()?);
    assert_eq!(inspector.depth().get(), 2);

    let graph = inspector.graph();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    let trust = &graph.nodes()[2];
    assert_eq!(trust.label, "Rossi Family Trust");
    assert_eq!(trust.kind, NodeKind::LEGAL);
    let controls = &graph.edges()[1];
    assert_eq!(controls.kind, EdgeKind::CONTROLS);
    assert_eq!(controls.to, graph.nodes()[1].id);
    Ok(())
}

#[test]
fn test_scenario_c_company_depth_three() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.set_depth(3);
    inspector.inspect(scenario_c()?);

    assert_eq!(
        node_kinds(&inspector),
        vec![
            ("Asset Unknown".to_string(), NodeKind::ASSET),
            ("IT12345678901".to_string(), NodeKind::COMPANY),
            ("Holding Company".to_string(), NodeKind::COMPANY),
            ("Ultimate Beneficial Owner".to_string(), NodeKind::PERSON),
        ]
    );
    let graph = inspector.graph();
    assert_eq!(graph.edge_count(), 3);

    // The UBO edge lands on the holding company.
    let ubo = &graph.edges()[2];
    assert_eq!(ubo.label, "UBO");
    assert_eq!(ubo.to, graph.nodes()[2].id);
    assert_eq!(graph.dangling_edges().count(), 0);
    Ok(())
}

#[test]
fn test_scenario_c_detached_ubo_is_skipped() -> anyhow::Result<()> {
    let settings = InspectorSettings {
        ubo_target: UboTarget::Detached,
        ..InspectorSettings::default()
    };
    let mut inspector = OwnershipInspector::new(settings).with_font(None);
    inspector.mount(800, 600);
    inspector.set_depth(3);
    inspector.events().drain();
    inspector.inspect(scenario_c()?);

    let graph = inspector.graph();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.dangling_edges().count(), 1);
    let ubo_target = &graph.edges()[2].to;
    assert!(!graph.contains(ubo_target));
    assert!(!inspector.positions().contains_key(ubo_target));

    let rebuilt = inspector.events().drain().into_iter().find_map(|event| match event {
        Event::GraphRebuilt { dangling_edges, .. } => Some(dangling_edges),
        _ => None,
    });
    assert_eq!(rebuilt, Some(1));
    // Rendering a dangling edge must not fail; the export still works.
    assert!(!inspector.export_image()?.is_empty());
    Ok(())
}

#[test]
fn test_scenario_d_unknown_owner() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.set_depth(1);
    inspector.inspect(record(json!({ "id": "U1" }))?);

    let graph = inspector.graph();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.nodes()[1].label, "Unknown Owner");
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges()[0].label, "Ownership Unknown");
    Ok(())
}

#[test]
fn test_non_object_ownership_shows_asset_only() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.set_depth(3);
    inspector.inspect(record(json!({ "id": "U2", "ownership": "private" }))?);

    let graph = inspector.graph();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes()[0].kind, NodeKind::ASSET);
    assert_eq!(graph.edge_count(), 0);
    Ok(())
}

#[test]
fn test_depth_changes_rebuild_as_superset() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.set_depth(1);
    inspector.inspect(scenario_c()?);
    let shallow: Vec<NodeId> = inspector.graph().nodes().iter().map(|n| n.id.clone()).collect();

    inspector.set_depth(3);
    let deep = inspector.graph();
    assert!(shallow.iter().all(|id| deep.contains(id)));
    assert_eq!(deep.node_count(), 4);
    Ok(())
}

#[test]
fn test_malformed_record_degrades_to_placeholders() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.inspect(record(json!({
        "pid_pg_parcels_251001": 4471,
        "ownership": { "type": "individual" }
    }))?);

    let graph = inspector.graph();
    assert_eq!(graph.nodes()[0].id.as_str(), "4471");
    assert_eq!(graph.nodes()[1].label, "N/A N/A");
    assert_eq!(graph.nodes()[2].label, "N/A Family Trust");

    let header = inspector.asset_header().expect("record is loaded");
    assert_eq!(header.title, "Asset: Unknown");
    assert_eq!(header.id, "ID: 4471");
    assert_eq!(header.location, "Location: N/A");
    Ok(())
}

#[test]
fn test_drag_moves_one_node_without_layout() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.inspect(scenario_a()?);
    let owner = inspector.graph().nodes()[1].id.clone();
    let before = inspector.positions().clone();
    let start = before[&owner];
    inspector.events().drain();

    inspector.pointer_down(start.x, start.y);
    inspector.pointer_move(start.x + 40.0, start.y - 25.0);
    inspector.pointer_up();

    let after = inspector.positions();
    assert!((after[&owner].x - (start.x + 40.0)).abs() < 1e-3);
    assert!((after[&owner].y - (start.y - 25.0)).abs() < 1e-3);
    for (id, pos) in &before {
        if id != &owner {
            assert_eq!(after[id], *pos);
        }
    }

    let events = inspector.events().drain();
    assert!(events.iter().any(|e| matches!(e, Event::NodeMoved { id, .. } if id == &owner)));
    assert!(!events.iter().any(|e| matches!(e, Event::LayoutCompleted { .. })));
    Ok(())
}

#[test]
fn test_long_drag_publishes_one_event() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.inspect(scenario_a()?);
    let owner = inspector.graph().nodes()[1].id.clone();
    let start = inspector.positions()[&owner];
    inspector.events().drain();

    inspector.pointer_down(start.x, start.y);
    for step in 1..=500 {
        inspector.pointer_move(start.x + step as f32 * 0.1, start.y);
        assert!(inspector.events().receiver().is_empty());
    }
    inspector.pointer_up();

    let events = inspector.events().drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::NodeMoved { id, x, y } => {
            assert_eq!(id, &owner);
            assert!((x - (start.x + 50.0)).abs() < 1e-2);
            assert!((y - start.y).abs() < 1e-3);
        }
        other => panic!("Expected NodeMoved, got {other:?}"),
    }

    // A press and release without movement is silent.
    inspector.pointer_down(start.x + 50.0, start.y);
    inspector.pointer_up();
    assert!(inspector.events().drain().is_empty());
    Ok(())
}

#[test]
fn test_click_selects_node_and_fills_details() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.inspect(scenario_a()?);
    let owner = inspector.graph().nodes()[1].id.clone();
    let pos = inspector.positions()[&owner];
    inspector.events().drain();

    inspector.click(pos.x + 5.0, pos.y + 5.0);
    assert_eq!(inspector.selected(), Some(&owner));
    let details = inspector.selected_details().expect("a node is selected");
    assert_eq!(details.title, "Mario Rossi");
    assert_eq!(details.value("SSN (Codice Fiscale)"), Some("RSSMRA80A01H501U"));
    assert_eq!(details.value("Ownership"), Some("100%"));

    let events = inspector.events().drain();
    assert!(matches!(&events[0], Event::NodeSelected { id } if id == &owner));
    assert!(matches!(events[1], Event::Rendered));

    // A rebuild drops the selection.
    inspector.set_depth(1);
    assert_eq!(inspector.selected(), None);
    Ok(())
}

#[test]
fn test_wheel_clamps_and_reset_restores() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.inspect(scenario_a()?);

    for _ in 0..40 {
        assert!(inspector.wheel(120.0));
    }
    assert_eq!(inspector.viewport().scale(), MIN_SCALE);
    for _ in 0..40 {
        assert!(inspector.wheel(-120.0));
    }
    assert_eq!(inspector.viewport().scale(), MAX_SCALE);

    inspector.reset();
    assert_eq!(inspector.viewport().scale(), 1.0);
    assert_eq!(inspector.positions().len(), 3);
    Ok(())
}

#[test]
fn test_spacing_relayout_keeps_graph() -> anyhow::Result<()> {
    let mut inspector = mounted();
    inspector.set_depth(1);
    inspector.inspect(scenario_a()?);
    let ids: Vec<NodeId> = inspector.graph().nodes().iter().map(|n| n.id.clone()).collect();
    let near = inspector.positions()[&ids[0]].distance(inspector.positions()[&ids[1]]);
    inspector.events().drain();

    inspector.set_spacing(150.0);
    let far = inspector.positions()[&ids[0]].distance(inspector.positions()[&ids[1]]);
    assert!(far > near);

    let events = inspector.events().drain();
    assert!(!events.iter().any(|e| matches!(e, Event::GraphRebuilt { .. })));
    assert!(events.iter().any(|e| matches!(e, Event::LayoutCompleted { .. })));
    Ok(())
}

#[test]
fn test_export_png_matches_surface() -> anyhow::Result<()> {
    let mut inspector = inspector();
    inspector.mount(320, 240);
    inspector.inspect(scenario_c()?);

    let bytes = inspector.export_image()?;
    let decoded = image::load_from_memory(&bytes)?;
    assert_eq!((decoded.width(), decoded.height()), (320, 240));

    // Something other than the transparent background was painted.
    let rgba = decoded.to_rgba8();
    assert!(rgba.pixels().any(|p| p.0[3] != 0));
    Ok(())
}
