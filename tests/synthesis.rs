//! Graph synthesis from seed graphs: flat label runs, hierarchies, radial

mod common;

use pretty_assertions::assert_eq;

use docx_smartart::model::{ConnectionKind, DiagramGraph, ModelId};
use docx_smartart::{synthesize_flat, synthesize_hierarchy, GraphError, HierarchyItem, Topology};

fn labels_in_order(graph: &DiagramGraph) -> Vec<String> {
    graph
        .data_nodes_in_order()
        .iter()
        .map(|id| {
            graph
                .node(id)
                .and_then(|n| n.text.as_ref())
                .map(|t| t.text.clone())
                .unwrap_or_default()
        })
        .collect()
}

#[test]
fn test_flat_synthesis_matches_label_count() {
    let seed = DiagramGraph::parse(common::flat_seed_xml(4).as_bytes()).unwrap();
    for count in [1usize, 3, 4, 7] {
        let labels: Vec<String> = (1..=count).map(|i| format!("Step {i}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let graph = synthesize_flat(&seed, Topology::Process, &refs).expect("synthesize");

        assert_eq!(graph.data_node_count(), count, "label count {count}");
        assert_eq!(labels_in_order(&graph), labels, "label count {count}");
        assert_eq!(graph.dangling_endpoints(), 0, "label count {count}");
        assert!(
            graph.orphaned_presentation_nodes().is_empty(),
            "label count {count}"
        );
    }
}

#[test]
fn test_flat_synthesis_shrink_then_grow_is_stable() {
    let seed = DiagramGraph::parse(common::flat_seed_xml(8).as_bytes()).unwrap();
    let eight: Vec<String> = (1..=8).map(|i| format!("L{i}")).collect();
    let eight_refs: Vec<&str> = eight.iter().map(String::as_str).collect();

    let full = synthesize_flat(&seed, Topology::List, &eight_refs).unwrap();
    assert_eq!(full.data_node_count(), 8);

    let small = synthesize_flat(&seed, Topology::List, &eight_refs[..3]).unwrap();
    assert_eq!(small.data_node_count(), 3);
    assert_eq!(small.dangling_endpoints(), 0);
    assert!(small.orphaned_presentation_nodes().is_empty());

    // shrinking never leaks into the seed; the full width is still available
    let again = synthesize_flat(&seed, Topology::List, &eight_refs).unwrap();
    assert_eq!(labels_in_order(&again), eight);
}

#[test]
fn test_flat_synthesis_grows_past_seed_width() {
    let seed = DiagramGraph::parse(common::flat_seed_xml(3).as_bytes()).unwrap();
    let labels = ["A", "B", "C", "D", "E"];
    let graph = synthesize_flat(&seed, Topology::List, &labels).unwrap();

    assert_eq!(graph.data_node_count(), 5);
    assert_eq!(labels_in_order(&graph), labels);
    assert_eq!(graph.dangling_endpoints(), 0);
    assert!(graph.orphaned_presentation_nodes().is_empty());
    // every grown point is rendered by its own presentation point
    let pres_count = graph
        .connections()
        .iter()
        .filter(|c| c.kind == ConnectionKind::PresentationOf)
        .count();
    assert_eq!(pres_count, 1 + 5);
}

#[test]
fn test_flat_synthesis_rejects_empty_labels() {
    let seed = DiagramGraph::parse(common::flat_seed_xml(2).as_bytes()).unwrap();
    let err = synthesize_flat(&seed, Topology::List, &[]).unwrap_err();
    assert!(matches!(err, GraphError::NoLabels));
}

#[test]
fn test_flat_synthesis_rejects_dataless_seed() {
    let seed = DiagramGraph::parse(common::flat_seed_xml(0).as_bytes()).unwrap();
    let err = synthesize_flat(&seed, Topology::Cycle, &["A"]).unwrap_err();
    match err {
        GraphError::EmptyTopology { topology } => assert_eq!(topology, "cycle"),
        other => panic!("expected EmptyTopology, got {other:?}"),
    }
}

#[test]
fn test_radial_center_label_lands_on_center_point() {
    let seed = DiagramGraph::parse(common::radial_seed_xml().as_bytes()).unwrap();
    let graph = synthesize_flat(&seed, Topology::Radial, &["Hub", "A", "B", "C"]).unwrap();

    assert_eq!(labels_in_order(&graph), vec!["Hub", "A", "B", "C"]);

    // "Hub" sits on the seed's designated center, whose presentation point
    // carries the center style
    let center = &graph.data_nodes_in_order()[0];
    assert_eq!(center, &ModelId::from("{DC}"));
    let pres = graph
        .connections()
        .iter()
        .find(|c| c.kind == ConnectionKind::PresentationOf && &c.src == center)
        .map(|c| graph.node(&c.dest).unwrap())
        .expect("center presentation point");
    assert!(pres.props_xml.contains("centerShape"));
}

#[test]
fn test_hierarchy_fills_slots_in_depth_first_order() {
    let seed = DiagramGraph::parse(common::hierarchy_seed_xml().as_bytes()).unwrap();
    let items = vec![HierarchyItem::with_children(
        "CEO",
        vec![
            HierarchyItem::with_children("VP Eng", vec![HierarchyItem::new("Lead")]),
            HierarchyItem::with_children("VP Sales", vec![HierarchyItem::new("Rep")]),
        ],
    )];
    let (graph, placement) = synthesize_hierarchy(&seed, &items).unwrap();

    assert_eq!(placement.requested, 5);
    assert_eq!(placement.placed, 5);
    assert!(!placement.truncated());
    assert_eq!(
        labels_in_order(&graph),
        vec!["CEO", "VP Eng", "Lead", "VP Sales", "Rep"]
    );
}

#[test]
fn test_hierarchy_overflow_reports_truncation() {
    let seed = DiagramGraph::parse(common::hierarchy_seed_xml().as_bytes()).unwrap();
    let items: Vec<HierarchyItem> = (1..=7)
        .map(|i| HierarchyItem::new(format!("Team {i}")))
        .collect();
    let (graph, placement) = synthesize_hierarchy(&seed, &items).unwrap();

    assert_eq!(placement.requested, 7);
    assert_eq!(placement.placed, 5);
    assert!(placement.truncated());
    assert_eq!(graph.data_node_count(), 5);
    assert_eq!(
        labels_in_order(&graph),
        vec!["Team 1", "Team 2", "Team 3", "Team 4", "Team 5"]
    );
}

#[test]
fn test_hierarchy_underflow_leaves_surplus_slots() {
    let seed = DiagramGraph::parse(common::hierarchy_seed_xml().as_bytes()).unwrap();
    let items = vec![HierarchyItem::new("Solo")];
    let (graph, placement) = synthesize_hierarchy(&seed, &items).unwrap();

    assert_eq!(placement.placed, 1);
    assert!(!placement.truncated());
    // surplus slots keep their seed text; the shape is never restructured
    assert_eq!(graph.data_node_count(), 5);
    assert_eq!(labels_in_order(&graph)[0], "Solo");
}
