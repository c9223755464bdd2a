//! Parse, mutate, and serialize the diagram data graph

mod common;

use pretty_assertions::assert_eq;

use docx_smartart::model::{ConnectionKind, DiagramGraph, ModelId, NodeKind};

fn parse_flat(n: usize) -> DiagramGraph {
    DiagramGraph::parse(common::flat_seed_xml(n).as_bytes()).expect("fixture seed should parse")
}

#[test]
fn test_parse_flat_seed_counts() {
    let graph = parse_flat(4);
    // doc + pres root, then per item: data + parTrans + sibTrans + pres
    assert_eq!(graph.nodes().len(), 2 + 4 * 4);
    // presOf for the root, then per item: parOf + presOf + presParOf
    assert_eq!(graph.connections().len(), 1 + 4 * 3);
    assert_eq!(graph.data_node_count(), 4);
    assert_eq!(graph.dangling_endpoints(), 0);
    assert!(graph.orphaned_presentation_nodes().is_empty());
}

#[test]
fn test_parse_reads_text_and_sibling_order() {
    let graph = parse_flat(3);
    let order = graph.data_nodes_in_order();
    let labels: Vec<&str> = order
        .iter()
        .map(|id| {
            graph
                .node(id)
                .and_then(|n| n.text.as_ref())
                .map(|t| t.text.as_str())
                .unwrap_or("")
        })
        .collect();
    assert_eq!(labels, vec!["Item 1", "Item 2", "Item 3"]);
}

#[test]
fn test_missing_type_attribute_means_parent_of() {
    let graph = parse_flat(1);
    let cxn = graph
        .connections()
        .iter()
        .find(|c| c.id == ModelId::from("{C0}"))
        .expect("hierarchy edge present");
    assert_eq!(cxn.kind, ConnectionKind::ParentOf);
    assert!(!cxn.explicit_type);
}

#[test]
fn test_serialize_round_trips_through_parse() {
    let first = parse_flat(3);
    let bytes = first.serialize();
    let second = DiagramGraph::parse(&bytes).expect("own output should parse");

    assert_eq!(second.nodes().len(), first.nodes().len());
    assert_eq!(second.connections().len(), first.connections().len());
    assert_eq!(second.trailer_xml(), first.trailer_xml());
    for node in first.nodes() {
        let twin = second.node(&node.id).expect("point survives round trip");
        assert_eq!(twin.kind, node.kind);
        assert_eq!(twin.props_xml, node.props_xml);
        assert_eq!(twin.text, node.text);
    }
}

#[test]
fn test_serialize_omits_default_edge_type() {
    let xml = String::from_utf8(parse_flat(1).serialize()).unwrap();
    // the hierarchy edge came without type="parOf" and must stay that way
    assert!(xml.contains(r#"<dgm:cxn modelId="{C0}" srcId="{DOC}""#));
    assert!(!xml.contains(r#"type="parOf""#));
    // presentation edges always keep their type
    assert!(xml.contains(r#"type="presOf""#));
    assert!(xml.contains(r#"type="presParOf""#));
}

#[test]
fn test_removal_cascade_leaves_no_dangling_endpoints() {
    for n in [1usize, 2, 8, 50] {
        let mut graph = parse_flat(n);
        let victim = graph.data_nodes_in_order().last().cloned().unwrap();
        graph.remove_data_node(&victim);

        assert_eq!(graph.data_node_count(), n - 1, "seed size {n}");
        assert_eq!(graph.dangling_endpoints(), 0, "seed size {n}");
        assert!(graph.orphaned_presentation_nodes().is_empty(), "seed size {n}");
        // data point, transition pair, and presentation point all gone
        assert_eq!(graph.nodes().len(), 2 + 4 * (n - 1), "seed size {n}");
        assert_eq!(graph.connections().len(), 1 + 3 * (n - 1), "seed size {n}");
    }
}

#[test]
fn test_removing_middle_node_keeps_neighbours() {
    let mut graph = parse_flat(3);
    let order = graph.data_nodes_in_order();
    graph.remove_data_node(&order[1]);

    let survivors = graph.data_nodes_in_order();
    assert_eq!(survivors, vec![order[0].clone(), order[2].clone()]);
    assert_eq!(graph.dangling_endpoints(), 0);
}

#[test]
fn test_append_clones_presentation_substructure() {
    let mut graph = parse_flat(2);
    let donor = graph.data_nodes_in_order().last().cloned().unwrap();
    let new_id = graph.append_data_node(&donor, "Item 3").expect("append");

    assert_eq!(graph.data_node_count(), 3);
    assert_eq!(graph.dangling_endpoints(), 0);
    assert!(graph.orphaned_presentation_nodes().is_empty());

    // the clone is rendered by its own presentation point, not the donor's
    let pres_edge = graph
        .connections()
        .iter()
        .find(|c| c.kind == ConnectionKind::PresentationOf && c.src == new_id)
        .expect("clone has a presOf edge");
    let pres_node = graph.node(&pres_edge.dest).expect("cloned pres point");
    assert_eq!(pres_node.kind, NodeKind::Presentation);
    assert!(pres_node.props_xml.contains(new_id.as_str()));
    assert!(!pres_node.props_xml.contains(donor.as_str()));

    // attached under the shared presentation parent at the next slot
    let attach = graph
        .connections()
        .iter()
        .find(|c| c.kind == ConnectionKind::PresentationParentOf && c.dest == pres_edge.dest)
        .expect("clone attached in presentation hierarchy");
    assert_eq!(attach.src, ModelId::from("{PRESROOT}"));
    assert_eq!(attach.src_ord, 2);
}

#[test]
fn test_append_attaches_under_donor_parent() {
    let mut graph =
        DiagramGraph::parse(common::hierarchy_seed_xml().as_bytes()).expect("hierarchy seed");
    // donate from a leaf two levels down; the clone must become its sibling
    let donor = ModelId::from("{DA1}");
    let new_id = graph.append_data_node(&donor, "Grandchild 3").expect("append");

    let edge = graph
        .connections()
        .iter()
        .find(|c| c.kind == ConnectionKind::ParentOf && c.dest == new_id)
        .expect("hierarchy edge for the clone");
    assert_eq!(edge.src, ModelId::from("{DA}"));
    assert_eq!(edge.src_ord, 1);
    assert!(edge.par_trans.is_some());
    assert!(edge.sib_trans.is_some());
}

#[test]
fn test_repeated_appends_take_successive_slots() {
    let mut graph = parse_flat(1);
    let donor = graph.data_nodes_in_order()[0].clone();
    let a = graph.append_data_node(&donor, "Second").expect("append");
    let b = graph.append_data_node(&donor, "Third").expect("append");

    let ord_of = |id: &ModelId| {
        graph
            .connections()
            .iter()
            .find(|c| c.kind == ConnectionKind::ParentOf && &c.dest == id)
            .map(|c| c.src_ord)
            .unwrap()
    };
    assert_eq!(ord_of(&a), 1);
    assert_eq!(ord_of(&b), 2);
    assert_eq!(graph.dangling_endpoints(), 0);
    assert!(graph.orphaned_presentation_nodes().is_empty());
}
