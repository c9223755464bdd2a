//! Flat synthesis: list, process, cycle, pyramid, and radial topologies

use log::debug;

use crate::model::{DiagramGraph, GraphError};
use crate::Topology;

/// Synthesize a flat diagram by relabeling a cloned seed graph
///
/// The seed's data nodes are visited in sibling order and given the caller's
/// labels. A longer label list grows the graph by cloning the seed's last
/// data node (its presentation substructure is the donor shape); a shorter
/// one shrinks it from the tail, so surviving items keep the presentation
/// points the seed assigned them.
///
/// Radial diagrams use this same algorithm; the caller prepends the center
/// label, which lands on the seed's designated center node because that node
/// sorts first in sibling order.
pub fn synthesize_flat(
    seed: &DiagramGraph,
    topology: Topology,
    labels: &[&str],
) -> Result<DiagramGraph, GraphError> {
    if labels.is_empty() {
        return Err(GraphError::NoLabels);
    }

    let mut graph = seed.clone();
    let seed_order = graph.data_nodes_in_order();
    if seed_order.is_empty() {
        return Err(GraphError::EmptyTopology {
            topology: topology.as_str().to_string(),
        });
    }

    for (id, label) in seed_order.iter().zip(labels.iter()) {
        graph.set_text(id, label);
    }

    if labels.len() < seed_order.len() {
        // Tail-first removal keeps the surviving items on their
        // seed-assigned presentation points
        for id in seed_order[labels.len()..].iter().rev() {
            graph.remove_data_node(id);
        }
    } else if labels.len() > seed_order.len() {
        let donor = seed_order
            .last()
            .cloned()
            .expect("seed order is non-empty");
        for label in &labels[seed_order.len()..] {
            graph.append_data_node(&donor, label)?;
        }
    }

    debug!(
        "synthesized flat '{}' graph: {} labels over {} seed nodes",
        topology.as_str(),
        labels.len(),
        seed_order.len()
    );
    Ok(graph)
}
