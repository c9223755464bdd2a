//! Hierarchy synthesis: nested label structures over a tree-shaped seed

use log::debug;

use crate::model::{DiagramGraph, GraphError};
use crate::synth::Placement;

/// One node of a caller-supplied label tree
///
/// Order is significant at every level; children render in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyItem {
    pub label: String,
    pub children: Vec<HierarchyItem>,
}

impl HierarchyItem {
    /// A leaf item
    pub fn new(label: impl Into<String>) -> Self {
        HierarchyItem {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// An item with children
    pub fn with_children(label: impl Into<String>, children: Vec<HierarchyItem>) -> Self {
        HierarchyItem {
            label: label.into(),
            children,
        }
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.label);
        for child in &self.children {
            child.flatten_into(out);
        }
    }
}

/// Synthesize a hierarchy diagram by relabeling a cloned seed graph
///
/// The seed's data tree is walked depth-first (`ParentOf` edges in ordering
/// key order from the document root) in lockstep with a depth-first
/// flattening of the caller's tree. The walk is bounded by the seed's shape:
/// presentation substructure for shapes the seed never demonstrated cannot
/// be synthesized safely, so excess labels are dropped and reported through
/// the returned [`Placement`] rather than grown or raised as an error.
pub fn synthesize_hierarchy(
    seed: &DiagramGraph,
    items: &[HierarchyItem],
) -> Result<(DiagramGraph, Placement), GraphError> {
    let mut labels: Vec<&str> = Vec::new();
    for item in items {
        item.flatten_into(&mut labels);
    }

    let mut graph = seed.clone();
    let seed_order = graph.data_nodes_in_order();

    let placed = labels.len().min(seed_order.len());
    for (id, label) in seed_order.iter().zip(labels.iter()) {
        graph.set_text(id, label);
    }

    let placement = Placement {
        requested: labels.len(),
        placed,
    };
    if placement.truncated() {
        debug!(
            "hierarchy seed has {} slots; dropped {} excess labels",
            seed_order.len(),
            placement.requested - placement.placed
        );
    }
    Ok((graph, placement))
}
