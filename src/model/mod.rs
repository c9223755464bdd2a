//! In-memory diagram data model
//!
//! A SmartArt diagram is stored in its data part as a graph of typed points
//! and typed connections. Alongside the visible structure (a document root,
//! data points carrying text, transition points encoding hierarchy order)
//! the graph carries a presentation substructure that Word's layout engine
//! requires but no public schema describes. This module keeps that
//! substructure intact by treating point payloads as opaque XML and only
//! ever cloning presentation points from existing ones.

mod graph;
mod parse;
pub mod xml;

pub use graph::{Connection, ConnectionKind, DiagramGraph, ModelId, Node, NodeKind, TextBody};

use thiserror::Error;

/// Errors raised by graph parsing and mutation
#[derive(Debug, Error)]
pub enum GraphError {
    /// The seed data XML could not be parsed
    #[error("malformed diagram data XML: {0}")]
    MalformedSeed(String),

    /// The seed graph has no data nodes, so there is nothing to donate
    /// presentation structure for synthesis
    #[error("seed graph for '{topology}' contains no data nodes")]
    EmptyTopology { topology: String },

    /// The caller supplied no labels
    #[error("no labels supplied for diagram synthesis")]
    NoLabels,

    /// An operation referenced a node id that is not in the graph
    #[error("unknown node id: {id}")]
    UnknownNode { id: String },
}
