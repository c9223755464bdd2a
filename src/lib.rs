//! docx-smartart - Native SmartArt diagrams for Word documents
//!
//! This library synthesizes DrawingML diagram graphs and injects them into
//! `.docx` containers as real, editable SmartArt objects rather than
//! embedded pictures. It works from template archives generated once,
//! offline, by the host application: each template donates a known-good seed
//! graph whose presentation substructure is edited in place, never rebuilt,
//! because the substructure's shape is undocumented and the host renders an
//! invisible zero-size region when it is wrong.
//!
//! # Example
//!
//! ```no_run
//! use docx_smartart::{add_process, DocxPackage, Extent, TemplateRepository};
//!
//! let mut repo = TemplateRepository::new("templates");
//! let mut doc = DocxPackage::new();
//! add_process(&mut doc, &mut repo, &[
//!     "Requirements",
//!     "Design",
//!     "Implementation",
//!     "Testing",
//! ], Extent::default()).unwrap();
//! doc.save("output.docx").unwrap();
//! ```

pub mod config;
pub mod model;
pub mod package;
pub mod synth;
pub mod template;

pub use config::{ConfigError, Defaults};
pub use model::{DiagramGraph, GraphError};
pub use package::{inject_diagram, DocxPackage, Extent, PackageError};
pub use synth::{synthesize_flat, synthesize_hierarchy, HierarchyItem, Placement};
pub use template::{ArtifactKind, TemplateBundle, TemplateError, TemplateRepository};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur across the synthesis and injection pipeline
#[derive(Debug, Error)]
pub enum SmartArtError {
    /// Template bundle missing or incomplete (deployment defect)
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Seed graph or caller input problem
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Target container cannot accept the new artifacts
    #[error("container error: {0}")]
    Package(#[from] PackageError),
}

/// The supported diagram topologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    List,
    Process,
    Hierarchy,
    Cycle,
    Pyramid,
    Radial,
}

/// Parse failure for a topology name
#[derive(Debug, Error)]
#[error("unknown topology '{0}', expected one of: list, process, hierarchy, cycle, pyramid, radial")]
pub struct UnknownTopology(String);

impl Topology {
    pub const ALL: [Topology; 6] = [
        Topology::List,
        Topology::Process,
        Topology::Hierarchy,
        Topology::Cycle,
        Topology::Pyramid,
        Topology::Radial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topology::List => "list",
            Topology::Process => "process",
            Topology::Hierarchy => "hierarchy",
            Topology::Cycle => "cycle",
            Topology::Pyramid => "pyramid",
            Topology::Radial => "radial",
        }
    }

    /// Layout identity of this topology in the host's layout registry
    ///
    /// Carried as opaque metadata; the layout definition itself always comes
    /// from the template bundle.
    pub fn layout_uri(self) -> &'static str {
        match self {
            Topology::List => "urn:microsoft.com/office/officeart/2005/8/layout/default",
            Topology::Process => "urn:microsoft.com/office/officeart/2005/8/layout/process1",
            Topology::Hierarchy => "urn:microsoft.com/office/officeart/2005/8/layout/hierarchy1",
            Topology::Cycle => "urn:microsoft.com/office/officeart/2005/8/layout/cycle1",
            Topology::Pyramid => "urn:microsoft.com/office/officeart/2005/8/layout/pyramid1",
            Topology::Radial => "urn:microsoft.com/office/officeart/2005/8/layout/radial1",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = UnknownTopology;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Topology::List),
            "process" => Ok(Topology::Process),
            "hierarchy" => Ok(Topology::Hierarchy),
            "cycle" => Ok(Topology::Cycle),
            "pyramid" => Ok(Topology::Pyramid),
            "radial" => Ok(Topology::Radial),
            other => Err(UnknownTopology(other.to_string())),
        }
    }
}

/// Synthesize and inject one flat-topology diagram
///
/// The shared pipeline behind the convenience entry points: load the
/// topology's bundle, parse its seed graph, relabel/resize it, and inject
/// the serialized result into the container.
pub fn add_flat_diagram(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    topology: Topology,
    labels: &[&str],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    let bundle = repository.load(topology)?;
    let seed = DiagramGraph::parse(bundle.artifact(ArtifactKind::Data))?;
    let graph = synthesize_flat(&seed, topology, labels)?;
    inject_diagram(package, bundle, graph.serialize(), extent)?;
    Ok(Placement::complete(labels.len()))
}

/// Add a Basic Block List diagram: one block per label
pub fn add_list(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    labels: &[&str],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    add_flat_diagram(package, repository, Topology::List, labels, extent)
}

/// Add a Basic Process diagram: a linear flow of sequential steps
pub fn add_process(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    labels: &[&str],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    add_flat_diagram(package, repository, Topology::Process, labels, extent)
}

/// Add a Cycle diagram: stages of a repeating process
pub fn add_cycle(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    labels: &[&str],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    add_flat_diagram(package, repository, Topology::Cycle, labels, extent)
}

/// Add a Pyramid diagram: labels from apex to base
pub fn add_pyramid(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    labels: &[&str],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    add_flat_diagram(package, repository, Topology::Pyramid, labels, extent)
}

/// Add a Radial diagram: a center label with radiating items
///
/// The center is prepended to the label sequence; flat synthesis then lands
/// it on the seed's designated center node, which sorts first in sibling
/// order.
pub fn add_radial(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    center: &str,
    labels: &[&str],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    let mut all: Vec<&str> = Vec::with_capacity(labels.len() + 1);
    all.push(center);
    all.extend_from_slice(labels);
    add_flat_diagram(package, repository, Topology::Radial, &all, extent)
}

/// Add a Hierarchy (org chart) diagram from a nested label tree
///
/// Placement is bounded by the seed's tree shape; compare the returned
/// [`Placement`] counts to detect dropped labels.
pub fn add_hierarchy(
    package: &mut DocxPackage,
    repository: &mut TemplateRepository,
    items: &[HierarchyItem],
    extent: Extent,
) -> Result<Placement, SmartArtError> {
    let bundle = repository.load(Topology::Hierarchy)?;
    let seed = DiagramGraph::parse(bundle.artifact(ArtifactKind::Data))?;
    let (graph, placement) = synthesize_hierarchy(&seed, items)?;
    inject_diagram(package, bundle, graph.serialize(), extent)?;
    Ok(placement)
}
