//! Diagram graph value type and mutation operations

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use super::GraphError;

/// A model identifier, unique within one graph
///
/// Word writes these as brace-wrapped uppercase GUIDs. Uniqueness within the
/// graph is all that matters; ids are never compared across graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(pub String);

impl ModelId {
    /// Generate a fresh id in the SmartArt GUID format
    pub fn fresh() -> Self {
        ModelId(format!(
            "{{{}}}",
            Uuid::new_v4().to_string().to_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        ModelId(s.to_string())
    }
}

/// Role of a point in the diagram graph
///
/// Closed set: every graph operation matches exhaustively, so a new role is
/// a compile-time change rather than a silently ignored string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The single root of the data hierarchy; carries layout/style/color ids
    Document,
    /// One per caller-visible item; carries display text
    Data,
    /// Structural padding between a parent and child data node
    ParentTransition,
    /// Structural padding between adjacent sibling data nodes
    SiblingTransition,
    /// Rendering-only point consumed by the host layout engine
    Presentation,
}

impl NodeKind {
    /// The `type` attribute value written to XML, if any
    ///
    /// Data points carry no attribute (the schema default is `node`).
    pub fn type_attr(self) -> Option<&'static str> {
        match self {
            NodeKind::Document => Some("doc"),
            NodeKind::Data => None,
            NodeKind::ParentTransition => Some("parTrans"),
            NodeKind::SiblingTransition => Some("sibTrans"),
            NodeKind::Presentation => Some("pres"),
        }
    }
}

/// Kind of a directed connection between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Data hierarchy edge; carries sibling order and a transition pair
    ParentOf,
    /// Maps a data point to a presentation point that renders it
    PresentationOf,
    /// Hierarchy edge among presentation points
    PresentationParentOf,
}

impl ConnectionKind {
    pub fn type_attr(self) -> &'static str {
        match self {
            ConnectionKind::ParentOf => "parOf",
            ConnectionKind::PresentationOf => "presOf",
            ConnectionKind::PresentationParentOf => "presParOf",
        }
    }
}

/// Text frame of a data point
///
/// `prelude_xml` and `run_props_xml` hold the seed's `bodyPr`/`lstStyle` and
/// run-properties markup verbatim; only the run text itself is rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub prelude_xml: String,
    pub run_props_xml: String,
    pub text: String,
}

impl TextBody {
    /// The frame built when a seed point has no text at all
    pub fn plain(text: impl Into<String>) -> Self {
        TextBody {
            prelude_xml: "<a:bodyPr/><a:lstStyle/>".to_string(),
            run_props_xml: r#"<a:rPr lang="en-US"/>"#.to_string(),
            text: text.into(),
        }
    }
}

/// One point in the diagram graph
#[derive(Debug, Clone)]
pub struct Node {
    pub id: ModelId,
    pub kind: NodeKind,
    /// Transition points name the connection that owns them
    pub cxn_id: Option<ModelId>,
    /// Raw child XML of the point (property set, shape properties, extension
    /// lists), preserved verbatim; for data points this excludes the text
    /// frame, which lives in `text`
    pub props_xml: String,
    /// Text frame, data points only
    pub text: Option<TextBody>,
}

/// One directed edge in the diagram graph
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ModelId,
    pub kind: ConnectionKind,
    pub src: ModelId,
    pub dest: ModelId,
    pub src_ord: u32,
    pub dest_ord: u32,
    pub par_trans: Option<ModelId>,
    pub sib_trans: Option<ModelId>,
    /// Opaque layout identity carried by presentation edges
    pub pres_id: Option<String>,
    /// Whether the seed wrote an explicit `type="parOf"`; kept so
    /// serialization round-trips both Word writer variants
    pub explicit_type: bool,
}

/// A diagram's data+presentation graph
///
/// Pure value type: cloned from a seed, mutated during synthesis, serialized
/// once, then discarded. Point order follows the seed's `ptLst` order.
#[derive(Debug, Clone, Default)]
pub struct DiagramGraph {
    pub(super) nodes: Vec<Node>,
    pub(super) connections: Vec<Connection>,
    /// Raw trailing children of the data model root (`bg`, `whole`,
    /// extension lists), re-emitted after the connection list
    pub(super) trailer_xml: String,
}

impl DiagramGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Raw trailing root children preserved from the seed
    pub fn trailer_xml(&self) -> &str {
        &self.trailer_xml
    }

    pub fn node(&self, id: &ModelId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// The single document root, if present
    pub fn document_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Document)
    }

    pub fn data_node_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Data)
            .count()
    }

    /// Data node ids in depth-first order following `ParentOf` edges from
    /// the document root, siblings ordered by their ordering key
    ///
    /// This is sibling order for flat seeds, and for the radial seed it puts
    /// the designated center point before its spokes.
    pub fn data_nodes_in_order(&self) -> Vec<ModelId> {
        let mut out = Vec::new();
        let Some(doc) = self.document_node() else {
            return out;
        };
        let doc_id = doc.id.clone();
        self.walk_children(&doc_id, &mut out);
        out
    }

    fn walk_children(&self, parent: &ModelId, out: &mut Vec<ModelId>) {
        let mut children: Vec<(u32, &ModelId)> = self
            .connections
            .iter()
            .filter(|c| c.kind == ConnectionKind::ParentOf && &c.src == parent)
            .filter(|c| {
                self.node(&c.dest)
                    .map(|n| n.kind == NodeKind::Data)
                    .unwrap_or(false)
            })
            .map(|c| (c.src_ord, &c.dest))
            .collect();
        children.sort_by_key(|(ord, _)| *ord);
        for (_, child) in children {
            out.push(child.clone());
            self.walk_children(child, out);
        }
    }

    /// Set the display text of a data point
    ///
    /// Unknown ids and non-data points are left untouched.
    pub fn set_text(&mut self, id: &ModelId, text: &str) {
        if let Some(node) = self
            .nodes
            .iter_mut()
            .find(|n| &n.id == id && n.kind == NodeKind::Data)
        {
            match &mut node.text {
                Some(body) => body.text = text.to_string(),
                None => node.text = Some(TextBody::plain(text)),
            }
        }
    }

    /// Remove a data point and everything that hangs off it
    ///
    /// Cascades over the point's transition pair, every connection touching
    /// a removed point, the presentation points reachable from removed
    /// points via `presOf`, and the presentation hierarchy edges touching
    /// those. Removing an unknown id is a no-op.
    pub fn remove_data_node(&mut self, id: &ModelId) {
        let exists = self
            .nodes
            .iter()
            .any(|n| &n.id == id && n.kind == NodeKind::Data);
        if !exists {
            return;
        }

        let mut removed: HashSet<ModelId> = HashSet::new();
        removed.insert(id.clone());

        // Transition pair referenced by connections into or out of the node
        for cxn in &self.connections {
            if removed.contains(&cxn.src) || removed.contains(&cxn.dest) {
                if let Some(pt) = &cxn.par_trans {
                    removed.insert(pt.clone());
                }
                if let Some(st) = &cxn.sib_trans {
                    removed.insert(st.clone());
                }
            }
        }

        // Presentation points rendered for any removed point, transitively
        // through the presentation hierarchy
        let mut pres_removed: HashSet<ModelId> = self
            .connections
            .iter()
            .filter(|c| c.kind == ConnectionKind::PresentationOf && removed.contains(&c.src))
            .map(|c| c.dest.clone())
            .collect();
        loop {
            let grew: Vec<ModelId> = self
                .connections
                .iter()
                .filter(|c| {
                    c.kind == ConnectionKind::PresentationParentOf
                        && pres_removed.contains(&c.src)
                        && !pres_removed.contains(&c.dest)
                })
                .map(|c| c.dest.clone())
                .collect();
            if grew.is_empty() {
                break;
            }
            pres_removed.extend(grew);
        }
        removed.extend(pres_removed);

        self.connections
            .retain(|c| !removed.contains(&c.src) && !removed.contains(&c.dest));
        self.nodes.retain(|n| !removed.contains(&n.id));
    }

    /// Append a new data point cloned from `donor`
    ///
    /// The clone keeps the donor's payload verbatim under a fresh id, is
    /// attached under the donor's own parent with the next sibling ordering
    /// key, gets a fresh transition pair, and receives a full copy of the
    /// donor's presentation substructure with fresh ids. Presentation points
    /// are never built from scratch: their shape is whatever the seed
    /// demonstrated, which is the only shape the host is known to render.
    pub fn append_data_node(
        &mut self,
        donor: &ModelId,
        text: &str,
    ) -> Result<ModelId, GraphError> {
        let donor_node = self
            .nodes
            .iter()
            .find(|n| &n.id == donor && n.kind == NodeKind::Data)
            .ok_or_else(|| GraphError::UnknownNode {
                id: donor.to_string(),
            })?
            .clone();

        let parent = self
            .connections
            .iter()
            .find(|c| c.kind == ConnectionKind::ParentOf && &c.dest == donor)
            .map(|c| c.src.clone())
            .or_else(|| self.document_node().map(|n| n.id.clone()))
            .ok_or_else(|| GraphError::UnknownNode {
                id: donor.to_string(),
            })?;

        let next_ord = self.next_child_ord(&parent, ConnectionKind::ParentOf);

        let new_id = ModelId::fresh();
        let par_trans_id = ModelId::fresh();
        let sib_trans_id = ModelId::fresh();
        let cxn_id = ModelId::fresh();

        let mut new_node = donor_node;
        new_node.id = new_id.clone();
        new_node.text = Some(match new_node.text.take() {
            Some(mut body) => {
                body.text = text.to_string();
                body
            }
            None => TextBody::plain(text),
        });
        self.nodes.push(new_node);

        for (tid, kind) in [
            (&par_trans_id, NodeKind::ParentTransition),
            (&sib_trans_id, NodeKind::SiblingTransition),
        ] {
            self.nodes.push(Node {
                id: tid.clone(),
                kind,
                cxn_id: Some(cxn_id.clone()),
                props_xml: "<dgm:prSet/><dgm:spPr/>".to_string(),
                text: None,
            });
        }

        self.connections.push(Connection {
            id: cxn_id,
            kind: ConnectionKind::ParentOf,
            src: parent,
            dest: new_id.clone(),
            src_ord: next_ord,
            dest_ord: 0,
            par_trans: Some(par_trans_id),
            sib_trans: Some(sib_trans_id),
            pres_id: None,
            explicit_type: false,
        });

        self.clone_presentation_substructure(donor, &new_id);

        Ok(new_id)
    }

    /// Next free ordering key among `parent`'s children for `kind` edges
    fn next_child_ord(&self, parent: &ModelId, kind: ConnectionKind) -> u32 {
        self.connections
            .iter()
            .filter(|c| c.kind == kind && &c.src == parent)
            .map(|c| c.src_ord + 1)
            .max()
            .unwrap_or(0)
    }

    fn clone_presentation_substructure(&mut self, donor: &ModelId, new_id: &ModelId) {
        // Closure of the donor's presentation points: directly rendered ones
        // plus everything below them in the presentation hierarchy
        let mut donor_pres: HashSet<ModelId> = self
            .connections
            .iter()
            .filter(|c| c.kind == ConnectionKind::PresentationOf && &c.src == donor)
            .map(|c| c.dest.clone())
            .collect();
        loop {
            let grew: Vec<ModelId> = self
                .connections
                .iter()
                .filter(|c| {
                    c.kind == ConnectionKind::PresentationParentOf
                        && donor_pres.contains(&c.src)
                        && !donor_pres.contains(&c.dest)
                })
                .map(|c| c.dest.clone())
                .collect();
            if grew.is_empty() {
                break;
            }
            donor_pres.extend(grew);
        }
        if donor_pres.is_empty() {
            return;
        }

        let mapping: Vec<(ModelId, ModelId)> = donor_pres
            .iter()
            .map(|old| (old.clone(), ModelId::fresh()))
            .collect();
        let mapped = |id: &ModelId| -> Option<ModelId> {
            mapping
                .iter()
                .find(|(old, _)| old == id)
                .map(|(_, new)| new.clone())
        };

        // Clone the points, rewriting the opaque presAssocID back-reference
        // to the donor inside the copied payload
        let cloned_points: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| donor_pres.contains(&n.id))
            .map(|n| {
                let mut clone = n.clone();
                clone.id = mapped(&n.id).unwrap_or_else(ModelId::fresh);
                clone.props_xml = clone.props_xml.replace(donor.as_str(), new_id.as_str());
                clone
            })
            .collect();
        self.nodes.extend(cloned_points);

        // (connection, needs ordering key under a shared parent)
        let mut cloned_cxns: Vec<(Connection, bool)> = Vec::new();
        for cxn in &self.connections {
            match cxn.kind {
                ConnectionKind::PresentationOf if &cxn.src == donor => {
                    if let Some(dest) = mapped(&cxn.dest) {
                        let mut clone = cxn.clone();
                        clone.id = ModelId::fresh();
                        clone.src = new_id.clone();
                        clone.dest = dest;
                        cloned_cxns.push((clone, false));
                    }
                }
                ConnectionKind::PresentationParentOf => {
                    let src = mapped(&cxn.src);
                    let dest = mapped(&cxn.dest);
                    match (src, dest) {
                        // Edge fully inside the donor substructure keeps its
                        // relative ordering keys
                        (Some(src), Some(dest)) => {
                            let mut clone = cxn.clone();
                            clone.id = ModelId::fresh();
                            clone.src = src;
                            clone.dest = dest;
                            cloned_cxns.push((clone, false));
                        }
                        // Attachment edge from a shared presentation parent;
                        // the clone takes the next slot under that parent
                        (None, Some(dest)) => {
                            let mut clone = cxn.clone();
                            clone.id = ModelId::fresh();
                            clone.dest = dest;
                            cloned_cxns.push((clone, true));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        // Attachment ordering keys are allocated at push time so repeated
        // appends stack under the shared parent instead of colliding
        for (mut clone, reorder) in cloned_cxns {
            if reorder {
                clone.src_ord =
                    self.next_child_ord(&clone.src, ConnectionKind::PresentationParentOf);
            }
            self.connections.push(clone);
        }
    }

    /// Presentation points not reachable from any `presOf` edge
    ///
    /// A non-empty result is the documented invisible-diagram failure mode.
    pub fn orphaned_presentation_nodes(&self) -> Vec<&ModelId> {
        let rendered: HashSet<&ModelId> = self
            .connections
            .iter()
            .filter(|c| c.kind == ConnectionKind::PresentationOf)
            .map(|c| &c.dest)
            .collect();
        let attached: HashSet<&ModelId> = self
            .connections
            .iter()
            .filter(|c| c.kind == ConnectionKind::PresentationParentOf)
            .map(|c| &c.dest)
            .collect();
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Presentation)
            .filter(|n| !rendered.contains(&n.id) && !attached.contains(&n.id))
            .map(|n| &n.id)
            .collect()
    }

    /// Count of connection endpoints that name a point no longer in the graph
    pub fn dangling_endpoints(&self) -> usize {
        let ids: HashSet<&ModelId> = self.nodes.iter().map(|n| &n.id).collect();
        self.connections
            .iter()
            .map(|c| {
                usize::from(!ids.contains(&c.src)) + usize::from(!ids.contains(&c.dest))
            })
            .sum()
    }

    /// Serialize to diagram data XML bytes
    pub fn serialize(&self) -> Vec<u8> {
        super::xml::write_data_model(self).into_bytes()
    }
}
