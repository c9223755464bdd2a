//! Seed data XML parsing
//!
//! Seed graphs come out of Word-authored template documents. Point payloads
//! (property sets, shape properties, extension lists) follow a vendor schema
//! with no public documentation, so they are captured as raw byte slices of
//! the source text and carried verbatim; only the structure the synthesis
//! algorithms need (ids, roles, connections, text frames) is lifted into
//! typed form. Word writes these parts with the `dgm`/`a` prefixes, which
//! the raw slices rely on.

use roxmltree::{Document, Node as XmlNode};

use super::graph::{Connection, ConnectionKind, DiagramGraph, ModelId, Node, NodeKind, TextBody};
use super::GraphError;

const DGM_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/diagram";

impl DiagramGraph {
    /// Parse a diagram data part into a graph
    pub fn parse(xml: &[u8]) -> Result<DiagramGraph, GraphError> {
        let source = std::str::from_utf8(xml)
            .map_err(|e| GraphError::MalformedSeed(format!("not valid UTF-8: {e}")))?;
        let doc = Document::parse(source)
            .map_err(|e| GraphError::MalformedSeed(e.to_string()))?;
        let root = doc.root_element();
        if root.tag_name().name() != "dataModel" {
            return Err(GraphError::MalformedSeed(format!(
                "expected dgm:dataModel root, found {}",
                root.tag_name().name()
            )));
        }

        let mut graph = DiagramGraph::default();
        for child in root.children().filter(XmlNode::is_element) {
            match child.tag_name().name() {
                "ptLst" => {
                    for pt in child.children().filter(XmlNode::is_element) {
                        graph.nodes.push(parse_point(pt, source)?);
                    }
                }
                "cxnLst" => {
                    for cxn in child.children().filter(XmlNode::is_element) {
                        graph.connections.push(parse_connection(cxn)?);
                    }
                }
                // bg, whole, extension lists: opaque, re-emitted verbatim
                _ => graph.trailer_xml.push_str(raw(source, child)),
            }
        }
        Ok(graph)
    }
}

fn raw<'a>(source: &'a str, node: XmlNode<'a, 'a>) -> &'a str {
    &source[node.range()]
}

fn parse_point(pt: XmlNode, source: &str) -> Result<Node, GraphError> {
    let id = pt
        .attribute("modelId")
        .ok_or_else(|| GraphError::MalformedSeed("point without modelId".to_string()))?;
    let kind = match pt.attribute("type") {
        None | Some("node") | Some("asst") => NodeKind::Data,
        Some("doc") => NodeKind::Document,
        Some("parTrans") => NodeKind::ParentTransition,
        Some("sibTrans") => NodeKind::SiblingTransition,
        Some("pres") => NodeKind::Presentation,
        Some(other) => {
            return Err(GraphError::MalformedSeed(format!(
                "unknown point type '{other}' on {id}"
            )))
        }
    };

    let mut props_xml = String::new();
    let mut text = None;
    for child in pt.children().filter(XmlNode::is_element) {
        if kind == NodeKind::Data
            && child.tag_name().name() == "t"
            && child.tag_name().namespace() == Some(DGM_NS)
        {
            text = Some(parse_text_body(child, source));
        } else {
            props_xml.push_str(raw(source, child));
        }
    }

    Ok(Node {
        id: ModelId::from(id),
        kind,
        cxn_id: pt.attribute("cxnId").map(ModelId::from),
        props_xml,
        text,
    })
}

/// Split a data point's text frame into its opaque parts and the run text
fn parse_text_body(t: XmlNode, source: &str) -> TextBody {
    let mut prelude_xml = String::new();
    let mut run_props_xml = r#"<a:rPr lang="en-US"/>"#.to_string();
    let mut text = String::new();

    for child in t.children().filter(XmlNode::is_element) {
        if child.tag_name().name() != "p" {
            prelude_xml.push_str(raw(source, child));
            continue;
        }
        for run in child.children().filter(|n| n.tag_name().name() == "r") {
            for part in run.children().filter(XmlNode::is_element) {
                match part.tag_name().name() {
                    "rPr" => run_props_xml = raw(source, part).to_string(),
                    "t" => text.push_str(part.text().unwrap_or_default()),
                    _ => {}
                }
            }
            // One run is enough; synthesis overwrites the text anyway
            break;
        }
        break;
    }

    TextBody {
        prelude_xml,
        run_props_xml,
        text,
    }
}

fn parse_connection(cxn: XmlNode) -> Result<Connection, GraphError> {
    let id = cxn
        .attribute("modelId")
        .ok_or_else(|| GraphError::MalformedSeed("connection without modelId".to_string()))?;
    // The schema default for an absent type attribute is parOf; Word emits
    // both spellings depending on version
    let (kind, explicit_type) = match cxn.attribute("type") {
        None => (ConnectionKind::ParentOf, false),
        Some("parOf") => (ConnectionKind::ParentOf, true),
        Some("presOf") => (ConnectionKind::PresentationOf, true),
        Some("presParOf") => (ConnectionKind::PresentationParentOf, true),
        Some(other) => {
            return Err(GraphError::MalformedSeed(format!(
                "unknown connection type '{other}' on {id}"
            )))
        }
    };

    let ord = |name: &str| -> Result<u32, GraphError> {
        match cxn.attribute(name) {
            None => Ok(0),
            Some(v) => v.parse().map_err(|_| {
                GraphError::MalformedSeed(format!("bad {name} '{v}' on connection {id}"))
            }),
        }
    };

    Ok(Connection {
        id: ModelId::from(id),
        kind,
        src: cxn
            .attribute("srcId")
            .map(ModelId::from)
            .ok_or_else(|| GraphError::MalformedSeed(format!("connection {id} without srcId")))?,
        dest: cxn
            .attribute("destId")
            .map(ModelId::from)
            .ok_or_else(|| GraphError::MalformedSeed(format!("connection {id} without destId")))?,
        src_ord: ord("srcOrd")?,
        dest_ord: ord("destOrd")?,
        par_trans: cxn.attribute("parTransId").map(ModelId::from),
        sib_trans: cxn.attribute("sibTransId").map(ModelId::from),
        pres_id: cxn.attribute("presId").map(str::to_string),
        explicit_type,
    })
}
