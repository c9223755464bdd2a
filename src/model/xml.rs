//! DrawingML data XML writer
//!
//! Output is built as strings, mirroring how the seed parts are stored:
//! typed structure from the graph, opaque payloads spliced back in verbatim.

use super::graph::{Connection, DiagramGraph, Node};

/// OpenXML namespaces shared across the crate
pub mod ns {
    pub const DGM: &str = "http://schemas.openxmlformats.org/drawingml/2006/diagram";
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const WP: &str =
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Vendor namespace for the cached drawing part
    pub const DSP: &str = "http://schemas.microsoft.com/office/drawing/2008/diagram";
}

pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escape text content and attribute values
pub fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize a graph back to a diagram data part
pub fn write_data_model(graph: &DiagramGraph) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECL);
    out.push_str(&format!(
        r#"<dgm:dataModel xmlns:dgm="{}" xmlns:a="{}">"#,
        ns::DGM,
        ns::A
    ));

    out.push_str("<dgm:ptLst>");
    for node in graph.nodes() {
        write_point(&mut out, node);
    }
    out.push_str("</dgm:ptLst>");

    out.push_str("<dgm:cxnLst>");
    for cxn in graph.connections() {
        write_connection(&mut out, cxn);
    }
    out.push_str("</dgm:cxnLst>");

    out.push_str(graph.trailer_xml());
    out.push_str("</dgm:dataModel>");
    out
}

fn write_point(out: &mut String, node: &Node) {
    out.push_str(&format!(r#"<dgm:pt modelId="{}""#, xml_escape(node.id.as_str())));
    if let Some(ty) = node.kind.type_attr() {
        out.push_str(&format!(r#" type="{ty}""#));
    }
    if let Some(cxn_id) = &node.cxn_id {
        out.push_str(&format!(r#" cxnId="{}""#, xml_escape(cxn_id.as_str())));
    }
    out.push('>');
    out.push_str(&node.props_xml);
    if let Some(body) = &node.text {
        out.push_str("<dgm:t>");
        out.push_str(&body.prelude_xml);
        out.push_str("<a:p><a:r>");
        out.push_str(&body.run_props_xml);
        out.push_str(&format!("<a:t>{}</a:t>", xml_escape(&body.text)));
        out.push_str("</a:r></a:p>");
        out.push_str("</dgm:t>");
    }
    out.push_str("</dgm:pt>");
}

fn write_connection(out: &mut String, cxn: &Connection) {
    out.push_str(&format!(r#"<dgm:cxn modelId="{}""#, xml_escape(cxn.id.as_str())));
    if cxn.explicit_type || cxn.kind.type_attr() != "parOf" {
        out.push_str(&format!(r#" type="{}""#, cxn.kind.type_attr()));
    }
    out.push_str(&format!(
        r#" srcId="{}" destId="{}" srcOrd="{}" destOrd="{}""#,
        xml_escape(cxn.src.as_str()),
        xml_escape(cxn.dest.as_str()),
        cxn.src_ord,
        cxn.dest_ord
    ));
    if let Some(pt) = &cxn.par_trans {
        out.push_str(&format!(r#" parTransId="{}""#, xml_escape(pt.as_str())));
    }
    if let Some(st) = &cxn.sib_trans {
        out.push_str(&format!(r#" sibTransId="{}""#, xml_escape(st.as_str())));
    }
    if let Some(pres) = &cxn.pres_id {
        out.push_str(&format!(r#" presId="{}""#, xml_escape(pres)));
    }
    out.push_str("/>");
}
