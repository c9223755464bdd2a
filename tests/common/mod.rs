//! Shared fixtures: seed data XML and in-memory template archives
//!
//! The real template bundles are produced offline by the host application.
//! These fixtures reproduce the structural shape of those bundles (data
//! graph with a full presentation substructure, five artifacts, mixed-
//! namespace relationship manifest) so the pipeline can be exercised
//! without the host.
#![allow(dead_code)]

use std::io::Write;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use docx_smartart::{TemplateRepository, Topology};

pub const OPEN_RT_DATA: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/diagramData";
pub const OPEN_RT_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/diagramLayout";
pub const VENDOR_RT_STYLE: &str =
    "http://schemas.microsoft.com/office/2007/relationships/diagramQuickStyle";
pub const VENDOR_RT_COLORS: &str =
    "http://schemas.microsoft.com/office/2007/relationships/diagramColors";
pub const VENDOR_RT_DRAWING: &str =
    "http://schemas.microsoft.com/office/2007/relationships/diagramDrawing";

const DGM_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/diagram";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

fn data_model(pts: &str, cxns: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><dgm:dataModel xmlns:dgm="{DGM_NS}" xmlns:a="{A_NS}"><dgm:ptLst>{pts}</dgm:ptLst><dgm:cxnLst>{cxns}</dgm:cxnLst><dgm:bg/><dgm:whole/></dgm:dataModel>"#
    )
}

fn doc_point(pts: &mut String, cxns: &mut String) {
    pts.push_str(
        r#"<dgm:pt modelId="{DOC}" type="doc"><dgm:prSet loTypeId="urn:microsoft.com/office/officeart/2005/8/layout/default" qsTypeId="urn:microsoft.com/office/officeart/2005/8/quickstyle/simple1" csTypeId="urn:microsoft.com/office/officeart/2005/8/colors/accent1_2"/><dgm:spPr/></dgm:pt>"#,
    );
    pts.push_str(
        r#"<dgm:pt modelId="{PRESROOT}" type="pres"><dgm:prSet presAssocID="{DOC}" presName="diagram" presStyleCnt="0"/><dgm:spPr/></dgm:pt>"#,
    );
    cxns.push_str(
        r#"<dgm:cxn modelId="{CPROOT}" type="presOf" srcId="{DOC}" destId="{PRESROOT}" srcOrd="0" destOrd="0" presId="urn:fixture/layout"/>"#,
    );
}

/// One data point with its transition pair, presentation point, and edges,
/// attached under `parent` at sibling slot `ord`
fn item_point(
    pts: &mut String,
    cxns: &mut String,
    tag: &str,
    label: &str,
    parent: &str,
    ord: usize,
    style_label: &str,
) {
    pts.push_str(&format!(
        r#"<dgm:pt modelId="{{D{tag}}}"><dgm:prSet phldrT="[Text]"/><dgm:spPr/><dgm:t><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{label}</a:t></a:r></a:p></dgm:t></dgm:pt>"#
    ));
    pts.push_str(&format!(
        r#"<dgm:pt modelId="{{PT{tag}}}" type="parTrans" cxnId="{{C{tag}}}"><dgm:prSet/><dgm:spPr/></dgm:pt>"#
    ));
    pts.push_str(&format!(
        r#"<dgm:pt modelId="{{ST{tag}}}" type="sibTrans" cxnId="{{C{tag}}}"><dgm:prSet/><dgm:spPr/></dgm:pt>"#
    ));
    pts.push_str(&format!(
        r#"<dgm:pt modelId="{{P{tag}}}" type="pres"><dgm:prSet presAssocID="{{D{tag}}}" presName="node" presStyleLbl="{style_label}" presStyleIdx="{ord}"/><dgm:spPr/></dgm:pt>"#
    ));
    // parOf carries no type attribute, matching one of the host's writers
    cxns.push_str(&format!(
        r#"<dgm:cxn modelId="{{C{tag}}}" srcId="{parent}" destId="{{D{tag}}}" srcOrd="{ord}" destOrd="0" parTransId="{{PT{tag}}}" sibTransId="{{ST{tag}}}"/>"#
    ));
    cxns.push_str(&format!(
        r#"<dgm:cxn modelId="{{CP{tag}}}" type="presOf" srcId="{{D{tag}}}" destId="{{P{tag}}}" srcOrd="0" destOrd="0" presId="urn:fixture/layout"/>"#
    ));
    cxns.push_str(&format!(
        r#"<dgm:cxn modelId="{{CQ{tag}}}" type="presParOf" srcId="{{PRESROOT}}" destId="{{P{tag}}}" srcOrd="{ord}" destOrd="0" presId="urn:fixture/layout"/>"#
    ));
}

/// Flat seed: `n` data points in sibling order under the document root
pub fn flat_seed_xml(n: usize) -> String {
    let mut pts = String::new();
    let mut cxns = String::new();
    doc_point(&mut pts, &mut cxns);
    for i in 0..n {
        item_point(
            &mut pts,
            &mut cxns,
            &format!("{i}"),
            &format!("Item {}", i + 1),
            "{DOC}",
            i,
            "node1",
        );
    }
    data_model(&pts, &cxns)
}

/// Radial seed: a designated center point with three spokes beneath it
///
/// The center carries a distinct presentation style label so tests can
/// verify which role a label landed on.
pub fn radial_seed_xml() -> String {
    let mut pts = String::new();
    let mut cxns = String::new();
    doc_point(&mut pts, &mut cxns);
    item_point(&mut pts, &mut cxns, "C", "Center", "{DOC}", 0, "centerShape");
    for i in 0..3 {
        item_point(
            &mut pts,
            &mut cxns,
            &format!("S{i}"),
            &format!("Spoke {}", i + 1),
            "{DC}",
            i,
            "node1",
        );
    }
    data_model(&pts, &cxns)
}

/// Hierarchy seed with five slots: Root -> (Child1 -> GC1, Child2 -> GC2)
pub fn hierarchy_seed_xml() -> String {
    let mut pts = String::new();
    let mut cxns = String::new();
    doc_point(&mut pts, &mut cxns);
    item_point(&mut pts, &mut cxns, "R", "Root", "{DOC}", 0, "node1");
    item_point(&mut pts, &mut cxns, "A", "Child 1", "{DR}", 0, "node1");
    item_point(&mut pts, &mut cxns, "A1", "Grandchild 1", "{DA}", 0, "node1");
    item_point(&mut pts, &mut cxns, "B", "Child 2", "{DR}", 1, "node1");
    item_point(&mut pts, &mut cxns, "B1", "Grandchild 2", "{DB}", 0, "node1");
    data_model(&pts, &cxns)
}

/// Build a template `.docx` archive holding the five artifacts and a
/// mixed-namespace relationship manifest
pub fn template_archive(data_xml: &str) -> Vec<u8> {
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/><Relationship Id="rId2" Type="{OPEN_RT_DATA}" Target="diagrams/data1.xml"/><Relationship Id="rId3" Type="{OPEN_RT_LAYOUT}" Target="diagrams/layout1.xml"/><Relationship Id="rId4" Type="{VENDOR_RT_STYLE}" Target="diagrams/quickStyle1.xml"/><Relationship Id="rId5" Type="{VENDOR_RT_COLORS}" Target="diagrams/colors1.xml"/><Relationship Id="rId6" Type="{VENDOR_RT_DRAWING}" Target="diagrams/drawing1.xml"/></Relationships>"#
    );

    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    // data part rels entry deliberately precedes the parts, matching how
    // Word orders template archives
    let entries: [(&str, &str); 8] = [
        ("word/document.xml", "<w:document/>"),
        ("word/_rels/document.xml.rels", &rels),
        ("word/diagrams/_rels/data1.xml.rels", "<Relationships/>"),
        ("word/diagrams/data1.xml", data_xml),
        ("word/diagrams/layout1.xml", "<dgm:layoutDef/>"),
        ("word/diagrams/quickStyle1.xml", "<dgm:styleDef/>"),
        ("word/diagrams/colors1.xml", "<dgm:colorsDef/>"),
        ("word/diagrams/drawing1.xml", "<dsp:drawing/>"),
    ];
    for (name, content) in entries {
        writer.start_file(name, options).expect("zip entry");
        writer.write_all(content.as_bytes()).expect("zip payload");
    }
    writer
        .finish()
        .expect("zip finish")
        .into_inner()
}

/// Repository with one fixture bundle registered per requested topology
pub fn fixture_repository(topologies: &[(Topology, String)]) -> TemplateRepository {
    let mut repo = TemplateRepository::new("unused");
    for (topology, data_xml) in topologies {
        repo.insert_from_bytes(*topology, &template_archive(data_xml))
            .expect("fixture bundle should load");
    }
    repo
}
