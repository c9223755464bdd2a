//! Template bundle extraction from a `.docx` archive

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::Topology;

use super::TemplateError;

/// The five diagram artifact kinds that make up one SmartArt instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The data model graph (`data*.xml`)
    Data,
    /// Layout definition (`layout*.xml`)
    Layout,
    /// Quick style definition (`quickStyle*.xml`)
    Style,
    /// Color definition (`colors*.xml`)
    Colors,
    /// Cached pre-rendered drawing (`drawing*.xml`, vendor part)
    Drawing,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Data,
        ArtifactKind::Layout,
        ArtifactKind::Style,
        ArtifactKind::Colors,
        ArtifactKind::Drawing,
    ];

    /// Substring identifying this kind in diagram part names
    pub fn part_pattern(self) -> &'static str {
        match self {
            ArtifactKind::Data => "data",
            ArtifactKind::Layout => "layout",
            ArtifactKind::Style => "quickStyle",
            ArtifactKind::Colors => "colors",
            ArtifactKind::Drawing => "drawing",
        }
    }

    /// Container part name for diagram index `idx`
    pub fn part_name(self, idx: u32) -> String {
        format!("word/diagrams/{}{}.xml", self.part_pattern(), idx)
    }

    /// Fixed content type registered for this kind
    ///
    /// Four are OPC-standard; the drawing part is a vendor type.
    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Data => {
                "application/vnd.openxmlformats-officedocument.drawingml.diagramData+xml"
            }
            ArtifactKind::Layout => {
                "application/vnd.openxmlformats-officedocument.drawingml.diagramLayout+xml"
            }
            ArtifactKind::Style => {
                "application/vnd.openxmlformats-officedocument.drawingml.diagramStyle+xml"
            }
            ArtifactKind::Colors => {
                "application/vnd.openxmlformats-officedocument.drawingml.diagramColors+xml"
            }
            ArtifactKind::Drawing => "application/vnd.ms-office.drawingml.diagramDrawing+xml",
        }
    }

    /// Substrings identifying this kind's relationship type URI in the
    /// template's manifest
    fn rel_patterns(self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Data => &["diagramData"],
            ArtifactKind::Layout => &["diagramLayout"],
            ArtifactKind::Style => &["diagramStyle", "diagramQuickStyle"],
            ArtifactKind::Colors => &["diagramColors"],
            ArtifactKind::Drawing => &["diagramDrawing"],
        }
    }
}

/// One topology's five artifacts plus its relationship-type manifest
///
/// Payloads are opaque bytes; the only part this crate ever parses is the
/// data model. Relationship types are copied verbatim from the template's
/// `word/_rels/document.xml.rels`, never reconstructed, because three of
/// them deviate from the OPC namespace and a hand-written "obvious" value
/// produces a diagram that silently renders as nothing.
#[derive(Debug, Clone)]
pub struct TemplateBundle {
    topology: Topology,
    artifacts: [Vec<u8>; 5],
    rel_types: [String; 5],
}

impl TemplateBundle {
    /// Extract a bundle from the raw bytes of a template `.docx`
    pub fn from_archive_bytes(topology: Topology, bytes: &[u8]) -> Result<Self, TemplateError> {
        let archive_err = |message: String| TemplateError::Archive {
            topology: topology.as_str().to_string(),
            message,
        };

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| archive_err(format!("not a zip archive: {e}")))?;
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        let mut artifacts: [Option<Vec<u8>>; 5] = Default::default();
        for name in &names {
            // Each diagram part carries its own relationship file under a
            // _rels/ segment whose name also matches the part patterns;
            // only the parts themselves are artifacts
            if !name.contains("diagrams/") || name.contains("_rels/") {
                continue;
            }
            for (slot, kind) in ArtifactKind::ALL.iter().enumerate() {
                if name.contains(kind.part_pattern()) && artifacts[slot].is_none() {
                    let mut payload = Vec::new();
                    archive
                        .by_name(name)
                        .and_then(|mut f| {
                            f.read_to_end(&mut payload)?;
                            Ok(())
                        })
                        .map_err(|e| archive_err(format!("cannot read {name}: {e}")))?;
                    artifacts[slot] = Some(payload);
                    break;
                }
            }
        }

        let mut rels_xml = String::new();
        archive
            .by_name("word/_rels/document.xml.rels")
            .and_then(|mut f| {
                f.read_to_string(&mut rels_xml)?;
                Ok(())
            })
            .map_err(|e| archive_err(format!("cannot read relationship manifest: {e}")))?;
        let rel_types = extract_rel_types(topology, &rels_xml)?;

        let mut resolved: Vec<Vec<u8>> = Vec::with_capacity(5);
        for (slot, kind) in ArtifactKind::ALL.iter().enumerate() {
            match artifacts[slot].take() {
                Some(payload) => resolved.push(payload),
                None => {
                    return Err(TemplateError::Incomplete {
                        topology: topology.as_str().to_string(),
                        missing: format!("{} artifact", kind.part_pattern()),
                    })
                }
            }
        }
        let artifacts: [Vec<u8>; 5] = resolved
            .try_into()
            .expect("exactly five artifact slots");

        Ok(TemplateBundle {
            topology,
            artifacts,
            rel_types,
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Raw payload of one artifact
    pub fn artifact(&self, kind: ArtifactKind) -> &[u8] {
        &self.artifacts[slot(kind)]
    }

    /// Verbatim relationship type string for one artifact
    pub fn rel_type(&self, kind: ArtifactKind) -> &str {
        &self.rel_types[slot(kind)]
    }
}

fn slot(kind: ArtifactKind) -> usize {
    ArtifactKind::ALL
        .iter()
        .position(|k| *k == kind)
        .expect("kind is in ALL")
}

fn extract_rel_types(topology: Topology, rels_xml: &str) -> Result<[String; 5], TemplateError> {
    let doc = roxmltree::Document::parse(rels_xml).map_err(|e| TemplateError::Manifest {
        topology: topology.as_str().to_string(),
        message: e.to_string(),
    })?;

    let mut types: [Option<String>; 5] = Default::default();
    for rel in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
    {
        let rtype = rel.attribute("Type").unwrap_or_default();
        for (slot, kind) in ArtifactKind::ALL.iter().enumerate() {
            if types[slot].is_none() && kind.rel_patterns().iter().any(|p| rtype.contains(p)) {
                types[slot] = Some(rtype.to_string());
            }
        }
    }

    let mut resolved = Vec::with_capacity(5);
    for (slot, kind) in ArtifactKind::ALL.iter().enumerate() {
        match types[slot].take() {
            Some(t) => resolved.push(t),
            None => {
                return Err(TemplateError::Incomplete {
                    topology: topology.as_str().to_string(),
                    missing: format!("{} relationship type", kind.part_pattern()),
                })
            }
        }
    }
    Ok(resolved.try_into().expect("exactly five manifest slots"))
}
