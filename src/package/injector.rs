//! Diagram injection into a target container
//!
//! Injection is staged: the allocated index, the five part payloads, the
//! relationship table, the content-type registry, the body paragraph, and
//! the settings change are all computed before the first mutation. Partial
//! injections (artifacts registered without a reference object, or the
//! reverse) are an invalid container state Word fails on silently, so any
//! error aborts with the container untouched.

use log::{debug, info};

use crate::model::xml::{ns, XML_DECL};
use crate::template::{ArtifactKind, TemplateBundle};

use super::docx::{DocxPackage, Relationship};
use super::PackageError;

/// Extent of the inline diagram in EMUs (914400 per inch)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width_emu: u64,
    pub height_emu: u64,
}

impl Default for Extent {
    fn default() -> Self {
        // ~5.7" x 3.3", the host's own default diagram footprint
        Extent {
            width_emu: 5_486_400,
            height_emu: 3_200_400,
        }
    }
}

/// Inject one diagram into the container; returns the allocated index
///
/// `data_xml` is the serialized graph from synthesis. Layout, style, and
/// color payloads come from the bundle; the cached drawing part is written
/// as an empty stub so the host regenerates the rendering from the data
/// model instead of trusting stale cached geometry.
pub fn inject_diagram(
    package: &mut DocxPackage,
    bundle: &TemplateBundle,
    data_xml: Vec<u8>,
    extent: Extent,
) -> Result<u32, PackageError> {
    let mut rels = package.document_relationships()?;
    let idx = next_diagram_index(&rels);
    debug!("allocated diagram index {idx}");

    for kind in ArtifactKind::ALL {
        let name = kind.part_name(idx);
        if package.has_part(&name) {
            return Err(PackageError::PartCollision { name });
        }
    }

    // Stage: artifact payloads
    let staged_parts: Vec<(String, Vec<u8>)> = ArtifactKind::ALL
        .iter()
        .map(|kind| {
            let payload = match kind {
                ArtifactKind::Data => data_xml.clone(),
                ArtifactKind::Drawing => empty_drawing_stub(),
                other => bundle.artifact(*other).to_vec(),
            };
            (kind.part_name(idx), payload)
        })
        .collect();

    // Stage: relationships, with types copied verbatim from the bundle.
    // Three of the five are vendor-namespace strings; reconstructing them
    // from the OPC pattern is exactly the mistake that renders nothing.
    let mut rel_number = DocxPackage::next_relationship_number(&rels);
    let mut rel_ids: Vec<String> = Vec::with_capacity(5);
    for kind in ArtifactKind::ALL {
        let rel_id = format!("rId{rel_number}");
        rel_number += 1;
        rels.push(Relationship {
            id: rel_id.clone(),
            rel_type: bundle.rel_type(kind).to_string(),
            target: format!("diagrams/{}{}.xml", kind.part_pattern(), idx),
            target_mode: None,
        });
        rel_ids.push(rel_id);
    }

    // Stage: content-type overrides, chained over one payload
    let mut content_types: Option<String> = None;
    for kind in ArtifactKind::ALL {
        let updated = package.staged_content_type_override(
            content_types.as_deref(),
            &kind.part_name(idx),
            kind.content_type(),
        )?;
        content_types = Some(updated);
    }

    // Stage: the inline reference paragraph (the drawing part is referenced
    // implicitly by the host and is not listed in dgm:relIds)
    let paragraph = reference_paragraph(idx, extent, &rel_ids);
    let document = package.staged_body_append(None, &paragraph)?;

    // Stage: compatibility flag
    let settings = package.staged_modern_compat()?;

    // Commit
    for (name, payload) in staged_parts {
        package.set_part(name, payload);
    }
    package.set_document_relationships(&rels);
    package.set_content_types(content_types.expect("five kinds staged"));
    package.set_document(document);
    if let Some(settings) = settings {
        package.set_part("word/settings.xml", settings.into_bytes());
    }

    info!("injected diagram {idx} ({})", bundle.topology().as_str());
    Ok(idx)
}

/// Highest diagram index referenced by the container, plus one
///
/// Scans relationship targets rather than part names, matching how the host
/// resolves diagrams. Freed slots are never reused: deleting diagram 2 from
/// a container holding {1, 2, 3} still allocates 4.
fn next_diagram_index(rels: &[Relationship]) -> u32 {
    rels.iter()
        .filter_map(|rel| rel.target.split("diagrams/data").nth(1))
        .filter_map(|tail| tail.split('.').next())
        .filter_map(|num| num.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// Minimal cached-drawing payload: one empty group shape
///
/// Signals the host that no cached rendering exists, forcing regeneration
/// from the data model and layout on first open.
fn empty_drawing_stub() -> Vec<u8> {
    format!(
        r#"{XML_DECL}<dsp:drawing xmlns:dsp="{dsp}"><dsp:spTree><dsp:nvGrpSpPr><dsp:cNvPr id="0" name=""/><dsp:cNvGrpSpPr/></dsp:nvGrpSpPr><dsp:grpSpPr/></dsp:spTree></dsp:drawing>"#,
        dsp = ns::DSP
    )
    .into_bytes()
}

/// The `w:p` block holding the inline graphic reference
fn reference_paragraph(idx: u32, extent: Extent, rel_ids: &[String]) -> String {
    format!(
        concat!(
            r#"<w:p><w:r><w:drawing>"#,
            r#"<wp:inline xmlns:wp="{wp}" distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{doc_pr}" name="Diagram {idx}"/>"#,
            r#"<wp:cNvGraphicFramePr/>"#,
            r#"<a:graphic xmlns:a="{a}"><a:graphicData uri="{dgm_ns}">"#,
            r#"<dgm:relIds xmlns:dgm="{dgm_ns}" xmlns:r="{r}" r:dm="{dm}" r:lo="{lo}" r:qs="{qs}" r:cs="{cs}"/>"#,
            r#"</a:graphicData></a:graphic>"#,
            r#"</wp:inline>"#,
            r#"</w:drawing></w:r></w:p>"#
        ),
        wp = ns::WP,
        a = ns::A,
        dgm_ns = ns::DGM,
        r = ns::R,
        cx = extent.width_emu,
        cy = extent.height_emu,
        // Offset keeps drawing object ids clear of ids the upstream
        // composition layer may have used
        doc_pr = idx + 100,
        idx = idx,
        dm = rel_ids[0],
        lo = rel_ids[1],
        qs = rel_ids[2],
        cs = rel_ids[3],
    )
}
