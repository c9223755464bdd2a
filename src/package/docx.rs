//! In-memory OPC container for WordprocessingML documents

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::model::xml::{xml_escape, ns, XML_DECL};

use super::PackageError;

const DOCUMENT_PART: &str = "word/document.xml";
const SETTINGS_PART: &str = "word/settings.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One entry in a relationship table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// Present for external targets (hyperlinks); preserved verbatim
    pub target_mode: Option<String>,
}

/// A Word document container held in memory
///
/// Parts are stored by OPC name without the leading slash, in sorted order
/// so saved archives are deterministic. The package is plain mutable state:
/// sequential injections into one package are fine, concurrent ones are the
/// caller's problem to serialize.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Default for DocxPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxPackage {
    /// A minimal empty document
    ///
    /// Enough skeleton for the host to open it: content types, the package
    /// relationship to the main part, an empty body, and empty settings.
    /// Richer base documents come from the upstream composition layer and
    /// enter through [`DocxPackage::open`].
    pub fn new() -> Self {
        let mut parts = BTreeMap::new();
        parts.insert(
            CONTENT_TYPES_PART.to_string(),
            format!(
                r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/></Types>"#
            )
            .into_bytes(),
        );
        parts.insert(
            "_rels/.rels".to_string(),
            format!(
                r#"{XML_DECL}<Relationships xmlns="{RELS_NS}"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#
            )
            .into_bytes(),
        );
        parts.insert(
            DOCUMENT_PART.to_string(),
            format!(
                r#"{XML_DECL}<w:document xmlns:w="{w}"><w:body></w:body></w:document>"#,
                w = ns::W
            )
            .into_bytes(),
        );
        parts.insert(
            SETTINGS_PART.to_string(),
            format!(
                r#"{XML_DECL}<w:settings xmlns:w="{w}"></w:settings>"#,
                w = ns::W
            )
            .into_bytes(),
        );
        parts.insert(
            DOCUMENT_RELS_PART.to_string(),
            format!(
                r#"{XML_DECL}<Relationships xmlns="{RELS_NS}"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/></Relationships>"#
            )
            .into_bytes(),
        );
        DocxPackage { parts }
    }

    /// Open an existing container from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PackageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Open a container from raw archive bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackageError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| PackageError::Archive(e.to_string()))?;
        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| PackageError::Archive(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let mut payload = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut payload)
                .map_err(|e| PackageError::Archive(e.to_string()))?;
            parts.insert(file.name().to_string(), payload);
        }
        Ok(DocxPackage { parts })
    }

    /// Save the container to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PackageError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize the container to archive bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, PackageError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, payload) in &self.parts {
            writer
                .start_file(name.as_str(), options)
                .and_then(|()| writer.write_all(payload).map_err(Into::into))
                .map_err(|e| PackageError::Archive(e.to_string()))?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| PackageError::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    pub fn set_part(&mut self, name: impl Into<String>, payload: Vec<u8>) {
        self.parts.insert(name.into(), payload);
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    fn part_str(&self, name: &str) -> Result<&str, PackageError> {
        let bytes = self
            .parts
            .get(name)
            .ok_or_else(|| PackageError::MissingPart {
                name: name.to_string(),
            })?;
        std::str::from_utf8(bytes).map_err(|e| PackageError::MalformedPart {
            name: name.to_string(),
            message: format!("not valid UTF-8: {e}"),
        })
    }

    // ---- document relationship table ----------------------------------

    /// Parse the document's relationship table
    pub fn document_relationships(&self) -> Result<Vec<Relationship>, PackageError> {
        let xml = self.part_str(DOCUMENT_RELS_PART)?;
        let doc =
            roxmltree::Document::parse(xml).map_err(|e| PackageError::MalformedPart {
                name: DOCUMENT_RELS_PART.to_string(),
                message: e.to_string(),
            })?;
        Ok(doc
            .root_element()
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
            .map(|rel| Relationship {
                id: rel.attribute("Id").unwrap_or_default().to_string(),
                rel_type: rel.attribute("Type").unwrap_or_default().to_string(),
                target: rel.attribute("Target").unwrap_or_default().to_string(),
                target_mode: rel.attribute("TargetMode").map(str::to_string),
            })
            .collect())
    }

    /// Serialize a relationship table back to the rels part payload
    pub(super) fn render_relationships(rels: &[Relationship]) -> Vec<u8> {
        let mut out = String::with_capacity(1024);
        out.push_str(XML_DECL);
        out.push_str(&format!(r#"<Relationships xmlns="{RELS_NS}">"#));
        for rel in rels {
            out.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                xml_escape(&rel.id),
                xml_escape(&rel.rel_type),
                xml_escape(&rel.target)
            ));
            if let Some(mode) = &rel.target_mode {
                out.push_str(&format!(r#" TargetMode="{}""#, xml_escape(mode)));
            }
            out.push_str("/>");
        }
        out.push_str("</Relationships>");
        out.into_bytes()
    }

    pub(super) fn set_document_relationships(&mut self, rels: &[Relationship]) {
        self.parts.insert(
            DOCUMENT_RELS_PART.to_string(),
            Self::render_relationships(rels),
        );
    }

    /// Next free `rId` number in the document relationship table
    pub(super) fn next_relationship_number(rels: &[Relationship]) -> u32 {
        rels.iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }

    // ---- content types -------------------------------------------------

    /// Stage a content-type override; returns the new part payload
    ///
    /// Idempotent: an existing override for the same part name wins.
    pub(super) fn staged_content_type_override(
        &self,
        current: Option<&str>,
        part_name: &str,
        content_type: &str,
    ) -> Result<String, PackageError> {
        let xml = match current {
            Some(s) => s,
            None => self.part_str(CONTENT_TYPES_PART)?,
        };
        let registered_name = format!("/{part_name}");
        if xml.contains(&format!(r#"PartName="{registered_name}""#)) {
            return Ok(xml.to_string());
        }
        let insert_at = xml.rfind("</Types>").ok_or_else(|| PackageError::MalformedPart {
            name: CONTENT_TYPES_PART.to_string(),
            message: "no closing Types element".to_string(),
        })?;
        let mut out = String::with_capacity(xml.len() + 128);
        out.push_str(&xml[..insert_at]);
        out.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            xml_escape(&registered_name),
            xml_escape(content_type)
        ));
        out.push_str(&xml[insert_at..]);
        Ok(out)
    }

    pub(super) fn set_content_types(&mut self, payload: String) {
        self.parts
            .insert(CONTENT_TYPES_PART.to_string(), payload.into_bytes());
    }

    // ---- document body -------------------------------------------------

    /// Stage an append of block-level XML to the document body
    ///
    /// Content lands before the body's trailing section properties when the
    /// document has them.
    pub(super) fn staged_body_append(
        &self,
        current: Option<&str>,
        block_xml: &str,
    ) -> Result<String, PackageError> {
        let xml = match current {
            Some(s) => s,
            None => self.part_str(DOCUMENT_PART)?,
        };
        let body_end = xml.rfind("</w:body>").ok_or_else(|| PackageError::MalformedPart {
            name: DOCUMENT_PART.to_string(),
            message: "no closing w:body element".to_string(),
        })?;
        // Only a sectPr after the last paragraph is the body-level trailing
        // one; earlier matches are mid-body section breaks inside paragraph
        // properties and must not become insertion points
        let last_para_end = xml[..body_end].rfind("</w:p>").unwrap_or(0);
        let insert_at = xml[..body_end]
            .rfind("<w:sectPr")
            .filter(|&pos| pos > last_para_end)
            .unwrap_or(body_end);
        let mut out = String::with_capacity(xml.len() + block_xml.len());
        out.push_str(&xml[..insert_at]);
        out.push_str(block_xml);
        out.push_str(&xml[insert_at..]);
        Ok(out)
    }

    pub(super) fn set_document(&mut self, payload: String) {
        self.parts
            .insert(DOCUMENT_PART.to_string(), payload.into_bytes());
    }

    /// Append a plain paragraph to the document body
    pub fn add_paragraph(&mut self, text: &str) -> Result<(), PackageError> {
        let para = format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            xml_escape(text)
        );
        let updated = self.staged_body_append(None, &para)?;
        self.set_document(updated);
        Ok(())
    }

    /// Append a styled heading paragraph to the document body
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<(), PackageError> {
        let para = format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading{}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            level.clamp(1, 9),
            xml_escape(text)
        );
        let updated = self.staged_body_append(None, &para)?;
        self.set_document(updated);
        Ok(())
    }

    // ---- compatibility flag --------------------------------------------

    /// Stage the settings change raising the compatibility mode to 15
    ///
    /// Word opens containers declaring an older mode in a legacy
    /// compatibility state that skips diagram regeneration entirely, which
    /// reproduces the zero-height render failure from a different cause.
    /// Returns `None` when the container already declares mode 15.
    pub(super) fn staged_modern_compat(&self) -> Result<Option<String>, PackageError> {
        const SETTING: &str = r#"<w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/>"#;

        let xml = match self.part_str(SETTINGS_PART) {
            Ok(xml) => xml.to_string(),
            Err(PackageError::MissingPart { .. }) => {
                return Ok(Some(format!(
                    r#"{XML_DECL}<w:settings xmlns:w="{w}"><w:compat>{SETTING}</w:compat></w:settings>"#,
                    w = ns::W
                )));
            }
            Err(e) => return Err(e),
        };

        let doc = roxmltree::Document::parse(&xml).map_err(|e| PackageError::MalformedPart {
            name: SETTINGS_PART.to_string(),
            message: e.to_string(),
        })?;

        let compat_setting = doc
            .descendants()
            .find(|n| {
                n.tag_name().name() == "compatSetting"
                    && n.attribute((ns::W, "name")) == Some("compatibilityMode")
            });
        if let Some(setting) = compat_setting {
            if setting.attribute((ns::W, "val")) == Some("15") {
                return Ok(None);
            }
            let range = setting.range();
            let mut out = String::with_capacity(xml.len());
            out.push_str(&xml[..range.start]);
            out.push_str(SETTING);
            out.push_str(&xml[range.end..]);
            return Ok(Some(out));
        }

        if let Some(compat) = doc.descendants().find(|n| n.tag_name().name() == "compat") {
            let range = compat.range();
            let raw = &xml[range.clone()];
            let replacement = if raw.ends_with("/>") {
                format!("<w:compat>{SETTING}</w:compat>")
            } else {
                let close = raw.rfind("</").unwrap_or(raw.len());
                format!("{}{SETTING}{}", &raw[..close], &raw[close..])
            };
            let mut out = String::with_capacity(xml.len() + replacement.len());
            out.push_str(&xml[..range.start]);
            out.push_str(&replacement);
            out.push_str(&xml[range.end..]);
            return Ok(Some(out));
        }

        let insert_at = xml
            .rfind("</w:settings>")
            .ok_or_else(|| PackageError::MalformedPart {
                name: SETTINGS_PART.to_string(),
                message: "no closing w:settings element".to_string(),
            })?;
        let mut out = String::with_capacity(xml.len() + 256);
        out.push_str(&xml[..insert_at]);
        out.push_str(&format!("<w:compat>{SETTING}</w:compat>"));
        out.push_str(&xml[insert_at..]);
        Ok(Some(out))
    }

    /// Raise the compatibility mode to 15 (idempotent)
    pub fn ensure_modern_compat(&mut self) -> Result<(), PackageError> {
        if let Some(updated) = self.staged_modern_compat()? {
            self.parts
                .insert(SETTINGS_PART.to_string(), updated.into_bytes());
        }
        Ok(())
    }
}
