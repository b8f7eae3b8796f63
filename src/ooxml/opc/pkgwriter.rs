//! Package writer for OPC packages.
//!
//! This module serializes a flat list of parts into a ZIP archive, writing
//! the [Content_Types].xml first, then the directory entries, then every
//! part in the order it was assembled.

use crate::common::error::Result;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use std::collections::BTreeMap;

/// Name of the content types stream at the package root.
pub const CONTENT_TYPES_URI: &str = "[Content_Types].xml";

/// One member of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Member name without a leading slash (e.g. `ppt/slides/slide1.xml`)
    pub partname: String,
    pub content_type: &'static str,
    pub blob: Vec<u8>,
}

impl Part {
    pub fn new(partname: impl Into<String>, content_type: &'static str, blob: impl Into<Vec<u8>>) -> Self {
        Self {
            partname: partname.into(),
            content_type,
            blob: blob.into(),
        }
    }

    /// A relationships part.
    pub fn rels(partname: impl Into<String>, xml: String) -> Self {
        Self::new(partname, ct::OPC_RELATIONSHIPS, xml)
    }

    /// Extension of the partname, without the dot.
    pub fn ext(&self) -> &str {
        self.partname
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }
}

/// Serializes parts into a ZIP archive.
pub struct PackageWriter;

impl PackageWriter {
    /// Serialize parts to bytes.
    ///
    /// # Arguments
    /// * `parts` - Package members, in archive order
    /// * `directories` - Directory entries to create (each ending in `/`)
    /// * `compress` - Deflate members instead of storing them
    pub fn to_bytes(parts: &[Part], directories: &[&str], compress: bool) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new(compress);

        let cti = ContentTypesItem::from_parts(parts);
        phys_writer.write(CONTENT_TYPES_URI, cti.to_xml().as_bytes())?;

        for dir in directories {
            phys_writer.add_directory(dir)?;
        }

        for part in parts {
            phys_writer.write(&part.partname, &part.blob)?;
        }

        log::debug!(parts = parts.len(), entries = phys_writer.entry_count(); "Package serialized");
        phys_writer.finish_to_bytes()
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping.
#[derive(Debug, Default)]
pub(crate) struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, &'static str>,

    /// Override content types by partname
    overrides: BTreeMap<String, &'static str>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut cti = Self::default();
        cti.defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS);
        cti.defaults.insert("xml".to_string(), ct::XML);
        cti
    }

    pub(crate) fn from_parts(parts: &[Part]) -> Self {
        let mut cti = Self::new();
        for part in parts {
            cti.add_content_type(part);
        }
        cti
    }

    /// Uses a default mapping if the extension matches a well-known type,
    /// otherwise an override for the specific partname.
    fn add_content_type(&mut self, part: &Part) {
        let ext = part.ext().to_ascii_lowercase();
        if Self::is_default_content_type(&ext, part.content_type) {
            self.defaults.insert(ext, part.content_type);
        } else {
            self.overrides
                .insert(format!("/{}", part.partname), part.content_type);
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("xlsx", ct::SML_SHEET)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("svg", ct::SVG)
                | ("tif", ct::TIFF)
                | ("tiff", ct::TIFF)
        )
    }

    pub(crate) fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}
