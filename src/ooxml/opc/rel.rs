//! Relationship collections for package parts.
//!
//! Every part that references another part gets a sibling
//! `_rels/<name>.rels` file listing those references by `rId`.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::namespace;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: u32,
    reltype: &'static str,
    target: String,
}

impl Relationship {
    pub fn r_id(&self) -> String {
        format!("rId{}", self.r_id)
    }

    pub fn reltype(&self) -> &'static str {
        self.reltype
    }

    pub fn target_ref(&self) -> &str {
        &self.target
    }
}

/// Ordered set of relationships belonging to one source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship with an explicit numeric id.
    ///
    /// # Arguments
    /// * `r_id` - Numeric part of the `rIdN` identifier
    /// * `reltype` - Relationship type URI
    /// * `target` - Target path relative to the source part
    pub fn add(&mut self, r_id: u32, reltype: &'static str, target: impl Into<String>) -> &mut Self {
        self.rels.push(Relationship {
            r_id,
            reltype,
            target: target.into(),
        });
        self
    }

    /// Add a relationship using the next free id.
    pub fn push(&mut self, reltype: &'static str, target: impl Into<String>) -> u32 {
        let r_id = self.next_id();
        self.add(r_id, reltype, target);
        r_id
    }

    pub fn next_id(&self) -> u32 {
        self.rels.iter().map(|r| r.r_id).max().unwrap_or(0) + 1
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Serialize to the `.rels` XML format, ordered by id.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<Relationships xmlns=""#);
        xml.push_str(namespace::OPC_RELATIONSHIPS);
        xml.push_str(r#"">"#);

        let mut rels: Vec<&Relationship> = self.rels.iter().collect();
        rels.sort_by_key(|rel| rel.r_id);

        for rel in rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel.r_id(),
                escape_xml(rel.reltype),
                escape_xml(&rel.target)
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;

    #[test]
    fn test_rels_sorted_by_numeric_id() {
        let mut rels = Relationships::new();
        rels.add(10, rt::IMAGE, "../media/image-1-1.png");
        rels.add(2, rt::NOTES_SLIDE, "../notesSlides/notesSlide1.xml");
        rels.add(1, rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");

        let xml = rels.to_xml();
        let first = xml.find(r#"Id="rId1""#).unwrap();
        let second = xml.find(r#"Id="rId2""#).unwrap();
        let tenth = xml.find(r#"Id="rId10""#).unwrap();
        assert!(first < second && second < tenth);
    }

    #[test]
    fn test_push_uses_next_free_id() {
        let mut rels = Relationships::new();
        rels.add(3, rt::THEME, "../theme/theme1.xml");
        assert_eq!(rels.push(rt::SLIDE_LAYOUT, "x.xml"), 4);
        assert_eq!(rels.len(), 2);
        assert_eq!(Relationships::new().next_id(), 1);
    }
}
