//! XML helpers shared by the part writers.

mod escape;

pub use escape::escape_xml;

/// Standard declaration prepended to every XML part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// OOXML boolean attribute value.
#[inline]
pub fn xml_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
