//! Open Packaging Conventions (OPC) writing support.
//!
//! A presentation package is a ZIP archive of XML parts plus binary media,
//! tied together by `[Content_Types].xml` and per-part `.rels` files.

pub mod constants;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

pub use phys_pkg::PhysPkgWriter;
pub use pkgwriter::{PackageWriter, Part};
pub use rel::{Relationship, Relationships};
