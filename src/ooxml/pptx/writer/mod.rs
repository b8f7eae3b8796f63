//! Part writers for PPTX packages.
//!
//! Each submodule turns one family of object-model types into part XML;
//! [`package`] drives them and archives the result.

pub(crate) mod master;
pub mod package;
pub(crate) mod pres;
pub(crate) mod shape;
pub(crate) mod slide;
pub(crate) mod theme;

pub use package::{ExportStage, PackageAssembler};
