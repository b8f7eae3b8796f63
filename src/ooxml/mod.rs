//! Office Open XML (OOXML) presentation writing.
//!
//! The module is organized into three layers:
//!
//! 1. **OPC Layer** (`opc`): package members, relationships and the ZIP
//!    container
//! 2. **Charts** (`charts`): funnel and waterfall geometry plus native
//!    DrawingML charts with their embedded workbooks
//! 3. **Presentation** (`pptx`): the slide object model and the part writers
pub mod charts;
pub mod opc;
pub mod pptx;
