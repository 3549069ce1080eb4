//! Console formatting and file export helpers

pub mod display;
pub mod svg;

pub use display::{Color, ColorOutput, KmapFormatter};
pub use svg::{path_data, svg_document};
