//! Group validation and loop geometry

pub mod renderer;
pub mod shapes;
pub mod validator;

pub use renderer::{emphasis, GroupDiagnostic, ImplicantLoop, LoopRenderer, RenderPass, LOOP_COLORS};
pub use shapes::{
    synthesize, CellBox, CellGeometry, Corner, LoopStyle, ShapeDescriptor, ShapeSynthesizer, Side,
    UniformGeometry,
};
pub use validator::{validate, AxisSpan, GroupValidator, ValidatedRegion};
