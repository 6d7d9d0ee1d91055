//! Data types shared by the layout math, the selection model and the engine.

mod dimension;
mod selection;
mod surface;

pub use dimension::*;
pub use selection::*;
pub use surface::*;
