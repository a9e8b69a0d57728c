//! Application state module

mod draft;
mod forms;

pub use draft::*;
pub use forms::*;
