//! Star chart orchestration: options, observer state, redraw pipeline and
//! SVG output.

pub mod controller;
pub mod frame;
pub mod observer;
pub mod options;
pub mod render;

pub use controller::*;
pub use frame::*;
pub use observer::*;
pub use options::*;
pub use render::*;
