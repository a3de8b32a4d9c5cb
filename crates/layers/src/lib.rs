pub mod classifier;
pub mod labels;
pub mod layer;
pub mod overlays;
pub mod symbology;

pub use classifier::*;
pub use labels::*;
pub use layer::*;
pub use overlays::*;
pub use symbology::*;
