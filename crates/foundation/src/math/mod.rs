pub mod angles;
pub mod projection;
pub mod sphere;
pub mod vec;
pub mod view;

pub use angles::*;
pub use projection::*;
pub use sphere::*;
pub use vec::*;
pub use view::*;
