pub mod catalog_chunk;
pub mod object_type;

pub use catalog_chunk::*;
pub use object_type::*;
