pub mod budget;
pub mod event_bus;
pub mod generation;
pub mod work_queue;

pub use budget::*;
pub use event_bus::*;
pub use generation::*;
pub use work_queue::*;
