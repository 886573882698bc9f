pub mod target;
pub mod verify;

pub use target::*;
pub use verify::*;
