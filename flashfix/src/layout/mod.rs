pub mod error;
pub mod layout;
pub mod naming;
pub mod size;

pub use error::*;
pub use layout::*;
pub use naming::*;
pub use size::*;
