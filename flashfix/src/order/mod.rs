pub mod error;
pub mod permutation;

pub use error::*;
pub use permutation::*;
