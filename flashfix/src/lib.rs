// SPDX-License-Identifier: MIT

#[macro_use]
pub mod utils;

pub mod fix;
pub mod layout;
pub mod order;
pub mod out;
pub mod reassemble;
pub mod report;

pub use fix::{FixOptions, fix_file};
pub use layout::FlashLayout;
pub use order::{ChunkOrder, invert_order, lexicographic_order};
pub use reassemble::{ChunkMove, FixError, reassemble, scramble};
pub use report::FixReport;
