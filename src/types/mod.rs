//! Data types shared by the grid engines.

mod column;
mod filter;
mod position;
mod row;
mod sort;

pub use column::*;
pub use filter::*;
pub use position::*;
pub use row::*;
pub use sort::*;
