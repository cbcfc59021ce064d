pub use direction::*;
pub use errors::*;
pub use grid::*;
pub use orders::*;
pub use protocol::*;
pub use shape::*;
pub use tracking::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod direction;
mod errors;
mod grid;
mod orders;
mod protocol;
mod shape;
mod tracking;
mod visualization;
