mod bitrows;
mod exclusion;
mod track;
mod trajectory;

pub use bitrows::{Cells, MAX_SIDE};
pub use exclusion::ExclusionMask;
pub use track::Track;
pub use trajectory::RelativeTrajectory;
