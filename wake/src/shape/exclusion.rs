use std::fmt::{self, Debug};

use super::bitrows::{BitRows, Cells};
use crate::{Direction, Grid};

/// The cells where the opponent's head is known not to be.
///
/// Unlike a [`Track`](crate::Track), shifting this mask fills the vacated edge
/// with excluded cells: nothing is known about what scrolls into view, except
/// that the opponent cannot have come from outside of the map.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExclusionMask {
    cells: BitRows,
}

impl ExclusionMask {
    /// Excludes no cell.
    pub fn nothing(width: i8, height: i8) -> Self {
        Self {
            cells: BitRows::empty(width, height),
        }
    }

    /// Excludes every cell.
    pub fn everything(width: i8, height: i8) -> Self {
        Self {
            cells: BitRows::full(width, height),
        }
    }

    /// Excludes exactly the islands of the map.
    pub fn obstacles(grid: &Grid) -> Self {
        Self {
            cells: grid.obstacles().rows(),
        }
    }

    /// Excludes every cell except the given ones.
    ///
    /// Panics if a cell is out of bounds.
    pub fn all_except(width: i8, height: i8, cells: impl IntoIterator<Item = (i8, i8)>) -> Self {
        Self {
            cells: !BitRows::from_cells(width, height, cells),
        }
    }

    /// Excludes every cell outside of the given sector, or `None` if there is no such sector.
    pub fn outside_sector(grid: &Grid, sector: u8) -> Option<Self> {
        grid.sector_cells(sector)
            .map(|cells| Self::all_except(grid.width(), grid.height(), cells))
    }

    /// Builds a mask from rows of `.` (possible) and `x` (excluded).
    ///
    /// Panics on malformed fixtures.
    pub fn from_fixture<S: AsRef<str>>(lines: &[S]) -> Self {
        let (cells, head) = BitRows::from_fixture(lines);
        assert!(head.is_none(), "exclusion masks have no head");
        Self { cells }
    }

    pub fn width(&self) -> i8 {
        self.cells.width()
    }

    pub fn height(&self) -> i8 {
        self.cells.height()
    }

    /// True iff `(x, y)` is excluded. Cells outside of the map are always excluded.
    pub fn excludes(&self, x: i8, y: i8) -> bool {
        !self.cells.in_bounds(x, y) || self.cells.contains(x, y)
    }

    pub fn num_excluded(&self) -> u32 {
        self.cells.count()
    }

    /// The cells that are not excluded, in row-major order.
    pub fn possible_cells(&self) -> Cells {
        (!self.cells).cells()
    }

    /// `[y][x]` matrix, `true` meaning excluded.
    pub fn to_matrix(&self) -> Vec<Vec<bool>> {
        self.cells.to_matrix()
    }

    /// Moves the mask one cell in `direction`, excluding the vacated edge.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Self {
        Self {
            cells: self.cells.shifted(direction, true),
        }
    }
}

impl std::ops::BitOr for ExclusionMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            cells: self.cells | rhs.cells,
        }
    }
}

impl std::ops::BitOrAssign for ExclusionMask {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl std::ops::BitAnd for ExclusionMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            cells: self.cells & rhs.cells,
        }
    }
}

impl std::ops::Not for ExclusionMask {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self { cells: !self.cells }
    }
}

impl Debug for ExclusionMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.cells)
    }
}
