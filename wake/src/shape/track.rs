use std::fmt::{self, Debug};

use super::bitrows::{BitRows, Cells};
use crate::{Direction, ExclusionMask};

/// A set of occupied cells, with an optional head.
///
/// With a head, this is a trajectory: a simple path of visited cells that
/// ends at the head. Without one, it is plain occupancy, e.g. the islands of
/// a map.
///
/// Note that its "mutating" methods return a new object instead of really mutating,
/// so hypotheses derived from one another never share state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Track {
    cells: BitRows,
    head: Option<(i8, i8)>,
}

impl Track {
    /// No occupied cells and no head.
    pub fn empty(width: i8, height: i8) -> Self {
        Self {
            cells: BitRows::empty(width, height),
            head: None,
        }
    }

    /// A trajectory made of the single cell `(0, 0)`.
    pub fn origin(width: i8, height: i8) -> Self {
        Self::starting_at(width, height, 0, 0)
    }

    /// A trajectory made of the single cell `(x, y)`.
    pub fn starting_at(width: i8, height: i8, x: i8, y: i8) -> Self {
        Self {
            cells: BitRows::empty(width, height).insert(x, y),
            head: Some((x, y)),
        }
    }

    /// Headless occupancy of the given cells.
    ///
    /// Panics if a cell is out of bounds.
    pub fn from_cells(width: i8, height: i8, cells: impl IntoIterator<Item = (i8, i8)>) -> Self {
        Self {
            cells: BitRows::from_cells(width, height, cells),
            head: None,
        }
    }

    /// Builds a track from rows of `.` (free), `x` (occupied) and `X` (the head).
    ///
    /// ```
    /// use wake::Track;
    /// let track = Track::from_fixture(&[
    ///     "xxX.",
    ///     "x...",
    /// ]);
    /// assert_eq!(track.head(), Some((2, 0)));
    /// assert_eq!(track.len(), 4);
    /// ```
    ///
    /// Panics on malformed fixtures.
    pub fn from_fixture<S: AsRef<str>>(lines: &[S]) -> Self {
        let (cells, head) = BitRows::from_fixture(lines);
        Self { cells, head }
    }

    pub fn width(&self) -> i8 {
        self.cells.width()
    }

    pub fn height(&self) -> i8 {
        self.cells.height()
    }

    pub fn head(&self) -> Option<(i8, i8)> {
        self.head
    }

    pub fn contains(&self, x: i8, y: i8) -> bool {
        self.cells.contains(x, y)
    }

    pub fn len(&self) -> u32 {
        self.cells.count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The occupied cells in row-major order.
    pub fn cells(&self) -> Cells {
        self.cells.cells()
    }

    /// `[y][x]` matrix of the occupied cells.
    pub fn to_matrix(&self) -> Vec<Vec<bool>> {
        self.cells.to_matrix()
    }

    /// True iff any cell is occupied in both tracks.
    pub fn collides_with(&self, other: &Track) -> bool {
        self.cells.intersects(other.cells)
    }

    /// True iff the head lies on an excluded cell. Headless tracks are never excluded.
    pub fn head_is_excluded(&self, mask: &ExclusionMask) -> bool {
        match self.head {
            Some((x, y)) => mask.excludes(x, y),
            None => false,
        }
    }

    /// Moves the whole track one cell in `direction`.
    ///
    /// Cells pushed over the edge are lost, and so is the head if it was one of them.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Track {
        let cells = self.cells.shifted(direction, false);
        let head = self
            .head
            .map(|head| direction.apply(head))
            .filter(|&(x, y)| cells.in_bounds(x, y));
        Self { cells, head }
    }

    /// Like [`Self::shift()`], but only if no occupied cell would be pushed over the edge.
    pub fn try_shift(self, direction: Direction) -> Option<Track> {
        self.cells
            .edge_is_empty(direction)
            .then(|| self.shift(direction))
    }

    /// Grows the trajectory by one cell in `direction`, in absolute coordinates.
    ///
    /// Returns `None` if the new cell is outside of the window or already visited.
    /// Panics if the track has no head.
    pub fn step(self, direction: Direction) -> Option<Track> {
        let head = self.head.expect("Cannot step a track without a head");
        let (x, y) = direction.apply(head);
        if !self.cells.in_bounds(x, y) || self.cells.contains(x, y) {
            return None;
        }
        Some(Self {
            cells: self.cells.insert(x, y),
            head: Some((x, y)),
        })
    }

    /// Grows the trajectory by one cell in `direction` inside a floating frame.
    ///
    /// If the next cell is outside of the window or already occupied, the whole
    /// track is first shifted one cell the other way. Returns `None` if the head
    /// itself would fall off during that shift. Panics if the track has no head.
    pub(crate) fn extend(self, direction: Direction) -> Option<Track> {
        let head = self.head.expect("Cannot extend a track without a head");
        let (x, y) = direction.apply(head);
        let baseline = if self.cells.in_bounds(x, y) && !self.cells.contains(x, y) {
            self
        } else {
            self.shift(direction.opposite())
        };
        let (x, y) = direction.apply(baseline.head?);
        Some(Self {
            cells: baseline.cells.insert(x, y),
            head: Some((x, y)),
        })
    }

    /// Shifts the track north and west as far as it goes without losing cells.
    #[must_use]
    pub(crate) fn to_top_left(self) -> Track {
        let mut track = self;
        if track.is_empty() {
            return track;
        }
        while let Some(shifted) = track.try_shift(Direction::North) {
            track = shifted;
        }
        while let Some(shifted) = track.try_shift(Direction::West) {
            track = shifted;
        }
        track
    }

    pub(crate) fn rows(&self) -> BitRows {
        self.cells
    }
}

impl Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.cells.render(self.head))
    }
}
