use std::iter::FusedIterator;

use crate::{Direction, ExclusionMask, Grid, Track};

/// Every absolute placement of a relative `shape` on the map.
///
/// A placement is yielded iff it does not overlap an island and its head is not
/// excluded by `exclusion`. Placements come row-major by head position; callers
/// should not rely on the order.
///
/// Nothing is computed before it is asked for, so e.g. `.take(2)` is enough to
/// find out whether a shape has a single placement.
///
/// Panics if the dimensions of `shape`, `exclusion` and `grid` differ.
pub fn placements<'a>(shape: &Track, exclusion: &'a ExclusionMask, grid: &'a Grid) -> Placements<'a> {
    assert!(
        shape.width() == grid.width()
            && shape.height() == grid.height()
            && exclusion.width() == grid.width()
            && exclusion.height() == grid.height(),
        "shape, exclusion mask and grid must have the same dimensions"
    );
    let anchor = if shape.is_empty() {
        None
    } else {
        Some(shape.to_top_left())
    };
    Placements {
        grid,
        exclusion,
        row_anchor: anchor,
        next: anchor,
    }
}

/// Iterator returned by [`placements()`].
#[derive(Clone, Debug)]
pub struct Placements<'a> {
    grid: &'a Grid,
    exclusion: &'a ExclusionMask,
    // The westmost placement of the current row
    row_anchor: Option<Track>,
    next: Option<Track>,
}

impl<'a> Placements<'a> {
    fn advance(&mut self) {
        let east = self.next.and_then(|candidate| candidate.try_shift(Direction::East));
        self.next = match east {
            Some(candidate) => Some(candidate),
            None => {
                self.row_anchor = self
                    .row_anchor
                    .and_then(|anchor| anchor.try_shift(Direction::South));
                self.row_anchor
            }
        };
    }
}

impl<'a> Iterator for Placements<'a> {
    type Item = Track;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(candidate) = self.next {
            self.advance();
            if !candidate.collides_with(self.grid.obstacles())
                && !candidate.head_is_excluded(self.exclusion)
            {
                return Some(candidate);
            }
        }
        None
    }
}

impl<'a> FusedIterator for Placements<'a> {}
