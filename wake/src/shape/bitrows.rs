use std::fmt::{self, Debug};
use std::iter::FusedIterator;

use crate::Direction;

/// Largest supported map side. Every row fits in a `u16`.
pub const MAX_SIDE: usize = 16;

/// The row-major bit matrix shared by [`Track`](crate::Track) and
/// [`ExclusionMask`](crate::ExclusionMask).
///
/// Bit `x` of `rows[y]` stands for the cell `(x, y)`, so shifting a row left
/// moves its cells east. Bits outside of `width` x `height` are always zero,
/// which keeps equality and counting simple.
///
/// Like the types built on it, this is a [`Copy`] value and its "mutating"
/// methods return a new object.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BitRows {
    width: i8,
    height: i8,
    rows: [u16; MAX_SIDE],
}

impl BitRows {
    pub(crate) fn empty(width: i8, height: i8) -> Self {
        assert!(
            width > 0 && width as usize <= MAX_SIDE,
            "width {} is not in 1..={}",
            width,
            MAX_SIDE
        );
        assert!(
            height > 0 && height as usize <= MAX_SIDE,
            "height {} is not in 1..={}",
            height,
            MAX_SIDE
        );
        Self {
            width,
            height,
            rows: [0; MAX_SIDE],
        }
    }

    pub(crate) fn full(width: i8, height: i8) -> Self {
        let mut bits = Self::empty(width, height);
        let mask = bits.row_mask();
        for row in &mut bits.rows[..height as usize] {
            *row = mask;
        }
        bits
    }

    pub(crate) fn from_cells(width: i8, height: i8, cells: impl IntoIterator<Item = (i8, i8)>) -> Self {
        cells
            .into_iter()
            .fold(Self::empty(width, height), |bits, (x, y)| bits.insert(x, y))
    }

    /// Reads a fixture made of `.` (clear), `x` (set) and `X` (set, and the head).
    ///
    /// Panics on anything else, fixtures are written by hand.
    pub(crate) fn from_fixture<S: AsRef<str>>(lines: &[S]) -> (Self, Option<(i8, i8)>) {
        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.as_ref().chars().count());
        let mut bits = Self::empty(width as i8, height as i8);
        let mut head = None;
        for (y, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            assert_eq!(
                line.chars().count(),
                width,
                "fixture row {} has the wrong length",
                y
            );
            for (x, c) in line.chars().enumerate() {
                match c {
                    '.' => {}
                    'x' => bits = bits.insert(x as i8, y as i8),
                    'X' => {
                        assert!(head.is_none(), "fixture has more than one head");
                        head = Some((x as i8, y as i8));
                        bits = bits.insert(x as i8, y as i8);
                    }
                    other => panic!("invalid fixture character '{}'", other),
                }
            }
        }
        (bits, head)
    }

    pub(crate) fn width(self) -> i8 {
        self.width
    }

    pub(crate) fn height(self) -> i8 {
        self.height
    }

    pub(crate) fn in_bounds(self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub(crate) fn contains(self, x: i8, y: i8) -> bool {
        self.in_bounds(x, y) && self.rows[y as usize] & (1u16 << x) != 0
    }

    #[must_use]
    pub(crate) fn insert(self, x: i8, y: i8) -> Self {
        assert!(
            self.in_bounds(x, y),
            "({}, {}) is outside of {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        let mut rows = self.rows;
        rows[y as usize] |= 1u16 << x;
        Self { rows, ..self }
    }

    pub(crate) fn is_empty(self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }

    pub(crate) fn count(self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// True iff some row has a cell set in both.
    pub(crate) fn intersects(self, other: BitRows) -> bool {
        debug_assert!(self.same_dimensions(other));
        self.rows
            .iter()
            .zip(other.rows.iter())
            .any(|(a, b)| a & b != 0)
    }

    pub(crate) fn same_dimensions(self, other: BitRows) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// True iff shifting in `direction` would not push any set bit out of the window.
    pub(crate) fn edge_is_empty(self, direction: Direction) -> bool {
        let h = self.height as usize;
        match direction {
            Direction::North => self.rows[0] == 0,
            Direction::South => self.rows[h - 1] == 0,
            Direction::East => {
                let edge = 1u16 << (self.width - 1);
                self.rows[..h].iter().all(|row| row & edge == 0)
            }
            Direction::West => self.rows[..h].iter().all(|row| row & 1 == 0),
        }
    }

    /// Moves every cell one step in `direction`. Cells pushed over the edge are lost,
    /// the vacated edge is set iff `fill` is true.
    #[must_use]
    pub(crate) fn shifted(self, direction: Direction, fill: bool) -> Self {
        let mask = self.row_mask();
        let h = self.height as usize;
        let mut rows = [0u16; MAX_SIDE];
        match direction {
            Direction::East => {
                let edge = if fill { 1 } else { 0 };
                for (new, old) in rows[..h].iter_mut().zip(self.rows.iter()) {
                    *new = ((old << 1) & mask) | edge;
                }
            }
            Direction::West => {
                let edge = if fill { 1u16 << (self.width - 1) } else { 0 };
                for (new, old) in rows[..h].iter_mut().zip(self.rows.iter()) {
                    *new = (old >> 1) | edge;
                }
            }
            Direction::South => {
                rows[1..h].copy_from_slice(&self.rows[..h - 1]);
                rows[0] = if fill { mask } else { 0 };
            }
            Direction::North => {
                rows[..h - 1].copy_from_slice(&self.rows[1..h]);
                rows[h - 1] = if fill { mask } else { 0 };
            }
        }
        Self { rows, ..self }
    }

    pub(crate) fn cells(self) -> Cells {
        Cells { bits: self, y: 0 }
    }

    /// `[y][x]` matrix of the set cells.
    pub(crate) fn to_matrix(self) -> Vec<Vec<bool>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.contains(x, y)).collect())
            .collect()
    }

    pub(crate) fn render(self, head: Option<(i8, i8)>) -> String {
        let mut s = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            if y > 0 {
                s.push('\n');
            }
            for x in 0..self.width {
                s.push(match (head == Some((x, y)), self.contains(x, y)) {
                    (true, _) => 'X',
                    (false, true) => 'x',
                    (false, false) => '.',
                });
            }
        }
        s
    }

    fn row_mask(self) -> u16 {
        u16::MAX >> (MAX_SIDE - self.width as usize)
    }
}

impl std::ops::BitAnd for BitRows {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        debug_assert!(self.same_dimensions(rhs));
        let mut rows = self.rows;
        for (row, other) in rows.iter_mut().zip(rhs.rows.iter()) {
            *row &= other;
        }
        Self { rows, ..self }
    }
}

impl std::ops::BitOr for BitRows {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        debug_assert!(self.same_dimensions(rhs));
        let mut rows = self.rows;
        for (row, other) in rows.iter_mut().zip(rhs.rows.iter()) {
            *row |= other;
        }
        Self { rows, ..self }
    }
}

impl std::ops::Not for BitRows {
    type Output = Self;

    fn not(self) -> Self::Output {
        let mask = self.row_mask();
        let mut rows = [0u16; MAX_SIDE];
        for (new, old) in rows[..self.height as usize].iter_mut().zip(self.rows.iter()) {
            *new = !old & mask;
        }
        Self { rows, ..self }
    }
}

impl Debug for BitRows {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(None))
    }
}

/// Iterator over set cells in row-major order, produced by e.g. [`Track::cells()`](crate::Track::cells).
#[derive(Clone, Debug)]
pub struct Cells {
    bits: BitRows,
    y: i8,
}

impl Iterator for Cells {
    type Item = (i8, i8);

    fn next(&mut self) -> Option<Self::Item> {
        while self.y < self.bits.height {
            let row = &mut self.bits.rows[self.y as usize];
            if *row != 0 {
                // This cast is safe, as rows have at most 16 bits
                let x = row.trailing_zeros() as i8;
                // Clear the flag corresponding to this coordinate
                *row ^= 1u16 << x;
                return Some((x, self.y));
            }
            self.y += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bits.count() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for Cells {}

impl FusedIterator for Cells {}
