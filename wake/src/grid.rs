use crate::{MapError, Track, MAX_SIDE};

/// Side length of the square sectors the map is divided into.
pub const SECTOR_SIZE: i8 = 5;
/// Largest Manhattan distance a torpedo can travel.
pub const TORPEDO_RANGE: i8 = 4;
/// Largest number of cells a silence can cover.
pub const SILENCE_RANGE: i8 = 4;

/// The map of a match: its dimensions and its islands.
///
/// Created once when the match starts, then only read.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i8,
    height: i8,
    obstacles: Track,
}

impl Grid {
    /// A map without islands.
    pub fn open(width: i8, height: i8) -> Self {
        Self {
            width,
            height,
            obstacles: Track::empty(width, height),
        }
    }

    /// Scans map rows made of `.` (water) and `x` (island).
    ///
    /// ```
    /// use wake::Grid;
    /// let grid = Grid::from_lines(&["..x", "..."]).unwrap();
    /// assert!(!grid.is_free(2, 0));
    /// assert!(grid.is_free(2, 1));
    /// ```
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, MapError> {
        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.as_ref().chars().count());
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(MapError::TooLarge { width, height });
        }
        let mut islands = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, c) in line.chars().enumerate() {
                match c {
                    '.' => {}
                    'x' => islands.push((x as i8, y as i8)),
                    found => return Err(MapError::InvalidCell { x, y, found }),
                }
            }
        }
        let (width, height) = (width as i8, height as i8);
        Ok(Self {
            width,
            height,
            obstacles: Track::from_cells(width, height, islands),
        })
    }

    pub fn width(&self) -> i8 {
        self.width
    }

    pub fn height(&self) -> i8 {
        self.height
    }

    /// The islands, as headless occupancy.
    pub fn obstacles(&self) -> &Track {
        &self.obstacles
    }

    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// True iff `(x, y)` is on the map and not an island.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        self.in_bounds(x, y) && !self.obstacles.contains(x, y)
    }

    /// Every free cell in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.is_free(x, y))
    }

    pub fn sectors_per_row(&self) -> u8 {
        ((self.width + SECTOR_SIZE - 1) / SECTOR_SIZE) as u8
    }

    /// The sector of a cell. Sectors are numbered from 1, row by row.
    pub fn sector_of(&self, x: i8, y: i8) -> Option<u8> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let column = (x / SECTOR_SIZE) as u8;
        let row = (y / SECTOR_SIZE) as u8;
        Some(row * self.sectors_per_row() + column + 1)
    }

    /// Every cell of a sector, islands included, or `None` if there is no such sector.
    pub fn sector_cells(&self, sector: u8) -> Option<Vec<(i8, i8)>> {
        let per_row = self.sectors_per_row();
        let rows = ((self.height + SECTOR_SIZE - 1) / SECTOR_SIZE) as u8;
        let index = sector.checked_sub(1)?;
        if index / per_row >= rows {
            return None;
        }
        let left = (index % per_row) as i8 * SECTOR_SIZE;
        let top = (index / per_row) as i8 * SECTOR_SIZE;
        let right = (left + SECTOR_SIZE).min(self.width);
        let bottom = (top + SECTOR_SIZE).min(self.height);
        Some(
            (top..bottom)
                .flat_map(|y| (left..right).map(move |x| (x, y)))
                .collect(),
        )
    }

    /// The free cells a torpedo fired from `(x, y)` can reach, i.e. those at a
    /// Manhattan distance of 1 to [`TORPEDO_RANGE`].
    ///
    /// Islands between the origin and the target are not taken into account.
    pub fn torpedo_range(&self, x: i8, y: i8) -> Vec<(i8, i8)> {
        let mut cells = Vec::new();
        for dy in -TORPEDO_RANGE..=TORPEDO_RANGE {
            let reach = TORPEDO_RANGE - dy.abs();
            for dx in -reach..=reach {
                if (dx, dy) != (0, 0) && self.is_free(x + dx, y + dy) {
                    cells.push((x + dx, y + dy));
                }
            }
        }
        cells
    }

    /// The cells of [`Self::torpedo_range()`] that do not also hit the firer.
    pub fn torpedo_targets(&self, x: i8, y: i8) -> Vec<(i8, i8)> {
        self.torpedo_range(x, y)
            .into_iter()
            .filter(|&(tx, ty)| (tx - x).abs() > 1 || (ty - y).abs() > 1)
            .collect()
    }

    /// The free cells of the 8-neighbourhood of `(x, y)`, without `(x, y)` itself.
    pub fn neighbouring_cells(&self, x: i8, y: i8) -> Vec<(i8, i8)> {
        let mut cells = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.is_free(x + dx, y + dy) {
                    cells.push((x + dx, y + dy));
                }
            }
        }
        cells
    }

    /// The free cells damaged by an explosion at `(x, y)`.
    pub fn blast_area(&self, x: i8, y: i8) -> Vec<(i8, i8)> {
        let mut cells = self.neighbouring_cells(x, y);
        if self.is_free(x, y) {
            cells.push((x, y));
        }
        cells
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.obstacles)
    }
}
