use tracing::{debug, warn, Span};

use crate::{Attack, Direction, ExclusionMask, Grid, LifeChange, SILENCE_RANGE};

/// Collects the evidence about where the opponent's head cannot be.
///
/// The mask lives in the absolute frame of the map and always excludes the
/// islands. Apart from a silence, every update can only exclude more cells.
#[derive(Clone, Debug)]
pub struct ExclusionAccumulator {
    grid: Grid,
    mask: ExclusionMask,
    // The mask as it was before the most recent restriction, kept in step with later moves
    fallback: Option<ExclusionMask>,
    span: Span,
}

impl ExclusionAccumulator {
    pub fn new(grid: Grid, span: Span) -> Self {
        Self::with_mask(grid, ExclusionMask::obstacles(&grid), span)
    }

    /// Starts from existing evidence. The islands are excluded in any case.
    pub fn with_mask(grid: Grid, mask: ExclusionMask, span: Span) -> Self {
        Self {
            grid,
            mask: mask | ExclusionMask::obstacles(&grid),
            fallback: None,
            span,
        }
    }

    pub fn mask(&self) -> &ExclusionMask {
        &self.mask
    }

    /// The opponent moved one cell, and so does everything known about it.
    pub fn on_move(&mut self, direction: Direction) {
        let obstacles = ExclusionMask::obstacles(&self.grid);
        self.mask = self.mask.shift(direction) | obstacles;
        self.fallback = self
            .fallback
            .map(|fallback| fallback.shift(direction) | obstacles);
    }

    /// The opponent fired at `(x, y)`, so it must be within range of that cell.
    pub fn on_torpedo(&mut self, x: i8, y: i8) {
        let span = self.span.clone();
        let _guard = span.enter();
        if !self.grid.in_bounds(x, y) {
            warn!(x, y, "Ignoring torpedo fired outside of the map");
            return;
        }
        let range = self.grid.torpedo_range(x, y);
        debug!(x, y, cells = range.len(), "Torpedo fired");
        self.restrict(ExclusionMask::all_except(
            self.grid.width(),
            self.grid.height(),
            range,
        ));
    }

    /// The opponent moved up to [`SILENCE_RANGE`] cells in a straight line,
    /// but not back onto its last move.
    pub fn on_silence(&mut self, last_move: Option<Direction>) {
        let span = self.span.clone();
        let _guard = span.enter();
        self.mask = self.dilate(self.mask, last_move);
        self.fallback = self
            .fallback
            .map(|fallback| self.dilate(fallback, last_move));
        debug!(
            ?last_move,
            excluded = self.mask.num_excluded(),
            "Silence widened the possible area"
        );
    }

    /// The opponent surfaced in `sector`.
    pub fn on_surface(&mut self, sector: u8) {
        let span = self.span.clone();
        let _guard = span.enter();
        match ExclusionMask::outside_sector(&self.grid, sector) {
            Some(outside) => self.restrict(outside),
            None => warn!(sector, "Ignoring surface in an unknown sector"),
        }
    }

    /// The opponent's life changed after our `attacks` of the last turn.
    ///
    /// `surfaced` tells whether the opponent surfaced in the same turn, which
    /// costs one life point by itself.
    pub fn on_life_changed(&mut self, change: LifeChange, surfaced: bool, attacks: &[Attack]) {
        let span = self.span.clone();
        let _guard = span.enter();
        let lost = change.lost() - i16::from(surfaced);
        if lost <= 0 || attacks.is_empty() {
            return;
        }
        let hit_cells: Vec<(i8, i8)> = match attacks {
            [attack] => {
                let (x, y) = attack.position();
                if lost > 1 {
                    // Direct hit
                    vec![(x, y)]
                } else {
                    self.grid.neighbouring_cells(x, y)
                }
            }
            _ if lost == 1 => attacks
                .iter()
                .flat_map(|attack| {
                    let (x, y) = attack.position();
                    self.grid.neighbouring_cells(x, y)
                })
                .collect(),
            _ => attacks
                .iter()
                .flat_map(|attack| {
                    let (x, y) = attack.position();
                    self.grid.blast_area(x, y)
                })
                .collect(),
        };
        debug!(lost, attacks = attacks.len(), cells = hit_cells.len(), "Opponent was hit");
        self.restrict(ExclusionMask::all_except(
            self.grid.width(),
            self.grid.height(),
            hit_cells.into_iter().filter(|&(x, y)| self.grid.in_bounds(x, y)),
        ));
    }

    /// Excludes every cell but `cells`.
    pub fn restrict_to(&mut self, cells: impl IntoIterator<Item = (i8, i8)>) {
        self.restrict(ExclusionMask::all_except(
            self.grid.width(),
            self.grid.height(),
            cells,
        ));
    }

    /// Adds evidence from elsewhere, e.g. a sonar result.
    pub fn exclude(&mut self, extra: ExclusionMask) {
        self.restrict(extra);
    }

    /// Undoes the most recent restriction, keeping the moves and silences since.
    ///
    /// Returns false if there was nothing to undo.
    pub fn discard_latest_restriction(&mut self) -> bool {
        match self.fallback.take() {
            Some(fallback) => {
                self.mask = fallback;
                true
            }
            None => false,
        }
    }

    /// Forgets all evidence except for the islands.
    pub fn widen_to_obstacles(&mut self) {
        self.mask = ExclusionMask::obstacles(&self.grid);
        self.fallback = None;
    }

    fn restrict(&mut self, extra: ExclusionMask) {
        self.fallback = Some(self.mask);
        self.mask = self.mask | extra | ExclusionMask::obstacles(&self.grid);
    }

    fn dilate(&self, mask: ExclusionMask, last_move: Option<Direction>) -> ExclusionMask {
        let mut dilated = mask;
        for direction in Direction::ALL {
            if Some(direction.opposite()) == last_move {
                continue;
            }
            let mut shifted = mask;
            for _ in 0..SILENCE_RANGE {
                shifted = shifted.shift(direction);
                dilated = dilated & shifted;
            }
        }
        dilated | ExclusionMask::obstacles(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::MaskCells;

    fn open_accumulator(width: i8, height: i8) -> ExclusionAccumulator {
        ExclusionAccumulator::new(Grid::open(width, height), Span::none())
    }

    fn only_possible(mask: &ExclusionMask) -> Vec<(i8, i8)> {
        Vec::from_iter(mask.possible_cells())
    }

    quickcheck! {
        fn silence_never_excludes_more(cells: MaskCells, last_move: Option<Direction>) -> bool {
            let mut acc = ExclusionAccumulator::with_mask(
                Grid::open(15, 15),
                cells.mask(15, 15),
                Span::none(),
            );
            let before = *acc.mask();
            acc.on_silence(last_move);
            let after = *acc.mask();
            after.num_excluded() <= before.num_excluded() && (after & !before).num_excluded() == 0
        }

        fn silence_keeps_exactly_the_unreachable_cells(cells: MaskCells, last_move: Option<Direction>) -> bool {
            let before = cells.mask(15, 15);
            let mut acc = ExclusionAccumulator::with_mask(Grid::open(15, 15), before, Span::none());
            acc.on_silence(last_move);
            let reachable = |x: i8, y: i8| {
                !before.excludes(x, y)
                    || Direction::ALL
                        .into_iter()
                        .filter(|&d| Some(d.opposite()) != last_move)
                        .any(|d| {
                            let (dx, dy) = d.offset();
                            (1..=SILENCE_RANGE).any(|k| !before.excludes(x - k * dx, y - k * dy))
                        })
            };
            (0..15).all(|y| (0..15).all(|x| acc.mask().excludes(x, y) != reachable(x, y)))
        }
    }

    #[test]
    fn torpedo_keeps_the_range_of_the_target() {
        let mut acc = open_accumulator(15, 15);
        acc.on_torpedo(7, 4);
        let expected = ExclusionMask::from_fixture(&[
            "xxxxxxx.xxxxxxx",
            "xxxxxx...xxxxxx",
            "xxxxx.....xxxxx",
            "xxxx.......xxxx",
            "xxx....x....xxx",
            "xxxx.......xxxx",
            "xxxxx.....xxxxx",
            "xxxxxx...xxxxxx",
            "xxxxxxx.xxxxxxx",
            "xxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxx",
        ]);
        assert_eq!(*acc.mask(), expected);
    }

    #[test]
    fn torpedo_outside_of_the_map_is_ignored() {
        let mut acc = open_accumulator(5, 5);
        acc.on_torpedo(5, 0);
        assert_eq!(acc.mask().num_excluded(), 0);
        assert!(!acc.discard_latest_restriction());
    }

    #[test]
    fn move_shifts_the_mask_and_keeps_the_islands() {
        let grid = Grid::from_lines(&["x..", "...", "..."]).unwrap();
        let mut acc = ExclusionAccumulator::with_mask(
            grid,
            ExclusionMask::from_fixture(&["...", ".x.", "..."]),
            Span::none(),
        );
        acc.on_move(Direction::East);
        assert_eq!(
            *acc.mask(),
            ExclusionMask::from_fixture(&["x..", "x.x", "x.."])
        );
    }

    #[test]
    fn silence_from_a_single_cell() {
        let mut acc = open_accumulator(15, 15);
        acc.restrict_to([(7, 7)]);
        acc.on_silence(Some(Direction::North));
        // Not back south
        let mut expected = vec![(7, 3), (7, 4), (7, 5), (7, 6)];
        expected.extend([(3, 7), (4, 7), (5, 7), (6, 7), (7, 7), (8, 7), (9, 7), (10, 7), (11, 7)]);
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(only_possible(acc.mask()), expected);
    }

    #[test]
    fn silence_without_a_previous_move_goes_anywhere() {
        let mut acc = open_accumulator(15, 15);
        acc.restrict_to([(7, 7)]);
        acc.on_silence(None);
        assert_eq!(only_possible(acc.mask()).len(), 17);
    }

    #[test]
    fn surface_keeps_the_sector() {
        let grid = Grid::from_lines(&[
            "..........",
            "..........",
            "..........",
            "..........",
            "......x...",
        ])
        .unwrap();
        let mut acc = ExclusionAccumulator::new(grid, Span::none());
        acc.on_surface(2);
        assert_eq!(acc.mask().num_excluded(), 26);
        assert!(acc.mask().excludes(6, 4));
        assert!(!acc.mask().excludes(5, 0));

        acc.on_surface(3);
        assert_eq!(acc.mask().num_excluded(), 26);
    }

    #[test]
    fn surface_in_an_unknown_sector_is_ignored() {
        let mut acc = open_accumulator(15, 15);
        acc.restrict_to([(7, 7), (8, 7)]);
        let before = *acc.mask();
        for sector in [0, 10, 100, u8::MAX] {
            acc.on_surface(sector);
        }
        assert_eq!(*acc.mask(), before);
    }

    #[test]
    fn direct_hit() {
        let mut acc = open_accumulator(15, 15);
        let change = LifeChange {
            previous: 6,
            current: 4,
        };
        acc.on_life_changed(change, false, &[Attack::Torpedo { x: 3, y: 3 }]);
        assert_eq!(only_possible(acc.mask()), vec![(3, 3)]);
    }

    #[test]
    fn splash_hit() {
        let mut acc = open_accumulator(15, 15);
        let change = LifeChange {
            previous: 6,
            current: 5,
        };
        acc.on_life_changed(change, false, &[Attack::Torpedo { x: 0, y: 0 }]);
        assert_eq!(only_possible(acc.mask()), vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn surface_damage_is_not_a_hit() {
        let mut acc = open_accumulator(15, 15);
        let change = LifeChange {
            previous: 6,
            current: 5,
        };
        acc.on_life_changed(change, true, &[Attack::Torpedo { x: 3, y: 3 }]);
        assert_eq!(acc.mask().num_excluded(), 0);

        // Surfacing and a splash hit
        let change = LifeChange {
            previous: 5,
            current: 3,
        };
        acc.on_life_changed(change, true, &[Attack::Torpedo { x: 3, y: 3 }]);
        assert_eq!(only_possible(acc.mask()).len(), 8);
    }

    #[test]
    fn no_attack_means_no_evidence() {
        let mut acc = open_accumulator(15, 15);
        let change = LifeChange {
            previous: 6,
            current: 4,
        };
        acc.on_life_changed(change, false, &[]);
        assert_eq!(acc.mask().num_excluded(), 0);
    }

    #[test]
    fn torpedo_and_mine() {
        let mut acc = open_accumulator(15, 15);
        let attacks = [Attack::Torpedo { x: 2, y: 2 }, Attack::Mine { x: 10, y: 10 }];
        let splash = LifeChange {
            previous: 6,
            current: 5,
        };
        acc.on_life_changed(splash, false, &attacks);
        assert_eq!(only_possible(acc.mask()).len(), 16);
        assert!(acc.mask().excludes(2, 2));

        let mut acc = open_accumulator(15, 15);
        let heavy = LifeChange {
            previous: 6,
            current: 3,
        };
        acc.on_life_changed(heavy, false, &attacks);
        assert_eq!(only_possible(acc.mask()).len(), 18);
        assert!(!acc.mask().excludes(2, 2));
    }

    #[test]
    fn latest_restriction_can_be_discarded() {
        let mut acc = open_accumulator(15, 15);
        acc.restrict_to([(7, 7), (8, 7)]);
        acc.restrict_to([(0, 0)]);
        acc.on_move(Direction::South);
        assert!(acc.discard_latest_restriction());
        assert_eq!(only_possible(acc.mask()), vec![(7, 8), (8, 8)]);
        assert!(!acc.discard_latest_restriction());

        acc.widen_to_obstacles();
        assert_eq!(acc.mask().num_excluded(), 0);
    }
}
