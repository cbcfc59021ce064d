mod accumulator;
mod enumerate;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Span};

pub use accumulator::ExclusionAccumulator;
pub use enumerate::{placements, Placements};

use crate::{
    visualize_positions, Attack, Direction, Event, ExclusionMask, Grid, RelativeTrajectory, Track,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerState {
    /// Several trajectories fit everything that is known.
    Tracking,
    /// A single trajectory fits, so the opponent's position is known exactly.
    Collapsed,
}

/// Keeps track of every trajectory the opponent could have followed.
///
/// Feed it the opponent's orders of each turn with [`Self::next()`], then ask
/// for [`Self::possible_positions()`].
///
/// ```
/// use wake::{Direction, Event, Grid, Tracker};
/// let grid = Grid::from_lines(&["...", "x..", "..."]).unwrap();
/// let mut tracker = Tracker::new(grid, tracing::Span::none());
/// assert_eq!(tracker.possible_positions().len(), 8);
///
/// tracker.next(&[Event::Move(Direction::South), Event::Move(Direction::South)]);
/// assert_eq!(tracker.possible_positions(), vec![(1, 2), (2, 2)]);
/// ```
#[derive(Clone, Debug)]
pub struct Tracker {
    grid: Grid,
    trajectory: RelativeTrajectory,
    accumulator: ExclusionAccumulator,
    // Only set in the collapsed state
    collapsed: Option<Track>,
    hypotheses: Vec<Track>,
    last_move: Option<Direction>,
    pending_attacks: Vec<Attack>,
    span: Span,
}

impl Tracker {
    /// Starts with no knowledge: the opponent may be on any free cell.
    ///
    /// Everything the tracker logs happens inside `span`.
    pub fn new(grid: Grid, span: Span) -> Self {
        let mut tracker = Self {
            grid,
            trajectory: RelativeTrajectory::new(grid.width(), grid.height()),
            accumulator: ExclusionAccumulator::new(grid, span.clone()),
            collapsed: None,
            hypotheses: Vec::new(),
            last_move: None,
            pending_attacks: Vec::new(),
            span,
        };
        tracker.recompute();
        tracker
    }

    /// Registers one of our own attacks, to explain the next life change of the opponent.
    pub fn record_attack(&mut self, attack: Attack) {
        self.pending_attacks.push(attack);
    }

    /// Consumes the events of one opponent turn.
    pub fn next(&mut self, events: &[Event]) {
        let span = self.span.clone();
        let _guard = span.enter();
        let surfaced = events.iter().any(|event| matches!(event, Event::Surface(_)));
        for event in events {
            debug!(?event);
            match *event {
                Event::Move(direction) => {
                    self.trajectory.extend(direction);
                    self.collapsed = self.collapsed.and_then(|track| track.step(direction));
                    self.accumulator.on_move(direction);
                    self.last_move = Some(direction);
                }
                Event::Silence => {
                    self.fold_into_accumulator();
                    self.reset_trajectory();
                    self.collapsed = None;
                    self.accumulator.on_silence(self.last_move);
                    self.last_move = None;
                }
                Event::Surface(sector) => {
                    self.fold_into_accumulator();
                    self.reset_trajectory();
                    // The head stays known, the wake is gone
                    self.collapsed = self
                        .collapsed
                        .and_then(|track| track.head())
                        .map(|(x, y)| {
                            Track::starting_at(self.grid.width(), self.grid.height(), x, y)
                        });
                    self.accumulator.on_surface(sector);
                    self.last_move = None;
                }
                Event::Torpedo { x, y } => self.accumulator.on_torpedo(x, y),
                Event::LifeChanged(change) => {
                    self.accumulator
                        .on_life_changed(change, surfaced, &self.pending_attacks)
                }
            }
        }
        self.pending_attacks.clear();
        self.recompute();
    }

    /// Adds evidence that does not come from the opponent's orders, e.g. a sonar result.
    pub fn exclude(&mut self, mask: ExclusionMask) {
        let span = self.span.clone();
        let _guard = span.enter();
        self.accumulator.exclude(mask);
        self.recompute();
    }

    /// The head of every possible trajectory, in row-major order. Only empty on a map without water.
    pub fn possible_positions(&self) -> Vec<(i8, i8)> {
        let mut positions: Vec<(i8, i8)> = self.hypotheses.iter().filter_map(Track::head).collect();
        positions.sort_by_key(|&(x, y)| (y, x));
        positions
    }

    pub fn possible_tracks(&self) -> &[Track] {
        &self.hypotheses
    }

    pub fn is_exact(&self) -> bool {
        self.hypotheses.len() == 1
    }

    pub fn state(&self) -> TrackerState {
        if self.collapsed.is_some() {
            TrackerState::Collapsed
        } else {
            TrackerState::Tracking
        }
    }

    pub fn exclusion_mask(&self) -> &ExclusionMask {
        self.accumulator.mask()
    }

    pub fn trajectory(&self) -> &RelativeTrajectory {
        &self.trajectory
    }

    /// Human-readable dump of the possible positions, the relative trajectory
    /// and the exclusion mask.
    pub fn debug_dump(&self) -> String {
        format!(
            "{:?} with {} possible position(s):\n{}\n\nTrajectory:\n{:?}\n\nExcluded:\n{:?}",
            self.state(),
            self.hypotheses.len(),
            visualize_positions(&self.grid, &self.possible_positions()),
            self.trajectory.shape(),
            self.accumulator.mask(),
        )
    }

    fn enumerate(&self) -> Vec<Track> {
        placements(self.trajectory.shape(), self.accumulator.mask(), &self.grid).collect()
    }

    fn is_consistent(&self, track: &Track) -> bool {
        !track.collides_with(self.grid.obstacles()) && !track.head_is_excluded(self.accumulator.mask())
    }

    fn reset_trajectory(&mut self) {
        self.trajectory = RelativeTrajectory::new(self.grid.width(), self.grid.height());
    }

    // The trajectory is about to be forgotten, but where its head may be is still known.
    fn fold_into_accumulator(&mut self) {
        let heads: Vec<(i8, i8)> = match self.collapsed {
            Some(track) => track.head().into_iter().collect(),
            None => self.enumerate().iter().filter_map(Track::head).collect(),
        };
        if heads.is_empty() {
            warn!("No trajectory left to remember");
            return;
        }
        self.accumulator.restrict_to(heads);
    }

    fn recompute(&mut self) {
        if let Some(track) = self.collapsed {
            if self.is_consistent(&track) {
                self.hypotheses = vec![track];
                return;
            }
            debug!("Known trajectory was contradicted");
            self.collapsed = None;
        }

        let mut hypotheses = self.enumerate();
        if hypotheses.is_empty() {
            hypotheses = self.recover();
        }
        if let [track] = hypotheses.as_slice() {
            info!(head = ?track.head(), "Opponent located");
            self.collapsed = Some(*track);
        }
        debug!(hypotheses = hypotheses.len());
        self.hypotheses = hypotheses;
    }

    fn recover(&mut self) -> Vec<Track> {
        warn!("Contradictory evidence, discarding the latest restriction");
        if self.accumulator.discard_latest_restriction() {
            let hypotheses = self.enumerate();
            if !hypotheses.is_empty() {
                return hypotheses;
            }
        }

        warn!("Still contradictory, forgetting all exclusions");
        self.accumulator.widen_to_obstacles();
        let hypotheses = self.enumerate();
        if !hypotheses.is_empty() {
            return hypotheses;
        }

        warn!("Trajectory fits nowhere, starting over");
        self.reset_trajectory();
        self.enumerate()
    }
}
