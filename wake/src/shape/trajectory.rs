use tracing::warn;

use crate::{Direction, Track};

/// The opponent's path since its last silence or surface, in a floating frame.
///
/// The frame starts with a single cell at `(0, 0)` and is re-centred whenever a
/// move would leave the window, so the coordinates carry no absolute meaning.
/// Only the shape matters; see [`placements()`](crate::placements).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelativeTrajectory {
    track: Track,
}

impl RelativeTrajectory {
    pub fn new(width: i8, height: i8) -> Self {
        Self {
            track: Track::origin(width, height),
        }
    }

    /// Appends a move to the path.
    ///
    /// A path that no longer fits the window can only come from inconsistent
    /// orders. It is then forgotten, and the trajectory starts over from the new head.
    pub fn extend(&mut self, direction: Direction) {
        self.track = match self.track.extend(direction) {
            Some(track) => track,
            None => {
                warn!(?direction, "Trajectory does not fit the map, starting over");
                Track::origin(self.track.width(), self.track.height())
            }
        };
    }

    pub fn shape(&self) -> &Track {
        &self.track
    }

    pub fn len(&self) -> u32 {
        self.track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn records_the_shape_of_a_walk() {
        let mut trajectory = RelativeTrajectory::new(15, 15);
        for direction in [North, East, East, South, South, East] {
            trajectory.extend(direction);
        }
        assert_eq!(trajectory.len(), 7);
        assert_eq!(trajectory.shape().head(), Some((3, 2)));
        let mut cells = Vec::from_iter(trajectory.shape().cells());
        cells.sort();
        assert_eq!(
            cells,
            vec![(0, 0), (0, 1), (1, 0), (2, 0), (2, 1), (2, 2), (3, 2)]
        );
    }

    #[test]
    fn a_path_wider_than_the_map_starts_over() {
        let mut trajectory = RelativeTrajectory::new(3, 1);
        trajectory.extend(East);
        trajectory.extend(East);
        assert_eq!(trajectory.len(), 3);
        trajectory.extend(East);
        assert_eq!(trajectory.len(), 3);
        trajectory.extend(West);
        assert_eq!(trajectory.len(), 1);
    }
}
