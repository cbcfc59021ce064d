use std::collections::HashSet;

use quickcheck::{Arbitrary, Gen};

use crate::{Direction, Event, ExclusionMask, Grid, Track};

const WALK_SIDE: i8 = 15;

impl Arbitrary for Direction {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Direction::ALL).unwrap()
    }
}

/// A trajectory on an open map, made of random steps that never cross the wake.
#[derive(Clone, Debug)]
pub struct OpenWalk {
    track: Track,
}

impl OpenWalk {
    pub fn track(&self) -> Track {
        self.track
    }
}

impl Arbitrary for OpenWalk {
    fn arbitrary(g: &mut Gen) -> Self {
        let x = (u8::arbitrary(g) % WALK_SIDE as u8) as i8;
        let y = (u8::arbitrary(g) % WALK_SIDE as u8) as i8;
        let mut track = Track::starting_at(WALK_SIDE, WALK_SIDE, x, y);
        let steps = usize::arbitrary(g) % 40;
        for _ in 0..steps {
            // Steps into the wake or off the map are skipped
            if let Some(next) = track.step(Direction::arbitrary(g)) {
                track = next;
            }
        }
        OpenWalk { track }
    }
}

/// Random cells for building an [`ExclusionMask`], either as the only possible
/// cells or as the only excluded ones.
#[derive(Clone, Debug)]
pub struct MaskCells {
    cells: Vec<(u8, u8)>,
    possible: bool,
}

impl MaskCells {
    pub fn mask(&self, width: i8, height: i8) -> ExclusionMask {
        let cells = self
            .cells
            .iter()
            .map(|&(x, y)| ((x % width as u8) as i8, (y % height as u8) as i8));
        let mask = ExclusionMask::all_except(width, height, cells);
        if self.possible {
            mask
        } else {
            !mask
        }
    }
}

impl Arbitrary for MaskCells {
    fn arbitrary(g: &mut Gen) -> Self {
        MaskCells {
            cells: Vec::arbitrary(g),
            possible: bool::arbitrary(g),
        }
    }
}

/// A game as the opponent plays it on an open 15x15 map: one event per turn,
/// along with where the opponent really is after that turn.
#[derive(Clone, Debug)]
pub struct Walk {
    pub turns: Vec<(Event, (i8, i8))>,
}

impl Arbitrary for Walk {
    fn arbitrary(g: &mut Gen) -> Self {
        let grid = Grid::open(WALK_SIDE, WALK_SIDE);
        let x = (u8::arbitrary(g) % WALK_SIDE as u8) as i8;
        let y = (u8::arbitrary(g) % WALK_SIDE as u8) as i8;
        let mut position = (x, y);
        let mut wake = HashSet::from([position]);
        let num_turns = usize::arbitrary(g) % 60;
        let mut turns = Vec::with_capacity(num_turns);
        for _ in 0..num_turns {
            let event = match u8::arbitrary(g) % 10 {
                0 => {
                    let range = grid.torpedo_range(position.0, position.1);
                    let &(x, y) = g.choose(&range).unwrap();
                    Event::Torpedo { x, y }
                }
                1 => {
                    let direction = Direction::arbitrary(g);
                    let distance = u8::arbitrary(g) % 5;
                    for _ in 0..distance {
                        let next = direction.apply(position);
                        if !grid.is_free(next.0, next.1) || wake.contains(&next) {
                            break;
                        }
                        position = next;
                        wake.insert(next);
                    }
                    Event::Silence
                }
                2 => surface(&grid, position, &mut wake),
                _ => {
                    let options: Vec<Direction> = Direction::ALL
                        .into_iter()
                        .filter(|direction| {
                            let (x, y) = direction.apply(position);
                            grid.is_free(x, y) && !wake.contains(&(x, y))
                        })
                        .collect();
                    match g.choose(&options) {
                        Some(&direction) => {
                            position = direction.apply(position);
                            wake.insert(position);
                            Event::Move(direction)
                        }
                        None => surface(&grid, position, &mut wake),
                    }
                }
            };
            turns.push((event, position));
        }
        Walk { turns }
    }
}

fn surface(grid: &Grid, position: (i8, i8), wake: &mut HashSet<(i8, i8)>) -> Event {
    wake.clear();
    wake.insert(position);
    Event::Surface(grid.sector_of(position.0, position.1).unwrap())
}
