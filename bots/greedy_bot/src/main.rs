use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wake::{Action, Device, Direction, GameSetup, Grid, Track, Tracker, TurnInput};
use wake_bot_utils::{Bot, HasTracker, TrackingWrapper, TurnRecorder};

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
    /// Write the possible opponent positions of every turn to this file, as JSON lines
    #[arg(long)]
    record_to: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let recorder = args
        .record_to
        .as_deref()
        .map(TurnRecorder::create)
        .transpose()?;

    TrackingWrapper::new(GreedyBot::new(StdRng::seed_from_u64(seed), recorder)).run()
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Stdout belongs to the referee
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Moves to the free neighbour with the most room around it, and fires as soon
/// as the opponent's position is known and within reach.
struct GreedyBot {
    rng: StdRng,
    grid: Grid,
    /// Our own trajectory since the last surface
    wake: Track,
    tracker: Option<Tracker>,
    recorder: Option<TurnRecorder>,
    turn: u32,
}

impl GreedyBot {
    fn new(rng: StdRng, recorder: Option<TurnRecorder>) -> Self {
        let grid = Grid::open(1, 1);
        Self {
            rng,
            grid,
            wake: Track::origin(1, 1),
            tracker: None,
            recorder,
            turn: 0,
        }
    }

    fn free_neighbours(&self, wake: &Track) -> Vec<Direction> {
        let Some(head) = wake.head() else {
            return Vec::new();
        };
        Direction::ALL
            .into_iter()
            .filter(|direction| {
                let (x, y) = direction.apply(head);
                self.grid.is_free(x, y) && !wake.contains(x, y)
            })
            .collect()
    }

    fn best_move(&mut self) -> Option<Direction> {
        let mut top_choices = Vec::new();
        let mut top_score = 0;
        for direction in self.free_neighbours(&self.wake) {
            let Some(next) = self.wake.step(direction) else {
                continue;
            };
            // Room to move on afterwards, plus one so that any legal move beats none
            let score = self.free_neighbours(&next).len() + 1;
            match score.cmp(&top_score) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => top_choices.push(direction),
                std::cmp::Ordering::Greater => {
                    top_choices = vec![direction];
                    top_score = score;
                }
            }
        }
        top_choices.choose(&mut self.rng).copied()
    }

    fn torpedo_target(&self, turn: &TurnInput) -> Option<(i8, i8)> {
        if turn.torpedo_cooldown != 0 {
            return None;
        }
        let tracker = self.tracker.as_ref()?;
        if !tracker.is_exact() {
            return None;
        }
        let target = *tracker.possible_positions().first()?;
        let (x, y) = self.wake.head()?;
        self.grid
            .torpedo_targets(x, y)
            .contains(&target)
            .then_some(target)
    }

    fn record(&mut self, turn: &TurnInput) {
        let (Some(recorder), Some(tracker)) = (self.recorder.as_mut(), self.tracker.as_ref()) else {
            return;
        };
        if let Err(err) = recorder.record(self.turn, &turn.opponent_orders, tracker) {
            warn!("Stopping the recording: {}", err);
            self.recorder = None;
        }
    }
}

impl HasTracker for GreedyBot {
    fn get_tracker(&mut self) -> &mut Option<Tracker> {
        &mut self.tracker
    }
}

impl Bot for GreedyBot {
    fn new_game(&mut self, setup: &GameSetup, grid: Grid) -> (i8, i8) {
        self.grid = grid;
        self.turn = 0;
        let free_cells: Vec<(i8, i8)> = grid.free_cells().collect();
        let (x, y) = free_cells.choose(&mut self.rng).copied().unwrap_or((0, 0));
        self.wake = Track::starting_at(grid.width(), grid.height(), x, y);
        info!(my_id = setup.my_id, x, y, "New game");
        (x, y)
    }

    fn play_turn(&mut self, turn: &TurnInput) -> Vec<Action> {
        self.turn += 1;
        self.record(turn);
        if self.wake.head() != Some((turn.x, turn.y)) {
            warn!(x = turn.x, y = turn.y, "Lost track of our own position");
            self.wake = Track::starting_at(self.grid.width(), self.grid.height(), turn.x, turn.y);
        }

        let mut actions = Vec::new();
        match self.best_move() {
            Some(direction) => {
                if let Some(next) = self.wake.step(direction) {
                    self.wake = next;
                }
                actions.push(Action::Move(direction, Device::Torpedo));
            }
            None => {
                debug!("Stuck, surfacing");
                self.wake = Track::starting_at(self.grid.width(), self.grid.height(), turn.x, turn.y);
                actions.push(Action::Surface);
            }
        }

        if let Some((x, y)) = self.torpedo_target(turn) {
            info!(x, y, "Firing at the opponent");
            actions.push(Action::Torpedo { x, y });
        }
        actions
    }
}
