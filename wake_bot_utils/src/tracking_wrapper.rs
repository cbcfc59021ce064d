use tracing::{debug, info_span};
use wake::{
    parse_orders, Action, Event, ExclusionMask, GameSetup, Grid, LifeChange, Tracker, TurnInput,
};

use crate::Bot;

/// Implement this trait on your bot to allow it to be used with a [`TrackingWrapper`].
///
/// The tracker is `None` until the first game starts.
pub trait HasTracker {
    fn get_tracker(&mut self) -> &mut Option<Tracker>;
}

/// Automatically tracks the opponent for your bot.
///
/// Before each turn of the wrapped bot, the tracker receives the opponent's
/// orders, its life change and the result of our last sonar. After the turn,
/// the tracker learns about our attacks.
pub struct TrackingWrapper<T>
where
    T: HasTracker,
{
    bot: T,
    grid: Option<Grid>,
    opponent_life: Option<u8>,
    pending_sonar: Option<u8>,
}

impl<T> TrackingWrapper<T>
where
    T: HasTracker,
{
    pub fn new(bot: T) -> Self {
        Self {
            bot,
            grid: None,
            opponent_life: None,
            pending_sonar: None,
        }
    }

    pub fn into_inner(self) -> T {
        self.bot
    }
}

impl<T: HasTracker + Bot> Bot for TrackingWrapper<T> {
    fn new_game(&mut self, setup: &GameSetup, grid: Grid) -> (i8, i8) {
        *self.bot.get_tracker() = Some(Tracker::new(grid, info_span!("opponent")));
        self.grid = Some(grid);
        self.opponent_life = None;
        self.pending_sonar = None;
        self.bot.new_game(setup, grid)
    }

    fn play_turn(&mut self, turn: &TurnInput) -> Vec<Action> {
        let sonar = self.pending_sonar.take().zip(turn.sonar_result);
        let mut events = parse_orders(&turn.opponent_orders);
        if let Some(previous) = self.opponent_life {
            if previous != turn.opponent_life {
                // Our attacks happened before the opponent's orders
                events.insert(
                    0,
                    Event::LifeChanged(LifeChange {
                        previous,
                        current: turn.opponent_life,
                    }),
                );
            }
        }
        self.opponent_life = Some(turn.opponent_life);

        if let (Some(tracker), Some(grid)) = (self.bot.get_tracker(), self.grid) {
            if let Some((sector, found)) = sonar {
                debug!(sector, found, "Sonar result");
                if let Some(outside) = ExclusionMask::outside_sector(&grid, sector) {
                    tracker.exclude(if found { outside } else { !outside });
                }
            }
            tracker.next(&events);
        }

        let actions = self.bot.play_turn(turn);

        if let Some(tracker) = self.bot.get_tracker() {
            for action in &actions {
                if let Some(attack) = action.attack() {
                    tracker.record_attack(attack);
                }
                if let Action::Sonar(sector) = *action {
                    self.pending_sonar = Some(sector);
                }
            }
        }
        actions
    }
}
