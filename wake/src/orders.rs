use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Direction, OrderError};

/// Something the opponent did that is relevant to tracking it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Move(Direction),
    /// A blind move of 0 to 4 cells in a single direction.
    Silence,
    /// The opponent surfaced in the given sector and cleared its wake.
    Surface(u8),
    Torpedo { x: i8, y: i8 },
    /// Derived from the opponent's life total between two turns.
    LifeChanged(LifeChange),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeChange {
    pub previous: u8,
    pub current: u8,
}

impl LifeChange {
    /// Life points lost. Negative if life was somehow gained.
    pub fn lost(&self) -> i16 {
        i16::from(self.previous) - i16::from(self.current)
    }
}

/// One of our own attacks, which may explain a life change of the opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attack {
    Torpedo { x: i8, y: i8 },
    Mine { x: i8, y: i8 },
}

impl Attack {
    pub fn position(&self) -> (i8, i8) {
        match *self {
            Attack::Torpedo { x, y } => (x, y),
            Attack::Mine { x, y } => (x, y),
        }
    }
}

/// Parses a `|`-separated list of opponent orders.
///
/// Malformed orders are skipped, the rest of the list is still used.
///
/// ```
/// use wake::{parse_orders, Direction, Event};
/// assert_eq!(
///     parse_orders("MOVE N TORPEDO|TORPEDO 3 5|SONAR 4|MSG hi"),
///     vec![Event::Move(Direction::North), Event::Torpedo { x: 3, y: 5 }],
/// );
/// ```
pub fn parse_orders(orders: &str) -> Vec<Event> {
    let mut events = Vec::new();
    for token in orders.split('|') {
        match parse_order(token) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(err) => debug!(token, %err, "Skipping order"),
        }
    }
    events
}

/// Parses a single order.
///
/// Returns `Ok(None)` for well-formed orders that tell nothing about the
/// opponent's position, like `SONAR` or `MINE`.
pub fn parse_order(token: &str) -> Result<Option<Event>, OrderError> {
    let mut words = token.split_whitespace();
    let command = words.next().ok_or(OrderError::Empty)?;
    match command {
        "MOVE" => {
            let direction = next_arg(&mut words, "MOVE")?.parse()?;
            Ok(Some(Event::Move(direction)))
        }
        "SILENCE" => Ok(Some(Event::Silence)),
        "SURFACE" => {
            let sector = parse_number(next_arg(&mut words, "SURFACE")?)?;
            Ok(Some(Event::Surface(sector)))
        }
        "TORPEDO" => {
            let x = parse_number(next_arg(&mut words, "TORPEDO")?)?;
            let y = parse_number(next_arg(&mut words, "TORPEDO")?)?;
            Ok(Some(Event::Torpedo { x, y }))
        }
        "SONAR" | "MINE" | "TRIGGER" | "MSG" | "NA" => Ok(None),
        other => Err(OrderError::UnknownCommand(String::from(other))),
    }
}

fn next_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<&'a str, OrderError> {
    words.next().ok_or(OrderError::MissingArgument { command })
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, OrderError> {
    word.parse()
        .map_err(|_| OrderError::InvalidNumber(String::from(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tracked_order() {
        assert_eq!(
            parse_orders("MOVE E SILENCE|SILENCE N 3|SURFACE 7|TORPEDO 0 14"),
            vec![
                Event::Move(Direction::East),
                Event::Silence,
                Event::Surface(7),
                Event::Torpedo { x: 0, y: 14 },
            ]
        );
    }

    #[test]
    fn untracked_orders_are_dropped() {
        assert_eq!(parse_orders("NA"), vec![]);
        assert_eq!(parse_order("MINE N"), Ok(None));
        assert_eq!(parse_order("TRIGGER 3 4"), Ok(None));
        assert_eq!(parse_order("MSG MOVE N"), Ok(None));
    }

    #[test]
    fn malformed_orders_are_skipped() {
        assert_eq!(parse_order(""), Err(OrderError::Empty));
        assert_eq!(
            parse_order("MOVE"),
            Err(OrderError::MissingArgument { command: "MOVE" })
        );
        assert_eq!(
            parse_order("MOVE Q"),
            Err(OrderError::InvalidDirection(String::from("Q")))
        );
        assert_eq!(
            parse_order("TORPEDO 3 y"),
            Err(OrderError::InvalidNumber(String::from("y")))
        );
        assert_eq!(
            parse_order("DIVE"),
            Err(OrderError::UnknownCommand(String::from("DIVE")))
        );
        assert_eq!(
            parse_orders("MOVE|TORPEDO 300 1|  |MOVE S"),
            vec![Event::Move(Direction::South)]
        );
    }

    #[test]
    fn life_lost() {
        let change = LifeChange {
            previous: 6,
            current: 3,
        };
        assert_eq!(change.lost(), 3);
        let gained = LifeChange {
            previous: 1,
            current: 2,
        };
        assert_eq!(gained.lost(), -1);
    }
}
