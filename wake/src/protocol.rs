use std::fmt::{self, Display};
use std::str::{FromStr, SplitWhitespace};

use crate::{Attack, Direction, ProtocolError};

/// The first line sent by the referee: `<width> <height> <my id>`.
///
/// It is followed by one line per map row, see [`Grid::from_lines()`](crate::Grid::from_lines).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSetup {
    pub width: i8,
    pub height: i8,
    pub my_id: u8,
}

impl FromStr for GameSetup {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        Ok(GameSetup {
            width: next_field(&mut words, "width")?,
            height: next_field(&mut words, "height")?,
            my_id: next_field(&mut words, "my_id")?,
        })
    }
}

/// Everything the referee sends at the start of a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnInput {
    pub x: i8,
    pub y: i8,
    pub my_life: u8,
    pub opponent_life: u8,
    /// Turns until the device is charged, or -1 if it is disabled.
    pub torpedo_cooldown: i8,
    pub sonar_cooldown: i8,
    pub silence_cooldown: i8,
    pub mine_cooldown: i8,
    /// The answer to our last sonar, `None` if we did not use one.
    pub sonar_result: Option<bool>,
    /// The raw orders of the opponent's last turn, see [`parse_orders()`](crate::parse_orders).
    pub opponent_orders: String,
}

impl TurnInput {
    /// Parses the three lines of a turn: the status line, the sonar result and the opponent's orders.
    pub fn parse(status: &str, sonar_result: &str, opponent_orders: &str) -> Result<Self, ProtocolError> {
        let mut words = status.split_whitespace();
        let x = next_field(&mut words, "x")?;
        let y = next_field(&mut words, "y")?;
        let my_life = next_field(&mut words, "my_life")?;
        let opponent_life = next_field(&mut words, "opponent_life")?;
        let torpedo_cooldown = next_field(&mut words, "torpedo_cooldown")?;
        let sonar_cooldown = next_field(&mut words, "sonar_cooldown")?;
        let silence_cooldown = next_field(&mut words, "silence_cooldown")?;
        let mine_cooldown = next_field(&mut words, "mine_cooldown")?;
        let sonar_result = match sonar_result.trim() {
            "Y" => Some(true),
            "N" => Some(false),
            "NA" => None,
            other => {
                return Err(ProtocolError::InvalidField {
                    field: "sonar_result",
                    value: String::from(other),
                })
            }
        };
        Ok(TurnInput {
            x,
            y,
            my_life,
            opponent_life,
            torpedo_cooldown,
            sonar_cooldown,
            silence_cooldown,
            mine_cooldown,
            sonar_result,
            opponent_orders: String::from(opponent_orders.trim()),
        })
    }
}

fn next_field<T: FromStr>(words: &mut SplitWhitespace, field: &'static str) -> Result<T, ProtocolError> {
    let word = words.next().ok_or(ProtocolError::MissingField { field })?;
    word.parse().map_err(|_| ProtocolError::InvalidField {
        field,
        value: String::from(word),
    })
}

/// A device that a move can charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Device {
    Torpedo,
    Sonar,
    Silence,
    Mine,
}

impl Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Device::Torpedo => "TORPEDO",
            Device::Sonar => "SONAR",
            Device::Silence => "SILENCE",
            Device::Mine => "MINE",
        };
        write!(f, "{}", name)
    }
}

/// One of our own orders. Its [`Display`] impl produces what the referee expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Direction, Device),
    Surface,
    Torpedo { x: i8, y: i8 },
    Silence(Direction, u8),
    Mine(Direction),
    Trigger { x: i8, y: i8 },
    Sonar(u8),
    Msg(String),
}

impl Action {
    /// The attack this action makes, if any.
    pub fn attack(&self) -> Option<Attack> {
        match *self {
            Action::Torpedo { x, y } => Some(Attack::Torpedo { x, y }),
            Action::Trigger { x, y } => Some(Attack::Mine { x, y }),
            _ => None,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(direction, device) => write!(f, "MOVE {} {}", direction, device),
            Action::Surface => write!(f, "SURFACE"),
            Action::Torpedo { x, y } => write!(f, "TORPEDO {} {}", x, y),
            Action::Silence(direction, distance) => write!(f, "SILENCE {} {}", direction, distance),
            Action::Mine(direction) => write!(f, "MINE {}", direction),
            Action::Trigger { x, y } => write!(f, "TRIGGER {} {}", x, y),
            Action::Sonar(sector) => write!(f, "SONAR {}", sector),
            Action::Msg(message) => write!(f, "MSG {}", message),
        }
    }
}

/// Joins the actions of one turn with `|`.
pub fn format_actions(actions: &[Action]) -> String {
    actions
        .iter()
        .map(Action::to_string)
        .collect::<Vec<_>>()
        .join("|")
}
