/// The error type for [`Grid::from_lines()`](crate::Grid::from_lines), i.e. for scanning the map.
#[derive(Debug, PartialEq, Eq)]
pub enum MapError {
    Empty,
    TooLarge { width: usize, height: usize },
    RaggedRow { row: usize, expected: usize, found: usize },
    InvalidCell { x: usize, y: usize, found: char },
}

impl std::error::Error for MapError {}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Empty => write!(f, "The map has no cells"),
            MapError::TooLarge { width, height } => write!(
                f,
                "The map is {}x{}, but at most {}x{} is supported",
                width,
                height,
                crate::MAX_SIDE,
                crate::MAX_SIDE
            ),
            MapError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "Map row {} has {} cells, but the first row has {}",
                row, found, expected
            ),
            MapError::InvalidCell { x, y, found } => write!(
                f,
                "Map cell ({}, {}) is '{}', expected '.' or 'x'",
                x, y, found
            ),
        }
    }
}

/// The error type for parsing a single opponent order, see [`parse_order()`](crate::parse_order).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderError {
    Empty,
    UnknownCommand(String),
    MissingArgument { command: &'static str },
    InvalidDirection(String),
    InvalidNumber(String),
}

impl std::error::Error for OrderError {}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::Empty => write!(f, "Empty order"),
            OrderError::UnknownCommand(command) => write!(f, "Unknown order '{}'", command),
            OrderError::MissingArgument { command } => {
                write!(f, "Order {} is missing an argument", command)
            }
            OrderError::InvalidDirection(word) => {
                write!(f, "'{}' is not one of N, S, E, W", word)
            }
            OrderError::InvalidNumber(word) => write!(f, "'{}' is not a valid number", word),
        }
    }
}

/// The error type for the line-based turn protocol, see [`TurnInput::parse()`](crate::TurnInput::parse).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    MissingField { field: &'static str },
    InvalidField { field: &'static str, value: String },
}

impl std::error::Error for ProtocolError {}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::MissingField { field } => {
                write!(f, "The input line ended before the {} field", field)
            }
            ProtocolError::InvalidField { field, value } => {
                write!(f, "Invalid value '{}' for the {} field", value, field)
            }
        }
    }
}
