mod recording;
mod tracking_wrapper;
pub use recording::*;
pub use tracking_wrapper::*;

use std::io::{BufRead, Write};

use wake::{format_actions, Action, GameSetup, Grid, TurnInput};

/// A trait to simplify writing bots.
pub trait Bot {
    /// Called once per match with the map. Returns the starting position.
    fn new_game(&mut self, setup: &GameSetup, grid: Grid) -> (i8, i8);
    fn play_turn(&mut self, turn: &TurnInput) -> Vec<Action>;

    fn run(&mut self) -> anyhow::Result<()> {
        // Communication happens through stdin/stdout.
        // Stderr can be used for logging.
        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        self.run_with(stdin, stdout)
    }

    /// Plays a whole match, reading the referee's lines from `input` and
    /// writing our answers to `output`.
    fn run_with(&mut self, mut input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
        let mut buf = String::new();
        if !next_line(&mut input, &mut buf)? {
            anyhow::bail!("The referee exited before sending the map size");
        }
        let setup: GameSetup = buf.parse()?;

        let mut lines = Vec::with_capacity(setup.height.max(0) as usize);
        for _ in 0..setup.height {
            if !next_line(&mut input, &mut buf)? {
                anyhow::bail!("The referee exited while sending the map");
            }
            lines.push(buf.clone());
        }
        let grid = Grid::from_lines(&lines)?;
        if grid.width() != setup.width {
            anyhow::bail!(
                "The map is {} cells wide, but {} was announced",
                grid.width(),
                setup.width
            );
        }

        let (x, y) = self.new_game(&setup, grid);
        writeln!(output, "{} {}", x, y)?;
        output.flush()?;

        loop {
            if !next_line(&mut input, &mut buf)? {
                // EOF - the referee has exited.
                break Ok(());
            }
            let status = buf.clone();
            let mut sonar_result = String::new();
            let mut opponent_orders = String::new();
            if !next_line(&mut input, &mut sonar_result)?
                || !next_line(&mut input, &mut opponent_orders)?
            {
                anyhow::bail!("The referee exited in the middle of a turn");
            }
            let turn = TurnInput::parse(&status, &sonar_result, &opponent_orders)?;
            let actions = self.play_turn(&turn);
            writeln!(output, "{}", format_actions(&actions))?;
            output.flush()?;
        }
    }
}

/// Reads the next line into `buf`, without the line ending. Returns false on EOF.
fn next_line(input: &mut impl BufRead, buf: &mut String) -> anyhow::Result<bool> {
    buf.clear(); // because read_line() appends to the buffer
    let num_bytes_read = input.read_line(buf)?;
    let len = buf.trim_end_matches(&['\r', '\n'][..]).len();
    buf.truncate(len);
    Ok(num_bytes_read > 0)
}
