use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use wake::Tracker;

/// Writes what the tracker believed after every turn, one JSON object per line.
pub struct TurnRecorder {
    writer: BufWriter<File>,
}

impl TurnRecorder {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if let Some(directory) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !directory.is_dir() {
                anyhow::bail!("Directory '{}' does not exist", directory.display());
            }
        }
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }

    pub fn record(&mut self, turn: u32, opponent_orders: &str, tracker: &Tracker) -> anyhow::Result<()> {
        let record = TurnRecord {
            turn,
            opponent_orders: String::from(opponent_orders),
            possible_positions: tracker.possible_positions(),
            exact: tracker.is_exact(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)?;
        // Matches can be cut short, so don't keep anything in the buffer
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub opponent_orders: String,
    pub possible_positions: Vec<(i8, i8)>,
    pub exact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wake::{parse_orders, Grid};

    #[test]
    fn one_line_per_turn() {
        let path = std::env::temp_dir().join(format!("wake_recording_{}.jsonl", std::process::id()));
        let mut tracker = Tracker::new(Grid::open(2, 2), tracing::Span::none());
        let mut recorder = TurnRecorder::create(&path).unwrap();
        recorder.record(1, "NA", &tracker).unwrap();
        tracker.next(&parse_orders("MOVE E|MOVE S"));
        recorder.record(2, "MOVE E|MOVE S", &tracker).unwrap();
        drop(recorder);

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let records: Vec<TurnRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].possible_positions.len(), 4);
        assert_eq!(
            records[1],
            TurnRecord {
                turn: 2,
                opponent_orders: String::from("MOVE E|MOVE S"),
                possible_positions: vec![(1, 1)],
                exact: true,
            }
        );
    }

    #[test]
    fn missing_directory() {
        let path = std::env::temp_dir().join("wake_no_such_dir").join("turns.jsonl");
        assert!(TurnRecorder::create(&path).is_err());
    }
}
