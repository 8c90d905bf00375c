//! Plain-text presenter writing to any output stream.

use std::{
    io::{self, Write},
    time::Duration,
};

use reef_core::Event;
use reef_highscores::Highscore;
use reef_rendering::{describe, Frame, Presenter};

/// Presenter that prints status lines and, optionally, frames.
pub(crate) struct Terminal<W> {
    out: W,
    frames: bool,
}

impl<W: Write> Terminal<W> {
    pub(crate) fn new(out: W, frames: bool) -> Self {
        Self { out, frames }
    }

    /// Prints the high-score table.
    pub(crate) fn scores(&mut self, scores: &[Highscore]) -> io::Result<()> {
        writeln!(self.out, "highscores:")?;
        for (rank, score) in scores.iter().enumerate() {
            writeln!(
                self.out,
                "{:>2}. {} {:.1}s {} moves",
                rank + 1,
                score.name(),
                Duration::from_millis(score.time_millis()).as_secs_f64(),
                score.moves()
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> Presenter for Terminal<W> {
    type Error = io::Error;

    fn present(&mut self, frame: &Frame, events: &[Event]) -> io::Result<()> {
        for line in events.iter().filter_map(describe) {
            writeln!(self.out, "{line}")?;
        }
        if self.frames {
            write!(self.out, "{frame}")?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_core::CharacterKind;

    #[test]
    fn frames_are_printed_only_on_request() {
        let frame = Frame::paint(1, 1, &[]);
        let events = [Event::ControlSwitched {
            character: CharacterKind::BigFish,
        }];

        let mut quiet = Terminal::new(Vec::new(), false);
        quiet.present(&frame, &events).expect("written");
        assert_eq!(String::from_utf8_lossy(&quiet.out), "controlling big fish\n");

        let mut verbose = Terminal::new(Vec::new(), true);
        verbose.present(&frame, &events).expect("written");
        assert_eq!(
            String::from_utf8_lossy(&verbose.out),
            "controlling big fish\n \n\n"
        );
    }

    #[test]
    fn scores_show_seconds_with_one_decimal() {
        let scores = [
            Highscore::new("Ana", 900, 12),
            Highscore::new("Bo", 12_340, 40),
        ];
        let mut terminal = Terminal::new(Vec::new(), false);
        terminal.scores(&scores).expect("written");
        assert_eq!(
            String::from_utf8_lossy(&terminal.out),
            "highscores:\n 1. Ana 0.9s 12 moves\n 2. Bo 12.3s 40 moves\n"
        );
    }
}
