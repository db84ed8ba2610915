//! Display title sinks.

use std::io::Write;

/// Error writing a title to its sink.
#[derive(Debug, thiserror::Error)]
pub enum TitleError {
    #[error("failed to write title: {0}")]
    Io(#[from] std::io::Error),
}

/// The externally owned title that `update_title` writes to.
pub trait TitleSink {
    fn set_title(&mut self, title: &str) -> Result<(), TitleError>;
}

/// Sets the terminal window title using the xterm OSC 0 sequence.
pub struct TerminalTitle<W: Write> {
    out: W,
}

impl<W: Write> TerminalTitle<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalTitle<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TitleSink for TerminalTitle<W> {
    fn set_title(&mut self, title: &str) -> Result<(), TitleError> {
        // Control characters would terminate the sequence early
        let clean: String = title.chars().filter(|c| !c.is_control()).collect();
        write!(self.out, "\x1b]0;{}\x07", clean)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps the most recent title in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingTitle {
    title: Option<String>,
    writes: usize,
}

impl RecordingTitle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last title set, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of `set_title` calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TitleSink for RecordingTitle {
    fn set_title(&mut self, title: &str) -> Result<(), TitleError> {
        self.title = Some(title.to_string());
        self.writes += 1;
        Ok(())
    }
}
