use super::MAX_LINE_LEN;
use crate::error;
use crate::lang::{clip, Error};

type Result<T> = std::result::Result<T, Error>;

pub const SCRIPT_LINES: usize = 64;

/// ## Stored command lines and the replay cursor
///
/// Each redirect of the cursor starts a new generation. A script payload
/// only advances the cursor if it belongs to the current generation and
/// the cursor still points at its line.

#[derive(Debug, Clone)]
pub struct Script {
    lines: Vec<String>,
    cursor: Option<usize>,
    generation: u64,
}

impl Default for Script {
    fn default() -> Self {
        Script {
            lines: vec![String::new(); SCRIPT_LINES],
            cursor: None,
            generation: 0,
        }
    }
}

impl Script {
    pub fn new() -> Script {
        Script::default()
    }

    /// Parses and validates a line number token.
    pub fn line_number(token: &str) -> Result<usize> {
        match token.parse::<usize>() {
            Ok(n) if n < SCRIPT_LINES => Ok(n),
            _ => Err(error!(InvalidScriptLine)),
        }
    }

    pub fn write_line(&mut self, n: usize, text: &str) -> Result<&str> {
        let line = self.line_mut(n)?;
        *line = clip(text.trim(), MAX_LINE_LEN).to_string();
        Ok(line.as_str())
    }

    pub fn clear_line(&mut self, n: usize) -> Result<()> {
        self.line_mut(n)?.clear();
        Ok(())
    }

    pub fn read_line(&self, n: usize) -> Result<&str> {
        match self.lines.get(n) {
            Some(line) => Ok(line),
            None => Err(error!(InvalidScriptLine)),
        }
    }

    /// Non-empty lines in order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(n, line)| (n, line.as_str()))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Points the cursor at line `n` and returns its text for enqueueing.
    pub fn start(&mut self, n: usize) -> Result<String> {
        let text = self.read_line(n)?;
        if text.is_empty() {
            return Err(error!(EmptyScriptLine));
        }
        let text = text.to_string();
        self.cursor = Some(n);
        self.generation += 1;
        Ok(text)
    }

    pub fn reset(&mut self) {
        self.cursor = None;
        self.generation += 1;
    }

    /// Called once `line` of `generation` has been dispatched. Returns the
    /// next line to enqueue, or `None` when the script ended or was
    /// redirected.
    pub fn advance(&mut self, line: usize, generation: u64) -> Option<(usize, String)> {
        if generation != self.generation || self.cursor != Some(line) {
            return None;
        }
        let next = line + 1;
        match self.lines.get(next) {
            Some(text) if !text.is_empty() => {
                self.cursor = Some(next);
                Some((next, text.clone()))
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }

    fn line_mut(&mut self, n: usize) -> Result<&mut String> {
        match self.lines.get_mut(n) {
            Some(line) => Ok(line),
            None => Err(error!(InvalidScriptLine)),
        }
    }
}
