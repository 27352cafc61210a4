use super::runtime::{Origin, Payload};
use super::stop::StopReport;
use super::{Runtime, MAX_LINE_LEN};
use crate::error;
use log::warn;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const ESCAPE: u8 = 0x1b;
/// Reserved byte that triggers the emergency stop mid-line.
pub const STOP_BYTE: u8 = b'`';

/// What a single byte did to the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Pending,
    Submitted,
    Overflow,
    Stopped(StopReport),
}

/// Which serial line a reader is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Port {
    /// The operator's terminal: echoed, and the stop byte is live.
    #[default]
    Console,
    /// The second UART, wired to another device. Nothing is echoed back
    /// and every printable byte is just text.
    Uart,
}

/// ## Byte-at-a-time line reader
///
/// Mirrors a UART receive loop: printable bytes are buffered and echoed,
/// CR or LF submits the line, backspace and delete erase. Escape and
/// other control bytes are ignored.

#[derive(Debug, Default)]
pub struct Input {
    buffer: String,
    port: Port,
}

impl Input {
    pub fn new() -> Input {
        Input::default()
    }

    pub fn uart() -> Input {
        Input {
            buffer: String::new(),
            port: Port::Uart,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn feed(&mut self, runtime: &Runtime, byte: u8) -> Feed {
        match byte {
            STOP_BYTE if self.port == Port::Console => {
                self.buffer.clear();
                Feed::Stopped(runtime.emergency_stop())
            }
            b'\r' | b'\n' => {
                if self.buffer.is_empty() {
                    return Feed::Pending;
                }
                self.echo(runtime, "\r\n");
                self.submit(runtime);
                Feed::Submitted
            }
            BACKSPACE | DELETE => {
                if self.buffer.pop().is_some() {
                    self.echo(runtime, "\x08 \x08");
                }
                Feed::Pending
            }
            ESCAPE => Feed::Pending,
            0x20..=0x7e => {
                if self.buffer.len() >= MAX_LINE_LEN {
                    self.buffer.clear();
                    match self.port {
                        Port::Console => runtime.report(error!(BufferOverflow)),
                        Port::Uart => warn!("UART1 line too long, discarded"),
                    }
                    return Feed::Overflow;
                }
                self.buffer.push(byte as char);
                self.echo(runtime, &(byte as char).to_string());
                Feed::Pending
            }
            _ => Feed::Pending,
        }
    }

    /// Submits whatever is left, for end of stream.
    pub fn finish(&mut self, runtime: &Runtime) {
        if !self.buffer.is_empty() {
            self.submit(runtime);
        }
    }

    fn echo(&self, runtime: &Runtime, text: &str) {
        if self.port == Port::Console {
            runtime.echo(text);
        }
    }

    fn submit(&mut self, runtime: &Runtime) {
        let line = std::mem::take(&mut self.buffer);
        match self.port {
            // Overflow is already reported by the runtime.
            Port::Console => {
                let _ = runtime.enter(&line);
            }
            Port::Uart => {
                if let Err(error) = runtime.enqueue(Payload::new(&line, Origin::Uart)) {
                    runtime.report(error);
                    return;
                }
                runtime.print(format!("Received Over UART1: {}", line.trim()));
            }
        }
    }
}
