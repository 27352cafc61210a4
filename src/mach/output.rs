use crate::lang::Error;
use std::io::Write;
use std::sync::mpsc::Sender;

/// How the front end should render a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    /// Asynchronous output that has to be drawn around the live input line.
    Program,
    /// Characters typed by the user, written back as-is.
    Echo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub class: MessageClass,
    pub text: String,
    pub error: bool,
}

impl Message {
    pub fn program<S: Into<String>>(text: S) -> Message {
        Message {
            class: MessageClass::Program,
            text: text.into(),
            error: false,
        }
    }

    pub fn echo<S: Into<String>>(text: S) -> Message {
        Message {
            class: MessageClass::Echo,
            text: text.into(),
            error: false,
        }
    }

    pub fn error(error: &Error) -> Message {
        Message {
            class: MessageClass::Program,
            text: error.to_string(),
            error: true,
        }
    }
}

/// Where the output writer delivers messages.
pub trait OutputSink: Send {
    fn write(&mut self, message: &Message) -> std::io::Result<()>;
}

/// Writes program lines to any byte stream. Echo is dropped unless asked
/// for, since a terminal usually echoes on its own.
pub struct WriterSink<W: Write + Send> {
    writer: W,
    echo: bool,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, echo: bool) -> WriterSink<W> {
        WriterSink { writer, echo }
    }
}

impl<W: Write + Send> OutputSink for WriterSink<W> {
    fn write(&mut self, message: &Message) -> std::io::Result<()> {
        match message.class {
            MessageClass::Program => writeln!(self.writer, "{}", message.text)?,
            MessageClass::Echo if self.echo => write!(self.writer, "{}", message.text)?,
            MessageClass::Echo => return Ok(()),
        }
        self.writer.flush()
    }
}

impl OutputSink for Sender<Message> {
    fn write(&mut self, message: &Message) -> std::io::Result<()> {
        self.send(message.clone())
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "receiver gone"))
    }
}
