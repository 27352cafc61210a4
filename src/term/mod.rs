extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::mach::{CommandTable, EventSource, Message, MessageClass, OutputSink, Runtime, Workers};
use ansi_term::Style;
use linefeed::{
    Command, Completer, Completion, DefaultTerminal, Function, Interface, Prompter, ReadResult,
    Signal, Terminal,
};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod pipe;

pub fn main(runtime: Runtime, color: bool) {
    let stop_requested = Arc::new(AtomicBool::new(false));
    let stop_moved = stop_requested.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        stop_moved.store(true, Ordering::SeqCst);
    }) {
        warn!("Error setting Ctrl-C handler: {}", error);
    }
    if let Err(error) = main_loop(runtime, stop_requested, color) {
        eprintln!("{}", error);
    }
}

fn main_loop(runtime: Runtime, stop_requested: Arc<AtomicBool>, color: bool) -> std::io::Result<()> {
    let runtime = Arc::new(runtime);
    let interface = Arc::new(Interface::new("p100")?);
    interface.set_prompt("> ")?;
    interface.set_report_signal(Signal::Interrupt, true);
    interface.set_completer(Arc::new(CommandCompleter::new(runtime.commands())));
    StopFunction::install(&interface, stop_requested.clone());
    SwitchFunction::install(&interface, runtime.clone());

    let workers = Workers::spawn(runtime.clone(), TermSink::new(interface.clone(), color))?;
    interface.write_fmt(format_args!(
        "{} v{}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ))?;
    let result = read_loop(&interface, &runtime, &stop_requested);
    workers.shutdown();
    result
}

fn read_loop(
    interface: &Interface<DefaultTerminal>,
    runtime: &Runtime,
    stop_requested: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        let read = interface.read_line()?;
        if stop_requested.swap(false, Ordering::SeqCst) {
            runtime.emergency_stop();
            continue;
        }
        match read {
            ReadResult::Input(line) => {
                if !line.trim().is_empty() {
                    // Overflow is reported through the output queue.
                    let _ = runtime.enter(&line);
                    interface.add_history_unique(line);
                }
            }
            ReadResult::Signal(Signal::Interrupt) => {
                interface.set_buffer("")?;
                runtime.emergency_stop();
            }
            ReadResult::Signal(_) | ReadResult::Eof => break,
        }
    }
    Ok(())
}

/// Writes program output above the live input line.
struct TermSink {
    interface: Arc<Interface<DefaultTerminal>>,
    color: bool,
}

impl TermSink {
    fn new(interface: Arc<Interface<DefaultTerminal>>, color: bool) -> TermSink {
        TermSink { interface, color }
    }
}

impl OutputSink for TermSink {
    fn write(&mut self, message: &Message) -> std::io::Result<()> {
        match message.class {
            MessageClass::Echo => Ok(()),
            MessageClass::Program if message.error && self.color => {
                self.interface.write_fmt(format_args!(
                    "{}\n",
                    Style::new().bold().paint(message.text.as_str())
                ))
            }
            MessageClass::Program => self
                .interface
                .write_fmt(format_args!("{}\n", message.text)),
        }
    }
}

/// The backtick never reaches the line buffer. It throws the line away
/// and hands control back to the read loop to run the stop.
struct StopFunction {
    requested: Arc<AtomicBool>,
}

impl StopFunction {
    fn install<T: Terminal>(i: &Interface<T>, requested: Arc<AtomicBool>) {
        i.define_function("emergency-stop", Arc::new(StopFunction { requested }));
        i.bind_sequence("`", Command::from_str("emergency-stop"));
    }
}

impl<Term: Terminal> Function<Term> for StopFunction {
    fn execute(&self, prompter: &mut Prompter<Term>, _count: i32, _ch: char) -> std::io::Result<()> {
        self.requested.store(true, Ordering::SeqCst);
        prompter.set_buffer("")?;
        prompter.accept_input()
    }
}

/// F1 and F2 play the two GPIO switches.
struct SwitchFunction {
    runtime: Arc<Runtime>,
    source: EventSource,
}

impl SwitchFunction {
    fn install<T: Terminal>(i: &Interface<T>, runtime: Arc<Runtime>) {
        let switches = [
            ("switch-a", "\x1bOP", EventSource::SwitchA),
            ("switch-b", "\x1bOQ", EventSource::SwitchB),
        ];
        for (name, sequence, source) in switches.iter() {
            let function = SwitchFunction {
                runtime: runtime.clone(),
                source: *source,
            };
            i.define_function(*name, Arc::new(function));
            i.bind_sequence(*sequence, Command::from_str(name));
        }
    }
}

impl<Term: Terminal> Function<Term> for SwitchFunction {
    fn execute(&self, _prompter: &mut Prompter<Term>, _count: i32, _ch: char) -> std::io::Result<()> {
        self.runtime.raise(self.source);
        Ok(())
    }
}

/// Completes the command keyword at the start of the line.
struct CommandCompleter {
    keywords: Vec<String>,
}

impl CommandCompleter {
    fn new(commands: &CommandTable) -> CommandCompleter {
        CommandCompleter {
            keywords: commands.keywords().into_iter().map(String::from).collect(),
        }
    }
}

impl<Term: Terminal> Completer<Term> for CommandCompleter {
    fn complete(
        &self,
        word: &str,
        _prompter: &Prompter<Term>,
        start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        if start != 0 {
            return None;
        }
        let word = word.to_ascii_lowercase();
        let completions: Vec<Completion> = self
            .keywords
            .iter()
            .filter(|keyword| keyword.starts_with(&word))
            .map(|keyword| Completion::simple(keyword.clone()))
            .collect();
        if completions.is_empty() {
            None
        } else {
            Some(completions)
        }
    }
}
