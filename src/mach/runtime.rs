use super::board::{Board, SimBoard};
use super::callback::{CallbackTable, EventSource};
use super::command::CommandTable;
use super::output::Message;
use super::queue::Queue;
use super::registers::Registers;
use super::script::Script;
use super::signal::Semaphore;
use super::stop::{EmergencyStop, StopReport};
use super::ticker::TickerTable;
use super::timer::PeriodicTimer;
use super::MAX_LINE_LEN;
use crate::lang::{clip, Args, Error, ErrorCode, ErrorCounters, Line};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Config {
    /// Ticker quantum.
    pub tick: Duration,
    pub payload_capacity: usize,
    pub output_capacity: usize,
    pub event_capacity: usize,
    /// GPIO pins on the simulated board.
    pub pins: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick: Duration::from_millis(10),
            payload_capacity: 500,
            output_capacity: 500,
            event_capacity: 500,
            pins: 8,
        }
    }
}

/// Who put a payload on the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Input,
    /// A line from the device on the second UART.
    Uart,
    Ticker(usize),
    Callback(usize),
    Script { line: usize, generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub text: String,
    pub origin: Origin,
}

impl Payload {
    pub fn new(text: &str, origin: Origin) -> Payload {
        Payload {
            text: clip(text.trim(), MAX_LINE_LEN).to_string(),
            origin,
        }
    }
}

/// ## Console context
///
/// Owns every table, queue, and collaborator. Workers and front ends share
/// it behind an `Arc`. Each table has its own lock so unrelated subsystems
/// never wait on each other.

pub struct Runtime {
    config: Config,
    registers: Mutex<Registers>,
    tickers: Mutex<TickerTable>,
    callbacks: Mutex<CallbackTable>,
    script: Mutex<Script>,
    payloads: Queue<Payload>,
    output: Queue<Message>,
    events: Queue<EventSource>,
    ticks: Semaphore,
    stop: EmergencyStop,
    errors: ErrorCounters,
    board: Arc<dyn Board>,
    timer: PeriodicTimer,
    commands: CommandTable,
    started: DateTime<Local>,
    shutdown: AtomicBool,
    busy: AtomicBool,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        let board = Arc::new(SimBoard::new(config.pins));
        Runtime::with_board(config, board)
    }

    pub fn with_board(config: Config, board: Arc<dyn Board>) -> Runtime {
        Runtime {
            registers: Mutex::new(Registers::new()),
            tickers: Mutex::new(TickerTable::new()),
            callbacks: Mutex::new(CallbackTable::new()),
            script: Mutex::new(Script::new()),
            payloads: Queue::new(config.payload_capacity, ErrorCode::PayloadQueueOverflow),
            output: Queue::new(config.output_capacity, ErrorCode::OutputQueueOverflow),
            events: Queue::new(config.event_capacity, ErrorCode::EventQueueOverflow),
            ticks: Semaphore::new(),
            stop: EmergencyStop::new(),
            errors: ErrorCounters::default(),
            board,
            timer: PeriodicTimer::new(),
            commands: CommandTable::default(),
            started: Local::now(),
            shutdown: AtomicBool::new(false),
            busy: AtomicBool::new(false),
            config,
        }
    }

    /// Adds or replaces a command before the runtime is shared.
    pub fn register<F>(&mut self, keyword: &str, usage: &'static str, handler: F)
    where
        F: Fn(&Runtime, &mut Args<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.commands.register(keyword, usage, handler);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn registers(&self) -> MutexGuard<'_, Registers> {
        self.registers.lock()
    }
    pub fn tickers(&self) -> MutexGuard<'_, TickerTable> {
        self.tickers.lock()
    }
    pub fn callbacks(&self) -> MutexGuard<'_, CallbackTable> {
        self.callbacks.lock()
    }
    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock()
    }
    pub fn payloads(&self) -> &Queue<Payload> {
        &self.payloads
    }
    pub fn output(&self) -> &Queue<Message> {
        &self.output
    }
    pub fn events(&self) -> &Queue<EventSource> {
        &self.events
    }
    pub fn ticks(&self) -> &Semaphore {
        &self.ticks
    }
    pub fn stop(&self) -> &EmergencyStop {
        &self.stop
    }
    pub fn errors(&self) -> &ErrorCounters {
        &self.errors
    }
    pub fn board(&self) -> &dyn Board {
        &*self.board
    }
    pub fn timer(&self) -> &PeriodicTimer {
        &self.timer
    }
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }
    pub fn started(&self) -> DateTime<Local> {
        self.started
    }

    /// Queues a line typed by the user. Overflow is reported and returned.
    pub fn enter(&self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        self.enqueue(Payload::new(line, Origin::Input))
            .map_err(|error| {
                self.report(error.clone());
                error
            })
    }

    pub fn enqueue(&self, payload: Payload) -> Result<()> {
        self.payloads.push(payload).map_err(|error| {
            warn!("Payload queue full, dropped a payload");
            error
        })
    }

    /// Queues a payload produced by the machine itself, reporting overflow.
    fn inject(&self, text: &str, origin: Origin) {
        if let Err(error) = self.enqueue(Payload::new(text, origin)) {
            self.report(error);
        }
    }

    /// Pops and runs one payload if there is one.
    pub fn execute_next(&self) -> bool {
        self.busy.store(true, Ordering::SeqCst);
        let ran = match self.payloads.take() {
            Some(payload) => {
                self.execute(payload);
                true
            }
            None => false,
        };
        self.busy.store(false, Ordering::SeqCst);
        ran
    }

    /// Runs queued payloads on the calling thread, at most `limit` of them.
    pub fn execute_pending(&self, limit: usize) -> usize {
        let mut executed = 0;
        while executed < limit {
            match self.payloads.try_pop() {
                Some(payload) => self.execute(payload),
                None => break,
            }
            executed += 1;
        }
        executed
    }

    /// One executor step: dispatch, report, then advance a running script.
    pub fn execute(&self, payload: Payload) {
        debug!("Dispatch {:?}: {}", payload.origin, payload.text);
        if let Err(error) = self.dispatch(&payload.text) {
            self.report(error);
        }
        if let Origin::Script { line, generation } = payload.origin {
            let next = self.script().advance(line, generation);
            if let Some((next, text)) = next {
                self.inject(
                    &text,
                    Origin::Script {
                        line: next,
                        generation,
                    },
                );
            }
        }
    }

    /// Runs one command line right away. Used for `-if` branches.
    pub fn dispatch(&self, text: &str) -> Result<()> {
        match Line::new(text) {
            Some(line) => self.commands.dispatch(self, line),
            None => Ok(()),
        }
    }

    /// Points the script cursor at `n` and queues that line.
    pub fn start_script(&self, n: usize) -> Result<()> {
        let (text, generation) = {
            let mut script = self.script();
            let text = script.start(n)?;
            (text, script.generation())
        };
        let payload = Payload::new(&text, Origin::Script { line: n, generation });
        if let Err(error) = self.enqueue(payload) {
            self.script().reset();
            return Err(error);
        }
        Ok(())
    }

    /// Advances every ticker one quantum and queues what fired.
    pub fn tick(&self) {
        let fired = self.tickers().tick();
        for (index, text) in fired {
            debug!("Ticker {} fired", index);
            self.inject(&text, Origin::Ticker(index));
        }
    }

    /// Posts an event for the callback dispatcher. Never blocks.
    pub fn raise(&self, source: EventSource) {
        if let Err(error) = self.events.push(source) {
            self.errors.count(error.code());
            warn!("Event inbox full, dropped {:?}", source);
        }
    }

    pub fn fire_callback(&self, index: usize) {
        let payload = self.callbacks().fire(index);
        if let Some(text) = payload {
            debug!("Callback {} fired", index);
            self.inject(&text, Origin::Callback(index));
        }
    }

    pub fn report(&self, error: Error) {
        self.errors.count(error.code());
        self.emit(Message::error(&error));
    }

    pub fn print<S: Into<String>>(&self, text: S) {
        self.emit(Message::program(text));
    }

    pub fn echo<S: Into<String>>(&self, text: S) {
        self.emit(Message::echo(text));
    }

    /// A full output queue can only be counted, never shown.
    pub fn emit(&self, message: Message) {
        if let Err(error) = self.output.push(message) {
            self.errors.count(error.code());
            warn!("Output queue full, dropped a message");
        }
    }

    pub fn drain_output(&self) -> Vec<Message> {
        self.output.drain()
    }

    /// Freezes every worker, clears the whole machine, then lets the
    /// workers resume. Returns once the machine is back to normal.
    pub fn emergency_stop(&self) -> StopReport {
        let _exclusive = self.stop.exclusive();
        warn!("Emergency stop requested");
        self.stop.begin();
        self.payloads.wake();
        self.output.wake();
        self.events.wake();
        self.ticks.post();
        let rendezvoused = self.stop.await_workers();

        self.timer.halt();
        self.tickers().clear_all();
        self.callbacks().clear_all();
        let payloads_dropped = self.payloads.drain().len();
        self.script().reset();
        let messages_dropped = self.output.drain().len();
        self.events.drain();
        self.ticks.reset();
        self.stop.finish();

        info!(
            "Emergency stop completed with {} workers, dropped {} payloads and {} messages",
            rendezvoused, payloads_dropped, messages_dropped
        );
        self.print("Emergency stop completed.");
        self.print("Timer, callbacks, tickers, and payloads have been cleared.");
        self.print("Resuming normal operation.");
        StopReport {
            rendezvoused,
            payloads_dropped,
            messages_dropped,
        }
    }

    /// Tells workers and event sources to exit. Caller joins them.
    pub fn begin_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.payloads.wake();
        self.events.wake();
        self.ticks.post();
        self.timer.close();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Nothing queued and nothing executing.
    pub fn is_idle(&self) -> bool {
        !self.busy.load(Ordering::SeqCst)
            && self.payloads.is_empty()
            && self.events.is_empty()
            && self.output.is_empty()
    }
}
