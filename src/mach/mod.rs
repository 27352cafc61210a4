/*!
## Rust Machine Module

This Rust module is the console machine: the payload queue and its
executor, tickers, callbacks, the register bank, the script store, and the
emergency stop that ties them together.

*/

/// Longest command line accepted from input or stored anywhere.
pub const MAX_LINE_LEN: usize = 79;

mod board;
mod callback;
mod command;
mod input;
mod operation;
mod output;
mod queue;
mod registers;
mod runtime;
mod script;
mod signal;
mod stop;
mod ticker;
mod timer;
mod worker;

pub use board::Board;
pub use board::Memory;
pub use board::SimBoard;
pub use callback::Callback;
pub use callback::CallbackTable;
pub use callback::EventSource;
pub use callback::CALLBACK_COUNT;
pub use command::CommandTable;
pub use command::Handler;
pub use input::Feed;
pub use input::Input;
pub use input::Port;
pub use input::STOP_BYTE;
pub use operation::Operation;
pub use output::Message;
pub use output::MessageClass;
pub use output::OutputSink;
pub use output::WriterSink;
pub use queue::Queue;
pub use registers::Location;
pub use registers::Registers;
pub use runtime::Config;
pub use runtime::Origin;
pub use runtime::Payload;
pub use runtime::Runtime;
pub use script::Script;
pub use script::SCRIPT_LINES;
pub use signal::Semaphore;
pub use stop::EmergencyStop;
pub use stop::StopReport;
pub use stop::StopState;
pub use ticker::Ticker;
pub use ticker::TickerTable;
pub use ticker::TICKER_COUNT;
pub use timer::PeriodicTimer;
pub use timer::MIN_TIMER_PERIOD_US;
pub use worker::Workers;

#[cfg(test)]
mod tests;
