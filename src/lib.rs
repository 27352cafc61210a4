//! # P100 Console
//!
//! A command-driven control console for a microcontroller, running on the
//! desktop against a simulated board.
//!
//! Commands are typed one per line. Each line becomes a payload on a
//! bounded queue and a single executor runs them in order. Tickers and
//! callbacks put their own payloads on the same queue, a 64 line script
//! replays itself one line at a time, and a 32 register machine gives
//! scripts something to compute with.
//!
//! ```text
//! > -reg mov r0 #3
//! R0 = 3
//! > -script 0 w -reg dec r0
//! Script line 0 set to: -reg dec r0
//! > -script 1 w -if (r0 > #0) ? -script 0 x : -print done
//! Script line 1 set to: -if (r0 > #0) ? -script 0 x : -print done
//! > -script 0 x
//! R0 = 2
//! R0 = 1
//! R0 = 0
//! done
//! ```
//!
//! The backtick key is reserved. It stops everything at once: tickers,
//! callbacks, Timer0, the running script, and anything still queued.

pub mod lang;
pub mod mach;
pub mod term;
