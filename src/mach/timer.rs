use crate::error;
use crate::lang::Error;
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

type Result<T> = std::result::Result<T, Error>;

pub const MIN_TIMER_PERIOD_US: u32 = 100;

#[derive(Debug, Default)]
struct State {
    period_us: u32,
    generation: u64,
    closed: bool,
}

/// ## Periodic Timer0
///
/// Stands in for the hardware timer that drives callback slot 0. The
/// source thread blocks in `wait_expiry` and raises one timer event per
/// period. Changing the period restarts the current wait.

#[derive(Debug, Default)]
pub struct PeriodicTimer {
    state: Mutex<State>,
    changed: Condvar,
}

impl PeriodicTimer {
    pub fn new() -> PeriodicTimer {
        PeriodicTimer::default()
    }

    pub fn period(&self) -> u32 {
        self.state.lock().period_us
    }

    /// Zero stops the timer.
    pub fn set_period(&self, period_us: u32) -> Result<()> {
        if period_us != 0 && period_us < MIN_TIMER_PERIOD_US {
            return Err(error!(InvalidTimerPeriod));
        }
        let mut state = self.state.lock();
        state.period_us = period_us;
        state.generation += 1;
        self.changed.notify_all();
        Ok(())
    }

    pub fn halt(&self) {
        let mut state = self.state.lock();
        state.period_us = 0;
        state.generation += 1;
        self.changed.notify_all();
    }

    /// Releases the source thread for good.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.changed.notify_all();
    }

    /// Blocks until one full period elapses. Returns false once closed.
    pub fn wait_expiry(&self) -> bool {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return false;
            }
            if state.period_us == 0 {
                self.changed.wait(&mut state);
                continue;
            }
            let generation = state.generation;
            let deadline = Instant::now() + Duration::from_micros(state.period_us as u64);
            loop {
                let now = Instant::now();
                if now >= deadline {
                    return true;
                }
                self.changed.wait_until(&mut state, deadline);
                if state.closed || state.generation != generation {
                    break;
                }
            }
        }
    }
}
