use super::signal::Semaphore;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopState {
    Normal,
    Stopping,
}

/// What an emergency stop found on its way through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopReport {
    pub rendezvoused: usize,
    pub payloads_dropped: usize,
    pub messages_dropped: usize,
}

/// ## Emergency stop rendezvous
///
/// Workers enlist when they start. The initiator flips the state to
/// `Stopping`, wakes every worker, and waits for each of them to check in
/// through `checkpoint`. Checked-in workers stay parked until `finish`.
/// Only one initiator runs at a time.

#[derive(Debug)]
pub struct EmergencyStop {
    state: Mutex<StopState>,
    resumed: Condvar,
    rendezvous: Semaphore,
    workers: AtomicUsize,
    initiator: Mutex<()>,
}

impl Default for EmergencyStop {
    fn default() -> Self {
        EmergencyStop {
            state: Mutex::new(StopState::Normal),
            resumed: Condvar::new(),
            rendezvous: Semaphore::new(),
            workers: AtomicUsize::new(0),
            initiator: Mutex::new(()),
        }
    }
}

impl EmergencyStop {
    pub fn new() -> EmergencyStop {
        EmergencyStop::default()
    }

    pub fn state(&self) -> StopState {
        *self.state.lock()
    }

    pub fn is_stopping(&self) -> bool {
        self.state() == StopState::Stopping
    }

    pub fn enlist(&self) {
        self.workers.fetch_add(1, Ordering::SeqCst);
    }

    pub fn retire(&self) {
        self.workers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn workers(&self) -> usize {
        self.workers.load(Ordering::SeqCst)
    }

    /// Worker side. Returns true if a stop was in progress, in which case
    /// the worker has already checked in and waited it out.
    pub fn checkpoint(&self) -> bool {
        let mut state = self.state.lock();
        if *state == StopState::Normal {
            return false;
        }
        self.rendezvous.post();
        while *state == StopState::Stopping {
            self.resumed.wait(&mut state);
        }
        true
    }

    /// Serializes whole-system operations such as stop and shutdown.
    pub fn exclusive(&self) -> MutexGuard<'_, ()> {
        self.initiator.lock()
    }

    pub(super) fn begin(&self) {
        *self.state.lock() = StopState::Stopping;
    }

    /// Blocks until every enlisted worker has checked in once.
    pub(super) fn await_workers(&self) -> usize {
        let workers = self.workers();
        for _ in 0..workers {
            self.rendezvous.pend();
        }
        workers
    }

    pub(super) fn finish(&self) {
        *self.state.lock() = StopState::Normal;
        self.rendezvous.reset();
        self.resumed.notify_all();
    }
}
