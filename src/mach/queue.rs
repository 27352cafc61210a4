use super::signal::Semaphore;
use crate::lang::{Error, ErrorCode};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};

type Result<T> = std::result::Result<T, Error>;

/// ## Signal guarded and size limited FIFO
///
/// Producers push then post, consumers pend then take. A push at
/// capacity is refused with the queue's overflow error. Items ride a
/// bounded channel; the signal is separate so a consumer can be woken
/// with nothing behind it.

pub struct Queue<T> {
    overflow: ErrorCode,
    capacity: usize,
    sender: Sender<T>,
    receiver: Receiver<T>,
    signal: Semaphore,
}

impl<T> std::fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("overflow", &self.overflow)
            .finish()
    }
}

impl<T> Queue<T> {
    pub fn new(capacity: usize, overflow: ErrorCode) -> Queue<T> {
        let (sender, receiver) = channel::bounded(capacity);
        Queue {
            overflow,
            capacity,
            sender,
            receiver,
            signal: Semaphore::new(),
        }
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
    pub fn push(&self, item: T) -> Result<()> {
        match self.sender.try_send(item) {
            Ok(()) => {
                self.signal.post();
                Ok(())
            }
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                Err(Error::new(self.overflow))
            }
        }
    }
    /// Blocks until something was posted. The post may be a wake-up with
    /// nothing behind it, so follow with `take`.
    pub fn wait(&self) {
        self.signal.pend()
    }
    /// Posts without pushing, to get a blocked consumer to look around.
    pub fn wake(&self) {
        self.signal.post()
    }
    pub fn take(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
    /// Non-blocking pop that keeps the signal count in step.
    pub fn try_pop(&self) -> Option<T> {
        let item = self.take();
        if item.is_some() {
            self.signal.try_pend();
        }
        item
    }
    /// Empties the queue and zeroes the signal.
    pub fn drain(&self) -> Vec<T> {
        let drained: Vec<T> = self.receiver.try_iter().collect();
        self.signal.reset();
        drained
    }
    pub fn pending_signals(&self) -> usize {
        self.signal.count()
    }
}
