use crossbeam::channel::{self, Receiver, Sender};

/// ## Counting signal
///
/// Producers post, consumers pend. A pend blocks until the count is
/// positive and then takes one. Each post is one unit message on an
/// unbounded channel, so the count is the channel length.

#[derive(Debug)]
pub struct Semaphore {
    posts: Sender<()>,
    pends: Receiver<()>,
}

impl Default for Semaphore {
    fn default() -> Self {
        let (posts, pends) = channel::unbounded();
        Semaphore { posts, pends }
    }
}

impl Semaphore {
    pub fn new() -> Semaphore {
        Semaphore::default()
    }

    pub fn post(&self) {
        // Both ends live in self, the channel never disconnects.
        let _ = self.posts.send(());
    }

    pub fn pend(&self) {
        let _ = self.pends.recv();
    }

    pub fn try_pend(&self) -> bool {
        self.pends.try_recv().is_ok()
    }

    pub fn reset(&self) {
        self.pends.try_iter().for_each(drop);
    }

    pub fn count(&self) -> usize {
        self.pends.len()
    }
}
