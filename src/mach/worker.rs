use super::callback::EventSource;
use super::input::Input;
use super::output::OutputSink;
use super::Runtime;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// ## Worker threads
///
/// One thread per role. The executor, output writer, ticker processor,
/// and callback dispatcher each block on their own signal and take part
/// in the emergency stop rendezvous. The tick source, Timer0 source, and
/// UART1 listener stand in for interrupts and only ever post.
///
/// Dropping the set stops it, so a spawn that fails halfway leaves no
/// thread behind.

pub struct Workers {
    runtime: Arc<Runtime>,
    handles: Vec<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
    closing: Arc<AtomicBool>,
}

impl Workers {
    pub fn spawn<S: OutputSink + 'static>(runtime: Arc<Runtime>, sink: S) -> std::io::Result<Workers> {
        let mut workers = Workers {
            runtime: runtime.clone(),
            handles: Vec::new(),
            writer: None,
            closing: Arc::new(AtomicBool::new(false)),
        };
        workers.handles.push(worker(&runtime, "executor", |rt| {
            rt.payloads().wait();
            if rt.is_shutting_down() {
                return false;
            }
            if !rt.stop().checkpoint() {
                rt.execute_next();
            }
            true
        })?);
        workers.handles.push(worker(&runtime, "ticker", |rt| {
            rt.ticks().pend();
            if rt.is_shutting_down() {
                return false;
            }
            if !rt.stop().checkpoint() {
                rt.tick();
            }
            true
        })?);
        workers.handles.push(worker(&runtime, "callback", |rt| {
            rt.events().wait();
            if rt.is_shutting_down() {
                return false;
            }
            if !rt.stop().checkpoint() {
                if let Some(source) = rt.events().take() {
                    rt.fire_callback(source.index());
                }
            }
            true
        })?);
        let closing = workers.closing.clone();
        let mut sink = sink;
        workers.writer = Some(worker(&runtime, "output", move |rt| {
            rt.output().wait();
            if closing.load(Ordering::SeqCst) {
                for message in rt.output().drain() {
                    if let Err(error) = sink.write(&message) {
                        warn!("Output sink failed: {}", error);
                        break;
                    }
                }
                return false;
            }
            if !rt.stop().checkpoint() {
                if let Some(message) = rt.output().take() {
                    if let Err(error) = sink.write(&message) {
                        warn!("Output sink failed: {}", error);
                    }
                }
            }
            true
        })?);
        workers.handles.push(source(&runtime, "tick", |rt| {
            let tick = rt.config().tick;
            while !rt.is_shutting_down() {
                thread::sleep(tick);
                rt.ticks().post();
            }
        })?);
        workers.handles.push(source(&runtime, "timer0", |rt| {
            while rt.timer().wait_expiry() {
                rt.raise(EventSource::Timer);
            }
        })?);
        workers.handles.push(source(&runtime, "uart1", |rt| {
            let mut input = Input::uart();
            let idle = rt.config().tick;
            while !rt.is_shutting_down() {
                match rt.board().uart_read() {
                    Some(byte) => {
                        input.feed(rt, byte);
                    }
                    None => thread::sleep(idle),
                }
            }
        })?);
        info!("Started {} workers", runtime.stop().workers());
        Ok(workers)
    }

    /// Stops every thread. Output still queued is written before the
    /// writer exits.
    pub fn shutdown(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if self.handles.is_empty() && self.writer.is_none() {
            return;
        }
        let _exclusive = self.runtime.stop().exclusive();
        self.runtime.begin_shutdown();
        for handle in self.handles.drain(..) {
            join(handle);
        }
        self.closing.store(true, Ordering::SeqCst);
        self.runtime.output().wake();
        if let Some(handle) = self.writer.take() {
            join(handle);
        }
        info!("Workers stopped");
    }
}

impl Drop for Workers {
    fn drop(&mut self) {
        self.halt();
    }
}

fn join(handle: JoinHandle<()>) {
    let name = handle.thread().name().unwrap_or("worker").to_string();
    if handle.join().is_err() {
        log::error!("Worker {} panicked", name);
    }
}

/// Spawns a rendezvous worker. `step` returns false to exit.
fn worker<F>(runtime: &Arc<Runtime>, name: &str, mut step: F) -> std::io::Result<JoinHandle<()>>
where
    F: FnMut(&Runtime) -> bool + Send + 'static,
{
    let rt = runtime.clone();
    rt.stop().enlist();
    let spawned = thread::Builder::new().name(name.to_string()).spawn(move || {
        debug!("{} worker started", thread_name());
        while step(&rt) {}
        rt.stop().retire();
        debug!("{} worker exited", thread_name());
    });
    if spawned.is_err() {
        runtime.stop().retire();
    }
    spawned
}

/// Spawns an event source. Sources never rendezvous.
fn source<F>(runtime: &Arc<Runtime>, name: &str, body: F) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce(&Runtime) + Send + 'static,
{
    let rt = runtime.clone();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || body(&rt))
}

fn thread_name() -> String {
    thread::current().name().unwrap_or("unnamed").to_string()
}
