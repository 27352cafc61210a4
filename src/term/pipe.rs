use crate::mach::{Input, Runtime, Workers, WriterSink};
use log::{debug, warn};
use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Byte-stream front end. Stdin is fed to the input reader one byte at a
/// time, the way the UART receive loop sees it, and program output goes
/// to stdout.
pub fn main(runtime: Runtime, echo: bool, linger: Duration) {
    if let Err(error) = run(runtime, echo, linger) {
        eprintln!("{}", error);
    }
}

fn run(runtime: Runtime, echo: bool, linger: Duration) -> std::io::Result<()> {
    let runtime = Arc::new(runtime);
    let stopper = runtime.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        stopper.emergency_stop();
    }) {
        warn!("Error setting Ctrl-C handler: {}", error);
    }
    let workers = Workers::spawn(runtime.clone(), WriterSink::new(std::io::stdout(), echo))?;

    let mut input = Input::new();
    for byte in std::io::stdin().lock().bytes() {
        match byte {
            Ok(byte) => {
                input.feed(&runtime, byte);
            }
            Err(error) => {
                warn!("Input failed: {}", error);
                break;
            }
        }
    }
    input.finish(&runtime);
    debug!("Input closed, lingering {:?}", linger);

    thread::sleep(linger);
    let tick = runtime.config().tick;
    while !runtime.is_idle() {
        thread::sleep(tick);
    }
    workers.shutdown();
    Ok(())
}
