use crate::lang::ErrorCode;
use crate::mach::*;

mod queue_test;
mod script_test;
mod stop_test;
mod ticker_test;

/// Runs everything queued and returns the program output, one line each.
fn run(runtime: &Runtime) -> String {
    runtime.execute_pending(5000);
    render(runtime)
}

fn render(runtime: &Runtime) -> String {
    let mut s = String::new();
    for message in runtime.drain_output() {
        if message.class == MessageClass::Program {
            s.push_str(&message.text);
            s.push('\n');
        }
    }
    s
}
