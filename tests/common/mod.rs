use p100::mach::{MessageClass, Runtime};

/// Runs every queued payload and returns the program output.
pub fn exec(runtime: &Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &Runtime, payloads: usize) -> String {
    let executed = runtime.execute_pending(payloads);
    let mut s = String::new();
    for message in runtime.drain_output() {
        if message.class == MessageClass::Program {
            s.push_str(&message.text);
            s.push('\n');
        }
    }
    if executed == payloads && !runtime.payloads().is_empty() {
        s.push_str(&format!("\n{} payloads exceeded.\n", payloads));
    }
    s
}

#[allow(dead_code)]
pub fn enter_all(runtime: &Runtime, lines: &[&str]) {
    for line in lines {
        runtime.enter(line).unwrap();
    }
}
