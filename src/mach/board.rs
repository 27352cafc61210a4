use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Word-addressed memory as seen by `@` operands and `-memr`.
/// Addresses are validated before they get here. Word access ignores the
/// low two address bits, as the bus does.
pub trait Memory {
    fn read_word(&self, address: u32) -> i32;
    fn write_word(&self, address: u32, value: i32);

    fn read_byte(&self, address: u32) -> u8 {
        let word = self.read_word(address & !3) as u32;
        (word >> ((address & 3) * 8)) as u8
    }
}

/// ## Hardware collaborator
///
/// Everything the console needs from the microcontroller beyond its own
/// tables. Calls never block and never fail; an out of range pin is
/// rejected by the command before it reaches the board.
pub trait Board: Memory + Send + Sync {
    fn pin_count(&self) -> usize;
    fn read_pin(&self, pin: usize) -> bool;
    fn write_pin(&self, pin: usize, high: bool);
    /// Sends one line out the second UART.
    fn uart_write(&self, line: &str);
    /// Next byte received on the second UART, if one is waiting.
    fn uart_read(&self) -> Option<u8>;

    fn toggle_pin(&self, pin: usize) -> bool {
        let state = !self.read_pin(pin);
        self.write_pin(pin, state);
        state
    }
}

/// Board backed by plain memory, for the desktop console and tests.
#[derive(Debug, Default)]
pub struct SimBoard {
    pins: Mutex<Vec<bool>>,
    memory: Mutex<HashMap<u32, i32>>,
    uart: Mutex<Vec<String>>,
    uart_rx: Mutex<VecDeque<u8>>,
}

impl SimBoard {
    pub fn new(pins: usize) -> SimBoard {
        SimBoard {
            pins: Mutex::new(vec![false; pins]),
            ..SimBoard::default()
        }
    }

    /// Lines written to the second UART so far.
    pub fn uart_lines(&self) -> Vec<String> {
        self.uart.lock().clone()
    }

    /// Bytes arriving from the device on the other end of the second UART.
    pub fn uart_receive(&self, bytes: &[u8]) {
        self.uart_rx.lock().extend(bytes);
    }
}

impl Memory for SimBoard {
    fn read_word(&self, address: u32) -> i32 {
        self.memory.lock().get(&(address & !3)).copied().unwrap_or(0)
    }

    fn write_word(&self, address: u32, value: i32) {
        self.memory.lock().insert(address & !3, value);
    }
}

impl Board for SimBoard {
    fn pin_count(&self) -> usize {
        self.pins.lock().len()
    }

    fn read_pin(&self, pin: usize) -> bool {
        self.pins.lock().get(pin).copied().unwrap_or(false)
    }

    fn write_pin(&self, pin: usize, high: bool) {
        if let Some(state) = self.pins.lock().get_mut(pin) {
            *state = high;
        }
    }

    fn uart_write(&self, line: &str) {
        self.uart.lock().push(line.to_string());
    }

    fn uart_read(&self) -> Option<u8> {
        self.uart_rx.lock().pop_front()
    }
}
