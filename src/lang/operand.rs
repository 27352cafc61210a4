use super::{Error, REGISTER_COUNT};
use crate::error;

type Result<T> = std::result::Result<T, Error>;

const FLASH: std::ops::RangeInclusive<u32> = 0x0000_0000..=0x000F_FFFF;
const SRAM: std::ops::RangeInclusive<u32> = 0x2000_0000..=0x2003_FFFF;

/// ## Operand of a register operation
///
/// `r<N>` or `<N>` names a register, `#10`, `#-3`, `#xFF`, `#0xFF`, `#hFF`
/// and `#$FF` are immediates, `@4096`, `@x1000` and `@r<N>` are memory
/// references. `@<N>` is always a decimal address, never a register.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Register(usize),
    Immediate(i32),
    Memory(Address),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Absolute(u32),
    /// The address is whatever the register holds when the operand is used.
    Indirect(usize),
}

impl Operand {
    pub fn parse(token: &str) -> Result<Operand> {
        if let Some(s) = token.strip_prefix('#') {
            return parse_immediate(s).map(Operand::Immediate);
        }
        if let Some(s) = token.strip_prefix('@') {
            return parse_address(s).map(Operand::Memory);
        }
        parse_register(token).map(Operand::Register)
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Operand::Immediate(_))
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "R{}", r),
            Operand::Immediate(v) => write!(f, "#{}", v),
            Operand::Memory(Address::Absolute(a)) => write!(f, "@{:#010x}", a),
            Operand::Memory(Address::Indirect(r)) => write!(f, "@R{}", r),
        }
    }
}

/// Memory operands may only touch the flash-like and RAM-like windows.
pub fn is_valid_address(address: u32) -> bool {
    FLASH.contains(&address) || SRAM.contains(&address)
}

pub fn parse_register(token: &str) -> Result<usize> {
    let digits = token
        .strip_prefix(|c| c == 'r' || c == 'R')
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(error!(InvalidOperand));
    }
    match digits.parse::<usize>() {
        Ok(index) if index < REGISTER_COUNT => Ok(index),
        _ => Err(error!(InvalidRegisterIndex)),
    }
}

fn parse_immediate(s: &str) -> Result<i32> {
    let parsed = match hex_digits(s) {
        Some(hex) => u32::from_str_radix(hex, 16).map(|v| v as i32),
        None => s.parse::<i32>(),
    };
    parsed.map_err(|_| error!(InvalidOperand; "immediate"))
}

fn parse_address(s: &str) -> Result<Address> {
    if s.starts_with(|c| c == 'r' || c == 'R') {
        return parse_register(s).map(Address::Indirect);
    }
    let parsed = match hex_digits(s) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed
        .map(Address::Absolute)
        .map_err(|_| error!(InvalidOperand; "address"))
}

fn hex_digits(s: &str) -> Option<&str> {
    ["0x", "0X", "x", "X", "h", "H", "$"]
        .iter()
        .find_map(|prefix| s.strip_prefix(prefix))
}
