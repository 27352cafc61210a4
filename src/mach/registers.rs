use super::board::Memory;
use crate::error;
use crate::lang::{is_valid_address, Address, Error, Operand, REGISTER_COUNT};

type Result<T> = std::result::Result<T, Error>;

/// ## Register bank
///
/// Thirty-two signed words. Operands reach memory through the board so
/// `@` references work the same against real or simulated hardware.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    regs: [i32; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Registers {
        Registers::default()
    }

    pub fn clear(&mut self) {
        self.regs = [0; REGISTER_COUNT];
    }

    pub fn fetch(&self, index: usize) -> i32 {
        self.regs[index]
    }

    pub fn store(&mut self, index: usize, value: i32) {
        self.regs[index] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.regs.iter().copied().enumerate()
    }

    /// Resolves a memory operand to a whitelisted address.
    pub fn address(&self, address: Address) -> Result<u32> {
        let address = match address {
            Address::Absolute(a) => a,
            Address::Indirect(r) => self.regs[r] as u32,
        };
        if is_valid_address(address) {
            Ok(address)
        } else {
            Err(error!(InvalidMemoryAddress))
        }
    }

    /// Pins an operand to the register or word it names. Indirect
    /// operands are resolved against the bank as it is now.
    pub fn locate(&self, operand: Operand) -> Result<Location> {
        match operand {
            Operand::Register(r) => Ok(Location::Register(r)),
            Operand::Immediate(_) => Err(error!(InvalidOperand; "destination")),
            Operand::Memory(address) => Ok(Location::Word(self.address(address)?)),
        }
    }

    pub fn read<M: Memory + ?Sized>(&self, operand: Operand, memory: &M) -> Result<i32> {
        match operand {
            Operand::Immediate(v) => Ok(v),
            _ => Ok(self.load(self.locate(operand)?, memory)),
        }
    }

    pub fn write<M: Memory + ?Sized>(
        &mut self,
        operand: Operand,
        value: i32,
        memory: &M,
    ) -> Result<()> {
        let location = self.locate(operand)?;
        self.put(location, value, memory);
        Ok(())
    }

    pub fn load<M: Memory + ?Sized>(&self, location: Location, memory: &M) -> i32 {
        match location {
            Location::Register(r) => self.regs[r],
            Location::Word(address) => memory.read_word(address),
        }
    }

    pub fn put<M: Memory + ?Sized>(&mut self, location: Location, value: i32, memory: &M) {
        match location {
            Location::Register(r) => self.regs[r] = value,
            Location::Word(address) => memory.write_word(address, value),
        }
    }

    /// `R3 = 10` or `@0x20000000 = 10`, naming where the value landed.
    pub fn describe<M: Memory + ?Sized>(&self, location: Location, memory: &M) -> String {
        format!("{} = {}", location, self.load(location, memory))
    }
}

/// A writable place with any indirection already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Register(usize),
    Word(u32),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Location::Register(r) => write!(f, "R{}", r),
            Location::Word(address) => write!(f, "@{:#010x}", address),
        }
    }
}
