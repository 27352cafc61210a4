use super::board::Memory;
use super::registers::Registers;
use crate::error;
use crate::lang::{Error, Operand};

type Result<T> = std::result::Result<T, Error>;

/// ## Register machine instruction set
///
/// Every operation writes its destination, which is a register or a
/// whitelisted memory word. Binary operations fold a source operand into
/// the destination: `-reg add r0 #5` is `r0 = r0 + 5`.
///
/// Arithmetic wraps at 32 bits rather than trapping.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // *** Unary
    Inc,
    Dec,
    Neg,
    Not,

    // *** Data movement
    Mov,
    /// Swaps destination and source. Both must be writable.
    Xchg,

    // *** Binary
    Add,
    Sub,
    Mul,
    /// Fails with division by zero and leaves the destination untouched.
    Div,
    Rem,
    And,
    Ior,
    Xor,
    Max,
    Min,
}

impl std::str::FromStr for Operation {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        use Operation::*;
        Ok(match s.to_ascii_lowercase().as_str() {
            "inc" => Inc,
            "dec" => Dec,
            "neg" => Neg,
            "not" => Not,
            "mov" => Mov,
            "xchg" => Xchg,
            "add" => Add,
            "sub" => Sub,
            "mul" => Mul,
            "div" => Div,
            "rem" => Rem,
            "and" => And,
            "ior" => Ior,
            "xor" => Xor,
            "max" => Max,
            "min" => Min,
            _ => return Err(error!(UnknownOperation)),
        })
    }
}

impl Operation {
    pub fn is_unary(self) -> bool {
        use Operation::*;
        matches!(self, Inc | Dec | Neg | Not)
    }

    /// Runs the operation and returns the confirmation line.
    pub fn execute<M: Memory + ?Sized>(
        self,
        regs: &mut Registers,
        memory: &M,
        dest: Operand,
        src: Option<Operand>,
    ) -> Result<String> {
        if !dest.is_writable() {
            return Err(error!(InvalidOperand; "destination"));
        }
        let target = regs.locate(dest)?;
        if self.is_unary() {
            let value = regs.load(target, memory);
            regs.put(target, self.unary(value), memory);
            return Ok(regs.describe(target, memory));
        }
        let src = match src {
            Some(src) => src,
            None => return Err(error!(MissingOperand)),
        };
        if self == Operation::Xchg {
            if !src.is_writable() {
                return Err(error!(InvalidOperand; "source"));
            }
            // Both sides are pinned before either is written, so an
            // indirect operand through the other side cannot move.
            let other = regs.locate(src)?;
            let a = regs.load(target, memory);
            let b = regs.load(other, memory);
            regs.put(target, b, memory);
            regs.put(other, a, memory);
            return Ok(format!(
                "{}, {}",
                regs.describe(target, memory),
                regs.describe(other, memory)
            ));
        }
        let value = regs.read(src, memory)?;
        let current = regs.load(target, memory);
        regs.put(target, self.binary(current, value)?, memory);
        Ok(regs.describe(target, memory))
    }

    fn unary(self, value: i32) -> i32 {
        use Operation::*;
        match self {
            Inc => value.wrapping_add(1),
            Dec => value.wrapping_sub(1),
            Neg => value.wrapping_neg(),
            _ => !value,
        }
    }

    fn binary(self, lhs: i32, rhs: i32) -> Result<i32> {
        use Operation::*;
        Ok(match self {
            Mov => rhs,
            Add => lhs.wrapping_add(rhs),
            Sub => lhs.wrapping_sub(rhs),
            Mul => lhs.wrapping_mul(rhs),
            Div | Rem if rhs == 0 => return Err(error!(DivisionByZero)),
            Div => lhs.wrapping_div(rhs),
            Rem => lhs.wrapping_rem(rhs),
            And => lhs & rhs,
            Ior => lhs | rhs,
            Xor => lhs ^ rhs,
            Max => lhs.max(rhs),
            Min => lhs.min(rhs),
            Inc | Dec | Neg | Not | Xchg => return Err(error!(UnknownOperation)),
        })
    }
}
