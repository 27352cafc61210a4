/*!
# Rust Language Module

This Rust module splits command lines into fields and parses the operand
and condition grammars used by the register machine.

*/

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 32;

#[macro_use]
mod error;
mod condition;
mod line;
mod operand;

pub use condition::Comparison;
pub use condition::Condition;
pub use error::Error;
pub use error::ErrorCode;
pub use error::ErrorCounters;
pub use line::clip;
pub use line::Args;
pub use line::Line;
pub use operand::is_valid_address;
pub use operand::parse_register;
pub use operand::Address;
pub use operand::Operand;

#[cfg(test)]
mod tests;
