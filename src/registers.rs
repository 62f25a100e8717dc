use std::convert::TryFrom;

use crate::error::{Error, ErrorKind, Result};
use crate::Value;

/// Default register bank
pub type StdRegisters = Registers<{ crate::REGISTER_COUNT }>;

/// Emulates the register bank of the CPU
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Registers<const S: usize> {
    /// The actual values of the registers
    pub data: [Value; S],
}

impl<const S: usize> Default for Registers<S> {
    /// Initializes every register to zero
    fn default() -> Self {
        Registers { data: [0; S] }
    }
}

impl<const S: usize> Registers<S> {
    fn index(index: u64) -> Result<usize> {
        match usize::try_from(index) {
            Ok(index) if index < S => Ok(index),
            _ => Err(Error::new(
                ErrorKind::Range,
                format!("invalid register index: {}", index),
            )),
        }
    }

    /// Reads a register
    pub fn read(&self, index: u64) -> Result<Value> {
        Ok(self.data[Self::index(index)?])
    }

    /// Writes a register
    pub fn write(&mut self, index: u64, value: Value) -> Result<()> {
        self.data[Self::index(index)?] = value;
        Ok(())
    }
}
