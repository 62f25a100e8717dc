use std::convert::TryFrom;

use crate::error::{Error, ErrorKind, Result};
use crate::Value;

/// Default memory
pub type StdMem = Memory<{ crate::MEMORY_SIZE }>;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    pub data: [Value; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Memory<S> {
    fn address(address: u64) -> Result<usize> {
        match usize::try_from(address) {
            Ok(address) if address < S => Ok(address),
            _ => Err(Error::new(
                ErrorKind::Range,
                format!("invalid memory address: {}", address),
            )),
        }
    }

    /// Reads a cell from the memory
    pub fn read(&self, address: u64) -> Result<Value> {
        Ok(self.data[Self::address(address)?])
    }

    /// Writes a cell to the memory
    pub fn write(&mut self, address: u64, value: Value) -> Result<()> {
        self.data[Self::address(address)?] = value;
        Ok(())
    }

    /// Returns the cells of the half-open range `start..end`
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Range`] unless `start < end <= S`.
    pub fn dump(&self, start: usize, end: usize) -> Result<&[Value]> {
        if start < end && end <= S {
            Ok(&self.data[start..end])
        } else {
            Err(Error::new(
                ErrorKind::Range,
                format!("invalid memory range: {}-{}", start, end),
            ))
        }
    }
}

/// Renders dumped cells as `memory_cell_<i>: <value>` lines, `i` counted from
/// the start of the dump and each value as its minimal binary digit string.
pub fn render_dump(cells: &[Value]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, value)| format!("memory_cell_{}: {:b}\n", i, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_read_write() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write(0x44, 12)?;
        assert_eq!(mem.data[0x44], 12);
        assert_eq!(mem.read(0x44)?, 12);
        assert_eq!(mem.read(1023)?, 0);

        Ok(())
    }

    #[test]
    fn test_out_of_bounds() {
        let mut mem = StdMem::default();

        assert_eq!(mem.read(1024).unwrap_err().kind(), &ErrorKind::Range);
        assert_eq!(mem.write(u64::MAX, 1).unwrap_err().kind(), &ErrorKind::Range);
    }

    #[test]
    fn test_dump() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write(2, 7)?;

        assert_eq!(mem.dump(1, 4)?, &[0, 7, 0]);
        assert_eq!(mem.dump(0, 1024)?.len(), 1024);

        Ok(())
    }

    #[test]
    fn test_dump_invalid_range() {
        let mem = StdMem::default();

        assert_eq!(mem.dump(500, 2000).unwrap_err().kind(), &ErrorKind::Range);
        assert_eq!(mem.dump(4, 4).unwrap_err().kind(), &ErrorKind::Range);
        assert_eq!(mem.dump(5, 4).unwrap_err().kind(), &ErrorKind::Range);
    }

    #[test]
    fn test_render_dump() {
        assert_eq!(
            render_dump(&[0, 2, 5]),
            "memory_cell_0: 0\nmemory_cell_1: 10\nmemory_cell_2: 101\n"
        );
        assert_eq!(render_dump(&[]), "");
    }
}
