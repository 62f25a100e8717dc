pub mod assembler;
pub mod bits;
pub mod config;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod processor;
pub mod registers;

/// Width of one instruction word in bits (6 bytes)
pub const WORD_BITS: usize = 6 * 8;

/// Number of registers of a fresh machine
pub const REGISTER_COUNT: usize = 1024;

/// Number of memory cells of a fresh machine
pub const MEMORY_SIZE: usize = 1024;

/// Scalar stored in every register and memory cell
pub type Value = u64;
