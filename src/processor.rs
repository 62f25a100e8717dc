use std::convert::TryFrom;

use crate::bits::BitStream;
use crate::error::{Error, ErrorKind, Result};
use crate::memory::Memory;
use crate::registers::StdRegisters;
use crate::WORD_BITS;
use log::*;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

/// Width of the opcode, which always leads a word
pub const OPCODE_BITS: usize = 3;

/// An operand slot of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: &'static str,
    pub width: usize,
}

macro_rules! opcodes {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal, $mnemonic:literal => [ $( $field:ident : $width:literal ),+ ], )+ ) => {
        /// Defines the instruction set.
        /// Every opcode fixes the layout of the fields following it in a word.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Opcode {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Opcode {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            /// The assembler mnemonic
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => $mnemonic , )+
                }
            }

            /// Fields following the opcode, in encoding order
            pub fn layout(&self) -> &'static [Field] {
                match self {
                    $(
                        Self::$name => &[
                            $( Field { name: stringify!($field), width: $width }, )+
                        ],
                    )+
                }
            }
        }

        impl ::std::fmt::Display for Opcode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    }
}

opcodes! {
    /// Load a constant into a register
    /// reg[dest] := value
    ConstLoad = 1, "CONST_LOAD" => [dest: 5, value: 12],
    /// Store a register into memory
    /// mem[address] := reg[src]
    MemoryWrite = 2, "MEMORY_WRITE" => [address: 32, src: 5],
    /// Multiply a register with a memory cell
    /// reg[dest] := reg[src] * mem[address]
    Mul = 3, "MUL" => [dest: 5, src: 5, address: 32],
    /// Load the memory cell a register points at
    /// reg[dest] := mem[reg[src]]
    MemoryRead = 7, "MEMORY_READ" => [dest: 5, src: 5],
}

impl Opcode {
    /// Looks up an opcode by its mnemonic, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|opcode| opcode.name().eq_ignore_ascii_case(name))
    }

    /// Number of bits a word of this opcode actually uses
    pub fn used_bits(&self) -> usize {
        OPCODE_BITS + self.layout().iter().map(|field| field.width).sum::<usize>()
    }
}

/// A decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    ConstLoad { dest: u64, value: u64 },
    MemoryWrite { address: u64, src: u64 },
    Mul { dest: u64, src: u64, address: u64 },
    MemoryRead { dest: u64, src: u64 },
}

impl Instruction {
    /// Builds an instruction from its field values, given in layout order
    pub fn from_fields(opcode: Opcode, fields: &[u64]) -> Result<Self> {
        match (opcode, fields) {
            (Opcode::ConstLoad, &[dest, value]) => Ok(Self::ConstLoad { dest, value }),
            (Opcode::MemoryWrite, &[address, src]) => Ok(Self::MemoryWrite { address, src }),
            (Opcode::Mul, &[dest, src, address]) => Ok(Self::Mul { dest, src, address }),
            (Opcode::MemoryRead, &[dest, src]) => Ok(Self::MemoryRead { dest, src }),
            _ => Err(Error::new(
                ErrorKind::MalformedInstruction,
                format!("{} takes {} fields, got {}", opcode, opcode.layout().len(), fields.len()),
            )),
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::ConstLoad { .. } => Opcode::ConstLoad,
            Self::MemoryWrite { .. } => Opcode::MemoryWrite,
            Self::Mul { .. } => Opcode::Mul,
            Self::MemoryRead { .. } => Opcode::MemoryRead,
        }
    }

    /// Decodes the word starting at bit `at` of `stream`.
    /// Only the opcode and its fields are read; padding is never looked at.
    pub fn decode(stream: &BitStream, at: usize) -> Result<Self> {
        let raw = stream.read(at, OPCODE_BITS)? as u8;
        let opcode = Opcode::try_from(raw).map_err(|_| {
            Error::new(
                ErrorKind::UnrecognizedOpcode { opcode: raw },
                format!("word at bit {}", at),
            )
        })?;

        let mut cursor = at + OPCODE_BITS;
        let fields = opcode
            .layout()
            .iter()
            .map(|field| {
                let value = stream.read(cursor, field.width)?;
                cursor += field.width;
                Ok(value)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_fields(opcode, &fields)
    }
}

/// Emulates the CPU
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Processor {
    /// Bit offset of the next word in the stream
    pub cursor: usize,
    /// Register bank, owned by this processor for one run
    pub registers: StdRegisters,
}

impl Processor {
    /// Initializes a new CPU
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a single instruction
    pub fn execute_instruction<const S: usize>(
        &mut self,
        instruction: Instruction,
        memory: &mut Memory<S>,
    ) -> Result<()> {
        match instruction {
            Instruction::ConstLoad { dest, value } => {
                self.registers.write(dest, value)?;

                debug!("CONST_LOAD r{} {:b}", dest, value);
            }
            Instruction::MemoryRead { dest, src } => {
                // the register holds the address itself
                let address = self.registers.read(src)?;
                let value = memory.read(address)?;
                self.registers.write(dest, value)?;

                debug!("MEMORY_READ r{} [r{}={}]: {:b}", dest, src, address, value);
            }
            Instruction::MemoryWrite { address, src } => {
                let value = self.registers.read(src)?;
                memory.write(address, value)?;

                debug!("MEMORY_WRITE [{}] r{}: {:b}", address, src, value);
            }
            Instruction::Mul { dest, src, address } => {
                let a = self.registers.read(src)?;
                let b = memory.read(address)?;
                let result = a.checked_mul(b).ok_or_else(|| {
                    Error::new(
                        ErrorKind::Range,
                        format!("product of {} and {} overflows a cell", a, b),
                    )
                })?;
                self.registers.write(dest, result)?;

                debug!("MUL r{} r{} [{}]: {:b} * {:b} = {:b}", dest, src, address, a, b, result);
            }
        }

        Ok(())
    }

    /// Runs one execution step and moves the cursor to the next word boundary
    pub fn execute<const S: usize>(
        &mut self,
        stream: &BitStream,
        memory: &mut Memory<S>,
    ) -> Result<()> {
        let instruction = Instruction::decode(stream, self.cursor)?;
        self.execute_instruction(instruction, memory)?;
        self.cursor += WORD_BITS;

        Ok(())
    }

    /// Runs the program until the end of the stream
    pub fn execute_until_end<const S: usize>(
        &mut self,
        stream: &BitStream,
        memory: &mut Memory<S>,
    ) -> Result<()> {
        let mut executed = 0;
        while self.cursor < stream.len() {
            self.execute(stream, memory)?;
            executed += 1;
        }

        info!("Program terminated after {} instructions", executed);

        Ok(())
    }
}
