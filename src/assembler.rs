//! Translates mnemonic lines into 48 bit instruction words.
//!
//! ```text
//! CONST_LOAD 1 0 1
//! MEMORY_WRITE 2 0 0
//! MUL 3 1 0 0
//! ```
//!
//! The number after the mnemonic repeats its opcode and must match it.

use std::num::IntErrorKind;
use std::str::Lines;

use crate::bits;
use crate::error::{Error, ErrorKind, Result};
use crate::processor::{Opcode, OPCODE_BITS};
use crate::WORD_BITS;

pub mod record;

pub use record::{DecodeRecord, RecordEntry};

/// A validated assembler line, holding the operands exactly as written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AsmInstruction {
    pub opcode: Opcode,
    pub b: i64,
    pub c: i64,
    /// Only present for opcodes with three fields
    pub d: Option<i64>,
    /// Source line the instruction was read from
    pub line_nr: usize,
}

impl AsmInstruction {
    /// Operands in field order
    pub fn operands(&self) -> Vec<i64> {
        let mut operands = vec![self.b, self.c];
        operands.extend(self.d);
        operands
    }

    /// Encodes the opcode and every field at its declared width, padded to a
    /// full word.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Range`] if an operand does not fit its field.
    pub fn encode(&self) -> Result<String> {
        let mut word = bits::encode(i64::from(u8::from(self.opcode)), OPCODE_BITS as u32)?;

        for (field, operand) in self.opcode.layout().iter().zip(self.operands()) {
            let digits = bits::encode(operand, field.width as u32).map_err(|_| {
                Error::new(
                    ErrorKind::Range,
                    format!(
                        "{} operand `{}` = {} does not fit into {} bits",
                        self.opcode, field.name, operand, field.width
                    ),
                )
            })?;
            word.push_str(&digits);
        }

        bits::pad(word, WORD_BITS)
    }

    /// The encoded word as a line of `0xHH` tokens
    pub fn to_hex(&self) -> Result<String> {
        bits::serialize_word(&self.encode()?)
    }
}

/// An assembled program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<AsmInstruction>,
}

impl Program {
    /// Renders the binary artifact: one word per line, trailing newline
    /// after each.
    pub fn to_binary(&self) -> Result<String> {
        let mut binary = String::new();

        for instruction in &self.instructions {
            let line = instruction
                .to_hex()
                .map_err(|err| err.at_line(instruction.line_nr))?;
            binary.push_str(&line);
            binary.push('\n');
        }

        Ok(binary)
    }

    /// The decode record listing the raw fields of every instruction
    pub fn record(&self) -> DecodeRecord {
        self.instructions.iter().map(RecordEntry::from).collect()
    }
}

/// Assembles `source`, aborting on the first invalid line
pub fn assemble(source: &str) -> Result<Program> {
    Parser::new(source).parse()
}

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line_nr: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for `data`.
    pub fn new(data: &'a str) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
        }
    }

    /// Consumes `self` and parses every line of the source.
    ///
    /// # Errors
    ///
    /// The first invalid line aborts the whole parse; nothing is returned
    /// for the lines before it.
    pub fn parse(mut self) -> Result<Program> {
        let mut program = Program::default();

        while let Some(line) = self.lines.next() {
            self.line_nr += 1;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match self.parse_instruction(line) {
                Ok(instruction) => program.instructions.push(instruction),
                Err(err) => {
                    let err = err.at_line(self.line_nr);
                    log::error!("{}", err);
                    return Err(err);
                }
            }
        }

        log::info!("Parsed {} instructions", program.instructions.len());

        Ok(program)
    }

    /// Parses a line of the form `MNEMONIC a b c [d]`.
    ///
    /// # Examples
    ///
    /// - `CONST_LOAD 1 0 1`
    /// - `MUL 3 1 0 0`
    fn parse_instruction(&self, line: &str) -> Result<AsmInstruction> {
        let mut tokens = line.split_whitespace();
        let mnemonic = tokens.next().unwrap_or_default();

        let unrecognized = || {
            Error::from_kind(ErrorKind::UnrecognizedCommand {
                command: mnemonic.to_string(),
            })
        };

        let opcode = Opcode::from_name(mnemonic).ok_or_else(unrecognized)?;

        let declared = match tokens.next() {
            Some(token) => parse_integer(token)?,
            None => {
                return Err(Error::new(
                    ErrorKind::MalformedInstruction,
                    format!("{} is missing its opcode", opcode),
                ))
            }
        };
        if declared != i64::from(u8::from(opcode)) {
            return Err(unrecognized());
        }

        let operands = tokens.map(parse_integer).collect::<Result<Vec<_>>>()?;
        let expected = opcode.layout().len();
        if operands.len() != expected {
            return Err(Error::new(
                ErrorKind::MalformedInstruction,
                format!(
                    "{} takes {} operands, got {}",
                    opcode,
                    expected,
                    operands.len()
                ),
            ));
        }

        log::debug!("[{}] Found instruction {}", self.line_nr, opcode);

        Ok(AsmInstruction {
            opcode,
            b: operands[0],
            c: operands[1],
            d: operands.get(2).copied(),
            line_nr: self.line_nr,
        })
    }
}

fn parse_integer(token: &str) -> Result<i64> {
    token.parse().map_err(|err: std::num::ParseIntError| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::new(
            ErrorKind::Range,
            format!("operand `{}` does not fit into any field", token),
        ),
        _ => Error::new(
            ErrorKind::MalformedInstruction,
            format!("operand `{}` is not an integer", token),
        ),
    })
}
