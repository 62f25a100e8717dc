use std::borrow::Cow;
use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown mnemonic, or a mnemonic whose declared opcode does not match
    UnrecognizedCommand { command: String },
    /// Missing or non-integer operand in an assembler line
    MalformedInstruction,
    /// Value does not fit its field, or an index lies outside a bank
    Range,
    /// Decoded opcode is not part of the instruction set
    UnrecognizedOpcode { opcode: u8 },
    /// Binary artifact contains something that is not a hex byte, or ends mid-field
    MalformedEncoding,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnrecognizedCommand { command } => {
                write!(f, "the command `{}` is not recognized", command)
            }
            ErrorKind::MalformedInstruction => f.write_str("malformed instruction"),
            ErrorKind::Range => f.write_str("value out of range"),
            ErrorKind::UnrecognizedOpcode { opcode } => {
                write!(f, "the opcode `{}` is not recognized", opcode)
            }
            ErrorKind::MalformedEncoding => f.write_str("malformed encoding"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: Option<usize>,
}

impl Error {
    pub fn new<C, S>(kind: ErrorKind, context: C) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr: None,
        }
    }

    /// An error without further context
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            line_nr: None,
        }
    }

    /// Attaches the (1-based) source line the error originated from
    pub fn at_line(mut self, line_nr: usize) -> Self {
        self.line_nr = Some(line_nr);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn line_nr(&self) -> Option<usize> {
        self.line_nr
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_nr {
            Some(line_nr) => write!(f, "error [ln: {}]: {}", line_nr, self.kind)?,
            None => write!(f, "error: {}", self.kind)?,
        }

        if let Some(context) = &self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl error::Error for Error {}

pub type Result<T, E = Error> = std::result::Result<T, E>;
