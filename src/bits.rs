//! Conversions between integers, binary digit strings and the `0xHH` byte
//! tokens of the binary artifact.
//!
//! Binary digit strings are always most significant bit first.

use crate::error::{Error, ErrorKind, Result};

/// Converts `value` into exactly `width` binary digits, zero-padded on the left.
///
/// # Errors
///
/// Fails with [`ErrorKind::Range`] if `value` is negative or larger than
/// `2^width - 1`.
pub fn encode(value: i64, width: u32) -> Result<String> {
    let max = if width >= 64 {
        i128::from(u64::MAX)
    } else {
        (1i128 << width) - 1
    };

    if value < 0 || i128::from(value) > max {
        return Err(Error::new(
            ErrorKind::Range,
            format!("{} does not fit into {} bits", value, width),
        ));
    }

    Ok(format!("{:0width$b}", value, width = width as usize))
}

/// Parses a string of binary digits back into an integer.
pub fn decode(digits: &str) -> Result<u64> {
    u64::from_str_radix(digits, 2).map_err(|_| {
        Error::new(
            ErrorKind::MalformedEncoding,
            format!("`{}` is not a binary number", digits),
        )
    })
}

/// Concatenates the binary digits of a stream of hex byte tokens, 4 bits per
/// hex digit. Tokens may carry a `0x` prefix and use either case.
///
/// # Errors
///
/// Fails with [`ErrorKind::MalformedEncoding`] unless every token holds
/// exactly two hex digits.
pub fn decode_nibble_stream<'a, I>(tokens: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut bits = String::new();

    for token in tokens {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        if digits.len() != 2 {
            return Err(Error::new(
                ErrorKind::MalformedEncoding,
                format!("`{}` is not a two digit hex byte", token),
            ));
        }

        for c in digits.chars() {
            let nibble = c.to_digit(16).ok_or_else(|| {
                Error::new(
                    ErrorKind::MalformedEncoding,
                    format!("`{}` is not a hex byte", token),
                )
            })?;
            bits.push_str(&format!("{:04b}", nibble));
        }
    }

    Ok(bits)
}

/// Right-pads `bits` with zeros up to exactly `width` digits.
pub fn pad(mut bits: String, width: usize) -> Result<String> {
    if bits.len() > width {
        return Err(Error::new(
            ErrorKind::Range,
            format!("{} bits do not fit into a {} bit word", bits.len(), width),
        ));
    }

    bits.extend(std::iter::repeat('0').take(width - bits.len()));
    Ok(bits)
}

/// Splits a padded word into bytes and renders them as `0xHH` tokens joined
/// by single spaces.
pub fn serialize_word(bits: &str) -> Result<String> {
    if bits.len() % 8 != 0 {
        return Err(Error::new(
            ErrorKind::MalformedEncoding,
            format!("{} bits are not a whole number of bytes", bits.len()),
        ));
    }

    let tokens = bits
        .as_bytes()
        .chunks(8)
        .map(|chunk| {
            let chunk = std::str::from_utf8(chunk).map_err(|_| {
                Error::new(ErrorKind::MalformedEncoding, "word is not a digit string")
            })?;
            Ok(format!("0x{:02X}", decode(chunk)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(tokens.join(" "))
}

/// The contiguous bit stream reconstructed from a binary artifact.
///
/// Line breaks carry no meaning; word boundaries are implicit every
/// [`WORD_BITS`](crate::WORD_BITS) bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: String,
}

impl BitStream {
    /// Wraps an existing binary digit string
    pub fn new(bits: String) -> Self {
        Self { bits }
    }

    /// Decodes every `0xHH` token of every line, in file order
    pub fn from_hex(text: &str) -> Result<Self> {
        decode_nibble_stream(text.split_whitespace()).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.bits
    }

    /// Reads `width` bits starting at bit `at` as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::MalformedEncoding`] if the stream ends before
    /// `at + width`.
    pub fn read(&self, at: usize, width: usize) -> Result<u64> {
        let field = at
            .checked_add(width)
            .and_then(|end| self.bits.get(at..end))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::MalformedEncoding,
                    format!(
                        "stream of {} bits ends inside a {} bit field at bit {}",
                        self.bits.len(),
                        width,
                        at
                    ),
                )
            })?;

        decode(field)
    }
}
