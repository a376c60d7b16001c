use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HexError {
    #[error("odd number of hex digits ({0})")]
    OddLength(usize),
    #[error("invalid hex digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}

/// Raw frame bytes given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexFrame(Vec<u8>);

impl HexFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for HexFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<Vec<u8>> for HexFrame {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

pub fn parse_hex_frame(input: &str) -> Result<HexFrame, HexError> {
    let digits: Vec<(usize, char)> = input
        .char_indices()
        .filter(|(_, c)| !(c.is_whitespace() || *c == ':' || *c == '-'))
        .collect();

    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }

    digits
        .chunks_exact(2)
        .map(|pair| -> Result<u8, HexError> {
            Ok(nibble(pair[0])? << 4 | nibble(pair[1])?)
        })
        .collect::<Result<Vec<u8>, HexError>>()
        .map(HexFrame)
}

fn nibble((position, digit): (usize, char)) -> Result<u8, HexError> {
    digit
        .to_digit(16)
        .map(|value| value as u8)
        .ok_or(HexError::InvalidDigit { digit, position })
}
