//! Operand pairs fed to the multiplier.

use std::{fmt, num::ParseIntError, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestVector {
    pub a: u8,
    pub b: u8,
}

impl TestVector {
    pub const fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }

    pub fn expected(&self, frac_bits: u32) -> u16 {
        expected_product(self.a, self.b, frac_bits)
    }
}

/// Zero, an asymmetric near-max/min pair, a mask pattern, a pair next to the
/// signed boundary, all ones and an arbitrary mid-range pair.
pub const DEFAULT_VECTORS: [TestVector; 6] = [
    TestVector::new(0x00, 0x00),
    TestVector::new(0x01, 0xFF),
    TestVector::new(0xAA, 0x0F),
    TestVector::new(0x7F, 0x80),
    TestVector::new(0xFF, 0xFF),
    TestVector::new(0x13, 0x27),
];

/// `(a * b) >> frac_bits`, truncated to the 16-bit result register.
pub fn expected_product(a: u8, b: u8, frac_bits: u32) -> u16 {
    let product = u32::from(a) * u32::from(b);
    product.checked_shr(frac_bits).unwrap_or(0) as u16
}

/// Every operand pair, A-major.
pub fn exhaustive() -> impl Iterator<Item = TestVector> {
    (0..=u8::MAX).flat_map(|a| (0..=u8::MAX).map(move |b| TestVector::new(a, b)))
}

impl fmt::Display for TestVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A={:02x} B={:02x}", self.a, self.b)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseVectorError {
    #[error("expected `A,B`, got `{0}`")]
    Format(String),

    #[error("operand `{text}` is not an 8-bit value: {source}")]
    Operand {
        text: String,
        #[source]
        source: ParseIntError,
    },
}

fn parse_operand(text: &str) -> Result<u8, ParseVectorError> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse::<u8>(),
    };
    parsed.map_err(|source| ParseVectorError::Operand {
        text: text.to_string(),
        source,
    })
}

impl FromStr for TestVector {
    type Err = ParseVectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| ParseVectorError::Format(s.to_string()))?;
        Ok(Self::new(parse_operand(a)?, parse_operand(b)?))
    }
}
