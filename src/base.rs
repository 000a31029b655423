use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Digit glyphs in value order. A base uses the first `radix` of them.
const DIGITS: &str = "0123456789ABCDEF";

/// One of the four supported positional numeral systems.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NumeralBase {
    Binary,
    Octal,
    #[default]
    Decimal,
    Hexadecimal,
}

// ============================================================================
// Constants
// ============================================================================

impl NumeralBase {
    /// Every supported base, smallest radix first.
    pub const ALL: [Self; 4] = [
        Self::Binary,
        Self::Octal,
        Self::Decimal,
        Self::Hexadecimal,
    ];
}

// ============================================================================
// Metadata
// ============================================================================

impl NumeralBase {
    /// The radix: 2, 8, 10 or 16.
    #[inline]
    pub const fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }

    /// Looks up a base by its radix.
    pub const fn from_radix(radix: u32) -> Option<Self> {
        match radix {
            2 => Some(Self::Binary),
            8 => Some(Self::Octal),
            10 => Some(Self::Decimal),
            16 => Some(Self::Hexadecimal),
            _ => None,
        }
    }

    /// Human readable name, capitalized.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Octal => "Octal",
            Self::Decimal => "Decimal",
            Self::Hexadecimal => "Hexadecimal",
        }
    }

    /// The digit characters of this base in value order (uppercase for hex).
    #[inline]
    pub fn valid_digits(self) -> &'static str {
        &DIGITS[..self.radix() as usize]
    }

    /// Conventional literal prefix, empty for decimal.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Binary => "0b",
            Self::Octal => "0o",
            Self::Decimal => "",
            Self::Hexadecimal => "0x",
        }
    }

    /// Radix written with subscript digits, as in `1010₂`.
    pub const fn subscript(self) -> &'static str {
        match self {
            Self::Binary => "₂",
            Self::Octal => "₈",
            Self::Decimal => "₁₀",
            Self::Hexadecimal => "₁₆",
        }
    }

    /// Number of decimal places one fractional digit of this base needs to be
    /// represented exactly: `radix^-1` is `0.5`, `0.125`, `0.1` and `0.0625`.
    #[inline]
    pub(crate) const fn exact_places_per_digit(self) -> u32 {
        match self {
            Self::Binary => 1,
            Self::Octal => 3,
            Self::Decimal => 1,
            Self::Hexadecimal => 4,
        }
    }
}

// ============================================================================
// Digit Mapping
// ============================================================================

impl NumeralBase {
    /// Value of `c` in this base, or `None` if `c` is not one of its digits.
    ///
    /// Letters are accepted in either case.
    #[inline]
    pub fn digit_value(self, c: char) -> Option<u32> {
        let upper = c.to_ascii_uppercase();
        let value = DIGITS.find(upper)? as u32;
        // DIGITS holds all 16 glyphs, so the radix bound is checked here.
        (value < self.radix()).then_some(value)
    }

    /// Character for a digit value, or `None` if `value >= radix`.
    #[inline]
    pub fn digit_char(self, value: u32) -> Option<char> {
        if value >= self.radix() {
            return None;
        }
        DIGITS[value as usize..].chars().next()
    }

    /// Glyph for a digit value already known to be below the radix.
    #[inline]
    pub(crate) fn glyph(self, value: u32) -> char {
        debug_assert!(value < self.radix());
        char::from(DIGITS.as_bytes()[value as usize])
    }

    /// Returns `true` if `c` is a digit of this base.
    #[inline]
    pub fn is_digit(self, c: char) -> bool {
        self.digit_value(c).is_some()
    }
}

impl fmt::Display for NumeralBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Octal => f.write_str("octal"),
            Self::Decimal => f.write_str("decimal"),
            Self::Hexadecimal => f.write_str("hexadecimal"),
        }
    }
}

impl FromStr for NumeralBase {
    type Err = ParseError;

    /// Accepts names ("binary", "hex", ...), radices ("2", "16") and literal
    /// prefixes ("0b", "0x"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = match trimmed.to_ascii_lowercase().as_str() {
            "binary" | "bin" | "b" | "2" | "0b" => Self::Binary,
            "octal" | "oct" | "o" | "8" | "0o" => Self::Octal,
            "decimal" | "dec" | "d" | "10" => Self::Decimal,
            "hexadecimal" | "hex" | "h" | "x" | "16" | "0x" => Self::Hexadecimal,
            _ => return Err(ParseError::UnknownBase(trimmed.to_string())),
        };
        Ok(base)
    }
}

impl TryFrom<u32> for NumeralBase {
    type Error = ParseError;

    fn try_from(radix: u32) -> Result<Self, Self::Error> {
        Self::from_radix(radix).ok_or_else(|| ParseError::UnknownBase(radix.to_string()))
    }
}
