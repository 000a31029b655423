//! Arbitrary-precision numeral base conversion and mixed-base arithmetic
//!
//! This library converts numbers between the four positional systems used in
//! introductory computing courses and explains every step it takes:
//!
//! - **`NumeralBase`**: binary, octal, decimal and hexadecimal metadata
//!   - Digit sets, display names, digit↔character mapping
//! - **Conversion**: any supported base to any other, integer and fractional
//!   - Unbounded integers, exact decimalization of power-of-two fractions
//!   - Deterministic truncation of non-terminating expansions
//! - **Arithmetic**: `+ - × ÷` over operands written in different bases
//! - **Traces**: structured, renderer-agnostic derivations of each result
//!
//! ## Features
//!
//! - **Exact pivot**: every conversion goes through an explicit-sign decimal
//!   value backed by `num-bigint`
//! - **no_std compatible**: only `alloc` is required
//! - **Serde support**: configuration, results and traces behind `serde`
//!
//! ## Example
//!
//! ```rust
//! use radixcalc::{ArithmeticOperation, NumeralBase};
//!
//! let result = radixcalc::convert("255", NumeralBase::Decimal, NumeralBase::Hexadecimal, 15).unwrap();
//! assert_eq!(result.output(), "FF");
//!
//! let sum = radixcalc::calculate(
//!     "1010",
//!     NumeralBase::Binary,
//!     "F",
//!     NumeralBase::Hexadecimal,
//!     ArithmeticOperation::Add,
//!     NumeralBase::Decimal,
//!     15,
//! )
//! .unwrap();
//! assert_eq!(sum, "25");
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(test)]
extern crate std;

extern crate alloc;

pub mod arithmetic;
pub mod base;
pub mod config;
pub mod convert;
pub mod decimal;
pub mod engine;
pub mod trace;

pub use arithmetic::{ArithmeticOperation, Evaluation, Operand};
pub use base::NumeralBase;
pub use config::{EngineConfig, PointPolicy, Precision};
pub use convert::{ConversionResult, from_decimal, normalize, to_decimal};
pub use decimal::{Decimal, DecimalValue, Fraction};
pub use engine::Engine;
pub use trace::{Method, Stage, StepKind, Trace, TraceSection, TraceStep};

use alloc::string::String;
use thiserror::Error;

/// Why a numeral was rejected as structurally malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MalformedReason {
    /// More than one radix point.
    MultiplePoints,
    /// A radix point with no digits on either side.
    NoDigits,
    /// Nothing before the radix point (".5") under the strict point policy.
    MissingIntegerDigits,
    /// Nothing after the radix point ("10.") under the strict point policy.
    MissingFractionDigits,
    /// A minus sign anywhere but the first position.
    MisplacedSign,
}

impl core::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MalformedReason::MultiplePoints => f.write_str("more than one radix point"),
            MalformedReason::NoDigits => f.write_str("no digits around the radix point"),
            MalformedReason::MissingIntegerDigits => {
                f.write_str("no digits before the radix point")
            }
            MalformedReason::MissingFractionDigits => {
                f.write_str("no digits after the radix point")
            }
            MalformedReason::MisplacedSign => f.write_str("sign is only allowed as the first character"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("empty input")]
    EmptyInput,

    #[error("invalid character '{character}' at position {position} for {base}")]
    InvalidCharacter {
        character: char,
        /// Zero-based character index in the input as given, whitespace included.
        position: usize,
        base: NumeralBase,
    },

    #[error("malformed number: {0}")]
    MalformedNumber(MalformedReason),

    #[error("precision {0} is outside the supported range 1..=30")]
    PrecisionOutOfRange(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("division by zero")]
    DivisionByZero,
}

/// Failure to parse a base or operation name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown numeral base: {0}")]
    UnknownBase(String),

    #[error("unknown arithmetic operation: {0}")]
    UnknownOperation(String),
}

pub type Result<T> = core::result::Result<T, ConversionError>;

// ============================================================================
// Crate-level entry points
// ============================================================================

/// Converts `input` from one base to another, keeping at most `precision`
/// fractional digits in the output.
pub fn convert(
    input: &str,
    from_base: NumeralBase,
    to_base: NumeralBase,
    precision: u32,
) -> Result<ConversionResult> {
    Engine::with_precision(precision)?.convert(input, from_base, to_base)
}

/// Like [`convert`], but returns the derivation instead of the result.
pub fn explain_conversion(
    input: &str,
    from_base: NumeralBase,
    to_base: NumeralBase,
    precision: u32,
) -> Result<Trace> {
    Engine::with_precision(precision)?.explain_conversion(input, from_base, to_base)
}

/// Applies `operation` to two operands written in (possibly different) bases
/// and renders the result in `out_base`.
pub fn calculate(
    lhs: &str,
    lhs_base: NumeralBase,
    rhs: &str,
    rhs_base: NumeralBase,
    operation: ArithmeticOperation,
    out_base: NumeralBase,
    precision: u32,
) -> core::result::Result<String, ArithmeticError> {
    Engine::with_precision(precision)?.calculate(
        Operand::new(lhs, lhs_base),
        Operand::new(rhs, rhs_base),
        operation,
        out_base,
    )
}

/// Like [`calculate`], but returns the derivation instead of the result.
pub fn explain_calculation(
    lhs: &str,
    lhs_base: NumeralBase,
    rhs: &str,
    rhs_base: NumeralBase,
    operation: ArithmeticOperation,
    out_base: NumeralBase,
    precision: u32,
) -> core::result::Result<Trace, ArithmeticError> {
    Engine::with_precision(precision)?.explain_calculation(
        Operand::new(lhs, lhs_base),
        Operand::new(rhs, rhs_base),
        operation,
        out_base,
    )
}

/// Returns `true` if `input` is a well-formed numeral in `base` under the
/// default (lenient) point policy.
pub fn validate(input: &str, base: NumeralBase) -> bool {
    convert::validate(input, base)
}
