//! Conversion between the canonical decimal form and base-`n` numerals.
//!
//! Every conversion pivots through [`DecimalValue`]: the source numeral is
//! decimalized with [`to_decimal`] and the target numeral is produced with
//! [`from_decimal`].

use core::fmt;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, PointPolicy};
use crate::decimal::{DecimalValue, Fraction, div_round_half_up_unsigned, pow10};
use crate::{ConversionError, MalformedReason, NumeralBase};

/// Minimum number of decimal places kept while decimalizing a fraction.
pub const WORKING_FRACTION_DIGITS: u32 = 50;

// ============================================================================
// Parsing
// ============================================================================

/// A syntactically valid numeral split around its radix point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Numeral<'a> {
    pub negative: bool,
    pub integer_digits: &'a str,
    pub fraction_digits: &'a str,
}

impl Numeral<'_> {
    /// Number of digits written after the radix point.
    pub fn fraction_len(&self) -> u32 {
        u32::try_from(self.fraction_digits.chars().count()).unwrap_or(u32::MAX)
    }
}

/// Checks `input` against `base` and splits it into sign, integer digits and
/// fraction digits. An empty integer segment reads as zero.
pub(crate) fn split_numeral(
    input: &str,
    base: NumeralBase,
    policy: PointPolicy,
) -> crate::Result<Numeral<'_>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::EmptyInput);
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return Err(ConversionError::EmptyInput);
    }
    // Positions count characters of `input` as given, before trimming.
    let leading = input.chars().take_while(|c| c.is_whitespace()).count();
    let offset = leading + usize::from(negative);

    let mut point = None;
    for (position, (index, character)) in body.char_indices().enumerate() {
        match character {
            '.' if point.is_some() => {
                return Err(ConversionError::MalformedNumber(
                    MalformedReason::MultiplePoints,
                ));
            }
            '.' => point = Some(index),
            '-' => {
                return Err(ConversionError::MalformedNumber(
                    MalformedReason::MisplacedSign,
                ));
            }
            _ if base.is_digit(character) => {}
            _ => {
                return Err(ConversionError::InvalidCharacter {
                    character,
                    position: position + offset,
                    base,
                });
            }
        }
    }

    let (integer_digits, fraction_digits) = match point {
        Some(index) => (&body[..index], &body[index + 1..]),
        None => (body, ""),
    };

    if point.is_some() {
        let reason = match (integer_digits.is_empty(), fraction_digits.is_empty()) {
            (true, true) => Some(MalformedReason::NoDigits),
            (true, false) if policy == PointPolicy::Strict => {
                Some(MalformedReason::MissingIntegerDigits)
            }
            (false, true) if policy == PointPolicy::Strict => {
                Some(MalformedReason::MissingFractionDigits)
            }
            _ => None,
        };
        if let Some(reason) = reason {
            return Err(ConversionError::MalformedNumber(reason));
        }
    }

    Ok(Numeral {
        negative,
        integer_digits,
        fraction_digits,
    })
}

/// Returns `true` if `input` is a well-formed numeral in `base`, reading
/// dangling radix points leniently.
pub fn validate(input: &str, base: NumeralBase) -> bool {
    validate_with(input, base, PointPolicy::default())
}

/// Like [`validate`], with an explicit point policy.
pub fn validate_with(input: &str, base: NumeralBase, policy: PointPolicy) -> bool {
    split_numeral(input, base, policy).is_ok()
}

/// Digit values of an already validated digit string.
fn digit_values(digits: &str, base: NumeralBase) -> impl Iterator<Item = u32> + '_ {
    digits.chars().filter_map(move |c| base.digit_value(c))
}

// ============================================================================
// Base-n to Decimal
// ============================================================================

/// Decimalizes `input` written in `base`.
///
/// # Errors
/// Returns `ConversionError::EmptyInput`, `InvalidCharacter` or
/// `MalformedNumber` when `input` is not a numeral of `base`.
pub fn to_decimal(input: &str, base: NumeralBase) -> crate::Result<DecimalValue> {
    to_decimal_with(input, base, PointPolicy::default())
}

/// Like [`to_decimal`], with an explicit point policy.
pub fn to_decimal_with(
    input: &str,
    base: NumeralBase,
    policy: PointPolicy,
) -> crate::Result<DecimalValue> {
    let numeral = split_numeral(input, base, policy).inspect_err(|err| {
        tracing::debug!(%base, error = %err, "rejected numeral");
    })?;
    Ok(decimalize(&numeral, base))
}

pub(crate) fn decimalize(numeral: &Numeral<'_>, base: NumeralBase) -> DecimalValue {
    DecimalValue::new(
        numeral.negative,
        integer_value(numeral.integer_digits, base),
        fraction_value(numeral.fraction_digits, base),
    )
}

/// Horner evaluation of an integer digit string: `acc = acc * radix + digit`.
pub(crate) fn integer_value(digits: &str, base: NumeralBase) -> BigUint {
    let radix = BigUint::from(base.radix());
    digit_values(digits, base).fold(BigUint::zero(), |acc, digit| acc * &radix + digit)
}

/// Decimal places used to decimalize `len` fractional digits of `base`.
///
/// Never below [`WORKING_FRACTION_DIGITS`]; raised when the exact expansion
/// needs more, so power-of-two fractions decimalize without error.
pub(crate) fn fraction_scale(base: NumeralBase, len: usize) -> u32 {
    let exact = u32::try_from(len)
        .unwrap_or(u32::MAX)
        .saturating_mul(base.exact_places_per_digit());
    exact.max(WORKING_FRACTION_DIGITS)
}

/// `digit × radix^-position`, scaled by `10^scale` and rounded half-up.
pub(crate) fn fraction_place_value(
    digit: u32,
    base: NumeralBase,
    position: u32,
    scale: u32,
) -> BigUint {
    let numerator = BigUint::from(digit) * pow10(scale);
    let denominator = BigUint::from(base.radix()).pow(position);
    div_round_half_up_unsigned(&numerator, &denominator)
}

/// Decimal value of the digits after the radix point, `None` if zero.
pub(crate) fn fraction_value(digits: &str, base: NumeralBase) -> Option<Fraction> {
    if digits.is_empty() {
        return None;
    }
    let scale = fraction_scale(base, digits.len());
    let sum = digit_values(digits, base)
        .zip(1u32..)
        .fold(BigUint::zero(), |acc, (digit, position)| {
            acc + fraction_place_value(digit, base, position, scale)
        });
    Fraction::new(sum, scale)
}

// ============================================================================
// Decimal to Base-n
// ============================================================================

/// One round of the divide-and-track-remainder algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DivisionStep {
    pub dividend: BigUint,
    pub quotient: BigUint,
    pub remainder: u32,
}

/// Repeated division of `value` by the radix until the quotient is zero.
///
/// Empty for zero; remainders come out least significant first.
pub(crate) fn division_steps(value: &BigUint, base: NumeralBase) -> Vec<DivisionStep> {
    let radix = BigUint::from(base.radix());
    let mut steps = Vec::new();
    let mut dividend = value.clone();
    while !dividend.is_zero() {
        let (quotient, remainder) = dividend.div_rem(&radix);
        let remainder = remainder.to_u32().unwrap_or_default();
        steps.push(DivisionStep {
            dividend,
            quotient: quotient.clone(),
            remainder,
        });
        dividend = quotient;
    }
    steps
}

/// One round of the multiply-and-take-integer-part algorithm. Both values are
/// numerators over `10^scale`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MultiplicationStep {
    pub fraction: BigUint,
    pub product: BigUint,
    pub digit: u32,
}

/// Repeated multiplication of `fraction` by the radix, stopping at an exact
/// zero remainder or after `max_digits` digits.
///
/// Returns the common scale of the step numerators alongside the steps.
pub(crate) fn multiplication_steps(
    fraction: &Fraction,
    base: NumeralBase,
    max_digits: u32,
) -> (u32, Vec<MultiplicationStep>) {
    let scale = fraction.scale();
    let one = pow10(scale);
    let radix = BigUint::from(base.radix());
    let mut steps = Vec::new();
    let mut current = fraction.numerator_at(scale);
    while !current.is_zero() && steps.len() < max_digits as usize {
        let product = &current * &radix;
        let (digit, remainder) = product.div_rem(&one);
        steps.push(MultiplicationStep {
            fraction: current,
            product,
            digit: digit.to_u32().unwrap_or_default(),
        });
        current = remainder;
    }
    (scale, steps)
}

/// Integer digits of `value` in `base`; zero is "0".
pub(crate) fn integer_digits(value: &BigUint, base: NumeralBase) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    division_steps(value, base)
        .iter()
        .rev()
        .map(|step| base.glyph(step.remainder))
        .collect()
}

/// Fractional digits of `fraction` in `base`, truncated to `max_digits` with
/// trailing zeros stripped. May be empty.
pub(crate) fn fraction_digits(fraction: &Fraction, base: NumeralBase, max_digits: u32) -> String {
    let (_, steps) = multiplication_steps(fraction, base, max_digits);
    let digits: String = steps.iter().map(|step| base.glyph(step.digit)).collect();
    digits.trim_end_matches('0').to_string()
}

/// Renders `value` in `base`, emitting at most `max_fractional_digits`
/// fractional digits.
///
/// Non-terminating expansions are truncated, never rounded. Hexadecimal
/// digits are uppercase; a value that renders as zero carries no sign.
pub fn from_decimal(value: &DecimalValue, base: NumeralBase, max_fractional_digits: u32) -> String {
    let mut out = integer_digits(value.integer_part(), base);
    if let Some(fraction) = value.fractional_part() {
        let digits = fraction_digits(fraction, base, max_fractional_digits);
        if !digits.is_empty() {
            out.push('.');
            out.push_str(&digits);
        }
    }
    if value.is_negative() && out != "0" {
        out.insert(0, '-');
    }
    out
}

// ============================================================================
// Normalization
// ============================================================================

/// Canonical spelling of `input` in its own base: no leading zeros, no
/// trailing fractional zeros, uppercase hex digits, no negative zero.
///
/// # Errors
/// Fails like [`to_decimal`].
pub fn normalize(input: &str, base: NumeralBase) -> crate::Result<String> {
    normalize_with(input, base, PointPolicy::default())
}

/// Like [`normalize`], with an explicit point policy.
pub fn normalize_with(input: &str, base: NumeralBase, policy: PointPolicy) -> crate::Result<String> {
    let numeral = split_numeral(input, base, policy)?;
    let value = decimalize(&numeral, base);
    // Decimalization is exact, so as many digits as were written reproduce them.
    Ok(from_decimal(&value, base, numeral.fraction_len()))
}

// ============================================================================
// Conversion
// ============================================================================

/// Outcome of a single conversion.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversionResult {
    input: String,
    output: String,
    from_base: NumeralBase,
    to_base: NumeralBase,
}

impl ConversionResult {
    pub fn new(input: String, output: String, from_base: NumeralBase, to_base: NumeralBase) -> Self {
        Self {
            input,
            output,
            from_base,
            to_base,
        }
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[inline]
    pub fn from_base(&self) -> NumeralBase {
        self.from_base
    }

    #[inline]
    pub fn to_base(&self) -> NumeralBase {
        self.to_base
    }

    /// Consumes the result, returning the converted numeral.
    pub fn into_output(self) -> String {
        self.output
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} = {}{}",
            self.input,
            self.from_base.subscript(),
            self.output,
            self.to_base.subscript()
        )
    }
}

/// Converts `input` from `from_base` to `to_base` under `config`.
///
/// The output keeps at most `config.precision` fractional digits, also when
/// both bases are the same; [`normalize`] keeps every written digit.
pub fn convert_with(
    input: &str,
    from_base: NumeralBase,
    to_base: NumeralBase,
    config: &EngineConfig,
) -> crate::Result<ConversionResult> {
    tracing::debug!(%from_base, %to_base, precision = %config.precision, "converting");
    let numeral = split_numeral(input, from_base, config.point_policy).inspect_err(|err| {
        tracing::debug!(base = %from_base, error = %err, "rejected numeral");
    })?;
    let value = decimalize(&numeral, from_base);
    let output = from_decimal(&value, to_base, config.precision.get());
    Ok(ConversionResult::new(
        input.trim().to_string(),
        output,
        from_base,
        to_base,
    ))
}


#[cfg(test)]
mod to_decimal_tests {
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_horner_integer() {
        let value = to_decimal("777", NumeralBase::Octal).unwrap();
        assert_eq!(value.integer_part(), &BigUint::from(511u32));
        assert!(value.fractional_part().is_none());
    }

    #[test]
    fn test_hex_case_insensitive() {
        assert_eq!(
            to_decimal("aBc", NumeralBase::Hexadecimal),
            to_decimal("ABC", NumeralBase::Hexadecimal)
        );
    }

    #[test]
    fn test_binary_fraction_is_exact() {
        let input = std::format!("0.{}1", "0".repeat(60));
        let value = to_decimal(&input, NumeralBase::Binary).unwrap();
        let fraction = value.fractional_part().unwrap();
        assert_eq!(fraction.scale(), 61);
        assert_eq!(fraction.digits(), &BigUint::from(5u32).pow(61));
        assert_eq!(from_decimal(&value, NumeralBase::Binary, 61), input);
    }

    #[test]
    fn test_trailing_fraction_zeros_vanish() {
        let value = to_decimal("12.500", NumeralBase::Decimal).unwrap();
        assert_eq!(value.to_string(), "12.5");
        let value = to_decimal("3.000", NumeralBase::Decimal).unwrap();
        assert!(value.fractional_part().is_none());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(to_decimal("  101  ", NumeralBase::Binary).unwrap().to_string(), "5");
    }

    #[test]
    fn test_negative_fraction_only() {
        let value = to_decimal("-0.8", NumeralBase::Hexadecimal).unwrap();
        assert!(value.is_negative());
        assert_eq!(value.to_string(), "-0.5");
    }

    #[test]
    fn test_fraction_place_value_rounds_half_up() {
        // 1 × 16^-1 = 0.0625
        assert_eq!(fraction_place_value(1, NumeralBase::Hexadecimal, 1, 4), BigUint::from(625u32));
        assert_eq!(fraction_place_value(1, NumeralBase::Hexadecimal, 1, 2), BigUint::from(6u32));
        assert_eq!(fraction_place_value(1, NumeralBase::Hexadecimal, 1, 1), BigUint::from(1u32));
        assert_eq!(fraction_place_value(1, NumeralBase::Binary, 1, 1), BigUint::from(5u32));
    }

    #[test]
    fn test_fraction_scale() {
        assert_eq!(fraction_scale(NumeralBase::Decimal, 3), 50);
        assert_eq!(fraction_scale(NumeralBase::Hexadecimal, 20), 80);
        assert_eq!(fraction_scale(NumeralBase::Octal, 16), 50);
        assert_eq!(fraction_scale(NumeralBase::Octal, 17), 51);
    }
}
