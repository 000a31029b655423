//! Canonical decimal pivot and the scaled decimal used for arithmetic.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Mul, Neg, Sub};

use alloc::string::{String, ToString};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A strictly positive decimal fraction below one, stored as
/// `digits / 10^scale` with no trailing zero digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFraction"))]
pub struct Fraction {
    digits: BigUint,
    scale: u32,
}

impl Fraction {
    /// Builds `digits / 10^scale`, trimming trailing zeros.
    ///
    /// Returns `None` when the value is zero or not below one.
    pub fn new(mut digits: BigUint, mut scale: u32) -> Option<Self> {
        if digits.is_zero() || digits >= pow10(scale) {
            return None;
        }
        let ten = BigUint::from(10u32);
        loop {
            let (quotient, remainder) = digits.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            digits = quotient;
            scale -= 1;
        }
        Some(Self { digits, scale })
    }

    /// The significant digits as an integer.
    #[inline]
    pub fn digits(&self) -> &BigUint {
        &self.digits
    }

    /// Number of decimal places.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Numerator of this fraction over `10^scale`, for `scale >= self.scale()`.
    pub(crate) fn numerator_at(&self, scale: u32) -> BigUint {
        debug_assert!(scale >= self.scale);
        &self.digits * pow10(scale - self.scale)
    }

    /// Digits after the point, zero-padded to the scale ("0625" for 0.0625).
    pub fn fraction_digits(&self) -> String {
        pad_digits(&self.digits, self.scale)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0.{}", self.fraction_digits())
    }
}

// ============================================================================
// Serde
// ============================================================================

/// Wire form of [`Fraction`], checked by [`Fraction::new`] on the way in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawFraction {
    digits: BigUint,
    scale: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFraction> for Fraction {
    type Error = &'static str;

    fn try_from(raw: RawFraction) -> Result<Self, Self::Error> {
        Self::new(raw.digits, raw.scale).ok_or("fraction must be greater than zero and below one")
    }
}

/// Wire form of [`DecimalValue`], normalized by [`DecimalValue::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDecimalValue {
    negative: bool,
    integer_part: BigUint,
    fractional_part: Option<Fraction>,
}

#[cfg(feature = "serde")]
impl From<RawDecimalValue> for DecimalValue {
    fn from(raw: RawDecimalValue) -> Self {
        Self::new(raw.negative, raw.integer_part, raw.fractional_part)
    }
}

// ============================================================================
// DecimalValue
// ============================================================================

/// Canonical form every conversion pivots through.
///
/// The sign is an explicit field so that values like `-0.5` survive the
/// split into integer and fractional parts. Zero is never negative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawDecimalValue"))]
pub struct DecimalValue {
    negative: bool,
    integer_part: BigUint,
    fractional_part: Option<Fraction>,
}

impl DecimalValue {
    pub fn new(negative: bool, integer_part: BigUint, fractional_part: Option<Fraction>) -> Self {
        let is_zero = integer_part.is_zero() && fractional_part.is_none();
        Self {
            negative: negative && !is_zero,
            integer_part,
            fractional_part,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// An integral value.
    pub fn from_integer(value: &BigInt) -> Self {
        Self::new(value.is_negative(), value.magnitude().clone(), None)
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.integer_part.is_zero() && self.fractional_part.is_none()
    }

    /// Magnitude of the integer part.
    #[inline]
    pub fn integer_part(&self) -> &BigUint {
        &self.integer_part
    }

    #[inline]
    pub fn fractional_part(&self) -> Option<&Fraction> {
        self.fractional_part.as_ref()
    }

    /// Integer part with the value's sign applied (`-0.5` gives `0`).
    pub fn signed_integer_part(&self) -> BigInt {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, self.integer_part.clone())
    }

    /// The same value with a positive sign.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    /// Exact scaled representation.
    pub fn to_decimal(&self) -> Decimal {
        let scale = self.fractional_part.as_ref().map_or(0, Fraction::scale);
        let mut magnitude = &self.integer_part * pow10(scale);
        if let Some(fraction) = &self.fractional_part {
            magnitude += &fraction.digits;
        }
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        Decimal::new(BigInt::from_biguint(sign, magnitude), scale)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.integer_part)?;
        if let Some(fraction) = &self.fractional_part {
            write!(f, ".{}", fraction.fraction_digits())?;
        }
        Ok(())
    }
}

// ============================================================================
// Decimal
// ============================================================================

/// Signed scaled decimal: `mantissa / 10^scale`.
///
/// Results are exact except where a target scale is requested, in which case
/// they are rounded half-up (ties away from zero). Equality, ordering and
/// hashing compare values, so `2.5` equals `2.50000`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    #[inline]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Re-expresses the value at `scale` decimal places.
    #[must_use]
    pub fn rescale(&self, scale: u32) -> Self {
        let mantissa = match scale.cmp(&self.scale) {
            Ordering::Equal => self.mantissa.clone(),
            Ordering::Greater => &self.mantissa * BigInt::from(pow10(scale - self.scale)),
            Ordering::Less => {
                div_round_half_up(&self.mantissa, &BigInt::from(pow10(self.scale - scale)))
            }
        };
        Self { mantissa, scale }
    }

    /// The same value at the smallest scale that represents it exactly.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if self.mantissa.is_zero() {
            return Self::default();
        }
        let ten = BigInt::from(10u32);
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        while scale > 0 {
            let (quotient, remainder) = mantissa.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            mantissa = quotient;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Mantissas of both operands at their common scale.
    fn aligned(&self, rhs: &Self) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(rhs.scale);
        (
            self.rescale(scale).mantissa,
            rhs.rescale(scale).mantissa,
            scale,
        )
    }

    /// Quotient rounded half-up to `scale` places, or `None` for a zero divisor.
    pub fn checked_div(&self, rhs: &Self, scale: u32) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        // self / rhs = (a / 10^sa) / (b / 10^sb); scaled by 10^scale this is
        // a * 10^(scale + sb) / (b * 10^sa).
        let numerator = &self.mantissa * BigInt::from(pow10(scale + rhs.scale));
        let denominator = &rhs.mantissa * BigInt::from(pow10(self.scale));
        Some(Self::new(div_round_half_up(&numerator, &denominator), scale))
    }

    /// Splits into the canonical sign / integer / fraction form.
    pub fn to_value(&self) -> DecimalValue {
        let (integer, remainder) = self.mantissa.magnitude().div_rem(&pow10(self.scale));
        DecimalValue::new(
            self.is_negative(),
            integer,
            Fraction::new(remainder, self.scale),
        )
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let (a, b, _) = self.aligned(other);
        a == b
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        normalized.mantissa.hash(state);
        normalized.scale.hash(state);
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: Self) -> Decimal {
        let (a, b, scale) = self.aligned(rhs);
        Decimal::new(a + b, scale)
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Decimal {
        let (a, b, scale) = self.aligned(rhs);
        Decimal::new(a - b, scale)
    }
}

impl Mul for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Self) -> Decimal {
        Decimal::new(&self.mantissa * &rhs.mantissa, self.scale + rhs.scale)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::new(-&self.mantissa, self.scale)
    }
}

impl From<&DecimalValue> for Decimal {
    fn from(value: &DecimalValue) -> Self {
        value.to_decimal()
    }
}

impl From<&Decimal> for DecimalValue {
    fn from(value: &Decimal) -> Self {
        value.to_value()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 10^n as an unbounded integer.
pub(crate) fn pow10(n: u32) -> BigUint {
    BigUint::from(10u32).pow(n)
}

/// Integer division rounding half away from zero.
pub(crate) fn div_round_half_up(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let (quotient, remainder) = numerator.div_rem(denominator);
    if remainder.is_zero() {
        return quotient;
    }
    let twice = remainder.magnitude() << 1usize;
    if twice >= *denominator.magnitude() {
        if numerator.is_negative() == denominator.is_negative() {
            quotient + BigInt::one()
        } else {
            quotient - BigInt::one()
        }
    } else {
        quotient
    }
}

/// Unsigned variant of [`div_round_half_up`].
pub(crate) fn div_round_half_up_unsigned(numerator: &BigUint, denominator: &BigUint) -> BigUint {
    let (quotient, remainder) = numerator.div_rem(denominator);
    if (remainder << 1usize) >= *denominator {
        quotient + BigUint::one()
    } else {
        quotient
    }
}

/// Renders `digits` as exactly `scale` decimal digits, left-padded with zeros.
pub(crate) fn pad_digits(digits: &BigUint, scale: u32) -> String {
    let raw = digits.to_string();
    let width = scale as usize;
    if raw.len() >= width {
        return raw;
    }
    let mut padded = String::with_capacity(width);
    for _ in raw.len()..width {
        padded.push('0');
    }
    padded.push_str(&raw);
    padded
}

/// Plain decimal rendering of `numerator / 10^scale` ("1.25", "0.5", "3").
pub(crate) fn format_scaled(numerator: &BigUint, scale: u32) -> String {
    let (integer, remainder) = numerator.div_rem(&pow10(scale));
    match Fraction::new(remainder, scale) {
        Some(fraction) => {
            let mut out = integer.to_string();
            out.push('.');
            out.push_str(&fraction.fraction_digits());
            out
        }
        None => integer.to_string(),
    }
}
