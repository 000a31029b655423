//! Mixed-base arithmetic.
//!
//! Both operands are decimalized independently, combined as signed decimals at
//! the working scale (`precision + 5`, rounded half-up) and the result is
//! rendered in the requested output base, truncated to `precision` digits.

use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, Precision};
use crate::convert::{from_decimal, to_decimal_with};
use crate::decimal::{Decimal, DecimalValue};
use crate::{ArithmeticError, NumeralBase, ParseError};

/// One of the four basic operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArithmeticOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperation {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Display symbol: `+`, `-`, `×` or `÷`.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
        }
    }

    /// Applies the operation, rounding the result half-up to `scale` places.
    ///
    /// # Errors
    /// Returns `ArithmeticError::DivisionByZero` when dividing by zero.
    pub fn apply(
        self,
        lhs: &Decimal,
        rhs: &Decimal,
        scale: u32,
    ) -> Result<Decimal, ArithmeticError> {
        let result = match self {
            Self::Add => (lhs + rhs).rescale(scale),
            Self::Subtract => (lhs - rhs).rescale(scale),
            Self::Multiply => (lhs * rhs).rescale(scale),
            Self::Divide => lhs
                .checked_div(rhs, scale)
                .ok_or(ArithmeticError::DivisionByZero)?,
        };
        Ok(result)
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ArithmeticOperation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let operation = match trimmed.to_ascii_lowercase().as_str() {
            "+" | "add" | "plus" | "addition" => Self::Add,
            "-" | "−" | "sub" | "subtract" | "minus" | "subtraction" => Self::Subtract,
            "*" | "×" | "x" | "mul" | "multiply" | "times" | "multiplication" => Self::Multiply,
            "/" | "÷" | "div" | "divide" | "division" => Self::Divide,
            _ => return Err(ParseError::UnknownOperation(trimmed.to_string())),
        };
        Ok(operation)
    }
}

/// A numeral tagged with the base it is written in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Operand<'a> {
    pub digits: &'a str,
    pub base: NumeralBase,
}

impl<'a> Operand<'a> {
    pub const fn new(digits: &'a str, base: NumeralBase) -> Self {
        Self { digits, base }
    }

    pub const fn decimal(digits: &'a str) -> Self {
        Self::new(digits, NumeralBase::Decimal)
    }
}

/// Both decimalized operands and the working-scale result of a calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    lhs: DecimalValue,
    rhs: DecimalValue,
    operation: ArithmeticOperation,
    result: Decimal,
}

impl Evaluation {
    #[inline]
    pub fn lhs(&self) -> &DecimalValue {
        &self.lhs
    }

    #[inline]
    pub fn rhs(&self) -> &DecimalValue {
        &self.rhs
    }

    #[inline]
    pub fn operation(&self) -> ArithmeticOperation {
        self.operation
    }

    /// The result at the working scale, before truncation.
    #[inline]
    pub fn result(&self) -> &Decimal {
        &self.result
    }

    /// The result split into sign, integer and fraction.
    pub fn result_value(&self) -> DecimalValue {
        self.result.to_value()
    }

    /// The result written in `base` with at most `precision` fractional
    /// digits. Results that truncate to zero are rendered unsigned.
    pub fn render(&self, base: NumeralBase, precision: Precision) -> String {
        from_decimal(&self.result_value(), base, precision.get())
    }
}

/// Decimalizes both operands and applies `operation` at the working scale.
///
/// # Errors
/// Conversion failures of either operand are returned unchanged, wrapped in
/// `ArithmeticError::Conversion`; dividing by zero fails with
/// `ArithmeticError::DivisionByZero`.
pub fn evaluate(
    lhs: Operand<'_>,
    rhs: Operand<'_>,
    operation: ArithmeticOperation,
    config: &EngineConfig,
) -> Result<Evaluation, ArithmeticError> {
    let lhs_value = to_decimal_with(lhs.digits, lhs.base, config.point_policy)?;
    let rhs_value = to_decimal_with(rhs.digits, rhs.base, config.point_policy)?;

    let scale = config.precision.working_scale();
    let result = operation
        .apply(&lhs_value.to_decimal(), &rhs_value.to_decimal(), scale)
        .inspect_err(|err| tracing::debug!(%operation, error = %err, "operation failed"))?;

    tracing::trace!(lhs = %lhs_value, rhs = %rhs_value, result = %result, "evaluated");
    Ok(Evaluation {
        lhs: lhs_value,
        rhs: rhs_value,
        operation,
        result,
    })
}

/// Applies `operation` to two base-tagged operands and renders the result in
/// `out_base`.
pub fn calculate(
    lhs: Operand<'_>,
    rhs: Operand<'_>,
    operation: ArithmeticOperation,
    out_base: NumeralBase,
    config: &EngineConfig,
) -> Result<String, ArithmeticError> {
    tracing::debug!(
        lhs_base = %lhs.base,
        rhs_base = %rhs.base,
        %operation,
        %out_base,
        precision = %config.precision,
        "calculating"
    );
    let evaluation = evaluate(lhs, rhs, operation, config)?;
    Ok(evaluation.render(out_base, config.precision))
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::*;
    use crate::{ConversionError, MalformedReason};

    fn calc(
        lhs: (&str, NumeralBase),
        rhs: (&str, NumeralBase),
        operation: ArithmeticOperation,
        out_base: NumeralBase,
    ) -> Result<String, ArithmeticError> {
        calculate(
            Operand::new(lhs.0, lhs.1),
            Operand::new(rhs.0, rhs.1),
            operation,
            out_base,
            &EngineConfig::default(),
        )
    }

    fn dec(digits: &str) -> (&str, NumeralBase) {
        (digits, NumeralBase::Decimal)
    }

    #[test]
    fn test_mixed_base_addition() {
        let result = calc(
            ("1010", NumeralBase::Binary),
            ("F", NumeralBase::Hexadecimal),
            ArithmeticOperation::Add,
            NumeralBase::Decimal,
        );
        assert_eq!(result.unwrap(), "25");
    }

    #[test]
    fn test_subtraction_goes_negative() {
        let result = calc(dec("5"), dec("10"), ArithmeticOperation::Subtract, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "-5");
        let result = calc(dec("5"), dec("10"), ArithmeticOperation::Subtract, NumeralBase::Binary);
        assert_eq!(result.unwrap(), "-101");
    }

    #[test]
    fn test_multiplication() {
        let result = calc(
            ("FF", NumeralBase::Hexadecimal),
            ("10", NumeralBase::Octal),
            ArithmeticOperation::Multiply,
            NumeralBase::Hexadecimal,
        );
        assert_eq!(result.unwrap(), "7F8");
        let result = calc(dec("-1.5"), dec("-1.5"), ArithmeticOperation::Multiply, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "2.25");
    }

    #[test]
    fn test_division() {
        let result = calc(dec("10"), dec("4"), ArithmeticOperation::Divide, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "2.5");
        let result = calc(dec("1"), dec("3"), ArithmeticOperation::Divide, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "0.333333333333333");
        let result = calc(dec("2"), dec("3"), ArithmeticOperation::Divide, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "0.666666666666666");
    }

    #[test]
    fn test_division_into_binary_fraction() {
        let result = calc(
            ("1", NumeralBase::Binary),
            ("100", NumeralBase::Binary),
            ArithmeticOperation::Divide,
            NumeralBase::Binary,
        );
        assert_eq!(result.unwrap(), "0.01");
    }

    #[test]
    fn test_division_by_zero() {
        let result = calc(dec("10"), dec("0"), ArithmeticOperation::Divide, NumeralBase::Decimal);
        assert_eq!(result, Err(ArithmeticError::DivisionByZero));
        let result = calc(
            dec("10"),
            ("0.000", NumeralBase::Hexadecimal),
            ArithmeticOperation::Divide,
            NumeralBase::Binary,
        );
        assert_eq!(result, Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn test_operand_errors_propagate() {
        let result = calc(
            ("12", NumeralBase::Binary),
            dec("1"),
            ArithmeticOperation::Add,
            NumeralBase::Decimal,
        );
        assert_eq!(
            result,
            Err(ArithmeticError::Conversion(ConversionError::InvalidCharacter {
                character: '2',
                position: 1,
                base: NumeralBase::Binary,
            }))
        );
        let result = calc(dec("1"), dec("1..0"), ArithmeticOperation::Add, NumeralBase::Decimal);
        assert_eq!(
            result,
            Err(ArithmeticError::Conversion(ConversionError::MalformedNumber(
                MalformedReason::MultiplePoints
            )))
        );
        let result = calc(dec(""), dec("1"), ArithmeticOperation::Add, NumeralBase::Decimal);
        assert_eq!(
            result,
            Err(ArithmeticError::Conversion(ConversionError::EmptyInput))
        );
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let result = calc(dec("-0.5"), dec("0.5"), ArithmeticOperation::Add, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "0");
        let config = EngineConfig::default().with_precision(Precision::saturating(1));
        let result = calculate(
            Operand::decimal("-1"),
            Operand::decimal("1000"),
            ArithmeticOperation::Divide,
            NumeralBase::Decimal,
            &config,
        );
        assert_eq!(result.unwrap(), "0");
    }

    #[test]
    fn test_negative_fraction_operand_keeps_sign() {
        let result = calc(dec("-0.5"), dec("2"), ArithmeticOperation::Multiply, NumeralBase::Decimal);
        assert_eq!(result.unwrap(), "-1");
    }

    #[test]
    fn test_working_scale_rounds_half_up() {
        let config = EngineConfig::default().with_precision(Precision::saturating(1));
        let evaluation = evaluate(
            Operand::decimal("2"),
            Operand::decimal("3"),
            ArithmeticOperation::Divide,
            &config,
        )
        .unwrap();
        assert_eq!(evaluation.result().scale(), 6);
        assert_eq!(evaluation.result().to_string(), "0.666667");
        assert_eq!(evaluation.render(NumeralBase::Decimal, config.precision), "0.6");
    }

    #[test]
    fn test_evaluation_exposes_operands() {
        let evaluation = evaluate(
            Operand::new("1010", NumeralBase::Binary),
            Operand::new("F", NumeralBase::Hexadecimal),
            ArithmeticOperation::Add,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(evaluation.lhs().to_string(), "10");
        assert_eq!(evaluation.rhs().to_string(), "15");
        assert_eq!(evaluation.operation(), ArithmeticOperation::Add);
        assert_eq!(evaluation.result_value().to_string(), "25");
    }

    #[test]
    fn test_operation_symbols_and_parsing() {
        assert_eq!(ArithmeticOperation::Multiply.symbol(), "×");
        assert_eq!(ArithmeticOperation::Divide.to_string(), "÷");
        assert_eq!("*".parse::<ArithmeticOperation>(), Ok(ArithmeticOperation::Multiply));
        assert_eq!("Minus".parse::<ArithmeticOperation>(), Ok(ArithmeticOperation::Subtract));
        assert_eq!(
            "%".parse::<ArithmeticOperation>(),
            Err(ParseError::UnknownOperation("%".to_string()))
        );
        for operation in ArithmeticOperation::ALL {
            assert_eq!(operation.symbol().parse::<ArithmeticOperation>(), Ok(operation));
        }
    }
}
