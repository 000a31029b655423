//! Structured derivations of conversion and calculation results.
//!
//! A [`Trace`] records *why* a result is what it is, one arithmetic fact per
//! [`TraceStep`]. It carries numbers and labels only; styling and layout
//! belong to whoever renders it.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use num_bigint::BigUint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::{self, ArithmeticOperation, Operand};
use crate::config::{EngineConfig, Precision};
use crate::convert::{
    self, Numeral, decimalize, division_steps, fraction_place_value, fraction_scale,
    multiplication_steps, split_numeral,
};
use crate::decimal::{DecimalValue, format_scaled};
use crate::{ArithmeticError, NumeralBase};

// ============================================================================
// Data Model
// ============================================================================

/// Which part of a derivation a section documents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stage {
    /// A standalone base-to-base conversion.
    Conversion,
    /// Decimalization of the left operand of a calculation.
    FirstOperand,
    /// Decimalization of the right operand of a calculation.
    SecondOperand,
    /// The operation itself, in decimal.
    Operation,
    /// Conversion of the decimal result to the output base.
    OutputConversion,
    /// Closing restatement of a calculation.
    Summary,
}

/// How a conversion result was reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Source and target base are the same.
    Identity,
    /// One side is decimal, so a single algorithm suffices.
    Direct,
    /// Decimalize the source, then extract digits of the target.
    ViaDecimal,
    /// Operands decimalized, combined, and converted to the output base.
    Calculation,
}

impl Method {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Direct => "direct",
            Self::ViaDecimal => "two-step via decimal",
            Self::Calculation => "calculation",
        }
    }

    fn for_conversion(from: NumeralBase, to: NumeralBase) -> Self {
        if from == to {
            Self::Identity
        } else if from == NumeralBase::Decimal || to == NumeralBase::Decimal {
            Self::Direct
        } else {
            Self::ViaDecimal
        }
    }
}

/// What a step computes, with the numbers a renderer needs to lay it out.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum StepKind {
    /// `digit × radix^exponent = contribution`; negative exponents for
    /// fractional digits. Operands: digit value, power. Result: contribution.
    PositionalExpansion {
        digit: char,
        radix: u32,
        exponent: i32,
    },
    /// Sum of the preceding contributions. Operands: contributions. Result:
    /// the decimal total.
    PositionalSum,
    /// `dividend ÷ radix = quotient remainder digit`. Operands: dividend,
    /// radix. Result: quotient.
    DivisionRemainder { radix: u32, remainder: u32, digit: char },
    /// `fraction × radix = product`, whose integer part is the next digit.
    /// Operands: fraction, radix. Result: product.
    MultiplicationDigit { radix: u32, digit: char },
    /// Operands: both decimal operands. Result: the decimal result.
    Arithmetic { operation: ArithmeticOperation },
    /// Operands: the input(s). Result: the final output.
    Summary { method: Method },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceStep {
    order: usize,
    kind: StepKind,
    operands: Vec<String>,
    result: String,
}

impl TraceStep {
    /// Position within the section, starting at 1.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    #[inline]
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    #[inline]
    pub fn result(&self) -> &str {
        &self.result
    }
}

/// One sub-trace: steps of a single stage, numbered from 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceSection {
    stage: Stage,
    steps: Vec<TraceStep>,
}

impl TraceSection {
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }
}

/// Ordered, immutable derivation of a single result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trace {
    sections: Vec<TraceSection>,
}

impl Trace {
    #[inline]
    pub fn sections(&self) -> &[TraceSection] {
        &self.sections
    }

    /// First section of the given stage.
    pub fn section(&self, stage: Stage) -> Option<&TraceSection> {
        self.sections.iter().find(|section| section.stage == stage)
    }

    /// All steps, section by section.
    pub fn steps(&self) -> impl Iterator<Item = &TraceStep> {
        self.sections.iter().flat_map(|section| section.steps.iter())
    }

    /// Total number of steps.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.steps.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The terminal summary step.
    pub fn summary(&self) -> Option<&TraceStep> {
        self.steps().last()
    }

    /// The result the trace explains.
    pub fn output(&self) -> Option<&str> {
        self.summary().map(TraceStep::result)
    }
}

impl IntoIterator for Trace {
    type Item = TraceSection;
    type IntoIter = vec::IntoIter<TraceSection>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

// ============================================================================
// Builders
// ============================================================================

struct SectionBuilder {
    stage: Stage,
    steps: Vec<TraceStep>,
}

impl SectionBuilder {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            steps: Vec::new(),
        }
    }

    fn push(&mut self, kind: StepKind, operands: Vec<String>, result: String) {
        self.steps.push(TraceStep {
            order: self.steps.len() + 1,
            kind,
            operands,
            result,
        });
    }

    fn finish(self) -> Option<TraceSection> {
        (!self.steps.is_empty()).then_some(TraceSection {
            stage: self.stage,
            steps: self.steps,
        })
    }
}

#[derive(Default)]
struct TraceBuilder {
    sections: Vec<TraceSection>,
}

impl TraceBuilder {
    fn push(&mut self, section: SectionBuilder) {
        self.sections.extend(section.finish());
    }

    fn finish(self) -> Trace {
        Trace {
            sections: self.sections,
        }
    }
}

// ============================================================================
// Step Recorders
// ============================================================================

/// Positional expansion of the integer and fractional digits of `numeral`,
/// each followed by the sum of its contributions.
fn record_decimalization(
    section: &mut SectionBuilder,
    numeral: &Numeral<'_>,
    value: &DecimalValue,
    base: NumeralBase,
) {
    let radix = base.radix();
    let digits: Vec<char> = numeral.integer_digits.chars().collect();
    tracing::trace!(
        %base,
        integer_digits = digits.len(),
        fraction_digits = numeral.fraction_digits.len(),
        "recording positional expansion"
    );
    if !digits.is_empty() {
        let mut contributions = Vec::with_capacity(digits.len());
        for (index, &c) in digits.iter().enumerate() {
            let Some(digit) = base.digit_value(c) else {
                continue;
            };
            let exponent = digits.len() - 1 - index;
            let power = BigUint::from(radix).pow(u32::try_from(exponent).unwrap_or(u32::MAX));
            let contribution = (power * digit).to_string();
            section.push(
                StepKind::PositionalExpansion {
                    digit: c.to_ascii_uppercase(),
                    radix,
                    exponent: i32::try_from(exponent).unwrap_or(i32::MAX),
                },
                vec![digit.to_string(), format!("{radix}^{exponent}")],
                contribution.clone(),
            );
            contributions.push(contribution);
        }
        section.push(
            StepKind::PositionalSum,
            contributions,
            value.integer_part().to_string(),
        );
    }

    if !numeral.fraction_digits.is_empty() {
        let scale = fraction_scale(base, numeral.fraction_digits.len());
        let mut contributions = Vec::new();
        for (c, position) in numeral.fraction_digits.chars().zip(1u32..) {
            let Some(digit) = base.digit_value(c) else {
                continue;
            };
            let contribution =
                format_scaled(&fraction_place_value(digit, base, position, scale), scale);
            section.push(
                StepKind::PositionalExpansion {
                    digit: c.to_ascii_uppercase(),
                    radix,
                    exponent: -i32::try_from(position).unwrap_or(i32::MAX),
                },
                vec![digit.to_string(), format!("{radix}^-{position}")],
                contribution.clone(),
            );
            contributions.push(contribution);
        }
        let total = value
            .fractional_part()
            .map_or_else(|| "0".to_string(), ToString::to_string);
        section.push(StepKind::PositionalSum, contributions, total);
    }
}

/// Repeated division for the integer part and repeated multiplication for
/// the fractional part of `value` (magnitudes only).
fn record_digit_extraction(
    section: &mut SectionBuilder,
    value: &DecimalValue,
    base: NumeralBase,
    max_fractional_digits: u32,
) {
    let radix = base.radix();
    let divisions = division_steps(value.integer_part(), base);
    tracing::trace!(%base, steps = divisions.len(), "recording division steps");
    for step in divisions {
        section.push(
            StepKind::DivisionRemainder {
                radix,
                remainder: step.remainder,
                digit: base.glyph(step.remainder),
            },
            vec![step.dividend.to_string(), radix.to_string()],
            step.quotient.to_string(),
        );
    }

    if let Some(fraction) = value.fractional_part() {
        let (scale, steps) = multiplication_steps(fraction, base, max_fractional_digits);
        tracing::trace!(%base, steps = steps.len(), scale, "recording multiplication steps");
        for step in steps {
            section.push(
                StepKind::MultiplicationDigit {
                    radix,
                    digit: base.glyph(step.digit),
                },
                vec![format_scaled(&step.fraction, scale), radix.to_string()],
                format_scaled(&step.product, scale),
            );
        }
    }
}

/// All steps of a conversion from `from` to `to`, ending in a summary.
fn record_conversion(
    section: &mut SectionBuilder,
    numeral: &Numeral<'_>,
    value: &DecimalValue,
    (from, to): (NumeralBase, NumeralBase),
    max_fractional_digits: u32,
    output: &str,
) {
    if from != to {
        if from != NumeralBase::Decimal {
            record_decimalization(section, numeral, value, from);
        }
        if to != NumeralBase::Decimal {
            record_digit_extraction(section, value, to, max_fractional_digits);
        }
    }
    section.push(
        StepKind::Summary {
            method: Method::for_conversion(from, to),
        },
        vec![numeral_text(numeral)],
        output.to_string(),
    );
}

/// The numeral as written, minus surrounding whitespace.
fn numeral_text(numeral: &Numeral<'_>) -> String {
    let mut text = String::new();
    if numeral.negative {
        text.push('-');
    }
    text.push_str(numeral.integer_digits);
    if !numeral.fraction_digits.is_empty() {
        text.push('.');
        text.push_str(numeral.fraction_digits);
    }
    text
}

// ============================================================================
// Public Entry Points
// ============================================================================

/// Derivation of `convert_with(input, from_base, to_base, config)`.
///
/// # Errors
/// Fails exactly when the conversion fails; no partial trace is returned.
pub fn explain_conversion(
    input: &str,
    from_base: NumeralBase,
    to_base: NumeralBase,
    config: &EngineConfig,
) -> crate::Result<Trace> {
    tracing::debug!(%from_base, %to_base, precision = %config.precision, "explaining conversion");
    let numeral = split_numeral(input, from_base, config.point_policy)?;
    let value = decimalize(&numeral, from_base);
    let output = convert::from_decimal(&value, to_base, config.precision.get());

    let mut section = SectionBuilder::new(Stage::Conversion);
    record_conversion(
        &mut section,
        &numeral,
        &value,
        (from_base, to_base),
        config.precision.get(),
        &output,
    );

    let mut trace = TraceBuilder::default();
    trace.push(section);
    Ok(trace.finish())
}

/// Derivation of `calculate(lhs, rhs, operation, out_base, config)`.
///
/// Sections appear in the order first operand, second operand, operation,
/// output conversion, summary; operand sections are omitted for decimal
/// operands and the output section for decimal output.
///
/// # Errors
/// Fails exactly when the calculation fails; no partial trace is returned.
pub fn explain_calculation(
    lhs: Operand<'_>,
    rhs: Operand<'_>,
    operation: ArithmeticOperation,
    out_base: NumeralBase,
    config: &EngineConfig,
) -> Result<Trace, ArithmeticError> {
    tracing::debug!(%operation, %out_base, precision = %config.precision, "explaining calculation");
    let evaluation = arithmetic::evaluate(lhs, rhs, operation, config)?;
    let precision: Precision = config.precision;
    let mut trace = TraceBuilder::default();

    let operands = [
        (Stage::FirstOperand, lhs, evaluation.lhs()),
        (Stage::SecondOperand, rhs, evaluation.rhs()),
    ];
    for (stage, operand, value) in operands {
        if operand.base == NumeralBase::Decimal {
            continue;
        }
        let numeral = split_numeral(operand.digits, operand.base, config.point_policy)?;
        let mut section = SectionBuilder::new(stage);
        record_conversion(
            &mut section,
            &numeral,
            value,
            (operand.base, NumeralBase::Decimal),
            precision.get(),
            &value.to_string(),
        );
        trace.push(section);
    }

    let result = evaluation.result_value();
    let mut section = SectionBuilder::new(Stage::Operation);
    section.push(
        StepKind::Arithmetic { operation },
        vec![evaluation.lhs().to_string(), evaluation.rhs().to_string()],
        result.to_string(),
    );
    trace.push(section);

    let output = evaluation.render(out_base, precision);
    if out_base != NumeralBase::Decimal {
        let text = result.to_string();
        let numeral = split_numeral(&text, NumeralBase::Decimal, config.point_policy)?;
        let mut section = SectionBuilder::new(Stage::OutputConversion);
        record_conversion(
            &mut section,
            &numeral,
            &result,
            (NumeralBase::Decimal, out_base),
            precision.get(),
            &output,
        );
        trace.push(section);
    }

    let mut section = SectionBuilder::new(Stage::Summary);
    section.push(
        StepKind::Summary {
            method: Method::Calculation,
        },
        vec![
            operand_text(lhs),
            operation.symbol().to_string(),
            operand_text(rhs),
        ],
        output,
    );
    trace.push(section);

    Ok(trace.finish())
}

fn operand_text(operand: Operand<'_>) -> String {
    convert::normalize(operand.digits, operand.base)
        .unwrap_or_else(|_| operand.digits.trim().to_string())
}


#[cfg(test)]
mod calculation_trace_tests {
    use std::vec::Vec;

    use super::*;
    use crate::ConversionError;

    fn stages(trace: &Trace) -> Vec<Stage> {
        trace.sections().iter().map(TraceSection::stage).collect()
    }

    #[test]
    fn test_mixed_base_sections() {
        let trace = explain_calculation(
            Operand::new("1010", NumeralBase::Binary),
            Operand::new("F", NumeralBase::Hexadecimal),
            ArithmeticOperation::Add,
            NumeralBase::Decimal,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(
            stages(&trace),
            [
                Stage::FirstOperand,
                Stage::SecondOperand,
                Stage::Operation,
                Stage::Summary
            ]
        );

        let operation = trace.section(Stage::Operation).unwrap();
        assert_eq!(operation.steps().len(), 1);
        let step = &operation.steps()[0];
        assert_eq!(
            step.kind(),
            &StepKind::Arithmetic {
                operation: ArithmeticOperation::Add
            }
        );
        assert_eq!(step.operands(), ["10", "15"]);
        assert_eq!(step.result(), "25");

        let summary = trace.summary().unwrap();
        assert_eq!(summary.operands(), ["1010", "+", "F"]);
        assert_eq!(trace.output(), Some("25"));
    }

    #[test]
    fn test_each_section_numbers_from_one() {
        let trace = explain_calculation(
            Operand::new("11", NumeralBase::Binary),
            Operand::new("7", NumeralBase::Octal),
            ArithmeticOperation::Multiply,
            NumeralBase::Hexadecimal,
            &EngineConfig::default(),
        )
        .unwrap();
        for section in trace.sections() {
            for (expected, step) in section.steps().iter().enumerate() {
                assert_eq!(step.order(), expected + 1);
            }
        }
        assert_eq!(
            stages(&trace),
            [
                Stage::FirstOperand,
                Stage::SecondOperand,
                Stage::Operation,
                Stage::OutputConversion,
                Stage::Summary
            ]
        );
        assert_eq!(trace.output(), Some("15"));
    }

    #[test]
    fn test_decimal_operands_skip_conversion_sections() {
        let trace = explain_calculation(
            Operand::decimal("10"),
            Operand::decimal("4"),
            ArithmeticOperation::Divide,
            NumeralBase::Decimal,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(stages(&trace), [Stage::Operation, Stage::Summary]);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.output(), Some("2.5"));
    }

    #[test]
    fn test_output_conversion_of_negative_fraction() {
        let trace = explain_calculation(
            Operand::decimal("1"),
            Operand::decimal("-4"),
            ArithmeticOperation::Divide,
            NumeralBase::Binary,
            &EngineConfig::default(),
        )
        .unwrap();
        let output = trace.section(Stage::OutputConversion).unwrap();
        let steps = output.steps();
        // 0.25 -> two multiplication digits, then the summary
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].operands(), ["0.25", "2"]);
        assert_eq!(steps[0].result(), "0.5");
        assert_eq!(steps[1].result(), "1");
        assert_eq!(steps[2].operands(), ["-0.25"]);
        assert_eq!(trace.output(), Some("-0.01"));
    }

    #[test]
    fn test_output_matches_calculate() {
        let config = EngineConfig::default();
        let lhs = Operand::new("-7.4", NumeralBase::Octal);
        let rhs = Operand::new("0.C", NumeralBase::Hexadecimal);
        for operation in ArithmeticOperation::ALL {
            for out_base in NumeralBase::ALL {
                let trace = explain_calculation(lhs, rhs, operation, out_base, &config).unwrap();
                let result = arithmetic::calculate(lhs, rhs, operation, out_base, &config).unwrap();
                assert_eq!(trace.output(), Some(result.as_str()));
            }
        }
    }

    #[test]
    fn test_division_by_zero_returns_no_trace() {
        let result = explain_calculation(
            Operand::new("101", NumeralBase::Binary),
            Operand::new("0", NumeralBase::Hexadecimal),
            ArithmeticOperation::Divide,
            NumeralBase::Binary,
            &EngineConfig::default(),
        );
        assert_eq!(result, Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn test_operand_error_returns_no_trace() {
        let result = explain_calculation(
            Operand::new("", NumeralBase::Binary),
            Operand::decimal("1"),
            ArithmeticOperation::Add,
            NumeralBase::Decimal,
            &EngineConfig::default(),
        );
        assert_eq!(
            result,
            Err(ArithmeticError::Conversion(ConversionError::EmptyInput))
        );
    }
}
