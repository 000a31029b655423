//! Configured entry point for conversions and calculations.

use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::{self, ArithmeticOperation, Evaluation, Operand};
use crate::config::{EngineConfig, PointPolicy, Precision};
use crate::convert::{self, ConversionResult};
use crate::decimal::DecimalValue;
use crate::trace::{self, Trace};
use crate::{ArithmeticError, NumeralBase};

/// A stateless calculator bound to one [`EngineConfig`].
///
/// Every method is a pure function of its arguments and the configuration;
/// an `Engine` can be copied freely and shared across threads.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine with the default point policy and the given precision.
    ///
    /// # Errors
    /// Returns `ConversionError::PrecisionOutOfRange` outside 1..=30.
    pub const fn with_precision(precision: u32) -> crate::Result<Self> {
        match Precision::new(precision) {
            Ok(precision) => Ok(Self::new(EngineConfig::new(precision, PointPolicy::Lenient))),
            Err(err) => Err(err),
        }
    }

    #[inline]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub const fn precision(&self) -> Precision {
        self.config.precision
    }

    pub fn validate(&self, input: &str, base: NumeralBase) -> bool {
        convert::validate_with(input, base, self.config.point_policy)
    }

    pub fn to_decimal(&self, input: &str, base: NumeralBase) -> crate::Result<DecimalValue> {
        convert::to_decimal_with(input, base, self.config.point_policy)
    }

    pub fn normalize(&self, input: &str, base: NumeralBase) -> crate::Result<String> {
        convert::normalize_with(input, base, self.config.point_policy)
    }

    pub fn convert(
        &self,
        input: &str,
        from_base: NumeralBase,
        to_base: NumeralBase,
    ) -> crate::Result<ConversionResult> {
        convert::convert_with(input, from_base, to_base, &self.config)
    }

    pub fn explain_conversion(
        &self,
        input: &str,
        from_base: NumeralBase,
        to_base: NumeralBase,
    ) -> crate::Result<Trace> {
        trace::explain_conversion(input, from_base, to_base, &self.config)
    }

    pub fn evaluate(
        &self,
        lhs: Operand<'_>,
        rhs: Operand<'_>,
        operation: ArithmeticOperation,
    ) -> Result<Evaluation, ArithmeticError> {
        arithmetic::evaluate(lhs, rhs, operation, &self.config)
    }

    pub fn calculate(
        &self,
        lhs: Operand<'_>,
        rhs: Operand<'_>,
        operation: ArithmeticOperation,
        out_base: NumeralBase,
    ) -> Result<String, ArithmeticError> {
        arithmetic::calculate(lhs, rhs, operation, out_base, &self.config)
    }

    pub fn explain_calculation(
        &self,
        lhs: Operand<'_>,
        rhs: Operand<'_>,
        operation: ArithmeticOperation,
        out_base: NumeralBase,
    ) -> Result<Trace, ArithmeticError> {
        trace::explain_calculation(lhs, rhs, operation, out_base, &self.config)
    }
}

impl From<EngineConfig> for Engine {
    fn from(config: EngineConfig) -> Self {
        Self::new(config)
    }
}
