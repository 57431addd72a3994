//! Overflow-checked Decimal steps for one period's line items

use rust_decimal::Decimal;

use crate::error::ModelError;
use crate::ModelResult;

/// Checked `+`, `-` and `*` that name the line item and period on overflow.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checked {
    year: u32,
}

impl Checked {
    pub(crate) fn new(year: u32) -> Self {
        Self { year }
    }

    pub(crate) fn add(&self, item: &'static str, a: Decimal, b: Decimal) -> ModelResult<Decimal> {
        a.checked_add(b).ok_or_else(|| self.overflow(item))
    }

    pub(crate) fn sub(&self, item: &'static str, a: Decimal, b: Decimal) -> ModelResult<Decimal> {
        a.checked_sub(b).ok_or_else(|| self.overflow(item))
    }

    pub(crate) fn mul(&self, item: &'static str, a: Decimal, b: Decimal) -> ModelResult<Decimal> {
        a.checked_mul(b).ok_or_else(|| self.overflow(item))
    }

    fn overflow(&self, item: &str) -> ModelError {
        ModelError::ArithmeticOverflow {
            context: format!("{item} for year {}", self.year),
        }
    }
}
