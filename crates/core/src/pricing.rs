//! Pricing

use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

use crate::lines::{Line, LineOverflow};

/// Errors that can occur while calculating a subtotal.
#[derive(Debug, Error, PartialEq)]
pub enum SubtotalError {
    /// No lines were provided, so currency could not be determined.
    #[error("no lines provided; cannot determine currency")]
    NoLines,

    /// A single line total did not fit in minor units.
    #[error(transparent)]
    Line(#[from] LineOverflow),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the subtotal of a list of lines
///
/// # Errors
///
/// - [`SubtotalError::NoLines`]: No lines were provided, so currency could not be determined.
/// - [`SubtotalError::Line`]: A line total overflowed.
/// - [`SubtotalError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn subtotal<'a>(lines: &[Line<'a>]) -> Result<Money<'a, iso::Currency>, SubtotalError> {
    let first = lines.first().ok_or(SubtotalError::NoLines)?;

    let total = lines.iter().try_fold(
        Money::from_minor(0, first.unit_price().currency()),
        |acc, line| -> Result<_, SubtotalError> { Ok(acc.add(line.total()?)?) },
    )?;

    Ok(total)
}
