//! Lines

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// The line total does not fit in minor units.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("line total overflowed")]
pub struct LineOverflow;

/// A priced line: a unit price and how many units were ordered.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line<'a> {
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> Line<'a> {
    /// Creates a new line with the given unit price and quantity
    pub fn new(unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// Returns the unit price of the line
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit price multiplied by the quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LineOverflow`] if the product does not fit in minor units.
    pub fn total(&self) -> Result<Money<'a, Currency>, LineOverflow> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .map(|minor| Money::from_minor(minor, self.unit_price.currency()))
            .ok_or(LineOverflow)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        let line = Line::new(Money::from_minor(1_250, iso::USD), 3);

        assert_eq!(line.total()?, Money::from_minor(3_750, iso::USD));

        Ok(())
    }

    #[test]
    fn zero_quantity_line_is_free() -> TestResult {
        let line = Line::new(Money::from_minor(999, iso::USD), 0);

        assert_eq!(line.total()?, Money::from_minor(0, iso::USD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_is_an_error() {
        let line = Line::new(Money::from_minor(i64::MAX, iso::USD), 2);

        assert_eq!(line.total(), Err(LineOverflow));
    }
}
