//! Money: a non-negative decimal amount with a literal display form.
//!
//! There is no currency or locale handling; amounts print with two decimals.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        Ok(Self(amount.normalize()))
    }

    /// Whole currency units, e.g. `Money::from_units(40)` for a price of 40.
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// `self × quantity`; quantity must be positive.
    pub fn times(&self, quantity: i64) -> DomainResult<Money> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Money)
            .ok_or_else(|| DomainError::invariant("amount overflow"))
    }

    pub fn checked_add(&self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("amount overflow"))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("invalid amount {s:?}: {e}")))?;
        Money::new(amount)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn revenue_is_price_times_quantity() {
        let price = Money::from_units(40);
        assert_eq!(price.times(5).unwrap(), Money::from_units(200));
    }

    #[test]
    fn fractional_prices_multiply_exactly() {
        let price: Money = "12.35".parse().unwrap();
        assert_eq!(price.times(3).unwrap().amount(), dec!(37.05));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(matches!(
            Money::new(dec!(-0.01)),
            Err(DomainError::Validation(_))
        ));
        assert!("-3".parse::<Money>().is_err());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let price = Money::from_units(10);
        assert!(price.times(0).is_err());
        assert!(price.times(-2).is_err());
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_units(120).to_string(), "120.00");
        assert_eq!("2.5".parse::<Money>().unwrap().to_string(), "2.50");
    }

    #[test]
    fn serializes_as_decimal_string() {
        let price: Money = "19.99".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
        assert!(serde_json::from_str::<Money>("\"-1\"").is_err());
    }
}
