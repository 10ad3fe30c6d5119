use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Physical Measurements
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    Gram,
    Kilogram,
}

impl WeightUnit {
    /// Conversion factor into grams.
    fn grams_per_unit(&self) -> Decimal {
        match self {
            WeightUnit::Gram => Decimal::ONE,
            WeightUnit::Kilogram => Decimal::from(1000),
        }
    }
}

/// A shipping weight with its unit.
///
/// Equality, comparisons and sums normalize through grams so mixed-unit
/// accumulation is well defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub value: Decimal,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn new(value: Decimal, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, WeightUnit::Gram)
    }

    pub fn to_grams(&self) -> Decimal {
        self.value * self.unit.grams_per_unit()
    }

    pub fn multiply(&self, factor: Decimal) -> Self {
        Self {
            value: self.value * factor,
            unit: self.unit,
        }
    }

    /// Sum in the left operand's unit.
    pub fn add(&self, other: &Weight) -> Weight {
        let grams = self.to_grams() + other.to_grams();
        Weight {
            value: grams / self.unit.grams_per_unit(),
            unit: self.unit,
        }
    }
}

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.to_grams() == other.to_grams()
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.to_grams().partial_cmp(&other.to_grams())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_multiply() {
        let unit_weight = Weight::new(dec!(1.5), WeightUnit::Kilogram);
        let total = unit_weight.multiply(dec!(4));
        assert_eq!(total, Weight::new(dec!(6.0), WeightUnit::Kilogram));
    }

    #[test]
    fn test_add_normalizes_units() {
        let kg = Weight::new(dec!(1), WeightUnit::Kilogram);
        let g = Weight::new(dec!(250), WeightUnit::Gram);
        let sum = kg.add(&g);
        assert_eq!(sum.unit, WeightUnit::Kilogram);
        assert_eq!(sum.to_grams(), dec!(1250));
    }

    #[test]
    fn test_comparison_across_units() {
        let heavy = Weight::new(dec!(2), WeightUnit::Kilogram);
        let light = Weight::new(dec!(500), WeightUnit::Gram);
        assert!(heavy > light);
        assert!(light < heavy);
    }

    #[test]
    fn test_zero_is_gram_zero() {
        assert_eq!(Weight::zero().to_grams(), Decimal::ZERO);
    }
}
