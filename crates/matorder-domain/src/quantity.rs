//! Quantity module - numeric amounts on a record

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Largest magnitude at which every integer is exactly representable in f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A finite numeric quantity
///
/// Whole values serialize as JSON integers (`350`, not `350.0`) so that a
/// record survives a serialize/normalize cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quantity(f64);

impl Quantity {
    /// Create a quantity, rejecting NaN and infinities
    ///
    /// # Examples
    ///
    /// ```
    /// use matorder_domain::Quantity;
    ///
    /// assert!(Quantity::new(350.0).is_some());
    /// assert!(Quantity::new(f64::NAN).is_none());
    /// ```
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the value is a whole number that fits an i64 exactly
    pub fn is_whole(&self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT_INTEGER
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Quantity::new(value)
            .ok_or_else(|| serde::de::Error::custom("quantity must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_number_serializes_as_integer() {
        let q = Quantity::new(350.0).unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "350");
    }

    #[test]
    fn test_fraction_serializes_as_float() {
        let q = Quantity::new(12.5).unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "12.5");
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Quantity::new(f64::INFINITY).is_none());
        assert!(Quantity::new(f64::NEG_INFINITY).is_none());
        assert!(Quantity::new(f64::NAN).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::new(40.0).unwrap().to_string(), "40");
        assert_eq!(Quantity::new(2.25).unwrap().to_string(), "2.25");
    }

    #[test]
    fn test_deserialize_integer_and_float() {
        let q: Quantity = serde_json::from_str("7").unwrap();
        assert_eq!(q.value(), 7.0);
        let q: Quantity = serde_json::from_str("7.5").unwrap();
        assert_eq!(q.value(), 7.5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: serialization round-trips through JSON without drift
        #[test]
        fn test_quantity_json_roundtrip(value in -1.0e12f64..1.0e12f64) {
            let q = Quantity::new(value).unwrap();
            let json = serde_json::to_string(&q).unwrap();
            let parsed: Quantity = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(q, parsed);
        }

        /// Property: whole values never carry a decimal point on the wire
        #[test]
        fn test_whole_values_have_no_fraction(value in -1_000_000i64..1_000_000i64) {
            let q = Quantity::new(value as f64).unwrap();
            let json = serde_json::to_string(&q).unwrap();
            prop_assert!(!json.contains('.'), "{} serialized as {}", value, json);
        }
    }
}
