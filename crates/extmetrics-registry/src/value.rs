//! Metric values — a base scalar plus optional selector-keyed sub-values.

use std::collections::HashMap;

/// The latest computed value of one metric.
///
/// The base scalar is what a caller gets when it queries without a
/// selector. Selector-qualified scalars let one registered metric expose
/// many sub-dimensions (`?labelSelector=zone=us`) instead of paying for
/// one update loop per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricValue {
    base: i64,
    /// label → value → scalar.
    selectors: HashMap<String, HashMap<String, i64>>,
}

impl MetricValue {
    /// Create a plain value with no selector dimensions.
    pub fn new(base: i64) -> Self {
        Self {
            base,
            selectors: HashMap::new(),
        }
    }

    /// Attach a more granular scalar under `selectors[label][value]`.
    ///
    /// Last write wins for a repeated `(label, value)` pair.
    pub fn add_selector(&mut self, label: &str, value: &str, scalar: i64) {
        self.selectors
            .entry(label.to_string())
            .or_default()
            .insert(value.to_string(), scalar);
    }

    /// Resolve a scalar for the given selector pair.
    ///
    /// Returns the selector scalar only when both parts are non-empty
    /// and the pair is known. Everything else falls back to the base: a
    /// query for a dimension this metric does not track gets the
    /// aggregate value rather than an error.
    pub fn resolve(&self, label: &str, value: &str) -> i64 {
        if label.is_empty() || value.is_empty() {
            return self.base;
        }
        self.selectors
            .get(label)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(self.base)
    }

    /// The base scalar.
    pub fn base(&self) -> i64 {
        self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_resolves_to_base() {
        let v = MetricValue::new(42);
        assert_eq!(v.resolve("", ""), 42);
        assert_eq!(v.base(), 42);
    }

    #[test]
    fn known_selector_resolves_to_its_scalar() {
        let mut v = MetricValue::new(10);
        v.add_selector("zone", "us", 5);
        assert_eq!(v.resolve("zone", "us"), 5);
    }

    #[test]
    fn unknown_selector_falls_back_to_base() {
        let mut v = MetricValue::new(10);
        v.add_selector("zone", "us", 5);
        assert_eq!(v.resolve("zone", "eu"), 10);
        assert_eq!(v.resolve("region", "us"), 10);
    }

    #[test]
    fn empty_label_or_value_falls_back_to_base() {
        let mut v = MetricValue::new(7);
        v.add_selector("zone", "us", 5);
        assert_eq!(v.resolve("", "us"), 7);
        assert_eq!(v.resolve("zone", ""), 7);
    }

    #[test]
    fn repeated_selector_last_write_wins() {
        let mut v = MetricValue::new(1);
        v.add_selector("zone", "us", 5);
        v.add_selector("zone", "us", 9);
        assert_eq!(v.resolve("zone", "us"), 9);
    }

    #[test]
    fn multiple_values_under_one_label() {
        let mut v = MetricValue::new(0);
        v.add_selector("some-key", "A", 1);
        v.add_selector("some-key", "B", 2);
        v.add_selector("some-key", "C", -3);
        assert_eq!(v.resolve("some-key", "A"), 1);
        assert_eq!(v.resolve("some-key", "B"), 2);
        assert_eq!(v.resolve("some-key", "C"), -3);
    }
}
