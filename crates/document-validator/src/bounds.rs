//! Numeric bounds and length constraints
//!
//! Shared by the document and object converters so both directions apply the
//! exact same inclusive/exclusive semantics and produce the same messages.

/// One side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    /// Whether the bound value itself is rejected
    pub exclusive: bool,
    pub value: f64,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            exclusive: false,
            value,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            exclusive: true,
            value,
        }
    }
}

/// Minimum and maximum of an integer or decimal node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericBounds {
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
}

impl NumericBounds {
    /// Create unbounded bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Check a decimal value; failing minimum and failing maximum are
    /// reported independently, minimum first.
    pub fn check_decimal(&self, value: f64) -> Vec<String> {
        let mut violations = Vec::new();

        if let Some(minimum) = self.minimum {
            if minimum.exclusive && !(value > minimum.value) {
                violations.push(format!("value must be strictly greater than {}", minimum.value));
            } else if !minimum.exclusive && !(value >= minimum.value) {
                violations.push(format!("value must be equal or greater than {}", minimum.value));
            }
        }

        if let Some(maximum) = self.maximum {
            if maximum.exclusive && !(value < maximum.value) {
                violations.push(format!("value must be strictly lower than {}", maximum.value));
            } else if !maximum.exclusive && !(value <= maximum.value) {
                violations.push(format!("value must be equal or lower than {}", maximum.value));
            }
        }

        violations
    }

    /// Check an integer value against bounds truncated to integers
    pub fn check_integer(&self, value: i64) -> Vec<String> {
        let mut violations = Vec::new();

        if let Some(minimum) = self.minimum {
            let bound = minimum.value.trunc() as i64;
            if minimum.exclusive && value <= bound {
                violations.push(format!("value must be strictly greater than {}", bound));
            } else if !minimum.exclusive && value < bound {
                violations.push(format!("value must be equal or greater than {}", bound));
            }
        }

        if let Some(maximum) = self.maximum {
            let bound = maximum.value.trunc() as i64;
            if maximum.exclusive && value >= bound {
                violations.push(format!("value must be strictly lower than {}", bound));
            } else if !maximum.exclusive && value > bound {
                violations.push(format!("value must be equal or lower than {}", bound));
            }
        }

        violations
    }
}

/// Length constraint of a string or a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Exact(usize),
    Range {
        minimum: Option<usize>,
        maximum: Option<usize>,
    },
}

impl Length {
    /// Check a length, returning the violated constraint if any
    pub fn check(&self, length: usize) -> Option<String> {
        match *self {
            Length::Exact(expected) if length != expected => {
                Some(format!("length must be equal to {}", expected))
            }
            Length::Exact(_) => None,
            Length::Range { minimum, maximum } => {
                if let Some(minimum) = minimum.filter(|&m| length < m) {
                    return Some(format!("length must be equal or greater than {}", minimum));
                }
                maximum
                    .filter(|&m| length > m)
                    .map(|maximum| format!("length must be equal or lower than {}", maximum))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(minimum: Option<Bound>, maximum: Option<Bound>) -> NumericBounds {
        NumericBounds { minimum, maximum }
    }

    #[test]
    fn test_inclusive_minimum() {
        let b = bounds(Some(Bound::inclusive(42.0)), None);
        assert!(b.check_integer(42).is_empty());
        assert_eq!(b.check_integer(41), vec!["value must be equal or greater than 42"]);
        assert!(b.check_decimal(42.0).is_empty());
        assert_eq!(b.check_decimal(41.5), vec!["value must be equal or greater than 42"]);
    }

    #[test]
    fn test_exclusive_minimum() {
        let b = bounds(Some(Bound::exclusive(42.0)), None);
        assert_eq!(b.check_integer(42), vec!["value must be strictly greater than 42"]);
        assert!(b.check_integer(43).is_empty());
        assert_eq!(b.check_decimal(42.0), vec!["value must be strictly greater than 42"]);
        assert!(b.check_decimal(42.01).is_empty());
    }

    #[test]
    fn test_inclusive_maximum() {
        let b = bounds(None, Some(Bound::inclusive(9.5)));
        assert!(b.check_decimal(9.5).is_empty());
        assert_eq!(b.check_decimal(9.75), vec!["value must be equal or lower than 9.5"]);
        // integer bounds are truncated
        assert!(b.check_integer(9).is_empty());
        assert_eq!(b.check_integer(10), vec!["value must be equal or lower than 9"]);
    }

    #[test]
    fn test_exclusive_maximum() {
        let b = bounds(None, Some(Bound::exclusive(10.0)));
        assert_eq!(b.check_integer(10), vec!["value must be strictly lower than 10"]);
        assert!(b.check_integer(9).is_empty());
        assert_eq!(b.check_decimal(10.0), vec!["value must be strictly lower than 10"]);
    }

    #[test]
    fn test_both_bounds_report_independently() {
        // inconsistent on purpose: no value can satisfy both
        let b = bounds(Some(Bound::inclusive(10.0)), Some(Bound::inclusive(0.0)));
        assert_eq!(
            b.check_integer(5),
            vec![
                "value must be equal or greater than 10",
                "value must be equal or lower than 0",
            ]
        );
    }

    #[test]
    fn test_nan_fails_every_bound() {
        let b = bounds(Some(Bound::inclusive(0.0)), Some(Bound::inclusive(1.0)));
        assert_eq!(b.check_decimal(f64::NAN).len(), 2);
    }

    #[test]
    fn test_length_checks() {
        assert_eq!(Length::Exact(3).check(3), None);
        assert_eq!(Length::Exact(3).check(2).as_deref(), Some("length must be equal to 3"));
        assert_eq!(
            Length::Range { minimum: Some(2), maximum: None }.check(1).as_deref(),
            Some("length must be equal or greater than 2")
        );
        assert_eq!(
            Length::Range { minimum: None, maximum: Some(2) }.check(3).as_deref(),
            Some("length must be equal or lower than 2")
        );
        assert_eq!(Length::Range { minimum: Some(1), maximum: Some(3) }.check(2), None);
    }
}
