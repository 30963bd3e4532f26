//! Bound checks for coerced field values.

use crate::core::{Constraint, Value};
use crate::error::ValidationError;

/// Check a coerced value against the bounds of its constraint.
///
/// - Strings are checked against `min_len`/`max_len` (length in bytes).
/// - Integers and floats are checked against `min`/`max`. NaN fails any bound.
/// - Durations are checked against `min`/`max` in nanoseconds.
/// - Booleans always pass.
///
/// The lower bound is checked first and only the first violation is returned.
///
/// # Examples
///
/// ```rust
/// use configly::core::{validate, Constraint, Value};
///
/// let age = Constraint::new("age").with_min(0).with_max(120);
/// assert!(validate(&Value::Int(42), &age).is_ok());
/// assert!(validate(&Value::Int(150), &age).is_err());
/// ```
///
/// # Errors
///
/// Returns the violated bound, or [`ValidationError::NegativeBound`] when a
/// negative `min`/`max` is checked against an unsigned value.
pub fn validate(value: &Value, constraint: &Constraint) -> Result<(), ValidationError> {
    match value {
        Value::String(s) => {
            let len = s.len();
            if let Some(min) = constraint.min_len {
                if (len as i128) < min as i128 {
                    return Err(ValidationError::TooShort { len, min });
                }
            }
            if let Some(max) = constraint.max_len {
                if (len as i128) > max as i128 {
                    return Err(ValidationError::TooLong { len, max });
                }
            }
            Ok(())
        }
        Value::Int(v) => check_bounds(i128::from(*v), v, constraint),
        Value::Uint(v) => {
            for bound in [constraint.min, constraint.max].into_iter().flatten() {
                if bound < 0 {
                    return Err(ValidationError::NegativeBound(bound));
                }
            }
            check_bounds(i128::from(*v), v, constraint)
        }
        Value::Duration(d) => {
            let nanos = i128::try_from(d.as_nanos()).unwrap_or(i128::MAX);
            check_bounds(nanos, &format_args!("{d:?}"), constraint)
        }
        Value::Float(v) => {
            if v.is_nan() && (constraint.min.is_some() || constraint.max.is_some()) {
                return Err(ValidationError::NotANumber);
            }
            if let Some(min) = constraint.min {
                if *v < min as f64 {
                    return Err(ValidationError::BelowMin {
                        value: v.to_string(),
                        min,
                    });
                }
            }
            if let Some(max) = constraint.max {
                if *v > max as f64 {
                    return Err(ValidationError::AboveMax {
                        value: v.to_string(),
                        max,
                    });
                }
            }
            Ok(())
        }
        Value::Bool(_) => Ok(()),
    }
}

fn check_bounds(
    value: i128,
    shown: &dyn std::fmt::Display,
    constraint: &Constraint,
) -> Result<(), ValidationError> {
    if let Some(min) = constraint.min {
        if value < i128::from(min) {
            return Err(ValidationError::BelowMin {
                value: shown.to_string(),
                min,
            });
        }
    }
    if let Some(max) = constraint.max {
        if value > i128::from(max) {
            return Err(ValidationError::AboveMax {
                value: shown.to_string(),
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_string_min_len() {
        let constraint = Constraint::new("test").with_min_len(5);
        assert!(validate(&string("hello"), &constraint).is_ok());
        assert_eq!(
            validate(&string("hi"), &constraint),
            Err(ValidationError::TooShort { len: 2, min: 5 })
        );
    }

    #[test]
    fn test_string_max_len() {
        let constraint = Constraint::new("test").with_max_len(10);
        assert!(validate(&string("hello"), &constraint).is_ok());
        assert!(matches!(
            validate(&string("this is a very long string"), &constraint),
            Err(ValidationError::TooLong { max: 10, .. })
        ));
    }

    #[test]
    fn test_string_length_boundaries() {
        let constraint = Constraint::new("test").with_min_len(3).with_max_len(5);
        assert!(validate(&string("abc"), &constraint).is_ok());
        assert!(validate(&string("abcde"), &constraint).is_ok());
        assert!(validate(&string("ab"), &constraint).is_err());
        assert!(validate(&string("abcdef"), &constraint).is_err());
    }

    #[test]
    fn test_string_length_counts_bytes() {
        let constraint = Constraint::new("test").with_max_len(3);
        // "héé" is 5 bytes
        assert!(validate(&string("héé"), &constraint).is_err());
    }

    #[test]
    fn test_int_bounds() {
        let constraint = Constraint::new("test").with_min(0).with_max(120);
        assert!(validate(&Value::Int(25), &constraint).is_ok());
        assert!(validate(&Value::Int(0), &constraint).is_ok());
        assert!(validate(&Value::Int(120), &constraint).is_ok());
        assert_eq!(
            validate(&Value::Int(-10), &constraint),
            Err(ValidationError::BelowMin {
                value: "-10".to_string(),
                min: 0
            })
        );
        assert!(matches!(
            validate(&Value::Int(150), &constraint),
            Err(ValidationError::AboveMax { max: 120, .. })
        ));
    }

    #[test]
    fn test_first_violation_wins() {
        // An impossible range reports the lower bound
        let constraint = Constraint::new("test").with_min(10).with_max(5);
        assert!(matches!(
            validate(&Value::Int(7), &constraint),
            Err(ValidationError::BelowMin { .. })
        ));
    }

    #[test]
    fn test_uint_bounds() {
        let constraint = Constraint::new("test").with_min(10).with_max(100);
        assert!(validate(&Value::Uint(50), &constraint).is_ok());
        assert!(validate(&Value::Uint(5), &constraint).is_err());
        assert!(validate(&Value::Uint(u64::MAX), &constraint).is_err());
    }

    #[test]
    fn test_uint_negative_bound() {
        let constraint = Constraint::new("test").with_min(-1);
        assert_eq!(
            validate(&Value::Uint(3), &constraint),
            Err(ValidationError::NegativeBound(-1))
        );
    }

    #[test]
    fn test_float_bounds() {
        let constraint = Constraint::new("test").with_min(0).with_max(100);
        assert!(validate(&Value::Float(50.5), &constraint).is_ok());
        assert!(validate(&Value::Float(-1.5), &constraint).is_err());
        assert!(validate(&Value::Float(150.5), &constraint).is_err());
        assert!(validate(&Value::Float(100.0), &constraint).is_ok());
    }

    #[test]
    fn test_nan_fails_float_bounds() {
        let nan = crate::core::coerce(crate::core::Kind::F64, "NaN").unwrap();
        let bounded = Constraint::new("ratio").with_min(0).with_max(1);
        assert_eq!(validate(&nan, &bounded), Err(ValidationError::NotANumber));
        assert_eq!(
            validate(&nan, &Constraint::new("ratio").with_max(1)),
            Err(ValidationError::NotANumber)
        );
        assert!(validate(&nan, &Constraint::new("ratio")).is_ok());
    }

    #[test]
    fn test_duration_bounds_in_nanoseconds() {
        let constraint = Constraint::new("test").with_max(1_000_000_000);
        assert!(validate(&Value::Duration(Duration::from_secs(1)), &constraint).is_ok());
        let err = validate(&Value::Duration(Duration::from_secs(2)), &constraint).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AboveMax {
                value: "2s".to_string(),
                max: 1_000_000_000
            }
        );
    }

    #[test]
    fn test_unconstrained_and_bool() {
        let constraint = Constraint::new("test");
        assert!(validate(&string("any string"), &constraint).is_ok());
        assert!(validate(&Value::Int(12345), &constraint).is_ok());

        let bounded = Constraint::new("test").with_min(5).with_min_len(5);
        assert!(validate(&Value::Bool(true), &bounded).is_ok());
    }
}
