//! Per-field input validation.
//!
//! Values outside a field's inclusive range are rejected outright. Nothing here
//! rounds or clamps: the number returned on success is the number parsed.

use crate::domain::Field;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: '{raw}' is not a number")]
    NotANumber { field: Field, raw: String },

    #[error("{field}: {got} is outside [{min}, {max}]")]
    OutOfRange { field: Field, min: f64, max: f64, got: f64 },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::NotANumber { field, .. } | ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Parse `raw` as a decimal number and range-check it for `field`.
pub fn validate(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    // `f64::from_str` accepts "NaN" and "inf"; neither is a usable measurement.
    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            raw: trimmed.to_string(),
        })?;
    validate_value(field, value)
}

/// Range-check an already-numeric value for `field`.
pub fn validate_value(field: Field, value: f64) -> Result<f64, ValidationError> {
    let spec = field.spec();
    // Written so NaN fails the check as well.
    if value >= spec.min && value <= spec.max {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: spec.min,
            max: spec.max,
            got: value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ac_above_max_is_out_of_range() {
        let err = validate(Field::Ac, "9").unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: Field::Ac,
                min: 3.0,
                max: 8.0,
                got: 9.0
            }
        );
    }

    #[test]
    fn letters_are_not_a_number() {
        let err = validate(Field::RapPercent, "abc").unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: Field::RapPercent, .. }));
    }

    #[test]
    fn non_finite_and_empty_are_not_a_number() {
        for raw in ["", "  ", "NaN", "inf", "-infinity", "5,0"] {
            assert!(
                matches!(validate(Field::Ac, raw), Err(ValidationError::NotANumber { .. })),
                "{raw:?} should be rejected as NotANumber"
            );
        }
    }

    #[test]
    fn boundaries_are_accepted() {
        for field in Field::ALL {
            assert_eq!(validate_value(field, field.min()), Ok(field.min()));
            assert_eq!(validate_value(field, field.max()), Ok(field.max()));
        }
    }

    #[test]
    fn values_are_returned_unrounded() {
        assert_eq!(validate(Field::Gsb, " 2.6512345 "), Ok(2.6512345));
        assert_eq!(validate(Field::Pass0_075, "2e0"), Ok(2.0));
    }

    #[test]
    fn just_outside_is_rejected_not_clamped() {
        let below = validate_value(Field::Pass19, 89.999).unwrap_err();
        assert_eq!(below.field(), Field::Pass19);
        assert!(validate_value(Field::RapPercent, -0.1).is_err());
        assert!(validate_value(Field::Gsb, 3.0001).is_err());
    }
}
