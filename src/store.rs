//! The parameter store: the single source of truth for the form and the chart.

use crate::domain::{Field, ParameterSet};
use crate::validate::{ValidationError, validate, validate_value};

/// Holds the current, fully validated `ParameterSet`.
///
/// `set`/`set_value` are the only mutators. A rejected update returns the error
/// and leaves the whole set untouched.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    current: ParameterSet,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot (a copy; later edits do not affect it).
    pub fn get(&self) -> ParameterSet {
        self.current
    }

    /// Validate raw user input for `field` and commit it.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<ParameterSet, ValidationError> {
        let value = validate(field, raw)?;
        Ok(self.commit(field, value))
    }

    /// Validate a numeric value for `field` and commit it.
    pub fn set_value(&mut self, field: Field, value: f64) -> Result<ParameterSet, ValidationError> {
        let value = validate_value(field, value)?;
        Ok(self.commit(field, value))
    }

    /// Move `field` by `steps` increments of its step size.
    ///
    /// The target goes through the validator like any other edit, so stepping
    /// past a bound is rejected rather than pinned to it.
    pub fn step(&mut self, field: Field, steps: i32) -> Result<ParameterSet, ValidationError> {
        let precision = field.display_precision() as i32;
        let target = self.current.get(field) + field.step() * f64::from(steps);
        // Snap away float drift so repeated stepping lands on clean decimals.
        let scale = 10f64.powi(precision);
        self.set_value(field, (target * scale).round() / scale)
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) -> ParameterSet {
        self.current = ParameterSet::defaults();
        self.current
    }

    fn commit(&mut self, field: Field, value: f64) -> ParameterSet {
        self.current = self.current.with(field, value);
        tracing::trace!(field = field.key(), value, "parameter committed");
        self.current
    }
}
