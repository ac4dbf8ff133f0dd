use crate::domain::errors::{FieldViolation, ValidationError, ViolationReason};
use crate::domain::ml::feature_registry::{FEATURE_BOUNDS, FEATURE_COUNT};
use crate::domain::ml::types::FeatureRow;
use serde_json::Value;
use tracing::debug;

/// Validator for raw patient records against the feature schema.
///
/// Accepts JSON numbers, or strings holding a number. Unknown keys are ignored.
/// Missing fields are violations, never defaulted; out-of-range values are
/// rejected, never clamped.
pub struct FeatureValidator;

impl FeatureValidator {
    /// Validates one record, reporting every violated field.
    pub fn validate_record(record: &Value) -> Result<FeatureRow, ValidationError> {
        Self::collect_record(record).map_err(ValidationError::new)
    }

    /// Validates every record of a batch.
    ///
    /// Violations are accumulated across all rows and tagged with their row index,
    /// so the caller sees the whole picture in one round trip.
    pub fn validate_batch(records: &[Value]) -> Result<Vec<FeatureRow>, ValidationError> {
        let mut rows = Vec::with_capacity(records.len());
        let mut violations = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            match Self::collect_record(record) {
                Ok(row) => rows.push(row),
                Err(found) => violations.extend(found.into_iter().map(|v| v.at_row(idx))),
            }
        }

        if violations.is_empty() {
            Ok(rows)
        } else {
            debug!(
                "Batch validation FAILED: {} violation(s) across {} row(s)",
                violations.len(),
                records.len()
            );
            Err(ValidationError::new(violations))
        }
    }

    fn collect_record(record: &Value) -> Result<FeatureRow, Vec<FieldViolation>> {
        let Some(object) = record.as_object() else {
            return Err(vec![FieldViolation::new(
                "record",
                ViolationReason::NotAnObject,
            )]);
        };

        let mut values = [0.0; FEATURE_COUNT];
        let mut violations = Vec::new();

        for (slot, bound) in values.iter_mut().zip(FEATURE_BOUNDS.iter()) {
            let checked = match object.get(bound.name) {
                None => Err(ViolationReason::Missing),
                Some(raw) => parse_numeric(raw).and_then(|v| bound.check(v)),
            };
            match checked {
                Ok(value) => *slot = value,
                Err(reason) => violations.push(FieldViolation::new(bound.name, reason)),
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        FeatureRow::new(values).map_err(ValidationError::into_violations)
    }
}

fn parse_numeric(raw: &Value) -> Result<f64, ViolationReason> {
    match raw {
        Value::Number(n) => n.as_f64().ok_or(ViolationReason::NotNumeric),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ViolationReason::NotNumeric),
        _ => Err(ViolationReason::NotNumeric),
    }
}
