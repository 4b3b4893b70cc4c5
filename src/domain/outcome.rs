use super::error::ValidationError;

/// Accumulated result of validating one item
///
/// Starts valid and turns invalid permanently on the first recorded error.
/// Only field scopes inside the engine can append; once handed to the
/// caller an outcome is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    errors: Vec<ValidationError>,
    valid: bool,
}

impl ValidationOutcome {
    /// Create an empty, valid outcome
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            valid: true,
        }
    }

    /// Errors in the order their checks ran
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// True iff no check has failed
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of failed checks
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Codes of the failed checks that carry one, in check order
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.errors.iter().filter_map(ValidationError::code)
    }

    /// Consume the outcome and return its errors
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    // Append-only: nothing resets `valid` to true
    pub(crate) fn record(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }
}

impl Default for ValidationOutcome {
    fn default() -> Self {
        Self::new()
    }
}

/// An outcome tied back to the input item it was produced for
///
/// `seq` is the item's 1-based position in the combined input, counting
/// items the error policy skipped. Under strategies that reorder or drop
/// work it is the only link between an outcome and its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedOutcome {
    pub seq: u64,
    pub outcome: ValidationOutcome,
}

impl SequencedOutcome {
    pub fn new(seq: u64, outcome: ValidationOutcome) -> Self {
        Self { seq, outcome }
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }
}
