//! Merging of values that may disagree across source records.

use serde::{Deserialize, Serialize};

/// Categories that yield to any concrete value when records are merged.
pub const DEFAULT_ABSORBING_CATEGORIES: &[&str] = &["UNK", "OTHER"];

/// Outcome of reconciling several candidate values for one patient.
///
/// `Unresolved` is never a category of its own: callers must exclude it from
/// grouping instead of treating it as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution<T> {
    Resolved(T),
    Unresolved,
}

impl<T> Resolution<T> {
    pub fn resolved(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

/// Reconciles the categorical values recorded for one patient.
///
/// The first value is the running candidate. Repeats and absorbing values are
/// skipped, an absorbing candidate is replaced by the next concrete value, and
/// two distinct concrete values leave the patient unresolved. Returns `None`
/// when no value was recorded at all.
pub fn resolve_category<S: AsRef<str>>(
    values: &[S],
    absorbing: &[&str],
) -> Option<Resolution<String>> {
    let is_absorbing = |value: &str| absorbing.iter().any(|a| a.eq_ignore_ascii_case(value));
    let mut values = values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty());
    let mut candidate = values.next()?;
    for value in values {
        if value == candidate || is_absorbing(value) {
            continue;
        }
        if is_absorbing(candidate) {
            candidate = value;
        } else {
            return Some(Resolution::Unresolved);
        }
    }
    Some(Resolution::Resolved(candidate.to_string()))
}
