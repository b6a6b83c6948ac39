//! Rule domain type
//!
//! A rule pairs a boolean condition over event fields with an action descriptor.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored condition/action pair
///
/// The `id` is immutable once the rule is registered; updates replace
/// `condition` and `action` in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier
    pub id: String,
    /// Boolean expression over event field names, e.g. `temp > 40`
    pub condition: String,
    /// Action descriptor, e.g. `alert('High Temp')`
    pub action: String,
}

impl Rule {
    /// Create a new rule
    pub fn new(
        id: impl Into<String>,
        condition: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            condition: condition.into(),
            action: action.into(),
        }
    }

    /// Create a rule with a freshly generated id
    pub fn with_generated_id(condition: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(generate_id(), condition, action)
    }

    /// Check that every persisted field is populated
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        if self.condition.trim().is_empty() {
            return Err(ValidationError::EmptyField("condition"));
        }
        if self.action.trim().is_empty() {
            return Err(ValidationError::EmptyField("action"));
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] if {} then {}", self.id, self.condition, self.action)
    }
}

/// Generate a new unique rule id
pub fn generate_id() -> String {
    format!("rule-{}", uuid::Uuid::new_v4().simple())
}
