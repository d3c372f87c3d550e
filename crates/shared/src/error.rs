use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("Invalid card number")]
    CardNumber,
    #[error("Card holder name is required")]
    CardHolder,
    #[error("Invalid expiry date format (MM/YY)")]
    ExpiryDate,
    #[error("Card type is required")]
    CardType,
}

/// Every problem found in a card profile, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("card data validation failed: {}", messages(.issues).join("; "))]
pub struct CardValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl CardValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn messages(&self) -> Vec<String> {
        messages(&self.issues)
    }
}

fn messages(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}
