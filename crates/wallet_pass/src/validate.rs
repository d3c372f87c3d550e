use shared::{
    domain::CardProfile,
    error::{CardValidationError, ValidationIssue},
};

const MIN_CARD_NUMBER_LEN: usize = 10;

/// Checks everything a pass needs and reports all failures at once.
pub fn validate_card_data(profile: &CardProfile) -> Result<(), CardValidationError> {
    let mut issues = Vec::new();

    if profile.card_number.encode_utf16().count() < MIN_CARD_NUMBER_LEN {
        issues.push(ValidationIssue::CardNumber);
    }
    if profile.card_holder.trim().is_empty() {
        issues.push(ValidationIssue::CardHolder);
    }
    if !is_mm_yy(&profile.expiry_date) {
        issues.push(ValidationIssue::ExpiryDate);
    }
    if profile.card_type.is_blank() {
        issues.push(ValidationIssue::CardType);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CardValidationError::new(issues))
    }
}

/// Shape check only: two digits, a slash, two digits. `13/99` passes.
fn is_mm_yy(raw: &str) -> bool {
    matches!(
        raw.as_bytes(),
        [m1, m2, b'/', y1, y2] if [m1, m2, y1, y2].iter().all(|b| b.is_ascii_digit())
    )
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
