use shared::domain::CardType;

use super::*;

#[test]
fn default_profile_is_valid() {
    assert_eq!(validate_card_data(&CardProfile::default()), Ok(()));
}

#[test]
fn every_failure_is_reported_together() {
    let profile = CardProfile {
        card_number: "123".into(),
        card_holder: "   ".into(),
        expiry_date: "1/25".into(),
        card_type: CardType::from(""),
        ..CardProfile::default()
    };

    let error = validate_card_data(&profile).expect_err("invalid profile");
    assert_eq!(
        error.messages(),
        vec![
            "Invalid card number",
            "Card holder name is required",
            "Invalid expiry date format (MM/YY)",
            "Card type is required",
        ]
    );
}

#[test]
fn card_number_needs_ten_characters() {
    let mut profile = CardProfile::default();
    profile.card_number = "123456789".into();
    assert_eq!(
        validate_card_data(&profile).expect_err("short").issues,
        vec![ValidationIssue::CardNumber]
    );

    profile.card_number = "1234567890".into();
    assert!(validate_card_data(&profile).is_ok());
}

#[test]
fn card_number_length_counts_utf16_units() {
    let mut profile = CardProfile::default();
    // Five mathematical digits, each a surrogate pair.
    profile.card_number = "\u{1D7CF}".repeat(5);
    assert!(validate_card_data(&profile).is_ok());

    profile.card_number = "\u{1D7CF}".repeat(4) + "1";
    assert_eq!(
        validate_card_data(&profile).expect_err("nine units").issues,
        vec![ValidationIssue::CardNumber]
    );
}

#[test]
fn expiry_must_be_two_digits_slash_two_digits() {
    for good in ["12/25", "01/30", "99/99"] {
        assert!(is_mm_yy(good), "{good}");
    }
    for bad in ["", "12-25", "1/25", "12/2025", "ab/cd", " 12/25", "12/25 "] {
        assert!(!is_mm_yy(bad), "{bad:?}");
    }
}
