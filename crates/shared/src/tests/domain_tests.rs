use super::*;

#[test]
fn default_profile_matches_demo_card() {
    let profile = CardProfile::default();
    assert_eq!(profile.card_number, "1234-5678-9012-3456");
    assert_eq!(profile.card_type, CardType::Visa);
    assert_eq!(profile.formatted_balance(), "USD 2500.00");
}

#[test]
fn card_type_round_trips_unknown_brands() {
    let parsed: CardType = serde_json::from_str("\"AMEX\"").expect("card type");
    assert_eq!(parsed, CardType::Other("AMEX".into()));
    assert_eq!(serde_json::to_string(&parsed).expect("json"), "\"AMEX\"");

    let metro: CardType = serde_json::from_str("\"METRO\"").expect("card type");
    assert_eq!(metro, CardType::Metro);
    assert!(CardType::from("  ").is_blank());
}

#[test]
fn display_number_groups_digit_runs() {
    let mut profile = CardProfile::default();
    profile.card_number = "4111111111111111".into();
    assert_eq!(profile.display_number(), "4111 1111 1111 1111");

    profile.card_number = "TRV-2026-042-007".into();
    assert_eq!(profile.display_number(), "TRV-2026 -042-007");
}

#[test]
fn has_zone_is_false_without_zone_list() {
    let mut profile = CardProfile::default();
    assert!(!profile.has_zone("A"));

    profile.valid_zones = Some(vec!["A".into(), "C".into()]);
    assert!(profile.has_zone("C"));
    assert!(!profile.has_zone("B"));
}

#[test]
fn apply_only_overwrites_present_fields() {
    let mut profile = CardProfile::default();
    profile.apply(ProfileUpdate {
        card_holder: Some("JANE ROE".into()),
        balance: Some(12.5),
        valid_zones: Some(vec!["B".into()]),
        ..ProfileUpdate::default()
    });

    assert_eq!(profile.card_holder, "JANE ROE");
    assert_eq!(profile.balance, 12.5);
    assert_eq!(profile.card_number, "1234-5678-9012-3456");
    assert_eq!(profile.cvv.as_deref(), Some("123"));
    assert!(profile.has_zone("B"));
}

#[test]
fn profile_uses_camel_case_wire_names() {
    let value = serde_json::to_value(CardProfile::default()).expect("json");
    assert_eq!(value["cardHolder"], "JOHN DOE");
    assert_eq!(value["expiryDate"], "12/25");
    assert!(value.get("validZones").is_none());
}
