use std::collections::HashMap;

use super::*;

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
simulation_interval_ms = 500
export_dir = "/tmp/passes"
seed = 42
log_filter = "debug"
"#,
    );

    assert_eq!(settings.simulation_interval_ms, 500);
    assert_eq!(settings.export_dir, PathBuf::from("/tmp/passes"));
    assert_eq!(settings.seed, Some(42));
    assert_eq!(settings.profile_path, None);
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn malformed_file_and_wrong_types_are_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "this is not toml = = =");
    assert_eq!(settings, Settings::default());

    apply_file(&mut settings, "simulation_interval_ms = \"fast\"\nseed = -1");
    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_file() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("CARDSIM__SIMULATION_INTERVAL_MS", "1000"),
        ("CARDSIM__SEED", "not-a-number"),
        ("CARDSIM__PROFILE", "card.json"),
    ]);
    let mut settings = Settings::default();
    apply_file(&mut settings, "seed = 5\nsimulation_interval_ms = 250");
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.simulation_interval_ms, 1000);
    assert_eq!(settings.seed, Some(5));
    assert_eq!(settings.profile_path, Some(PathBuf::from("card.json")));
}

#[test]
fn zero_interval_is_clamped() {
    let settings = Settings {
        simulation_interval_ms: 0,
        ..Settings::default()
    };
    assert_eq!(settings.simulation_interval(), Duration::from_millis(1));
}

#[test]
fn profile_file_merges_over_demo_card() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("card.json");
    fs::write(
        &path,
        r#"{"cardType":"METRO","balance":12.5,"validZones":["A","B"]}"#,
    )
    .expect("write profile");

    let profile = load_profile(Some(&path)).expect("profile");
    assert_eq!(profile.card_type.as_str(), "METRO");
    assert_eq!(profile.balance, 12.5);
    assert!(profile.has_zone("B"));
    assert_eq!(profile.card_holder, "JOHN DOE");
}

#[test]
fn unreadable_profile_reports_path() {
    let error = load_profile(Some(Path::new("/definitely/missing/card.json")))
        .expect_err("missing file");
    assert!(error.to_string().contains("/definitely/missing/card.json"));
}
