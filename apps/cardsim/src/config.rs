use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use card_core::DEFAULT_SIMULATION_INTERVAL;
use shared::domain::{CardProfile, ProfileUpdate};

pub const DEFAULT_CONFIG_FILE: &str = "cardsim.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub simulation_interval_ms: u64,
    pub export_dir: PathBuf,
    pub seed: Option<u64>,
    pub profile_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation_interval_ms: DEFAULT_SIMULATION_INTERVAL.as_millis() as u64,
            export_dir: "./passes".into(),
            seed: None,
            profile_path: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms.max(1))
    }
}

pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Unknown keys and values of the wrong type are ignored.
fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(table) = toml::from_str::<toml::Table>(raw) else {
        return;
    };

    if let Some(v) = table
        .get("simulation_interval_ms")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
    {
        settings.simulation_interval_ms = v;
    }
    if let Some(v) = table.get("export_dir").and_then(toml::Value::as_str) {
        settings.export_dir = v.into();
    }
    if let Some(v) = table
        .get("seed")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
    {
        settings.seed = Some(v);
    }
    if let Some(v) = table.get("profile_path").and_then(toml::Value::as_str) {
        settings.profile_path = Some(v.into());
    }
    if let Some(v) = table.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CARDSIM__SIMULATION_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.simulation_interval_ms = parsed;
        }
    }
    if let Some(v) = lookup("CARDSIM__EXPORT_DIR") {
        settings.export_dir = v.into();
    }
    if let Some(v) = lookup("CARDSIM__SEED") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.seed = Some(parsed);
        }
    }
    if let Some(v) = lookup("CARDSIM__PROFILE") {
        settings.profile_path = Some(v.into());
    }
    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
}

/// Reads a JSON profile edit. Missing fields keep the demo card's values.
pub fn load_profile_update(path: &Path) -> anyhow::Result<ProfileUpdate> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read card profile '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse card profile '{}'", path.display()))
}

pub fn load_profile(path: Option<&Path>) -> anyhow::Result<CardProfile> {
    let mut profile = CardProfile::default();
    if let Some(path) = path {
        profile.apply(load_profile_update(path)?);
    }
    Ok(profile)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
