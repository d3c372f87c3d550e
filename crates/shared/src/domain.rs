use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Card brand or transit product. Unknown brands round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardType {
    Visa,
    Travel,
    Metro,
    Bus,
    Train,
    Other(String),
}

impl CardType {
    pub const TRANSIT: [CardType; 4] = [
        CardType::Travel,
        CardType::Metro,
        CardType::Bus,
        CardType::Train,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Visa => "VISA",
            Self::Travel => "TRAVEL",
            Self::Metro => "METRO",
            Self::Bus => "BUS",
            Self::Train => "TRAIN",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl From<String> for CardType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "VISA" => Self::Visa,
            "TRAVEL" => Self::Travel,
            "METRO" => Self::Metro,
            "BUS" => Self::Bus,
            "TRAIN" => Self::Train,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for CardType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CardType> for String {
    fn from(value: CardType) -> Self {
        match value {
            CardType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl MembershipLevel {
    pub const ALL: [MembershipLevel; 4] = [
        MembershipLevel::Bronze,
        MembershipLevel::Silver,
        MembershipLevel::Gold,
        MembershipLevel::Platinum,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProfile {
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String,
    pub card_type: CardType,
    pub balance: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_level: Option<MembershipLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_zones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<NaiveDate>,
}

impl Default for CardProfile {
    fn default() -> Self {
        Self {
            card_number: "1234-5678-9012-3456".into(),
            card_holder: "JOHN DOE".into(),
            expiry_date: "12/25".into(),
            card_type: CardType::Visa,
            balance: 2500.00,
            currency: "USD".into(),
            cvv: Some("123".into()),
            travel_points: None,
            membership_level: None,
            valid_zones: None,
            last_used: None,
        }
    }
}

impl CardProfile {
    /// Groups every run of four digits, e.g. `4111111111111111` -> `4111 1111 1111 1111`.
    pub fn display_number(&self) -> String {
        let mut out = String::with_capacity(self.card_number.len() + 4);
        let mut run = 0;
        for ch in self.card_number.chars() {
            if ch.is_ascii_digit() {
                out.push(ch);
                run += 1;
                if run == 4 {
                    out.push(' ');
                    run = 0;
                }
            } else {
                out.push(ch);
                run = 0;
            }
        }
        out.trim().to_string()
    }

    pub fn formatted_balance(&self) -> String {
        format!("{} {:.2}", self.currency, self.balance)
    }

    pub fn has_zone(&self, zone: &str) -> bool {
        self.valid_zones
            .as_deref()
            .is_some_and(|zones| zones.iter().any(|z| z == zone))
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            card_number,
            card_holder,
            expiry_date,
            card_type,
            balance,
            currency,
            cvv,
            travel_points,
            membership_level,
            valid_zones,
            last_used,
        } = update;

        if let Some(v) = card_number {
            self.card_number = v;
        }
        if let Some(v) = card_holder {
            self.card_holder = v;
        }
        if let Some(v) = expiry_date {
            self.expiry_date = v;
        }
        if let Some(v) = card_type {
            self.card_type = v;
        }
        if let Some(v) = balance {
            self.balance = v;
        }
        if let Some(v) = currency {
            self.currency = v;
        }
        if cvv.is_some() {
            self.cvv = cvv;
        }
        if travel_points.is_some() {
            self.travel_points = travel_points;
        }
        if membership_level.is_some() {
            self.membership_level = membership_level;
        }
        if valid_zones.is_some() {
            self.valid_zones = valid_zones;
        }
        if last_used.is_some() {
            self.last_used = last_used;
        }
    }
}

/// Partial profile edit; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub card_holder: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub card_type: Option<CardType>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub cvv: Option<String>,
    #[serde(default)]
    pub travel_points: Option<u32>,
    #[serde(default)]
    pub membership_level: Option<MembershipLevel>,
    #[serde(default)]
    pub valid_zones: Option<Vec<String>>,
    #[serde(default)]
    pub last_used: Option<NaiveDate>,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
