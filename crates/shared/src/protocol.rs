use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{CardType, MembershipLevel};

/// Two-byte ISO 7816 style status word, carried on the wire as four hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord(pub u16);

impl StatusWord {
    pub const SUCCESS: StatusWord = StatusWord(0x9000);
    pub const UNSUPPORTED: StatusWord = StatusWord(0x6F00);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl Serialize for StatusWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.len() != 4 {
            return Err(de::Error::custom(format!(
                "status word must be 4 hex digits, got {raw:?}"
            )));
        }
        u16::from_str_radix(&raw, 16)
            .map(StatusWord)
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl SimulatedRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedResponse {
    pub status: StatusWord,
    pub data: ResponsePayload,
}

impl SimulatedResponse {
    pub fn success(data: ResponsePayload) -> Self {
        Self {
            status: StatusWord::SUCCESS,
            data,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            status: StatusWord::UNSUPPORTED,
            data: ResponsePayload::Error {
                error: UNSUPPORTED_COMMAND.to_string(),
            },
        }
    }
}

pub const UNSUPPORTED_COMMAND: &str = "Command not supported";

/// Response body; the variant is implied by the command, so it is encoded untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ResponsePayload {
    Select {
        aid: String,
        card_type: CardType,
        card_number: String,
    },
    Challenge {
        challenge: [u8; 8],
    },
    PinVerification {
        verified: bool,
        attempts_left: u8,
    },
    Record {
        record: CardRecord,
    },
    FareDeduction {
        fare_amount: f64,
        new_balance: f64,
        points_earned: i64,
        transaction_id: String,
    },
    Zone {
        zone: Option<String>,
        zone_valid: bool,
    },
    Balance {
        balance: f64,
        currency: String,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub card_holder: String,
    pub expiry_date: String,
    pub balance: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_level: Option<MembershipLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_zones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<NaiveDate>,
}

/// One NDEF record after decoding; `data` is text, a URL, or space separated hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdefRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
}

pub const COMMAND_RECORD_TYPE: &str = "command";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcReading {
    pub timestamp: DateTime<Utc>,
    pub records: Vec<NdefRecord>,
    pub serial_number: String,
}

impl NfcReading {
    /// The request carried by the first `command` record, if it parses.
    pub fn command_request(&self) -> Option<SimulatedRequest> {
        self.records
            .iter()
            .find(|record| record.record_type == COMMAND_RECORD_TYPE)
            .and_then(|record| serde_json::from_str(&record.data).ok())
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
