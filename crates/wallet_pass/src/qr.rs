use std::fmt::Write as _;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::{CardProfile, CardType};

const QR_SIZE: usize = 128;
const QR_CELL: usize = 4;
const QR_CELLS: usize = QR_SIZE / QR_CELL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCardInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String,
    pub card_type: CardType,
    pub balance: f64,
    pub currency: String,
    pub timestamp: i64,
}

impl QrCardInfo {
    pub fn new(profile: &CardProfile, now: DateTime<Utc>) -> Self {
        Self {
            kind: "payment_card".into(),
            card_number: profile.card_number.clone(),
            card_holder: profile.card_holder.clone(),
            expiry_date: profile.expiry_date.clone(),
            card_type: profile.card_type.clone(),
            balance: profile.balance,
            currency: profile.currency.clone(),
            timestamp: now.timestamp_millis(),
        }
    }
}

/// The string embedded in every pass barcode.
pub fn qr_payload(profile: &CardProfile, now: DateTime<Utc>) -> serde_json::Result<String> {
    serde_json::to_string(&QrCardInfo::new(profile, now))
}

/// Not a scannable code: a deterministic checker pattern derived from the
/// payload, for preview only. Returned as a base64 `data:` URL.
pub fn qr_placeholder_svg(data: &str) -> String {
    let units: Vec<u16> = data.encode_utf16().collect();

    let mut svg = format!(
        r#"<svg width="{QR_SIZE}" height="{QR_SIZE}" xmlns="http://www.w3.org/2000/svg"><rect width="{QR_SIZE}" height="{QR_SIZE}" fill="white"/>"#
    );
    if !units.is_empty() {
        for i in 0..QR_CELLS {
            for j in 0..QR_CELLS {
                if units[(i * QR_CELLS + j) % units.len()] % 2 == 0 {
                    let _ = write!(
                        svg,
                        r#"<rect x="{}" y="{}" width="{QR_CELL}" height="{QR_CELL}" fill="black"/>"#,
                        i * QR_CELL,
                        j * QR_CELL
                    );
                }
            }
        }
    }
    svg.push_str("</svg>");

    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}
