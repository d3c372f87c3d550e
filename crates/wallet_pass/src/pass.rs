//! Wallet pass documents. These are the shapes each wallet expects, but they
//! are never signed, so no wallet will actually import them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::CardProfile;

pub const APPLE_PASS_TYPE_ID: &str = "pass.com.smartcard.simulator";
pub const APPLE_TEAM_ID: &str = "TEAM123456";
pub const ORGANIZATION_NAME: &str = "Smart Card Simulator";
const GOOGLE_LANGUAGE: &str = "en-US";
const GOOGLE_BACKGROUND: &str = "#4285f4";
const GOOGLE_LOGO_URI: &str = "https://smartcard-simulator.com/logo.png";

pub fn pass_serial(now: DateTime<Utc>) -> String {
    format!("card-{}", now.timestamp_millis())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePass {
    pub format_version: u8,
    pub pass_type_identifier: String,
    pub serial_number: String,
    pub team_identifier: String,
    pub organization_name: String,
    pub description: String,
    pub generic: AppleFieldSet,
    pub barcodes: Vec<AppleBarcode>,
    pub locations: Vec<AppleLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleFieldSet {
    pub primary_fields: Vec<AppleField>,
    pub secondary_fields: Vec<AppleField>,
    pub auxiliary_fields: Vec<AppleField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppleField {
    pub key: String,
    pub label: String,
    pub value: String,
}

impl AppleField {
    fn new(key: &str, label: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleBarcode {
    pub format: String,
    pub message: String,
    pub message_encoding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleLocation {
    pub longitude: f64,
    pub latitude: f64,
    pub relevant_text: String,
}

pub fn apple_pass(profile: &CardProfile, qr_data: &str, now: DateTime<Utc>) -> ApplePass {
    ApplePass {
        format_version: 1,
        pass_type_identifier: APPLE_PASS_TYPE_ID.into(),
        serial_number: pass_serial(now),
        team_identifier: APPLE_TEAM_ID.into(),
        organization_name: ORGANIZATION_NAME.into(),
        description: "Digital Payment Card".into(),
        generic: AppleFieldSet {
            primary_fields: vec![AppleField::new(
                "cardNumber",
                "CARD NUMBER",
                &profile.card_number,
            )],
            secondary_fields: vec![
                AppleField::new("cardHolder", "CARD HOLDER", &profile.card_holder),
                AppleField::new("expiryDate", "EXPIRES", &profile.expiry_date),
            ],
            auxiliary_fields: vec![
                AppleField::new("balance", "BALANCE", profile.formatted_balance()),
                AppleField::new("cardType", "CARD TYPE", profile.card_type.as_str()),
            ],
        },
        barcodes: vec![AppleBarcode {
            format: "PKBarcodeFormatQR".into(),
            message: qr_data.into(),
            message_encoding: "utf-8".into(),
        }],
        locations: vec![AppleLocation {
            longitude: -122.374,
            latitude: 37.618,
            relevant_text: "Use this card for payments".into(),
        }],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePass {
    pub generic_objects: Vec<GoogleGenericObject>,
    pub barcode: GoogleBarcode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenericObject {
    pub id: String,
    pub card_title: LocalizedString,
    pub subheader: LocalizedString,
    pub header: LocalizedString,
    pub hex_background_color: String,
    pub logo: GoogleImage,
    pub text_modules_data: Vec<GoogleTextModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    pub default_value: TranslatedString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedString {
    pub language: String,
    pub value: String,
}

impl LocalizedString {
    fn en(value: impl Into<String>) -> Self {
        Self {
            default_value: TranslatedString {
                language: GOOGLE_LANGUAGE.into(),
                value: value.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleImage {
    pub source_uri: GoogleUri,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleUri {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleTextModule {
    pub header: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleBarcode {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

pub fn google_pass(profile: &CardProfile, qr_data: &str, now: DateTime<Utc>) -> GooglePass {
    GooglePass {
        generic_objects: vec![GoogleGenericObject {
            id: pass_serial(now),
            card_title: LocalizedString::en(format!("{} Payment Card", profile.card_type)),
            subheader: LocalizedString::en(&profile.card_number),
            header: LocalizedString::en(&profile.card_holder),
            hex_background_color: GOOGLE_BACKGROUND.into(),
            logo: GoogleImage {
                source_uri: GoogleUri {
                    uri: GOOGLE_LOGO_URI.into(),
                },
            },
            text_modules_data: vec![
                GoogleTextModule {
                    header: "Balance".into(),
                    body: profile.formatted_balance(),
                },
                GoogleTextModule {
                    header: "Expires".into(),
                    body: profile.expiry_date.clone(),
                },
            ],
        }],
        barcode: GoogleBarcode {
            kind: "QR_CODE".into(),
            value: qr_data.into(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamsungPass {
    pub card_type: String,
    pub card_number: String,
    pub card_holder_name: String,
    pub expiry_date: String,
    pub card_brand: String,
    pub balance: f64,
    pub currency: String,
    pub qr_code: String,
}

pub fn samsung_pass(profile: &CardProfile, qr_data: &str) -> SamsungPass {
    SamsungPass {
        card_type: "PAYMENT_CARD".into(),
        card_number: profile.card_number.clone(),
        card_holder_name: profile.card_holder.clone(),
        expiry_date: profile.expiry_date.clone(),
        card_brand: profile.card_type.to_string(),
        balance: profile.balance,
        currency: profile.currency.clone(),
        qr_code: qr_data.into(),
    }
}

#[cfg(test)]
#[path = "tests/pass_tests.rs"]
mod tests;
