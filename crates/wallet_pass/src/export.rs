use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{domain::CardProfile, error::CardValidationError};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    pass::{apple_pass, google_pass, samsung_pass},
    qr::qr_payload,
    validate::validate_card_data,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Apple,
    Google,
    Samsung,
}

impl WalletKind {
    pub const ALL: [WalletKind; 3] = [WalletKind::Apple, WalletKind::Google, WalletKind::Samsung];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Google => "google",
            Self::Samsung => "samsung",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Apple => "Apple Wallet",
            Self::Google => "Google Wallet",
            Self::Samsung => "Samsung Pay",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Apple => "pkpass",
            Self::Google | Self::Samsung => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Apple => "application/vnd.apple.pkpass",
            Self::Google | Self::Samsung => "application/json",
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown wallet {0:?}; expected apple, google or samsung")]
pub struct WalletKindError(pub String);

impl FromStr for WalletKind {
    type Err = WalletKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lower = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| WalletKindError(raw.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] CardValidationError),
    #[error("failed to serialize {wallet} pass: {source}")]
    Serialize {
        wallet: WalletKind,
        source: serde_json::Error,
    },
    #[error("failed to write pass to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A serialized pass ready to be saved or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassDocument {
    pub wallet: WalletKind,
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

impl PassDocument {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        fs::create_dir_all(dir)
            .and_then(|()| fs::write(&path, &self.body))
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        info!(wallet = self.wallet.as_str(), path = %path.display(), "pass written");
        Ok(path)
    }
}

/// Validates the profile, then builds the wallet-specific document around a
/// fresh QR payload.
pub fn export_pass(
    wallet: WalletKind,
    profile: &CardProfile,
    now: DateTime<Utc>,
) -> Result<PassDocument, ExportError> {
    if let Err(error) = validate_card_data(profile) {
        warn!(wallet = wallet.as_str(), issues = ?error.messages(), "card data validation failed");
        return Err(error.into());
    }

    let serialize_error = |source| ExportError::Serialize { wallet, source };
    let qr_data = qr_payload(profile, now).map_err(serialize_error)?;
    let body = match wallet {
        WalletKind::Apple => serde_json::to_string(&apple_pass(profile, &qr_data, now)),
        WalletKind::Google => serde_json::to_string(&google_pass(profile, &qr_data, now)),
        WalletKind::Samsung => serde_json::to_string(&samsung_pass(profile, &qr_data)),
    }
    .map_err(serialize_error)?;

    Ok(PassDocument {
        wallet,
        filename: format!("smartcard-{}.{}", now.timestamp_millis(), wallet.extension()),
        content_type: wallet.content_type(),
        body,
    })
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
