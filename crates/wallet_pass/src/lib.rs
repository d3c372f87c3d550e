//! Card-data validation and mock wallet pass export.

pub mod export;
pub mod pass;
pub mod qr;
pub mod validate;

pub use export::{export_pass, ExportError, PassDocument, WalletKind, WalletKindError};
pub use qr::{qr_payload, qr_placeholder_svg};
pub use validate::validate_card_data;
