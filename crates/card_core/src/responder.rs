//! Canned APDU-style responses for the simulated card.

use std::fmt;

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use shared::{
    domain::CardProfile,
    protocol::{CardRecord, ResponsePayload, SimulatedRequest, SimulatedResponse},
};
use tracing::debug;

pub const SELECT_AID: &str = "A0000002471001";
pub const DEFAULT_FARE: f64 = 2.50;
pub const PIN_ATTEMPTS: u8 = 3;
const POINTS_PER_UNIT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardCommand {
    Select,
    GetChallenge,
    VerifyPin,
    ReadRecord,
    GetBalance,
    CheckZone,
    DeductFare,
}

impl CardCommand {
    pub const ALL: [CardCommand; 7] = [
        CardCommand::Select,
        CardCommand::GetChallenge,
        CardCommand::VerifyPin,
        CardCommand::ReadRecord,
        CardCommand::GetBalance,
        CardCommand::CheckZone,
        CardCommand::DeductFare,
    ];

    /// Exact, case-sensitive match on the wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::GetChallenge => "GET_CHALLENGE",
            Self::VerifyPin => "VERIFY_PIN",
            Self::ReadRecord => "READ_RECORD",
            Self::GetBalance => "GET_BALANCE",
            Self::CheckZone => "CHECK_ZONE",
            Self::DeductFare => "DEDUCT_FARE",
        }
    }
}

impl fmt::Display for CardCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps requests to responses. Only the challenge bytes and transaction ids
/// depend on the random source; everything else is a function of the inputs.
pub struct CommandResponder<R = StdRng> {
    rng: R,
}

impl CommandResponder<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for CommandResponder<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> CommandResponder<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn respond(
        &mut self,
        request: &SimulatedRequest,
        profile: &CardProfile,
    ) -> SimulatedResponse {
        let Some(command) = CardCommand::parse(&request.command) else {
            debug!(command = %request.command, "unsupported card command");
            return SimulatedResponse::unsupported();
        };

        let payload = match command {
            CardCommand::Select => ResponsePayload::Select {
                aid: SELECT_AID.to_string(),
                card_type: profile.card_type.clone(),
                card_number: profile.card_number.clone(),
            },
            CardCommand::GetChallenge => {
                let mut challenge = [0u8; 8];
                self.rng.fill_bytes(&mut challenge);
                ResponsePayload::Challenge { challenge }
            }
            CardCommand::VerifyPin => ResponsePayload::PinVerification {
                verified: true,
                attempts_left: PIN_ATTEMPTS,
            },
            CardCommand::ReadRecord => ResponsePayload::Record {
                record: CardRecord {
                    card_holder: profile.card_holder.clone(),
                    expiry_date: profile.expiry_date.clone(),
                    balance: profile.balance,
                    currency: profile.currency.clone(),
                    travel_points: profile.travel_points,
                    membership_level: profile.membership_level,
                    valid_zones: profile.valid_zones.clone(),
                    last_used: profile.last_used,
                },
            },
            CardCommand::GetBalance => ResponsePayload::Balance {
                balance: profile.balance,
                currency: profile.currency.clone(),
            },
            CardCommand::CheckZone => ResponsePayload::Zone {
                zone: request.zone.clone(),
                zone_valid: request
                    .zone
                    .as_deref()
                    .is_some_and(|zone| profile.has_zone(zone)),
            },
            CardCommand::DeductFare => {
                let fare_amount = request.amount.unwrap_or(DEFAULT_FARE);
                ResponsePayload::FareDeduction {
                    fare_amount,
                    new_balance: (profile.balance - fare_amount).max(0.0),
                    points_earned: (fare_amount * POINTS_PER_UNIT).floor() as i64,
                    transaction_id: self.transaction_id(),
                }
            }
        };

        debug!(%command, "card command answered");
        SimulatedResponse::success(payload)
    }

    fn transaction_id(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.gen();
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        format!("TXN-{}", id.simple().to_string().to_uppercase())
    }
}

#[cfg(test)]
#[path = "tests/responder_tests.rs"]
mod tests;
