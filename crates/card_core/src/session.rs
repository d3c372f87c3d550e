use rand::RngCore;
use serde::Serialize;
use shared::{
    domain::{CardProfile, ProfileUpdate},
    protocol::{NfcReading, SimulatedRequest, SimulatedResponse},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    activity_log::{ActivityLog, LogKind},
    responder::CommandResponder,
};

pub const SESSION_QUEUE_CAPACITY: usize = 64;

/// Everything that may change session state. Producers only ever send these;
/// the session task applies them one at a time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Read(NfcReading),
    UpdateProfile(ProfileUpdate),
    ToggleSimulation,
    Log { message: String, kind: LogKind },
}

/// Single owner of the card profile, the activity log and the responder.
pub struct CardSession<R = rand::rngs::StdRng> {
    profile: CardProfile,
    log: ActivityLog,
    responder: CommandResponder<R>,
    simulating: bool,
}

impl CardSession {
    pub fn new(profile: CardProfile) -> Self {
        Self::with_responder(profile, CommandResponder::new())
    }
}

impl<R: RngCore> CardSession<R> {
    pub fn with_responder(profile: CardProfile, responder: CommandResponder<R>) -> Self {
        Self {
            profile,
            log: ActivityLog::new(),
            responder,
            simulating: false,
        }
    }

    pub fn profile(&self) -> &CardProfile {
        &self.profile
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn record(&mut self, message: impl Into<String>, kind: LogKind) {
        self.log.append(message, kind);
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Answers a request against the current profile without touching the log.
    pub fn respond(&mut self, request: &SimulatedRequest) -> SimulatedResponse {
        self.responder.respond(request, &self.profile)
    }

    /// Logs the reading, answers the command it carries and logs the answer.
    /// A reading without a parsable command record gets the unsupported answer.
    pub fn handle_read(&mut self, reading: &NfcReading) -> SimulatedResponse {
        self.log.success(format!("NFC Read: {}", to_json(reading)));

        let request = reading.command_request().unwrap_or_default();
        let response = self.responder.respond(&request, &self.profile);
        debug!(
            serial = %reading.serial_number,
            command = %request.command,
            status = %response.status,
            "handled tag read"
        );

        self.log.info(format!("Smart Card Response: {}", to_json(&response)));
        response
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.profile.apply(update);
        self.log.info("Card data updated");
    }

    pub fn toggle_simulation(&mut self) -> bool {
        self.simulating = !self.simulating;
        let state = if self.simulating { "started" } else { "stopped" };
        self.log.info(format!("Smart card simulation {state}"));
        self.simulating
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Read(reading) => {
                self.handle_read(&reading);
            }
            SessionEvent::UpdateProfile(update) => self.update_profile(update),
            SessionEvent::ToggleSimulation => {
                self.toggle_simulation();
            }
            SessionEvent::Log { message, kind } => self.record(message, kind),
        }
    }
}

impl<R: RngCore + Send + 'static> CardSession<R> {
    /// Moves the session onto its own task, fed by a bounded queue. The task
    /// hands the session back once every sender is dropped.
    pub fn spawn(self) -> (mpsc::Sender<SessionEvent>, JoinHandle<Self>) {
        let (tx, mut rx) = mpsc::channel(SESSION_QUEUE_CAPACITY);
        let task = tokio::spawn(async move {
            let mut session = self;
            while let Some(event) = rx.recv().await {
                session.apply(event);
            }
            info!(entries = session.log.len(), "session queue drained");
            session
        });
        (tx, task)
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|error| format!("<unserializable: {error}>"))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
