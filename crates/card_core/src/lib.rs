//! Simulated contactless card: command responder, activity log, read sources
//! and the session that ties them together.

pub mod activity_log;
pub mod profile;
pub mod reader;
pub mod responder;
pub mod session;

pub use activity_log::{ActivityLog, LogCounts, LogEntry, LogFilter, LogKind, LOG_CAPACITY};
pub use profile::random_travel_card;
pub use reader::{
    simulate_read, ReadSimulator, SimulatedReader, TagReader, DEFAULT_SIMULATION_INTERVAL,
};
pub use responder::{CardCommand, CommandResponder};
pub use session::{CardSession, SessionEvent};
