//! Tag read sources: raw NDEF decoding, simulated reads, and the cancellable
//! task that feeds readings into a session queue.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use shared::protocol::{NdefRecord, NfcReading, SimulatedRequest, COMMAND_RECORD_TYPE};
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
    time::{self, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{activity_log::LogKind, session::SessionEvent};

pub const DEFAULT_SIMULATION_INTERVAL: Duration = Duration::from_secs(3);
pub const UNKNOWN_SERIAL: &str = "Unknown";
const SERIAL_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SERIAL_LEN: usize = 9;

/// Command mix used by simulated reads. `READ_TRANSACTIONS` is unknown to the
/// responder and exercises the unsupported path.
pub const SIMULATED_COMMANDS: [(&str, Option<&str>, Option<&str>); 8] = [
    ("SELECT", Some("A0000002471001"), None),
    ("GET_CHALLENGE", Some("08000000"), None),
    ("VERIFY_PIN", Some("1234"), None),
    ("READ_RECORD", Some("00010000"), None),
    ("GET_BALANCE", None, None),
    ("READ_TRANSACTIONS", Some("00010000"), None),
    ("CHECK_ZONE", None, Some("A")),
    ("DEDUCT_FARE", None, None),
];

/// Undecoded record as delivered by a contactless reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub record_type: String,
    pub encoding: Option<String>,
    pub data: Vec<u8>,
}

pub fn decode_record(raw: &RawRecord) -> NdefRecord {
    let data = match raw.record_type.as_str() {
        "text" => decode_text(&raw.data, raw.encoding.as_deref()),
        "url" => String::from_utf8_lossy(&raw.data).into_owned(),
        _ => raw
            .data
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<Vec<_>>()
            .join(" "),
    };

    NdefRecord {
        record_type: raw.record_type.clone(),
        data,
    }
}

fn decode_text(bytes: &[u8], encoding: Option<&str>) -> String {
    let encoding = encoding.unwrap_or("utf-8").to_ascii_lowercase();
    match encoding.as_str() {
        "utf-16" | "utf-16be" => decode_utf16(bytes, u16::from_be_bytes),
        "utf-16le" => decode_utf16(bytes, u16::from_le_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

pub fn reading_from_raw(serial_number: Option<String>, records: &[RawRecord]) -> NfcReading {
    NfcReading {
        timestamp: Utc::now(),
        records: records.iter().map(decode_record).collect(),
        serial_number: serial_number
            .filter(|serial| !serial.is_empty())
            .unwrap_or_else(|| UNKNOWN_SERIAL.to_string()),
    }
}

pub fn simulated_request<R: Rng + ?Sized>(rng: &mut R) -> SimulatedRequest {
    let (command, data, zone) = *SIMULATED_COMMANDS
        .choose(rng)
        .unwrap_or(&SIMULATED_COMMANDS[0]);
    SimulatedRequest {
        command: command.to_string(),
        data: data.map(str::to_string),
        zone: zone.map(str::to_string),
        amount: None,
    }
}

pub fn simulated_serial<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..SERIAL_LEN)
        .map(|_| SERIAL_ALPHABET[rng.gen_range(0..SERIAL_ALPHABET.len())] as char)
        .collect();
    format!("SIMULATED-{suffix}")
}

pub fn simulate_read<R: Rng + ?Sized>(rng: &mut R) -> NfcReading {
    let request = simulated_request(rng);
    NfcReading {
        timestamp: Utc::now(),
        records: vec![NdefRecord {
            record_type: COMMAND_RECORD_TYPE.to_string(),
            data: serde_json::to_string(&request).unwrap_or_default(),
        }],
        serial_number: simulated_serial(rng),
    }
}

/// Source of tag readings. `Ok(None)` means the source is exhausted.
#[async_trait]
pub trait TagReader: Send {
    async fn next_reading(&mut self) -> anyhow::Result<Option<NfcReading>>;
}

/// Emits one simulated reading per interval tick, optionally a bounded number.
pub struct SimulatedReader {
    rng: StdRng,
    ticker: Interval,
    remaining: Option<usize>,
}

impl SimulatedReader {
    pub fn new(interval: Duration) -> Self {
        Self::with_rng(interval, StdRng::from_entropy())
    }

    pub fn with_rng(interval: Duration, rng: StdRng) -> Self {
        // tokio rejects a zero period.
        let interval = interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            rng,
            ticker,
            remaining: None,
        }
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.remaining = Some(count);
        self
    }
}

#[async_trait]
impl TagReader for SimulatedReader {
    async fn next_reading(&mut self) -> anyhow::Result<Option<NfcReading>> {
        match self.remaining {
            Some(0) => return Ok(None),
            Some(ref mut left) => *left -= 1,
            None => {}
        }
        self.ticker.tick().await;
        Ok(Some(simulate_read(&mut self.rng)))
    }
}

struct RunningScan {
    task: JoinHandle<()>,
    sink: mpsc::Sender<SessionEvent>,
}

/// Owns at most one background read loop. Stopping it never touches the
/// session's log beyond appending the stop notice.
#[derive(Default)]
pub struct ReadSimulator {
    running: Option<RunningScan>,
}

impl ReadSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts periodic simulated reads, replacing any running loop.
    pub fn start(&mut self, interval: Duration, sink: mpsc::Sender<SessionEvent>) {
        self.start_with(SimulatedReader::new(interval), interval, sink);
    }

    pub fn start_with<T>(&mut self, reader: T, interval: Duration, sink: mpsc::Sender<SessionEvent>)
    where
        T: TagReader + 'static,
    {
        self.abort_running();
        let backlog = notify(
            &sink,
            format!("NFC simulation started ({})", describe_interval(interval)),
            LogKind::Info,
        );
        info!(interval_ms = interval.as_millis() as u64, "read simulation started");

        let task = tokio::spawn(pump(reader, sink.clone(), backlog));
        self.running = Some(RunningScan { task, sink });
    }

    /// Cancels the loop. Returns `false` when nothing was running.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        running.task.abort();
        if let Some(event) = notify(&running.sink, "NFC simulation stopped", LogKind::Info) {
            let sink = running.sink.clone();
            tokio::spawn(async move {
                if sink.send(event).await.is_err() {
                    debug!("session queue closed before stop notice");
                }
            });
        }
        info!("read simulation stopped");
        true
    }

    /// Waits for a bounded reader to run dry, then releases the queue handle.
    ///
    /// Cancel safe: if this future is dropped early the loop stays owned by
    /// the simulator, so a later `stop` still aborts it.
    pub async fn finished(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        let outcome = (&mut running.task).await;
        self.running = None;
        if let Err(error) = outcome {
            if !error.is_cancelled() {
                warn!(%error, "read loop ended abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    fn abort_running(&mut self) {
        if let Some(running) = self.running.take() {
            running.task.abort();
        }
    }
}

impl Drop for ReadSimulator {
    fn drop(&mut self) {
        self.abort_running();
    }
}

async fn pump<T: TagReader>(
    mut reader: T,
    sink: mpsc::Sender<SessionEvent>,
    backlog: Option<SessionEvent>,
) {
    if let Some(event) = backlog {
        if sink.send(event).await.is_err() {
            return;
        }
    }
    loop {
        let event = match reader.next_reading().await {
            Ok(Some(reading)) => SessionEvent::Read(reading),
            Ok(None) => break,
            Err(error) => SessionEvent::Log {
                message: format!("NFC Reading Error: {error}"),
                kind: LogKind::Error,
            },
        };
        if sink.send(event).await.is_err() {
            debug!("session queue closed; read loop exiting");
            break;
        }
    }
}

/// Queues a notice without waiting. A full queue hands the event back so the
/// caller can deliver it once there is room.
fn notify(
    sink: &mpsc::Sender<SessionEvent>,
    message: impl Into<String>,
    kind: LogKind,
) -> Option<SessionEvent> {
    let event = SessionEvent::Log {
        message: message.into(),
        kind,
    };
    match sink.try_send(event) {
        Ok(()) => None,
        Err(TrySendError::Full(event)) => Some(event),
        Err(TrySendError::Closed(_)) => {
            debug!("session queue closed; notice dropped");
            None
        }
    }
}

fn describe_interval(interval: Duration) -> String {
    if interval.subsec_nanos() == 0 {
        let secs = interval.as_secs();
        let unit = if secs == 1 { "second" } else { "seconds" };
        format!("every {secs} {unit}")
    } else {
        format!("every {} ms", interval.as_millis())
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
