use super::*;

#[test]
fn text_records_decode_with_declared_encoding() {
    let utf8 = RawRecord {
        record_type: "text".into(),
        encoding: None,
        data: "héllo".as_bytes().to_vec(),
    };
    assert_eq!(decode_record(&utf8).data, "héllo");

    let utf16 = RawRecord {
        record_type: "text".into(),
        encoding: Some("utf-16le".into()),
        data: vec![b'h', 0, b'i', 0],
    };
    assert_eq!(decode_record(&utf16).data, "hi");
}

#[test]
fn url_records_decode_as_utf8() {
    let raw = RawRecord {
        record_type: "url".into(),
        encoding: None,
        data: b"https://example.org/card".to_vec(),
    };
    let record = decode_record(&raw);
    assert_eq!(record.record_type, "url");
    assert_eq!(record.data, "https://example.org/card");
}

#[test]
fn other_records_render_as_spaced_hex() {
    let raw = RawRecord {
        record_type: "mime".into(),
        encoding: None,
        data: vec![0x00, 0x0a, 0xff],
    };
    assert_eq!(decode_record(&raw).data, "00 0a ff");
}

#[test]
fn missing_serial_becomes_unknown() {
    assert_eq!(reading_from_raw(None, &[]).serial_number, UNKNOWN_SERIAL);
    assert_eq!(
        reading_from_raw(Some(String::new()), &[]).serial_number,
        UNKNOWN_SERIAL
    );
    assert_eq!(
        reading_from_raw(Some("04:a2:2b".into()), &[]).serial_number,
        "04:a2:2b"
    );
}

#[test]
fn simulated_reads_carry_one_command_record() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let reading = simulate_read(&mut rng);
        assert_eq!(reading.records.len(), 1);
        assert_eq!(reading.records[0].record_type, COMMAND_RECORD_TYPE);

        let request = reading.command_request().expect("command record parses");
        assert!(SIMULATED_COMMANDS
            .iter()
            .any(|(command, _, _)| *command == request.command));

        let suffix = reading
            .serial_number
            .strip_prefix("SIMULATED-")
            .expect("serial prefix");
        assert_eq!(suffix.len(), 9);
        assert!(suffix.bytes().all(|b| SERIAL_ALPHABET.contains(&b)));
    }
}

#[test]
fn intervals_are_described_like_the_log_expects() {
    assert_eq!(
        describe_interval(Duration::from_secs(3)),
        "every 3 seconds"
    );
    assert_eq!(describe_interval(Duration::from_secs(1)), "every 1 second");
    assert_eq!(
        describe_interval(Duration::from_millis(250)),
        "every 250 ms"
    );
}

#[tokio::test(start_paused = true)]
async fn bounded_simulated_reader_runs_dry() {
    let mut reader =
        SimulatedReader::with_rng(Duration::from_secs(3), StdRng::seed_from_u64(1)).limit(2);
    assert!(reader.next_reading().await.expect("read").is_some());
    assert!(reader.next_reading().await.expect("read").is_some());
    assert!(reader.next_reading().await.expect("read").is_none());
}

#[tokio::test(start_paused = true)]
async fn simulator_feeds_queue_and_announces_start() {
    let (tx, mut rx) = mpsc::channel(16);
    let mut simulator = ReadSimulator::new();
    let reader =
        SimulatedReader::with_rng(Duration::from_secs(3), StdRng::seed_from_u64(9)).limit(3);
    simulator.start_with(reader, Duration::from_secs(3), tx);
    simulator.finished().await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(matches!(
        &events[0],
        SessionEvent::Log { message, kind: LogKind::Info }
            if message == "NFC simulation started (every 3 seconds)"
    ));
    let reads = events
        .iter()
        .filter(|event| matches!(event, SessionEvent::Read(_)))
        .count();
    assert_eq!(reads, 3);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_and_reports_once() {
    let (tx, mut rx) = mpsc::channel(16);
    let mut simulator = ReadSimulator::new();
    simulator.start(Duration::from_secs(3), tx);
    assert!(simulator.is_running());

    assert!(simulator.stop());
    assert!(!simulator.stop());
    assert!(!simulator.is_running());

    let mut notices = Vec::new();
    while let Some(event) = rx.recv().await {
        if let SessionEvent::Log { message, .. } = event {
            notices.push(message);
        }
    }
    assert_eq!(notices.last().map(String::as_str), Some("NFC simulation stopped"));
}

#[tokio::test(start_paused = true)]
async fn stop_works_after_an_abandoned_wait() {
    let (tx, mut rx) = mpsc::channel(16);
    let mut simulator = ReadSimulator::new();
    let reader =
        SimulatedReader::with_rng(Duration::from_secs(1), StdRng::seed_from_u64(3)).limit(10);
    simulator.start_with(reader, Duration::from_secs(1), tx);

    tokio::select! {
        _ = simulator.finished() => panic!("reader should still be running"),
        _ = time::sleep(Duration::from_millis(2500)) => {}
    }
    assert!(simulator.is_running());
    assert!(simulator.stop());

    let mut reads = 0;
    let mut notices = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Read(_) => reads += 1,
            SessionEvent::Log { message, .. } => notices.push(message),
            _ => {}
        }
    }
    assert_eq!(reads, 2);
    assert_eq!(notices.last().map(String::as_str), Some("NFC simulation stopped"));
}

#[tokio::test(start_paused = true)]
async fn notices_survive_a_full_queue() {
    let (tx, mut rx) = mpsc::channel(1);
    tx.try_send(SessionEvent::ToggleSimulation).expect("room for one");

    let mut simulator = ReadSimulator::new();
    let reader =
        SimulatedReader::with_rng(Duration::from_secs(1), StdRng::seed_from_u64(5)).limit(1);
    simulator.start_with(reader, Duration::from_secs(1), tx.clone());
    drop(tx);

    assert!(matches!(rx.recv().await, Some(SessionEvent::ToggleSimulation)));
    assert!(matches!(
        rx.recv().await,
        Some(SessionEvent::Log { message, .. }) if message == "NFC simulation started (every 1 second)"
    ));
    assert!(matches!(rx.recv().await, Some(SessionEvent::Read(_))));
    simulator.finished().await;
    assert!(rx.recv().await.is_none());

    let (tx, mut rx) = mpsc::channel(1);
    simulator.start(Duration::from_secs(1), tx);
    assert!(simulator.stop());

    let mut notices = Vec::new();
    while let Some(event) = rx.recv().await {
        if let SessionEvent::Log { message, .. } = event {
            notices.push(message);
        }
    }
    assert_eq!(
        notices,
        vec!["NFC simulation started (every 1 second)", "NFC simulation stopped"]
    );
}

struct FailingReader {
    failed: bool,
}

#[async_trait]
impl TagReader for FailingReader {
    async fn next_reading(&mut self) -> anyhow::Result<Option<NfcReading>> {
        if self.failed {
            return Ok(None);
        }
        self.failed = true;
        Err(anyhow::anyhow!("tag moved away"))
    }
}

#[tokio::test]
async fn reader_errors_become_error_log_events() {
    let (tx, mut rx) = mpsc::channel(16);
    let mut simulator = ReadSimulator::new();
    simulator.start_with(FailingReader { failed: false }, Duration::from_secs(1), tx);
    simulator.finished().await;

    let mut saw_error = false;
    while let Some(event) = rx.recv().await {
        if let SessionEvent::Log {
            message,
            kind: LogKind::Error,
        } = event
        {
            assert_eq!(message, "NFC Reading Error: tag moved away");
            saw_error = true;
        }
    }
    assert!(saw_error);
}
