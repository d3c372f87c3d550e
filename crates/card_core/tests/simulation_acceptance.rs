use std::time::Duration;

use card_core::{
    CardSession, CommandResponder, LogFilter, LogKind, ReadSimulator, SimulatedReader,
    LOG_CAPACITY,
};
use rand::{rngs::StdRng, SeedableRng};
use shared::domain::CardProfile;

#[tokio::test(start_paused = true)]
async fn stopping_the_simulator_keeps_recorded_entries() {
    let session =
        CardSession::with_responder(CardProfile::default(), CommandResponder::seeded(3));
    let (tx, task) = session.spawn();

    let mut simulator = ReadSimulator::new();
    let reader = SimulatedReader::with_rng(Duration::from_secs(3), StdRng::seed_from_u64(8));
    simulator.start_with(reader, Duration::from_secs(3), tx.clone());

    tokio::time::sleep(Duration::from_millis(9_500)).await;
    assert!(simulator.stop());
    drop(tx);

    let session = task.await.expect("session task");
    let log = session.log();

    // start notice + 3 reads (request and response each) + stop notice
    assert_eq!(log.len(), 8);
    assert_eq!(
        log.newest().map(|entry| entry.message.as_str()),
        Some("NFC simulation stopped")
    );
    assert_eq!(log.filter(LogFilter::Only(LogKind::Success)).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn long_simulation_never_exceeds_capacity() {
    let session =
        CardSession::with_responder(CardProfile::default(), CommandResponder::seeded(4));
    let (tx, task) = session.spawn();

    let mut simulator = ReadSimulator::new();
    let reader = SimulatedReader::with_rng(Duration::from_millis(10), StdRng::seed_from_u64(2))
        .limit(100);
    simulator.start_with(reader, Duration::from_millis(10), tx);
    simulator.finished().await;

    let session = task.await.expect("session task");
    assert_eq!(session.log().len(), LOG_CAPACITY);
    let ids: Vec<u64> = session.log().iter().map(|entry| entry.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
}
