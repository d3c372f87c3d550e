use std::path::PathBuf;

use anyhow::{Context, Result};
use card_core::{
    random_travel_card, ActivityLog, CardSession, CommandResponder, LogFilter, ReadSimulator,
    SimulatedReader, LOG_CAPACITY,
};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use shared::{domain::CardProfile, protocol::SimulatedRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wallet_pass::{export_pass, qr_payload, qr_placeholder_svg, validate_card_data, WalletKind};

mod config;

use config::{load_profile, load_settings, Settings, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "cardsim", about = "Contactless smart card simulator")]
struct Cli {
    /// TOML settings file; missing files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// JSON card profile merged over the demo card.
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Seed for challenge bytes, transaction ids and simulated reads.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a single card command.
    Respond {
        command: String,
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        zone: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Run periodic simulated reads and print the activity log.
    Simulate {
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long, default_value = "all")]
        filter: LogFilter,
    },
    /// Validate the card and write a wallet pass.
    Export {
        wallet: WalletKind,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also print the QR placeholder image as a data URL.
        #[arg(long)]
        qr: bool,
    },
    /// Print a random travel card profile as JSON.
    RandomCard,
    /// Print the active card profile.
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let seed = cli.seed.or(settings.seed);
    let profile_path = cli.profile.clone().or_else(|| settings.profile_path.clone());
    let profile = load_profile(profile_path.as_deref())?;

    match cli.command {
        Command::Respond {
            command,
            data,
            zone,
            amount,
        } => {
            let request = SimulatedRequest {
                command,
                data,
                zone,
                amount,
            };
            let response = responder(seed).respond(&request, &profile);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Simulate {
            count,
            interval_ms,
            filter,
        } => {
            let log = simulate(&settings, profile, seed, count, interval_ms).await?;
            print!("{}", render_log(&log, filter));
        }
        Command::Export { wallet, out, qr } => {
            let document = export_pass(wallet, &profile, Utc::now())?;
            let dir = out.unwrap_or_else(|| settings.export_dir.clone());
            let path = document.write_to(&dir)?;
            println!("Saved {wallet} pass to {}", path.display());
            if qr {
                println!("{}", qr_placeholder_svg(&qr_payload(&profile, Utc::now())?));
            }
        }
        Command::RandomCard => {
            let card = random_travel_card(&mut rng(seed), Local::now().date_naive());
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        Command::Show => print!("{}", render_profile(&profile)),
    }

    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn responder(seed: Option<u64>) -> CommandResponder {
    CommandResponder::with_rng(rng(seed))
}

async fn simulate(
    settings: &Settings,
    profile: CardProfile,
    seed: Option<u64>,
    count: usize,
    interval_ms: Option<u64>,
) -> Result<ActivityLog> {
    let interval = interval_ms.map_or_else(
        || settings.simulation_interval(),
        |ms| std::time::Duration::from_millis(ms.max(1)),
    );

    let (tx, task) = CardSession::with_responder(profile, responder(seed)).spawn();

    let mut simulator = ReadSimulator::new();
    let reader = SimulatedReader::with_rng(interval, rng(seed.map(|s| s.wrapping_add(1))))
        .limit(count);
    simulator.start_with(reader, interval, tx);
    info!(count, interval_ms = interval.as_millis() as u64, "simulating reads");

    let interrupted = tokio::select! {
        _ = simulator.finished() => false,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            true
        }
    };
    if interrupted {
        simulator.stop();
    }
    drop(simulator);

    let session = task.await.context("session task failed")?;
    Ok(session.log().clone())
}

fn render_log(log: &ActivityLog, filter: LogFilter) -> String {
    let shown = log.filter(filter);
    let mut out = format!(
        "Showing {} of {} logs (capacity {LOG_CAPACITY})\n",
        shown.len(),
        log.len()
    );
    if shown.is_empty() {
        out.push_str("No logs to display\n");
    }
    for entry in shown {
        out.push_str(&format!(
            "{} [{}] {}\n",
            entry.kind.icon(),
            entry.timestamp,
            entry.message
        ));
    }
    let counts = log.counts();
    out.push_str(&format!(
        "info={} success={} warning={} error={}\n",
        counts.info, counts.success, counts.warning, counts.error
    ));
    out
}

fn render_profile(profile: &CardProfile) -> String {
    let mut out = format!(
        "{} card {}\nHolder: {}\nExpires: {}\nBalance: {}\n",
        profile.card_type,
        profile.display_number(),
        profile.card_holder,
        profile.expiry_date,
        profile.formatted_balance()
    );
    if let Some(points) = profile.travel_points {
        out.push_str(&format!("Travel points: {points}\n"));
    }
    if let Some(level) = profile.membership_level {
        out.push_str(&format!("Membership: {level:?}\n"));
    }
    if let Some(zones) = &profile.valid_zones {
        out.push_str(&format!("Zones: {}\n", zones.join(", ")));
    }
    match validate_card_data(profile) {
        Ok(()) => out.push_str("Wallet export: ready\n"),
        Err(error) => {
            for message in error.messages() {
                out.push_str(&format!("Wallet export blocked: {message}\n"));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
