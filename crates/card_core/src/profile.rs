use chrono::{Datelike, NaiveDate};
use rand::{seq::SliceRandom, Rng};
use shared::domain::{CardProfile, CardType, MembershipLevel};

const ZONES: [&str; 4] = ["A", "B", "C", "D"];

/// A plausible transit card issued "today". The holder and expiry are fixed
/// demo values; everything else is drawn from `rng`.
pub fn random_travel_card<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> CardProfile {
    let card_type = CardType::TRANSIT
        .choose(rng)
        .cloned()
        .unwrap_or(CardType::Travel);
    let card_number = format!(
        "TRV-{}-{:03}-{:03}",
        today.year(),
        rng.gen_range(1..=999),
        rng.gen_range(1..=999)
    );
    let balance = f64::from(rng.gen_range(10u32..210));
    let travel_points = rng.gen_range(100..5100);
    let membership_level = MembershipLevel::ALL.choose(rng).copied();
    let zone_count = rng.gen_range(1..=ZONES.len());

    CardProfile {
        card_number,
        card_holder: "JOHN DOE".into(),
        expiry_date: "12/25".into(),
        card_type,
        balance,
        currency: "USD".into(),
        cvv: None,
        travel_points: Some(travel_points),
        membership_level,
        valid_zones: Some(ZONES[..zone_count].iter().map(|z| z.to_string()).collect()),
        last_used: Some(today),
    }
}
