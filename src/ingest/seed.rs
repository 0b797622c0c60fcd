use chrono::{DateTime, Duration, DurationRound, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::domain::Event;

/// Skills drawn from when generating seed events.
pub const SEED_SKILLS: [&str; 8] = [
    "dribble", "shoot", "pass", "defense", "rebound", "speed", "stamina", "vision",
];

const SEED_TALENTS: u32 = 500;
const SEED_WINDOW_DAYS: i64 = 90;

/// Rounds to two decimals, halves away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Lazily generates `n` random events: talents `t-001..=t-500`, raw metric in `0..100`,
/// timestamps within the last 90 days truncated to the minute.
pub fn generate_events(n: usize) -> impl Iterator<Item = Event> + Send {
    let now = Utc::now();
    (0..n).map(move |_| generate_event(now))
}

/// Generates one random event with a timestamp before `now`.
pub fn generate_event(now: DateTime<Utc>) -> Event {
    // ThreadRng is !Send; keep it local so callers can await between events.
    let mut rng = rand::thread_rng();
    let window_ms = Duration::days(SEED_WINDOW_DAYS).num_milliseconds();

    let raw = round2(rng.gen_range(0.0..100.0));
    let talent = rng.gen_range(1..=SEED_TALENTS);
    let skill = SEED_SKILLS[rng.gen_range(0..SEED_SKILLS.len())];
    let ts = random_past_time(now, rng.gen_range(0..window_ms));

    Event::new(Uuid::new_v4(), format!("t-{talent:03}"), raw, skill, ts)
}

fn random_past_time(now: DateTime<Utc>, back_ms: i64) -> DateTime<Utc> {
    let ts = now - Duration::milliseconds(back_ms);
    ts.duration_trunc(Duration::minutes(1)).unwrap_or(ts)
}
