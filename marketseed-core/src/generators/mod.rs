//! Synthetic row generators, one module per entity family.
//!
//! Generators are pure: they take an RNG, a clock reading, target counts and
//! the parent references they depend on, and return rows. When a required
//! parent list is empty they log a warning and return no rows, so nothing
//! is ever produced with a dangling foreign key.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub mod jobs;
pub mod messages;
pub mod notifications;
pub mod reference;
pub mod reviews;
pub mod users;

/// Placeholder bcrypt hash for every seeded account ("password").
pub const DEMO_PASSWORD_HASH: &str =
    "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// Seeded activity spans the year before the run.
pub const HISTORY_DAYS: i64 = 365;

/// Uniform instant in `[now - max_days, now]`.
pub(crate) fn past_instant<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    max_days: i64,
) -> DateTime<Utc> {
    let seconds = rng.gen_range(0..=max_days.max(0) * 86_400);
    now - Duration::seconds(seconds)
}

/// Uniform instant in `[start, now]`; `start` after `now` yields `now`.
pub(crate) fn instant_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let span = (now - start).num_seconds();
    if span <= 0 {
        return now;
    }
    start + Duration::seconds(rng.gen_range(0..=span))
}

/// Pick a fixed-list entry. Lists are compile-time constants and non-empty.
pub(crate) fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &'a [&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn past_instant_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();
        for _ in 0..200 {
            let t = past_instant(&mut rng, now, 30);
            assert!(t <= now);
            assert!(t >= now - Duration::days(30));
        }
    }

    #[test]
    fn instant_between_handles_inverted_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let now = Utc::now();
        assert_eq!(instant_between(&mut rng, now + Duration::days(1), now), now);
    }
}
