use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::FetchError;
use crate::selection::Selector;
use crate::stats_fetch::StatsSource;
use crate::view_data::ViewData;

const CHAMPION_POOL: &[&str] = &[
    "Azir", "Ahri", "Orianna", "Sylas", "LeBlanc", "Syndra", "Taliyah", "Corki", "Viktor",
    "Tristana", "Yone", "Akali",
];

/// Offline source with seeded tables and random latency. Latency varies per
/// call, so fast switching between players produces out-of-order
/// completions.
#[derive(Debug, Clone)]
pub struct FakeStatsSource {
    min_latency: Duration,
    max_latency: Duration,
    fail_pct: u8,
}

impl Default for FakeStatsSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), Duration::from_millis(1800), 0)
    }
}

impl FakeStatsSource {
    pub fn new(min_latency: Duration, max_latency: Duration, fail_pct: u8) -> Self {
        let max_latency = max_latency.max(min_latency);
        Self {
            min_latency,
            max_latency,
            fail_pct: fail_pct.min(100),
        }
    }

    pub fn with_fail_pct(mut self, fail_pct: u8) -> Self {
        self.fail_pct = fail_pct.min(100);
        self
    }
}

impl StatsSource for FakeStatsSource {
    fn fetch_wins(&self, selector: &Selector) -> Result<ViewData, FetchError> {
        let mut rng = rand::thread_rng();
        let latency = if self.max_latency > self.min_latency {
            rng.gen_range(self.min_latency..=self.max_latency)
        } else {
            self.min_latency
        };
        thread::sleep(latency);

        if self.fail_pct > 0 && rng.gen_range(0..100) < self.fail_pct {
            return Err(FetchError::Network("simulated connection reset".to_string()));
        }
        seeded_wins(selector.as_str())
    }

    fn label(&self) -> String {
        "fake".to_string()
    }
}

/// Same table for the same player on every call.
pub fn seeded_wins(player: &str) -> Result<ViewData, FetchError> {
    let seed = player
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
            (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
    let mut rng = StdRng::seed_from_u64(seed);
    let count = rng.gen_range(3..=6);

    let mut pool: Vec<&str> = CHAMPION_POOL.to_vec();
    let mut rows: Vec<(String, f64)> = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = rng.gen_range(0..pool.len());
        let champion = pool.swap_remove(idx);
        rows.push((champion.to_string(), f64::from(rng.gen_range(1..=25_u32))));
    }
    // The real endpoint sorts by wins, descending.
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    ViewData::from_entries(rows)
}
