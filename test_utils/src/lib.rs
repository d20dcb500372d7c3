use common::Coin;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a test-friendly `fmt` subscriber filtered by `RUST_LOG`.
///
/// Only the first call takes effect. Events reach it only when `skipset` is
/// built with the `tracing` feature.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

/// Replays a fixed draw pattern, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedCoin {
    draws: Vec<bool>,
    cursor: usize,
}

impl ScriptedCoin {
    pub fn new(draws: &[bool]) -> Self {
        Self {
            draws: draws.to_vec(),
            cursor: 0,
        }
    }

    /// Never grows a tower: every value lives on level 0 only.
    pub fn flat() -> Self {
        Self::new(&[false])
    }

    /// Always asks to grow; height is then bounded by the container rules.
    pub fn always() -> Self {
        Self::new(&[true])
    }

    pub fn draws_taken(&self) -> usize {
        self.cursor
    }
}

impl Coin for ScriptedCoin {
    fn next(&mut self) -> bool {
        if self.draws.is_empty() {
            return false;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}

pub fn sample_values(seed: u64, n: usize, max: i64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..max)).collect()
}

/// The expected traversal of a multiset built from `values`.
pub fn sorted_model<T: Ord + Clone>(values: &[T]) -> Vec<T> {
    let mut model = values.to_vec();
    model.sort();
    model
}

pub fn is_non_decreasing<T: Ord>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
