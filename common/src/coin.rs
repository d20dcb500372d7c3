//! Level growth draws for randomized towers.
//!
//! Every time a new value is linked into level 0 the container flips a coin to
//! decide whether its tower climbs one more level. The coin is owned by the
//! container, so two lists in the same process never share generator state.

use rand::distributions::{Bernoulli, BernoulliError, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A source of independent boolean draws.
pub trait Coin {
    /// Returns `true` when the tower under construction should grow one level.
    fn next(&mut self) -> bool;
}

impl<F> Coin for F
where
    F: FnMut() -> bool,
{
    fn next(&mut self) -> bool {
        self()
    }
}

/// Coin that lands `true` with a fixed probability `p`.
#[derive(Debug, Clone)]
pub struct BernoulliCoin {
    probability: f64,
    dist: Bernoulli,
    rng: StdRng,
}

impl BernoulliCoin {
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// Entropy seeded coin.
    pub fn new(probability: f64) -> Result<Self, BernoulliError> {
        Ok(Self {
            probability,
            dist: Bernoulli::new(probability)?,
            rng: StdRng::from_entropy(),
        })
    }

    /// Coin producing a reproducible draw sequence for a given `seed`.
    pub fn seeded(probability: f64, seed: u64) -> Result<Self, BernoulliError> {
        Ok(Self {
            probability,
            dist: Bernoulli::new(probability)?,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for BernoulliCoin {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBABILITY).expect("0.5 is a valid probability")
    }
}

impl Coin for BernoulliCoin {
    fn next(&mut self) -> bool {
        self.dist.sample(&mut self.rng)
    }
}
