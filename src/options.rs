use common::BernoulliCoin;

/// Hard ceiling on tower height, whatever the options ask for.
pub const MAX_HEIGHT: usize = 32;

#[derive(Debug, Clone)]
pub struct SkipListOptions {
    /// Chance that a tower grows one more level.
    pub probability: f64,
    /// Seed for the growth coin. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub max_height: usize,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            probability: BernoulliCoin::DEFAULT_PROBABILITY,
            seed: None,
            max_height: MAX_HEIGHT,
        }
    }
}

impl SkipListOptions {
    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub(crate) fn coin(&self) -> crate::Result<BernoulliCoin> {
        let coin = match self.seed {
            Some(seed) => BernoulliCoin::seeded(self.probability, seed)?,
            None => BernoulliCoin::new(self.probability)?,
        };
        Ok(coin)
    }
}
