use rand::distributions::BernoulliError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid iterator")]
    InvalidIterator,
    #[error("invalid growth probability {0}")]
    Probability(#[from] BernoulliError),
    #[error("broken invariant: {0}")]
    BrokenInvariant(String),
}
