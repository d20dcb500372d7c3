pub mod coin;

pub use coin::{BernoulliCoin, Coin};
