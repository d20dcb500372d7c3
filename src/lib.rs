//! Ordered multiset built on a randomized skip list.
//!
//! ```
//! use skipset::SkipList;
//!
//! let mut list = SkipList::new();
//! list.insert(1).insert(3).insert(3).insert(2);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 3]);
//! assert_eq!(list.count(&3), 2);
//! ```

pub use crate::error::Error;

mod arena;
pub mod cmp;
mod error;
pub mod iter;
mod node;
pub mod options;
pub mod skiplist;
mod tracing_helpers;

pub use crate::cmp::{Comparator, DefaultComparator, ReverseComparator};
pub use crate::iter::{Direction, Iter, Position, SkipListIterator, Values};
pub use crate::options::{SkipListOptions, MAX_HEIGHT};
pub use crate::skiplist::SkipList;
pub use common::{BernoulliCoin, Coin};

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! ensure {
    ($cond:expr,$err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}
