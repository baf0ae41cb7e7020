use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;


/// A uniform integer source consumed by dice rolls.
///
/// Dice leaves call [`RollSource::next_int`] once per die with `(0, sides)`
/// and add 1, yielding values in `[1, sides]`.
pub trait RollSource {
    /// Returns a uniformly distributed integer in `[low, high)`.
    /// Callers must pass `low < high`.
    fn next_int(&mut self, low: u32, high: u32) -> u32;
}


/// Adapter exposing any [`rand::Rng`] as a [`RollSource`].
#[derive(Debug, Clone)]
pub struct RandSource<R>(pub R);

impl<R: Rng + 'static> RandSource<R> {
    /// Wraps an owned generator into a [`SharedSource`] handle.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use pips::{roll_with, RandSource};
    ///
    /// let source = RandSource::shared(StdRng::seed_from_u64(7));
    /// let value = roll_with("3d6", source).unwrap();
    /// assert!((3.0..=18.0).contains(&value));
    /// ```
    pub fn shared(rng: R) -> SharedSource {
        Rc::new(RefCell::new(Self(rng)))
    }
}

impl<R: Rng> RollSource for RandSource<R> {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        self.0.random_range(low..high)
    }
}


/// The random-source handle shared by every dice leaf of one tree.
///
/// The source is mutated on every roll; `Rc` keeps trees single-threaded by
/// construction.
pub type SharedSource = Rc<RefCell<dyn RollSource>>;

/// Fresh thread-local source for the convenience entry points.
pub(crate) fn default_source() -> SharedSource {
    RandSource::shared(rand::rng())
}


#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    proptest! {
        #[test]
        fn rand_source_stays_in_range(
            seed in any::<u64>(),
            low in 0u32..=10,
            width in 1u32..=100
        ) {
            let mut source = RandSource(StdRng::seed_from_u64(seed));
            let value = source.next_int(low, low + width);

            prop_assert!(value >= low);
            prop_assert!(value < low + width);
        }

        #[test]
        fn seeded_sources_are_reproducible(seed in any::<u64>()) {
            let mut a = RandSource(StdRng::seed_from_u64(seed));
            let mut b = RandSource(StdRng::seed_from_u64(seed));

            for _ in 0..16 {
                prop_assert_eq!(a.next_int(0, 20), b.next_int(0, 20));
            }
        }
    }
}
