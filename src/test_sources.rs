use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::source::{RandSource, RollSource, SharedSource};


/// Deterministic source stepping `low + n % width` with an advancing `n`.
pub(crate) struct StepSource(pub u32);

impl RollSource for StepSource {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        let value = low + self.0 % (high - low);
        self.0 += 1;
        value
    }
}

pub(crate) fn step_source(start: u32) -> SharedSource {
    Rc::new(RefCell::new(StepSource(start)))
}

pub(crate) fn seeded(seed: u64) -> SharedSource {
    RandSource::shared(StdRng::seed_from_u64(seed))
}
