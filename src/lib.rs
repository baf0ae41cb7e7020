#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

//! Dice notation parsing and rolling.
//!
//! Parses expressions like `6d6h4 + 2d20 - 3` into an [`Expr`] tree and
//! evaluates them against a pluggable random source. Every evaluation of a
//! tree containing dice draws fresh rolls.
//!
//! ```
//! let total = pips::roll("3d6 + 2").unwrap();
//! assert!((5.0..=20.0).contains(&total));
//! ```

#[cfg(test)]
mod test_sources;

mod error;
mod parser;
mod source;

pub use error::{Error, ErrorKind, Result};
pub use parser::{
    compile, compile_with, roll, roll_with, BinaryOperator, DiceRoll, Expr, Parser, TakeRoll,
};
pub use source::{RandSource, RollSource, SharedSource};
