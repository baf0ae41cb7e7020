use std::fmt;

use crate::error::{Error, Result};
use crate::source::SharedSource;


/// A parsed dice notation expression.
///
/// Built once by the parser and immutable afterwards. A tree may be
/// evaluated any number of times; every evaluation draws fresh rolls for the
/// dice it contains, so only constant-and-arithmetic trees are idempotent.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A fixed numeric value.
    Constant(f64),
    /// A pool of identical dice, summed.
    Roll(DiceRoll),
    /// A dice pool reduced to its highest or lowest rolls.
    Take(TakeRoll),
    /// Two operands combined with an arithmetic operator.
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Evaluates the expression, drawing fresh rolls for every dice node.
    pub fn evaluate(&self) -> f64 {
        match self {
            Expr::Constant(value) => *value,
            Expr::Roll(dice) => dice.roll().into_iter().map(f64::from).sum(),
            Expr::Take(take) => take.evaluate(),
            Expr::Binary { op, left, right } => op.apply(left.evaluate(), right.evaluate()),
        }
    }

    /// The smallest and largest values this expression can evaluate to.
    ///
    /// Binary nodes combine the four bound combinations of their operands,
    /// which is exact for `+`, `-` and `*` but only indicative for `/`.
    pub fn possible_values(&self) -> (f64, f64) {
        match self {
            Expr::Constant(value) => (*value, *value),
            Expr::Roll(dice) => (dice.min(), dice.max()),
            Expr::Take(take) => (take.min(), take.max()),

            Expr::Binary { op, left, right } => {
                let (l_min, l_max) = left.possible_values();
                let (r_min, r_max) = right.possible_values();

                let combinations = [
                    op.apply(l_min, r_min),
                    op.apply(l_min, r_max),
                    op.apply(l_max, r_min),
                    op.apply(l_max, r_max),
                ];

                let min = combinations.iter().copied().fold(f64::INFINITY, f64::min);
                let max = combinations
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);
                (min, max)
            }
        }
    }

    /// Midpoint of [`Expr::possible_values`].
    pub fn avg(&self) -> f64 {
        let (min, max) = self.possible_values();
        (min + max) / 2.0
    }

    fn binary_op<L: Into<Expr>, R: Into<Expr>>(op: BinaryOperator, left: L, right: R) -> Self {
        Self::Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// `left + right`.
    pub fn add<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    /// `left - right`.
    pub fn sub<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Subtract, left, right)
    }

    /// `left * right`.
    pub fn mul<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Multiply, left, right)
    }

    /// `left / right`.
    pub fn div<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Divide, left, right)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<DiceRoll> for Expr {
    fn from(value: DiceRoll) -> Self {
        Self::Roll(value)
    }
}

impl From<TakeRoll> for Expr {
    fn from(value: TakeRoll) -> Self {
        Self::Take(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Roll(dice) => write!(f, "{dice}"),
            Expr::Take(take) => write!(f, "{take}"),
            Expr::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}


/// Arithmetic operators usable between expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Applies the operator. Division by zero follows IEEE float semantics.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        use BinaryOperator as Op;
        match self {
            Op::Add => left + right,
            Op::Subtract => left - right,
            Op::Multiply => left * right,
            Op::Divide => left / right,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
        }
    }
}


/// A pool of `count` dice with `sides` sides each, bound to the random
/// source it draws from.
#[derive(Clone)]
pub struct DiceRoll {
    count: u32,
    sides: u32,
    source: SharedSource,
}

impl DiceRoll {
    /// Validates and builds a dice pool from the raw parsed values.
    ///
    /// # Errors
    /// [`Error::DiceCount`] unless `count` is a whole number of at least 1;
    /// [`Error::DiceSides`] unless `sides` is a whole number of at least 2.
    pub fn new(count: f64, sides: f64, source: SharedSource) -> Result<Self> {
        if count.fract() != 0.0 || count < 1.0 {
            return Err(Error::DiceCount(count));
        }
        if sides.fract() != 0.0 || sides < 2.0 {
            return Err(Error::DiceSides(sides));
        }

        Ok(Self {
            count: count as u32,
            sides: sides as u32,
            source,
        })
    }

    /// Number of dice in the pool.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Sides per die.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Draws a fresh sequence of rolls, one value in `[1, sides]` per die.
    ///
    /// Sequences are never cached; every call advances the shared source.
    pub fn roll(&self) -> Vec<u32> {
        let mut source = self.source.borrow_mut();

        (0..self.count)
            .map(|_| source.next_int(0, self.sides) + 1)
            .collect()
    }

    /// Smallest possible sum.
    pub fn min(&self) -> f64 {
        f64::from(self.count)
    }

    /// Largest possible sum.
    pub fn max(&self) -> f64 {
        f64::from(self.count) * f64::from(self.sides)
    }
}

impl fmt::Debug for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceRoll")
            .field("count", &self.count)
            .field("sides", &self.sides)
            .finish_non_exhaustive()
    }
}

// The source handle never influences what a pool *is*.
impl PartialEq for DiceRoll {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.sides == other.sides
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}


/// Keeps only the highest or lowest `take` rolls of a dice pool.
#[derive(Debug, Clone, PartialEq)]
pub struct TakeRoll {
    dice: DiceRoll,
    take: u32,
    highest: bool,
}

impl TakeRoll {
    /// Validates and builds a take expression over `dice`.
    ///
    /// # Errors
    /// [`Error::TakeCount`] unless `take` is a whole number of at least 1;
    /// [`Error::TakeTooLarge`] if it exceeds the number of dice.
    pub fn new(dice: DiceRoll, take: f64, highest: bool) -> Result<Self> {
        if take.fract() != 0.0 || take < 1.0 {
            return Err(Error::TakeCount(take));
        }

        let take = take as u32;
        if take > dice.count() {
            return Err(Error::TakeTooLarge {
                take,
                count: dice.count(),
            });
        }

        Ok(Self {
            dice,
            take,
            highest,
        })
    }

    /// The underlying dice pool.
    pub fn dice(&self) -> &DiceRoll {
        &self.dice
    }

    /// How many rolls are kept.
    pub fn take(&self) -> u32 {
        self.take
    }

    /// Whether the highest rolls are kept rather than the lowest.
    pub fn highest(&self) -> bool {
        self.highest
    }

    pub(crate) fn evaluate(&self) -> f64 {
        let mut rolls = self.dice.roll();
        if self.highest {
            rolls.sort_unstable_by(|a, b| b.cmp(a));
        } else {
            rolls.sort_unstable();
        }

        rolls
            .into_iter()
            .take(self.take as usize)
            .map(f64::from)
            .sum()
    }

    /// Smallest possible sum.
    pub fn min(&self) -> f64 {
        f64::from(self.take)
    }

    /// Largest possible sum.
    pub fn max(&self) -> f64 {
        f64::from(self.take) * f64::from(self.dice.sides())
    }
}

impl fmt::Display for TakeRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.dice,
            if self.highest { "h" } else { "l" },
            self.take
        )
    }
}
