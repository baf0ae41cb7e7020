use std::rc::Rc;

use crate::error::{Error, Result};
use crate::parser::{BinaryOperator, DiceRoll, Expr, Scanner, TakeRoll, Token, TokenKind};
use crate::source::{default_source, SharedSource};


/// An operator-precedence parser for dice notation strings.
///
/// The parser drives the scanner over the input and folds the token stream
/// into an [`Expr`] with two explicit stacks, one for operands and one for
/// pending operator tokens. A token's precedence derives from its declared
/// ordinal, which makes dice bind tightest and, notably, `+` bind tighter
/// than `-`. The random source handed to [`Parser::new`] is bound into
/// every dice leaf of the resulting tree.
///
/// # Examples
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use pips::{Parser, RandSource};
///
/// let source = RandSource::shared(StdRng::seed_from_u64(1));
/// let mut parser = Parser::new("1d6 + 3", source).unwrap();
/// let expr = parser.parse().unwrap();
/// assert_eq!(expr.to_string(), "(1d6 + 3)");
/// ```
pub struct Parser {
    scanner: Scanner,
    source: SharedSource,
}

impl Parser {
    /// Creates a parser over `input`, scanning the first token.
    ///
    /// # Errors
    /// A lexical [`Error`] if the input opens with a character no token can
    /// start with.
    pub fn new(input: &str, source: SharedSource) -> Result<Self> {
        Ok(Self {
            scanner: Scanner::new(input)?,
            source,
        })
    }

    /// Parses the entire input into a single expression tree.
    ///
    /// # Errors
    /// Any [`Error`] raised by the scanner, the grammar, or dice
    /// construction, wrapped with the scanner position via
    /// [`Error::at_pos`]. Use [`Error::kind`] to classify and
    /// [`Error::err`] to look through the wrapper.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use pips::{ErrorKind, Parser, RandSource};
    ///
    /// let source = RandSource::shared(StdRng::seed_from_u64(1));
    /// let mut parser = Parser::new("1 +", source).unwrap();
    /// let err = parser.parse().unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Syntax);
    /// assert!(err.pos().is_some());
    /// ```
    pub fn parse(&mut self) -> Result<Expr> {
        self.parse_tokens()
            .map_err(|err| err.at_pos(self.scanner.position))
    }

    fn parse_tokens(&mut self) -> Result<Expr> {
        let mut operands: Vec<Expr> = Vec::new();
        let mut operators: Vec<Token> = Vec::new();

        let mut last = Token::end();
        let mut cur = self.scanner.current().clone();

        loop {
            match cur.kind() {
                TokenKind::EndOfInput => break,

                TokenKind::Constant => {
                    let node = reduce(&cur, &mut operands, &self.source)?;
                    operands.push(node);
                }

                TokenKind::ParenOpen => operators.push(cur.clone()),

                TokenKind::ParenClose => {
                    if last.kind() == TokenKind::ParenOpen {
                        return Err(Error::EmptyParens);
                    }
                    loop {
                        let Some(top) = operators.pop() else {
                            return Err(Error::UnmatchedParen);
                        };
                        if top.kind() == TokenKind::ParenOpen {
                            break;
                        }
                        let node = reduce(&top, &mut operands, &self.source)?;
                        operands.push(node);
                    }
                }

                TokenKind::Dice
                | TokenKind::TakeHigh
                | TokenKind::TakeLow
                | TokenKind::Multiply
                | TokenKind::Divide
                | TokenKind::Add
                | TokenKind::Subtract => {
                    // The left operand of a dice expression is optional
                    // with a default of 1.
                    if cur.kind() == TokenKind::Dice && last.kind() != TokenKind::Constant {
                        operands.push(Expr::Constant(1.0));
                    }

                    // Resolve pending operators binding tighter than `cur`.
                    while let Some(top) = operators.pop() {
                        if top.kind() == TokenKind::ParenOpen
                            || top.precedence() <= cur.precedence()
                        {
                            operators.push(top);
                            break;
                        }
                        let node = reduce(&top, &mut operands, &self.source)?;
                        operands.push(node);
                    }

                    // The take count of a take high/low expression is also
                    // optional with a default of 1.
                    if matches!(cur.kind(), TokenKind::TakeHigh | TokenKind::TakeLow)
                        && self.scanner.peek()?.kind() != TokenKind::Constant
                    {
                        operands.push(Expr::Constant(1.0));
                    }

                    operators.push(cur.clone());
                }
            }

            last = cur;
            cur = self.scanner.advance()?.clone();
        }

        while let Some(op) = operators.pop() {
            let node = reduce(&op, &mut operands, &self.source)?;
            operands.push(node);
        }

        // All tokens resolved: exactly the finished tree may remain.
        match operands.pop() {
            Some(expr) if operands.is_empty() => Ok(expr),
            _ => Err(Error::MissingOperator),
        }
    }
}


/// Builds one expression node from a pending token, consuming the node's
/// operands from the top of the stack.
fn reduce(op: &Token, operands: &mut Vec<Expr>, source: &SharedSource) -> Result<Expr> {
    match op.kind() {
        TokenKind::Constant => Ok(Expr::Constant(op.text().parse()?)),

        TokenKind::Add | TokenKind::Subtract | TokenKind::Multiply | TokenKind::Divide => {
            let right = pop_operand(operands, op)?;
            let left = pop_operand(operands, op)?;

            let operator = match op.kind() {
                TokenKind::Add => BinaryOperator::Add,
                TokenKind::Subtract => BinaryOperator::Subtract,
                TokenKind::Multiply => BinaryOperator::Multiply,
                _ => BinaryOperator::Divide,
            };

            Ok(Expr::Binary {
                op: operator,
                left: Box::new(left),
                right: Box::new(right),
            })
        }

        TokenKind::TakeHigh | TokenKind::TakeLow => {
            let Expr::Constant(take) = pop_operand(operands, op)? else {
                return Err(Error::ExpectedNumber("take count"));
            };
            let Expr::Roll(dice) = pop_operand(operands, op)? else {
                return Err(Error::ExpectedDice);
            };

            let take = TakeRoll::new(dice, take, op.kind() == TokenKind::TakeHigh)?;
            Ok(Expr::Take(take))
        }

        TokenKind::Dice => {
            let Expr::Constant(sides) = pop_operand(operands, op)? else {
                return Err(Error::ExpectedNumber("dice sides"));
            };
            let Expr::Constant(count) = pop_operand(operands, op)? else {
                return Err(Error::ExpectedNumber("dice count"));
            };

            let dice = DiceRoll::new(count, sides, Rc::clone(source))?;
            Ok(Expr::Roll(dice))
        }

        _ => Err(Error::UnknownOperator(op.text().to_string())),
    }
}

fn pop_operand(operands: &mut Vec<Expr>, op: &Token) -> Result<Expr> {
    operands
        .pop()
        .ok_or_else(|| Error::MissingOperand(op.text().to_string()))
}


/// Parses `input` into an expression tree, binding `source` into its dice.
///
/// # Errors
/// Any [`Error`] raised while scanning, parsing, or constructing dice.
///
/// # Examples
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use pips::{compile_with, RandSource};
///
/// let source = RandSource::shared(StdRng::seed_from_u64(1));
/// let expr = compile_with("2d20h1 + 5", source).unwrap();
/// assert_eq!(expr.to_string(), "(2d20h1 + 5)");
/// ```
pub fn compile_with(input: &str, source: SharedSource) -> Result<Expr> {
    Parser::new(input, source)?.parse()
}

/// Parses `input` with a fresh thread-local random source.
///
/// # Errors
/// Any [`Error`] raised while scanning, parsing, or constructing dice.
///
/// # Examples
/// ```
/// use pips::compile;
///
/// let expr = compile("d20").unwrap();
/// let value = expr.evaluate();
/// assert!((1.0..=20.0).contains(&value));
/// ```
pub fn compile(input: &str) -> Result<Expr> {
    compile_with(input, default_source())
}

/// Parses and immediately evaluates `input` against `source`.
///
/// # Errors
/// Any [`Error`] raised while scanning, parsing, or constructing dice.
///
/// # Examples
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use pips::{roll_with, RandSource};
///
/// let first = roll_with("4d8", RandSource::shared(StdRng::seed_from_u64(9))).unwrap();
/// let second = roll_with("4d8", RandSource::shared(StdRng::seed_from_u64(9))).unwrap();
/// assert_eq!(first, second);
/// ```
pub fn roll_with(input: &str, source: SharedSource) -> Result<f64> {
    Ok(compile_with(input, source)?.evaluate())
}

/// Parses and immediately evaluates `input` with a fresh thread-local
/// random source.
///
/// # Errors
/// Any [`Error`] raised while scanning, parsing, or constructing dice.
///
/// # Examples
/// ```
/// use pips::roll;
///
/// let value = roll("2d6 + 3").unwrap();
/// assert!((5.0..=15.0).contains(&value));
/// ```
pub fn roll(input: &str) -> Result<f64> {
    Ok(compile(input)?.evaluate())
}
