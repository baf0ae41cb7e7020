mod expr;
mod lexer;
mod parse;

#[cfg(test)]
mod str_test_strategies;

pub use expr::{BinaryOperator, DiceRoll, Expr, TakeRoll};
pub use parse::{compile, compile_with, roll, roll_with, Parser};
pub(crate) use lexer::{Scanner, Token, TokenKind};
