use std::num::ParseFloatError;


/// The three failure classes surfaced by [`Error::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The scanner hit a character or numeric literal it cannot read.
    Lexical,
    /// The token stream violates the grammar.
    Syntax,
    /// A dice parameter is outside its domain.
    Semantic,
}


#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("at position {0} - {1}")]
    AtPosition(usize, Box<Error>),

    #[error("unexpected character: {0}")]
    UnexpectedChar(char),

    #[error("invalid number: {0}")]
    Number(#[from] ParseFloatError),

    #[error("empty parentheses (must contain an expression)")]
    EmptyParens,

    #[error("close parenthesis without a matching open")]
    UnmatchedParen,

    #[error("missing operand for {0}")]
    MissingOperand(String),

    #[error("expected a number for the {0}")]
    ExpectedNumber(&'static str),

    #[error("take high/low must operate on a dice roll")]
    ExpectedDice,

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("missing operator")]
    MissingOperator,

    #[error("dice count must be a whole number of at least 1, got {0}")]
    DiceCount(f64),

    #[error("dice must have a whole number of sides, at least 2, got {0}")]
    DiceSides(f64),

    #[error("take count must be a whole number of at least 1, got {0}")]
    TakeCount(f64),

    #[error("cannot take {take} rolls from {count} dice")]
    TakeTooLarge { take: u32, count: u32 },
}

impl Error {
    /// Classifies the error into the scanner/parser/constructor taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AtPosition(_, inner) => inner.kind(),

            Error::UnexpectedChar(_) | Error::Number(_) => ErrorKind::Lexical,

            Error::EmptyParens
            | Error::UnmatchedParen
            | Error::MissingOperand(_)
            | Error::ExpectedNumber(_)
            | Error::ExpectedDice
            | Error::UnknownOperator(_)
            | Error::MissingOperator => ErrorKind::Syntax,

            Error::DiceCount(_)
            | Error::DiceSides(_)
            | Error::TakeCount(_)
            | Error::TakeTooLarge { .. } => ErrorKind::Semantic,
        }
    }

    /// The error itself, looking through any position wrapper.
    pub fn err(&self) -> &Self {
        match self {
            Error::AtPosition(_, err) => err.as_ref(),
            other => other,
        }
    }

    /// The input position the error was reported at, if any.
    pub fn pos(&self) -> Option<usize> {
        match self {
            Error::AtPosition(position, _) => Some(*position),
            _ => None,
        }
    }

    /// Wraps the error with an input position, keeping the first one on
    /// repeated wrapping.
    pub fn at_pos(self, position: usize) -> Self {
        match self {
            Error::AtPosition(_, _) => self,
            other => Error::AtPosition(position, Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
