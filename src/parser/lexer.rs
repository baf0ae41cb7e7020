use crate::error::{Error, Result};


/// Token categories in reverse precedence order: a token's precedence is
/// `10 - ordinal`, so Dice binds tightest and Subtract loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    EndOfInput = 0,
    Dice = 1,
    TakeHigh = 2,
    TakeLow = 3,
    ParenOpen = 4,
    ParenClose = 5,
    Multiply = 6,
    Divide = 7,
    Add = 8,
    Subtract = 9,
    Constant = 10,
}


#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn end() -> Self {
        Self::new(TokenKind::EndOfInput, "")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn precedence(&self) -> u8 {
        10 - self.kind as u8
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Multiply | TokenKind::Divide | TokenKind::Add | TokenKind::Subtract
        )
    }

    pub fn is_dice(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Dice | TokenKind::TakeHigh | TokenKind::TakeLow
        )
    }
}


/// A one-token-buffered scanner over dice notation text.
///
/// The token scanned last is always available through [`Scanner::current`],
/// and [`Scanner::peek`] looks one token further without visibly moving the
/// stream.
#[derive(Debug)]
pub(crate) struct Scanner {
    input: Vec<char>,
    pub position: usize,
    start: usize,
    current: Token,
}

impl Scanner {
    pub fn new(input: &str) -> Result<Self> {
        let mut scanner = Self {
            input: input.chars().collect(),
            position: 0,
            start: 0,
            current: Token::end(),
        };
        scanner.advance()?;

        Ok(scanner)
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Scans the next token, replacing the current one. Past the end of the
    /// input this keeps returning [`TokenKind::EndOfInput`].
    pub fn advance(&mut self) -> Result<&Token> {
        self.skip_whitespace();
        self.start = self.position;
        self.current = self.scan()?;

        Ok(&self.current)
    }

    /// The token after the current one, without visibly moving the stream.
    ///
    /// Saves the start index of the current token, scans one token ahead,
    /// then rewinds and re-scans so the current token is rebuilt exactly.
    pub fn peek(&mut self) -> Result<Token> {
        let start = self.start;
        let ahead = self.advance()?.clone();
        self.position = start;
        self.advance()?;

        Ok(ahead)
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.input[self.position].is_whitespace() {
            self.position += 1;
        }
    }

    fn scan(&mut self) -> Result<Token> {
        let Some(&ch) = self.input.get(self.position) else {
            return Ok(Token::end());
        };

        if ch.is_ascii_digit() || (ch == '-' && self.digit_follows()) {
            return Ok(self.scan_number());
        }

        self.position += 1;
        match ch.to_ascii_lowercase() {
            '%' => Ok(Token::new(TokenKind::Constant, "100")),
            'd' => Ok(Token::new(TokenKind::Dice, "d")),
            'h' => Ok(Token::new(TokenKind::TakeHigh, "h")),
            'l' => Ok(Token::new(TokenKind::TakeLow, "l")),
            '(' => Ok(Token::new(TokenKind::ParenOpen, "(")),
            ')' => Ok(Token::new(TokenKind::ParenClose, ")")),
            '*' => Ok(Token::new(TokenKind::Multiply, "*")),
            '/' => Ok(Token::new(TokenKind::Divide, "/")),
            '+' => Ok(Token::new(TokenKind::Add, "+")),
            '-' => Ok(Token::new(TokenKind::Subtract, "-")),
            _ => Err(Error::UnexpectedChar(ch)),
        }
    }

    fn digit_follows(&self) -> bool {
        self.input
            .get(self.position + 1)
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// Consumes a run of digits and `.` characters. Malformed runs are
    /// accepted here and rejected at numeric conversion.
    fn scan_number(&mut self) -> Token {
        let start = self.position;
        self.position += 1; // first digit, or a leading minus
        while self
            .input
            .get(self.position)
            .is_some_and(|&c| c.is_ascii_digit() || c == '.')
        {
            self.position += 1;
        }

        let text: String = self.input[start..self.position].iter().collect();
        Token::new(TokenKind::Constant, text)
    }
}
