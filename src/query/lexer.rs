use super::error::QueryError;
use super::token::{Token, TokenKind};
use regex::Regex;
use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));
static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid integer regex"));
static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("valid float regex"));

/// Characters that end a bare (unquoted) value
pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '"' || TokenKind::from_char(c).is_some()
}

/// Lazily turns query text into tokens
///
/// Yields exactly one `Eof` token at the end, or stops after the first error.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            pos: 0,
            finished: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Result<Token, QueryError> {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        if let Some(kind) = TokenKind::from_char(c) {
            self.advance();
            return Ok(Token::new(kind, c.to_string(), start));
        }

        if c == '"' {
            return self.scan_quoted(start);
        }

        if c.is_control() {
            return Err(QueryError::syntax(
                start,
                format!("illegal character {:?}", c),
            ));
        }

        Ok(self.scan_bare(start))
    }

    /// Scan a double-quoted value; `""` stands for one literal quote
    fn scan_quoted(&mut self, start: usize) -> Result<Token, QueryError> {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('"') => {
                    if self.peek_char() == Some('"') {
                        self.advance();
                        value.push('"');
                    } else {
                        return Ok(Token::new(TokenKind::String, value, start));
                    }
                }
                Some(c) => value.push(c),
                None => {
                    return Err(QueryError::syntax(start, "unterminated quoted value"));
                }
            }
        }
    }

    fn scan_bare(&mut self, start: usize) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek_char() {
            if is_delimiter(c) || c.is_control() {
                break;
            }
            value.push(c);
            self.advance();
        }

        let kind = if IDENTIFIER_RE.is_match(&value) {
            TokenKind::Identifier
        } else if INTEGER_RE.is_match(&value) {
            TokenKind::Integer
        } else if FLOAT_RE.is_match(&value) {
            TokenKind::Float
        } else {
            TokenKind::String
        };

        Token::new(kind, value, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        match &result {
            Ok(token) if token.is(TokenKind::Eof) => self.finished = true,
            Err(_) => self.finished = true,
            Ok(token) => log::trace!("token {} {:?} at {}", token.kind, token.value, token.position),
        }
        Some(result)
    }
}

/// Tokenize the whole input (mostly useful for tests and tooling)
pub fn tokenize(source: &str) -> Result<Vec<Token>, QueryError> {
    Lexer::new(source).collect()
}

/// Cursor over the lexer with arbitrary lookahead
///
/// Tokens are pulled from the lexer only when needed; once the input is
/// exhausted every further read returns the `Eof` token.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: VecDeque<Token>,
    eof: Option<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: VecDeque::new(),
            eof: None,
        }
    }

    fn fill(&mut self, n: usize) -> Result<(), QueryError> {
        while self.buffer.len() <= n {
            if let Some(eof) = &self.eof {
                self.buffer.push_back(eof.clone());
                continue;
            }

            match self.lexer.next() {
                Some(token) => {
                    let token = token?;
                    if token.is(TokenKind::Eof) {
                        self.eof = Some(token.clone());
                    }
                    self.buffer.push_back(token);
                }
                None => {
                    let eof = Token::new(TokenKind::Eof, "", self.lexer.pos);
                    self.eof = Some(eof);
                }
            }
        }
        Ok(())
    }

    /// Look at the token `n` positions ahead without consuming anything
    pub fn peek(&mut self, n: usize) -> Result<&Token, QueryError> {
        self.fill(n)?;
        Ok(&self.buffer[n])
    }

    pub fn peek_kind(&mut self, n: usize) -> Result<TokenKind, QueryError> {
        Ok(self.peek(n)?.kind)
    }

    pub fn next_token(&mut self) -> Result<Token, QueryError> {
        self.fill(0)?;
        self.buffer
            .pop_front()
            .ok_or_else(|| QueryError::syntax(self.lexer.pos, "unexpected end of input"))
    }

    /// Consume the next token if it has the given kind
    pub fn skip_if(&mut self, kind: TokenKind) -> Result<bool, QueryError> {
        if self.peek_kind(0)? == kind {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the next token, failing unless it has the given kind
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, QueryError> {
        let token = self.next_token()?;
        if token.is(kind) {
            Ok(token)
        } else {
            Err(unexpected(&token, &kind.to_string()))
        }
    }
}

pub(crate) fn unexpected(token: &Token, expected: &str) -> QueryError {
    let found = if token.kind.is_value() {
        format!("{} \"{}\"", token.kind, token.value)
    } else {
        token.kind.to_string()
    };
    QueryError::syntax(token.position, format!("expected {expected}, found {found}"))
}
