use std::fmt;

/// Token kinds of the filter query language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Identifier,
    String,
    Integer,
    Float,

    // Structural characters
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Multiply,
    Minus,
    Comma,
    Semicolon,
    Colon,
    Negate,
    LowerThan,
    GreaterThan,
    Equals,
    Tilde,
    QuestionMark,

    Eof,
}

impl TokenKind {
    /// Token produced by a structural character, if `c` is one
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBrace,
            ']' => TokenKind::CloseBrace,
            '*' => TokenKind::Multiply,
            '-' => TokenKind::Minus,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '!' => TokenKind::Negate,
            '<' => TokenKind::LowerThan,
            '>' => TokenKind::GreaterThan,
            '=' => TokenKind::Equals,
            '~' => TokenKind::Tilde,
            '?' => TokenKind::QuestionMark,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that can stand for a value literal
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::String | TokenKind::Integer | TokenKind::Float
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenBrace => "'['",
            TokenKind::CloseBrace => "']'",
            TokenKind::Multiply => "'*'",
            TokenKind::Minus => "'-'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Negate => "'!'",
            TokenKind::LowerThan => "'<'",
            TokenKind::GreaterThan => "'>'",
            TokenKind::Equals => "'='",
            TokenKind::Tilde => "'~'",
            TokenKind::QuestionMark => "'?'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A token with its materialized value and character offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Value as it should be used: quotes stripped and `""` unescaped
    pub value: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
