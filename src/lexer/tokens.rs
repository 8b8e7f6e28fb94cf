use std::fmt;

/// Position in source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Reserved words. Each one is seeded into the symbol table when a module
/// compilation starts, and the scanner re-tags identifiers that resolve to
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Module,
    Begin,
    End,
    Import,
    Const,
    Var,
    Procedure,
    If,
    Then,
    Elsif,
    Else,
    While,
    Do,
    Repeat,
    Until,
    Return,
    Array,
    Of,
    Pointer,
    To,
    Inc,
    Dec,
    Break,
    Continue,
    Or,
    Div,
    Mod,
    True,
    False,
    Nil,
    Abs,
    Odd,
    Ash,
    Assert,
    Ord,
    Chr,
    Floor,
    Integer,
    LongInt,
    Real,
    LongReal,
    Boolean,
    Char,
}

impl Keyword {
    pub const ALL: [Keyword; 43] = [
        Keyword::Module,
        Keyword::Begin,
        Keyword::End,
        Keyword::Import,
        Keyword::Const,
        Keyword::Var,
        Keyword::Procedure,
        Keyword::If,
        Keyword::Then,
        Keyword::Elsif,
        Keyword::Else,
        Keyword::While,
        Keyword::Do,
        Keyword::Repeat,
        Keyword::Until,
        Keyword::Return,
        Keyword::Array,
        Keyword::Of,
        Keyword::Pointer,
        Keyword::To,
        Keyword::Inc,
        Keyword::Dec,
        Keyword::Break,
        Keyword::Continue,
        Keyword::Or,
        Keyword::Div,
        Keyword::Mod,
        Keyword::True,
        Keyword::False,
        Keyword::Nil,
        Keyword::Abs,
        Keyword::Odd,
        Keyword::Ash,
        Keyword::Assert,
        Keyword::Ord,
        Keyword::Chr,
        Keyword::Floor,
        Keyword::Integer,
        Keyword::LongInt,
        Keyword::Real,
        Keyword::LongReal,
        Keyword::Boolean,
        Keyword::Char,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Module => "MODULE",
            Keyword::Begin => "BEGIN",
            Keyword::End => "END",
            Keyword::Import => "IMPORT",
            Keyword::Const => "CONST",
            Keyword::Var => "VAR",
            Keyword::Procedure => "PROCEDURE",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Elsif => "ELSIF",
            Keyword::Else => "ELSE",
            Keyword::While => "WHILE",
            Keyword::Do => "DO",
            Keyword::Repeat => "REPEAT",
            Keyword::Until => "UNTIL",
            Keyword::Return => "RETURN",
            Keyword::Array => "ARRAY",
            Keyword::Of => "OF",
            Keyword::Pointer => "POINTER",
            Keyword::To => "TO",
            Keyword::Inc => "INC",
            Keyword::Dec => "DEC",
            Keyword::Break => "BREAK",
            Keyword::Continue => "CONTINUE",
            Keyword::Or => "OR",
            Keyword::Div => "DIV",
            Keyword::Mod => "MOD",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Nil => "NIL",
            Keyword::Abs => "ABS",
            Keyword::Odd => "ODD",
            Keyword::Ash => "ASH",
            Keyword::Assert => "ASSERT",
            Keyword::Ord => "ORD",
            Keyword::Chr => "CHR",
            Keyword::Floor => "FLOOR",
            Keyword::Integer => "INTEGER",
            Keyword::LongInt => "LONGINT",
            Keyword::Real => "REAL",
            Keyword::LongReal => "LONGREAL",
            Keyword::Boolean => "BOOLEAN",
            Keyword::Char => "CHAR",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a numeric-literal token denotes. `TRUE`, `FALSE` and `NIL` arrive as
/// numeric literals spelled the way the target language spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberClass {
    Integer,
    Real,
    Boolean,
    Nil,
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier,
    Number(NumberClass),
    CharLiteral,
    StringLiteral,
    Keyword(Keyword),

    // Punctuation
    OpenParen,          // (
    CloseParen,         // )
    OpenBracket,        // [
    CloseBracket,       // ]
    Comma,              // ,
    Colon,              // :
    Semicolon,          // ;
    Dot,                // .

    // Operators
    Assign,             // :=
    Equal,              // =
    NotEqual,           // #
    Less,               // <
    LessEqual,          // <=
    Greater,            // >
    GreaterEqual,       // >=
    Plus,               // +
    Minus,              // -
    Asterisk,           // *
    Slash,              // /
    Ampersand,          // &
    Tilde,              // ~

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number(_) => write!(f, "number"),
            TokenKind::CharLiteral => write!(f, "character literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Keyword(kw) => write!(f, "{}", kw),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::OpenBracket => write!(f, "["),
            TokenKind::CloseBracket => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Assign => write!(f, ":="),
            TokenKind::Equal => write!(f, "="),
            TokenKind::NotEqual => write!(f, "#"),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Ampersand => write!(f, "&"),
            TokenKind::Tilde => write!(f, "~"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with position information. `lexeme` holds the exact text of
/// identifiers and literals, already rewritten to target spelling where the
/// literal needs it (hex numbers, `TRUE`/`FALSE`/`NIL`).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position, lexeme: String) -> Self {
        Self { kind, pos, lexeme }
    }
}
