use crate::lexer::{Keyword, LexerError, NumberClass, Position, Token, TokenKind};
use crate::symbol::{SymbolKind, SymbolTable};

/// On-demand scanner. Tokens are produced one at a time because identifier
/// classification consults the symbol table as it stands when the token is
/// read.
pub struct Scanner {
    input: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Line the scanner has reached; diagnostics report this.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan the next token.
    /// # Errors
    /// Fails on characters the language does not use and on malformed numbers.
    pub fn next_token(&mut self, symbols: &SymbolTable) -> Result<Token, LexerError> {
        loop {
            self.skip_whitespace();
            if self.peek() == Some('(') && self.peek_ahead(1) == Some('*') {
                self.advance();
                self.advance();
                self.skip_comment();
                continue;
            }
            break;
        }

        let start_pos = self.current_position();
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, start_pos, String::new()));
        };

        if ch.is_ascii_alphabetic() {
            return Ok(self.scan_identifier(start_pos, symbols));
        }
        if ch.is_ascii_digit() {
            return self.scan_number(start_pos);
        }
        if ch == '"' || ch == '\'' {
            return Ok(self.scan_literal(start_pos, ch));
        }

        self.advance();
        let kind = match ch {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Equal,
            '#' => TokenKind::NotEqual,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '&' => TokenKind::Ampersand,
            '~' => TokenKind::Tilde,
            ':' => {
                if self.match_char('=') {
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            other => return Err(LexerError::UnexpectedChar(other)),
        };

        let lexeme = kind.to_string();
        Ok(Token::new(kind, start_pos, lexeme))
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.current + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Skips a `(* ... *)` comment whose opener was already consumed.
    /// Comments nest; an unclosed one swallows the rest of the input.
    fn skip_comment(&mut self) {
        let mut level = 1usize;
        while level > 0 {
            match self.advance() {
                None => return,
                Some('(') if self.peek() == Some('*') => {
                    self.advance();
                    level += 1;
                }
                Some('*') if self.peek() == Some(')') => {
                    self.advance();
                    level -= 1;
                }
                Some(_) => {}
            }
        }
    }

    fn scan_identifier(&mut self, start_pos: Position, symbols: &SymbolTable) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_alphanumeric) {
            text.push(ch);
            self.advance();
        }

        let keyword = symbols.find(&text).and_then(|index| match symbols.get(index).kind {
            SymbolKind::Reserved(keyword) => Some(keyword),
            _ => None,
        });

        match keyword {
            Some(Keyword::True) => Token::new(TokenKind::Number(NumberClass::Boolean), start_pos, "true".into()),
            Some(Keyword::False) => Token::new(TokenKind::Number(NumberClass::Boolean), start_pos, "false".into()),
            Some(Keyword::Nil) => Token::new(TokenKind::Number(NumberClass::Nil), start_pos, "NULL".into()),
            Some(keyword) => Token::new(TokenKind::Keyword(keyword), start_pos, text),
            None => Token::new(TokenKind::Identifier, start_pos, text),
        }
    }

    fn scan_number(&mut self, start_pos: Position) -> Result<Token, LexerError> {
        let mut digits = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_hexdigit) {
            digits.push(ch);
            self.advance();
        }

        if self.match_char('H') {
            return Ok(Token::new(
                TokenKind::Number(NumberClass::Integer),
                start_pos,
                format!("0x{digits}"),
            ));
        }
        if self.match_char('X') {
            return Ok(Token::new(TokenKind::CharLiteral, start_pos, format!("0x{digits}")));
        }
        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(LexerError::InvalidNumber(digits));
        }
        if !self.match_char('.') {
            return Ok(Token::new(TokenKind::Number(NumberClass::Integer), start_pos, digits));
        }

        digits.push('.');
        self.push_decimal_digits(&mut digits);
        if let Some(marker) = self.peek().filter(|ch| *ch == 'E' || *ch == 'e') {
            digits.push(marker);
            self.advance();
            if let Some(sign) = self.peek().filter(|ch| *ch == '+' || *ch == '-') {
                digits.push(sign);
                self.advance();
            }
            if !self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                return Err(LexerError::MissingExponentDigits);
            }
            self.push_decimal_digits(&mut digits);
        }

        Ok(Token::new(TokenKind::Number(NumberClass::Real), start_pos, digits))
    }

    fn push_decimal_digits(&mut self, buf: &mut String) {
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            buf.push(ch);
            self.advance();
        }
    }

    /// Character and string literals are copied verbatim, delimiters included.
    fn scan_literal(&mut self, start_pos: Position, quote: char) -> Token {
        let mut text = String::new();
        text.push(quote);
        self.advance();
        while let Some(ch) = self.advance() {
            if ch == quote {
                break;
            }
            text.push(ch);
        }
        text.push(quote);

        let kind = if quote == '"' {
            TokenKind::StringLiteral
        } else {
            TokenKind::CharLiteral
        };
        Token::new(kind, start_pos, text)
    }
}

/// Tokenize a whole source text against a table holding only the reserved
/// words. Useful for dumping token streams; compilation scans lazily.
/// # Errors
/// Returns the first lexical error encountered.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    let symbols = SymbolTable::reserved_words();
    let mut scanner = Scanner::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token(&symbols)?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
