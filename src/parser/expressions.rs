use crate::codegen::{c, Emitter};
use crate::compiler::CompilerOptions;
use crate::lexer::{Keyword, Scanner, Token, TokenKind};
use crate::parser::ParserError;
use crate::symbol::{SymbolKind, SymbolTable};
use crate::types::{TypeForm, TypeId, TypeRegistry};

/// Whether declarations being parsed belong to the module or to a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionScope {
    Module,
    Procedure,
}

/// What a parsed designator denotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Designator {
    pub name: String,
    /// Type of the designator used as a value.
    pub data_type: TypeId,
    /// Type produced by calling it.
    pub call_type: TypeId,
    /// Parameter types when it names a procedure of this module.
    pub params: Option<Vec<TypeId>>,
    pub assignable: bool,
}

/// Single-pass parser. Every routine consumes tokens and writes target text
/// for what it recognized; no tree is built.
pub struct Parser<E: Emitter> {
    pub(crate) scanner: Scanner,
    pub(crate) token: Token,
    pub(crate) symbols: SymbolTable,
    pub(crate) types: TypeRegistry,
    pub(crate) emitter: E,
    pub(crate) module_name: String,
    pub(crate) scope: DefinitionScope,
    /// First symbol index belonging to the innermost open scope.
    pub(crate) scope_floor: usize,
    /// Declared result type of the procedure being parsed.
    pub(crate) return_type: TypeId,
}

impl<E: Emitter> Parser<E> {
    /// Set up a fresh symbol table and type registry and read the first token.
    /// # Errors
    /// If the reserved words do not fit the configured capacities, or the first
    /// token is malformed
    pub fn new(source: &str, options: &CompilerOptions, emitter: E) -> Result<Self, ParserError> {
        let mut symbols = SymbolTable::new(options.max_symbols, options.name_buffer_size);
        symbols.seed_reserved_words()?;
        let mut scanner = Scanner::new(source);
        let token = scanner.next_token(&symbols)?;
        Ok(Self {
            scanner,
            token,
            scope_floor: symbols.len(),
            symbols,
            types: TypeRegistry::new(),
            emitter,
            module_name: String::new(),
            scope: DefinitionScope::Module,
            return_type: TypeId::UNKNOWN,
        })
    }

    /// Current source line, for diagnostics.
    #[must_use]
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    #[must_use]
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    #[must_use]
    pub fn type_registry(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }

    /// Move to the next token
    pub(crate) fn advance(&mut self) -> Result<Token, ParserError> {
        let next = self.scanner.next_token(&self.symbols)?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.token.kind == *kind
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.token.kind == TokenKind::Keyword(keyword)
    }

    /// Consume the current token if it has the given kind
    pub(crate) fn accept(&mut self, kind: &TokenKind) -> Result<bool, ParserError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn accept_keyword(&mut self, keyword: Keyword) -> Result<bool, ParserError> {
        self.accept(&TokenKind::Keyword(keyword))
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParserError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.expected(&format!("'{kind}'")))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ParserError> {
        self.expect(&TokenKind::Keyword(keyword))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParserError> {
        if self.check(&TokenKind::Identifier) {
            Ok(self.advance()?.lexeme)
        } else {
            Err(self.expected("Identifier"))
        }
    }

    pub(crate) fn expected(&self, what: &str) -> ParserError {
        ParserError::ExpectedToken(what.to_string(), self.found())
    }

    /// Text of the current token for diagnostics.
    pub(crate) fn found(&self) -> String {
        match self.token.kind {
            TokenKind::Eof => "EOF".to_string(),
            _ => self.token.lexeme.clone(),
        }
    }

    pub(crate) fn emit(&mut self, text: &str) {
        self.emitter.emit(text);
    }

    /// Run `f` with emission redirected into a buffer. The capture is closed
    /// whether or not `f` succeeds.
    pub(crate) fn captured<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<(T, String), ParserError> {
        self.emitter.begin_capture();
        let result = f(self);
        let text = self.emitter.end_capture();
        result.map(|value| (value, text))
    }

    /// Parse an expression
    pub(crate) fn parse_expression(&mut self) -> Result<TypeId, ParserError> {
        self.emit("(");
        let left = self.parse_simple_expression()?;
        self.emit(")");

        if !c::is_relation(&self.token.kind) {
            return Ok(left);
        }
        self.emit_operator();
        self.advance()?;
        self.emit("(");
        let right = self.parse_simple_expression()?;
        self.types.check(left, right)?;
        self.emit(")");
        Ok(TypeId::BOOLEAN)
    }

    fn parse_simple_expression(&mut self) -> Result<TypeId, ParserError> {
        if self.accept(&TokenKind::Minus)? {
            self.emit("-");
        } else {
            self.accept(&TokenKind::Plus)?;
        }

        let left = self.parse_term()?;
        while c::is_add_operator(&self.token.kind) {
            self.emit_operator();
            self.advance()?;
            let right = self.parse_term()?;
            self.types.check(left, right)?;
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<TypeId, ParserError> {
        self.emit("(");
        let left = self.parse_factor()?;
        while c::is_mul_operator(&self.token.kind) {
            self.emit_operator();
            self.advance()?;
            let right = self.parse_factor()?;
            self.types.check(left, right)?;
        }
        self.emit(")");
        Ok(left)
    }

    fn emit_operator(&mut self) {
        if let Some(op) = c::operator(&self.token.kind) {
            self.emitter.emit(op);
        }
    }

    fn parse_factor(&mut self) -> Result<TypeId, ParserError> {
        match self.token.kind.clone() {
            TokenKind::Number(class) => {
                let token = self.advance()?;
                self.emit(&token.lexeme);
                Ok(TypeId::of_number(class))
            }
            TokenKind::CharLiteral => {
                let token = self.advance()?;
                self.emit(&token.lexeme);
                Ok(TypeId::CHAR)
            }
            TokenKind::StringLiteral => {
                let token = self.advance()?;
                self.emit(&token.lexeme);
                Ok(TypeId::STRING)
            }
            TokenKind::OpenParen => {
                self.advance()?;
                self.emit("(");
                let ty = self.parse_expression()?;
                self.expect(&TokenKind::CloseParen)?;
                self.emit(")");
                Ok(ty)
            }
            TokenKind::Tilde => {
                self.advance()?;
                self.emit("!");
                let ty = self.parse_factor()?;
                self.types.check(ty, TypeId::BOOLEAN)?;
                Ok(TypeId::BOOLEAN)
            }
            TokenKind::Keyword(Keyword::Abs) => self.parse_abs(),
            TokenKind::Keyword(Keyword::Odd) => {
                self.parse_unary_builtin("((", ") & 1)", Some(TypeId::INTEGER), TypeId::BOOLEAN)
            }
            TokenKind::Keyword(Keyword::Ash) => self.parse_ash(),
            TokenKind::Keyword(Keyword::Ord) => self.parse_unary_builtin("((int)(", "))", None, TypeId::INTEGER),
            TokenKind::Keyword(Keyword::Chr) => {
                self.parse_unary_builtin("((char)(", "))", Some(TypeId::INTEGER), TypeId::CHAR)
            }
            TokenKind::Keyword(Keyword::Floor) => {
                self.parse_unary_builtin("((long)floor(", "))", Some(TypeId::REAL), TypeId::LONGINT)
            }
            TokenKind::Identifier => {
                let designator = self.parse_designator()?;
                if self.check(&TokenKind::OpenParen) {
                    self.parse_actual_parameters(&designator)?;
                    Ok(designator.call_type)
                } else {
                    Ok(designator.data_type)
                }
            }
            _ => Err(ParserError::FactorExpected(self.found())),
        }
    }

    /// `NAME(expr)` wrapped in a fixed prefix and suffix.
    fn parse_unary_builtin(
        &mut self,
        prefix: &str,
        suffix: &str,
        operand: Option<TypeId>,
        result: TypeId,
    ) -> Result<TypeId, ParserError> {
        self.advance()?;
        self.expect(&TokenKind::OpenParen)?;
        self.emit(prefix);
        let ty = self.parse_expression()?;
        if let Some(expected) = operand {
            self.types.check(ty, expected)?;
        }
        self.emit(suffix);
        self.expect(&TokenKind::CloseParen)?;
        Ok(result)
    }

    /// The operand is rendered first so its type can pick the idiom.
    fn parse_abs(&mut self) -> Result<TypeId, ParserError> {
        self.advance()?;
        self.expect(&TokenKind::OpenParen)?;
        let (ty, operand) = self.captured(Self::parse_expression)?;
        self.expect(&TokenKind::CloseParen)?;
        let function = if ty.is_real() { "fabs" } else { "abs" };
        self.emit(&format!("{function}({operand})"));
        Ok(ty)
    }

    fn parse_ash(&mut self) -> Result<TypeId, ParserError> {
        self.advance()?;
        self.expect(&TokenKind::OpenParen)?;
        let call = format!("{}(", c::ash_macro(&self.module_name));
        self.emit(&call);
        let value = self.parse_expression()?;
        self.types.check(value, TypeId::INTEGER)?;
        self.expect(&TokenKind::Comma)?;
        self.emit(", ");
        let shift = self.parse_expression()?;
        self.types.check(shift, TypeId::INTEGER)?;
        self.expect(&TokenKind::CloseParen)?;
        self.emit(")");
        Ok(value)
    }

    /// Parse and emit `[Module.]name{[index]}`.
    pub(crate) fn parse_designator(&mut self) -> Result<Designator, ParserError> {
        if !self.check(&TokenKind::Identifier) {
            return Err(self.expected("Identifier"));
        }
        let name = self.token.lexeme.clone();
        let index = self
            .symbols
            .find(&name)
            .ok_or_else(|| ParserError::UndeclaredIdentifier(name.clone()))?;
        let target = self.symbols.resolve_alias(index);
        self.expect(&TokenKind::Identifier)?;

        let (owner, member, entry) = match self.symbols.get(target).kind {
            SymbolKind::ThisModule => {
                self.expect(&TokenKind::Dot)?;
                let member = self.expect_identifier()?;
                let entry = self
                    .symbols
                    .find(&member)
                    .ok_or_else(|| ParserError::UndeclaredIdentifier(format!("{name}.{member}")))?;
                (self.module_name.clone(), member, Some(entry))
            }
            SymbolKind::Import => {
                let owner = self.symbols.name(target).to_string();
                self.expect(&TokenKind::Dot)?;
                let member = self.expect_identifier()?;
                (owner, member, None)
            }
            _ => (self.module_name.clone(), name, Some(index)),
        };

        let mut designator = match entry {
            Some(entry) => self.describe(entry, &member)?,
            None => Designator {
                name: member.clone(),
                data_type: TypeId::UNKNOWN,
                call_type: TypeId::UNKNOWN,
                params: None,
                assignable: true,
            },
        };
        self.emit(&c::mangle(&owner, &member));

        while self.accept(&TokenKind::OpenBracket)? {
            let element = self.types.element_type(designator.data_type)?;
            self.emit("[");
            let index_type = self.parse_expression()?;
            self.types.check(index_type, TypeId::INTEGER)?;
            self.expect(&TokenKind::CloseBracket)?;
            self.emit("]");
            designator.data_type = element;
            designator.call_type = TypeId::UNKNOWN;
            designator.params = None;
        }

        Ok(designator)
    }

    fn describe(&self, entry: usize, name: &str) -> Result<Designator, ParserError> {
        let symbol = self.symbols.get(entry);
        let (data_type, call_type, params, assignable) = match &symbol.kind {
            SymbolKind::Procedure { params, .. } => (TypeId::PROC, symbol.data_type, Some(params.clone()), false),
            SymbolKind::Constant => (symbol.data_type, TypeId::UNKNOWN, None, false),
            SymbolKind::Variable { .. } | SymbolKind::Parameter => {
                (symbol.data_type, TypeId::UNKNOWN, None, true)
            }
            _ => return Err(ParserError::IllKinded(name.to_string())),
        };
        Ok(Designator {
            name: name.to_string(),
            data_type,
            call_type,
            params,
            assignable,
        })
    }

    /// Parse and emit `(arg, ...)`. Arguments to procedures of this module are
    /// counted, and checked against built-in scalar parameter types.
    pub(crate) fn parse_actual_parameters(&mut self, callee: &Designator) -> Result<(), ParserError> {
        self.expect(&TokenKind::OpenParen)?;
        self.emit("(");
        let mut args = Vec::new();
        if !self.check(&TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.accept(&TokenKind::Comma)? {
                    break;
                }
                self.emit(", ");
            }
        }
        self.expect(&TokenKind::CloseParen)?;
        self.emit(")");

        if let Some(params) = &callee.params {
            self.check_arguments(&callee.name, params, &args)?;
        }
        Ok(())
    }

    pub(crate) fn check_arguments(&self, name: &str, params: &[TypeId], args: &[TypeId]) -> Result<(), ParserError> {
        if params.len() != args.len() {
            return Err(ParserError::ArgumentCount {
                name: name.to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }
        for (&param, &arg) in params.iter().zip(args) {
            if param.is_builtin() && self.types.form(param) == TypeForm::Scalar {
                self.types.check(param, arg)?;
            }
        }
        Ok(())
    }
}
