use crate::codegen::{c, Emitter};
use crate::lexer::{Keyword, NumberClass, TokenKind};
use crate::parser::{DefinitionScope, Parser, ParserError};
use crate::symbol::SymbolKind;
use crate::types::{TypeForm, TypeId};

/// A resolved type together with the declarator text that wraps a name:
/// `int` + `[10]` for `ARRAY 10 OF INTEGER`, `void (*` + `)()` for
/// `PROCEDURE`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub id: TypeId,
    pub prefix: String,
    pub suffix: String,
}

impl TypeSpec {
    fn new(id: TypeId, prefix: impl Into<String>) -> Self {
        Self {
            id,
            prefix: prefix.into(),
            suffix: String::new(),
        }
    }
}

impl<E: Emitter> Parser<E> {
    /// `MODULE name; [IMPORT ...;] {declarations} [BEGIN stmts] END name.`
    ///
    /// `header_name` is how the implementation unit includes its own
    /// interface unit.
    pub fn parse_module(&mut self, header_name: &str) -> Result<(), ParserError> {
        self.expect_keyword(Keyword::Module)?;
        let name = self.expect_identifier()?;
        self.scope_floor = self.symbols.len();
        self.symbols.add(&name, SymbolKind::ThisModule, TypeId::UNKNOWN)?;
        self.module_name = name;
        self.scope = DefinitionScope::Module;
        self.expect(&TokenKind::Semicolon)?;
        tracing::debug!(module = %self.module_name, "compiling module");

        let prelude = c::interface_prelude(&self.module_name);
        self.emitter.emit_interface(&prelude);

        while self.accept_keyword(Keyword::Import)? {
            self.parse_import_list()?;
        }
        self.emit(&c::include(header_name));
        self.emit("\n");

        loop {
            if self.accept_keyword(Keyword::Const)? {
                self.parse_constant_declarations()?;
            } else if self.accept_keyword(Keyword::Var)? {
                self.parse_variable_declarations()?;
            } else if self.accept_keyword(Keyword::Procedure)? {
                self.parse_procedure_declaration()?;
            } else {
                break;
            }
        }

        let prologue = c::init_prologue(&self.module_name);
        self.emit(&prologue);
        self.return_type = TypeId::UNKNOWN;
        if self.accept_keyword(Keyword::Begin)? {
            self.parse_statement_sequence()?;
        }
        self.emit("}\n");

        self.expect_keyword(Keyword::End)?;
        let module = self.module_name.clone();
        self.expect_closing_name(&module)?;
        self.expect(&TokenKind::Dot)?;
        self.expect(&TokenKind::Eof)?;

        let epilogue = c::interface_epilogue(&self.module_name);
        self.emitter.emit_interface(&epilogue);
        tracing::debug!(
            module = %self.module_name,
            symbols = self.symbols.len(),
            types = self.types.len(),
            "module complete"
        );
        Ok(())
    }

    /// `Name` or `Alias := Name`, comma separated, closed by `;`.
    fn parse_import_list(&mut self) -> Result<(), ParserError> {
        loop {
            if self.check(&TokenKind::Identifier) {
                let name = self.expect_identifier()?;
                self.ensure_unique(&name)?;
                let module = if self.accept(&TokenKind::Assign)? {
                    let real = self.expect_identifier()?;
                    self.ensure_unique(&real)?;
                    let target = self.symbols.add(&real, SymbolKind::Import, TypeId::UNKNOWN)?;
                    self.symbols.add(&name, SymbolKind::Alias(target), TypeId::UNKNOWN)?;
                    real
                } else {
                    self.symbols.add(&name, SymbolKind::Import, TypeId::UNKNOWN)?;
                    name
                };
                self.emit(&c::include(&format!("{module}.h")));
            }
            if !self.accept(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(())
    }

    /// Fails if `name` was already declared in the innermost open scope.
    pub(crate) fn ensure_unique(&self, name: &str) -> Result<(), ParserError> {
        match self.symbols.find(name) {
            Some(index) if index >= self.scope_floor => Err(ParserError::DuplicateIdentifier(name.to_string())),
            _ => Ok(()),
        }
    }

    fn expect_closing_name(&mut self, expected: &str) -> Result<(), ParserError> {
        let found = self.expect_identifier()?;
        if found != expected {
            return Err(ParserError::NameMismatch {
                expected: expected.to_string(),
                found,
            });
        }
        Ok(())
    }

    fn parse_constant_declarations(&mut self) -> Result<(), ParserError> {
        while self.check(&TokenKind::Identifier) {
            let name = self.expect_identifier()?;
            let exported = self.accept(&TokenKind::Asterisk)?;
            self.expect(&TokenKind::Equal)?;
            let (value, ty) = self.parse_constant_value()?;
            self.expect(&TokenKind::Semicolon)?;

            self.ensure_unique(&name)?;
            self.symbols.add(&name, SymbolKind::Constant, ty)?;
            let define = c::define(&self.module_name, &name, &value);
            if exported {
                self.emitter.emit_interface(&define);
            } else {
                self.emit(&define);
            }
        }
        Ok(())
    }

    fn parse_constant_value(&mut self) -> Result<(String, TypeId), ParserError> {
        let negated = self.accept(&TokenKind::Minus)?;
        match self.token.kind {
            TokenKind::Number(class @ (NumberClass::Integer | NumberClass::Real)) => {
                let literal = self.advance()?.lexeme;
                let value = if negated { format!("(-{literal})") } else { literal };
                Ok((value, TypeId::of_number(class)))
            }
            TokenKind::Number(class) if !negated => Ok((self.advance()?.lexeme, TypeId::of_number(class))),
            TokenKind::CharLiteral if !negated => Ok((self.advance()?.lexeme, TypeId::CHAR)),
            TokenKind::StringLiteral if !negated => Ok((self.advance()?.lexeme, TypeId::STRING)),
            _ => Err(ParserError::ConstantExpected),
        }
    }

    /// `a, b*: T;` lines. Names are entered before their type is known and
    /// back-filled once it is.
    fn parse_variable_declarations(&mut self) -> Result<(), ParserError> {
        while self.check(&TokenKind::Identifier) {
            let first = self.symbols.len();
            loop {
                let name = self.expect_identifier()?;
                let exported = self.accept(&TokenKind::Asterisk)?;
                if exported && self.scope == DefinitionScope::Procedure {
                    return Err(ParserError::ExportedLocal(name));
                }
                self.ensure_unique(&name)?;
                self.symbols.add(&name, SymbolKind::Variable { exported }, TypeId::UNKNOWN)?;
                if !self.accept(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            self.expect(&TokenKind::Semicolon)?;

            for index in first..self.symbols.len() {
                self.symbols.get_mut(index).data_type = ty.id;
                let exported = matches!(self.symbols.get(index).kind, SymbolKind::Variable { exported: true });
                let decl = c::declarator(&ty.prefix, &self.module_name, self.symbols.name(index), &ty.suffix);
                match (self.scope, exported) {
                    (DefinitionScope::Module, true) => {
                        self.emit(&format!("{decl};\n"));
                        self.emitter.emit_interface(&format!("extern {decl};\n"));
                    }
                    (DefinitionScope::Module, false) => self.emit(&format!("static {decl};\n")),
                    (DefinitionScope::Procedure, _) => self.emit(&format!("{decl};\n")),
                }
            }
        }
        Ok(())
    }

    /// Parse a type expression
    pub(crate) fn parse_type(&mut self) -> Result<TypeSpec, ParserError> {
        if self.accept_keyword(Keyword::Pointer)? {
            if self.accept_keyword(Keyword::To)? {
                let base = self.parse_basic_type()?;
                let id = self.types.allocate(TypeForm::Pointer, base.id, 0);
                return Ok(TypeSpec::new(id, format!("{} *", base.prefix)));
            }
            let id = self.types.allocate(TypeForm::Pointer, TypeId::UNKNOWN, 0);
            return Ok(TypeSpec::new(id, "void *"));
        }

        if self.accept_keyword(Keyword::Array)? {
            let (size, length) = self.parse_array_size()?;
            self.expect_keyword(Keyword::Of)?;
            if self.check_keyword(Keyword::Array) {
                return Err(ParserError::MultiDimensionalArray);
            }
            let element = self.parse_type()?;
            let id = self.types.allocate(TypeForm::Array, element.id, length);
            return Ok(TypeSpec {
                id,
                prefix: element.prefix,
                suffix: format!("[{size}]{}", element.suffix),
            });
        }

        if self.accept_keyword(Keyword::Procedure)? {
            return Ok(TypeSpec {
                id: TypeId::PROC,
                prefix: "void (*".to_string(),
                suffix: ")()".to_string(),
            });
        }

        self.parse_basic_type()
    }

    /// A built-in type name, `Module.Name`, or a name passed through to the
    /// target verbatim.
    fn parse_basic_type(&mut self) -> Result<TypeSpec, ParserError> {
        if let TokenKind::Keyword(keyword) = self.token.kind {
            if let Some(name) = c::builtin_type_name(keyword) {
                self.advance()?;
                return Ok(TypeSpec::new(TypeId::of_keyword(keyword), name));
            }
        }
        if !self.check(&TokenKind::Identifier) {
            return Err(ParserError::TypeExpected(self.found()));
        }

        let name = self.token.lexeme.clone();
        let Some(index) = self.symbols.find(&name) else {
            self.advance()?;
            return Ok(TypeSpec::new(TypeId::UNKNOWN, name));
        };
        let target = self.symbols.resolve_alias(index);
        match self.symbols.get(target).kind {
            SymbolKind::Import | SymbolKind::ThisModule => {
                let owner = self.symbols.name(target).to_string();
                self.advance()?;
                self.expect(&TokenKind::Dot)?;
                let member = self.expect_identifier()?;
                Ok(TypeSpec::new(TypeId::UNKNOWN, c::mangle(&owner, &member)))
            }
            _ => Err(ParserError::TypeExpected(name)),
        }
    }

    /// Array length: a number or a (possibly qualified) constant. Returns the
    /// target spelling and the length when it is known.
    fn parse_array_size(&mut self) -> Result<(String, usize), ParserError> {
        if self.check(&TokenKind::Number(NumberClass::Integer)) {
            let literal = self.advance()?.lexeme;
            let length = match literal.strip_prefix("0x") {
                Some(hex) => usize::from_str_radix(hex, 16).unwrap_or(0),
                None => literal.parse().unwrap_or(0),
            };
            return Ok((literal, length));
        }
        if !self.check(&TokenKind::Identifier) {
            return Err(ParserError::ArraySizeExpected);
        }

        let name = self.token.lexeme.clone();
        let index = self.symbols.find(&name).ok_or(ParserError::ArraySizeExpected)?;
        let target = self.symbols.resolve_alias(index);
        match self.symbols.get(target).kind {
            SymbolKind::Import | SymbolKind::ThisModule => {
                let owner = self.symbols.name(target).to_string();
                self.advance()?;
                self.expect(&TokenKind::Dot)?;
                let member = self.expect_identifier()?;
                Ok((c::mangle(&owner, &member), 0))
            }
            SymbolKind::Constant => {
                self.advance()?;
                Ok((c::mangle(&self.module_name, &name), 0))
            }
            _ => Err(ParserError::ArraySizeExpected),
        }
    }

    /// `PROCEDURE name[*] [(params)] [: T]; {VAR ...} [BEGIN stmts] END name;`
    fn parse_procedure_declaration(&mut self) -> Result<(), ParserError> {
        let name = self.expect_identifier()?;
        let exported = self.accept(&TokenKind::Asterisk)?;
        self.ensure_unique(&name)?;
        let entry = self.symbols.add(
            &name,
            SymbolKind::Procedure {
                exported,
                params: Vec::new(),
            },
            TypeId::UNKNOWN,
        )?;

        let mark = self.symbols.mark();
        let saved_floor = std::mem::replace(&mut self.scope_floor, mark.first_entry());
        self.scope = DefinitionScope::Procedure;

        let result = self.parse_procedure_rest(entry, &name, exported);

        self.symbols.release(mark);
        self.scope_floor = saved_floor;
        self.scope = DefinitionScope::Module;
        self.return_type = TypeId::UNKNOWN;
        result
    }

    /// Everything after the procedure name, parsed inside the procedure scope.
    fn parse_procedure_rest(&mut self, entry: usize, name: &str, exported: bool) -> Result<(), ParserError> {
        let mut params = Vec::new();
        let mut args = Vec::new();

        if self.accept(&TokenKind::OpenParen)? {
            if !self.check(&TokenKind::CloseParen) {
                loop {
                    if self.check_keyword(Keyword::Var) {
                        return Err(ParserError::VarParameter);
                    }
                    let first = self.symbols.len();
                    loop {
                        let param = self.expect_identifier()?;
                        self.ensure_unique(&param)?;
                        self.symbols.add(&param, SymbolKind::Parameter, TypeId::UNKNOWN)?;
                        if !self.accept(&TokenKind::Comma)? {
                            break;
                        }
                    }
                    self.expect(&TokenKind::Colon)?;
                    let ty = self.parse_type()?;
                    for index in first..self.symbols.len() {
                        self.symbols.get_mut(index).data_type = ty.id;
                        params.push(ty.id);
                        args.push(c::declarator(
                            &ty.prefix,
                            &self.module_name,
                            self.symbols.name(index),
                            &ty.suffix,
                        ));
                    }
                    if !self.accept(&TokenKind::Semicolon)? {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::CloseParen)?;
        }

        let result = if self.accept(&TokenKind::Colon)? {
            self.parse_type()?
        } else {
            TypeSpec::new(TypeId::UNKNOWN, "void")
        };
        self.expect(&TokenKind::Semicolon)?;

        let symbol = self.symbols.get_mut(entry);
        symbol.data_type = result.id;
        if let SymbolKind::Procedure { params: slot, .. } = &mut symbol.kind {
            slot.clone_from(&params);
        }
        self.return_type = result.id;

        let arg_list = if args.is_empty() { "void".to_string() } else { args.join(", ") };
        let signature = format!(
            "{} {}({}){}",
            result.prefix,
            c::mangle(&self.module_name, name),
            arg_list,
            result.suffix
        );
        let linkage = if exported { "" } else { "static " };
        self.emit(&format!("\n{linkage}{signature} {{\n"));
        if exported {
            self.emitter.emit_interface(&format!("extern {signature};\n"));
        }

        while self.accept_keyword(Keyword::Var)? {
            self.parse_variable_declarations()?;
        }
        if self.accept_keyword(Keyword::Begin)? {
            self.parse_statement_sequence()?;
        }
        self.expect_keyword(Keyword::End)?;
        self.expect_closing_name(name)?;
        self.expect(&TokenKind::Semicolon)?;
        self.emit("}\n");

        tracing::debug!(procedure = name, exported, params = params.len(), "emitted procedure");
        Ok(())
    }
}
