use crate::codegen::Emitter;
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{Parser, ParserError};
use crate::types::{TypeError, TypeForm, TypeId};

impl<E: Emitter> Parser<E> {
    /// Tokens that close a statement sequence.
    fn at_sequence_end(&self) -> bool {
        matches!(
            self.token.kind,
            TokenKind::Keyword(Keyword::End | Keyword::Elsif | Keyword::Else | Keyword::Until) | TokenKind::Eof
        )
    }

    pub(crate) fn parse_statement_sequence(&mut self) -> Result<(), ParserError> {
        while !self.at_sequence_end() {
            self.parse_statement()?;
            self.accept(&TokenKind::Semicolon)?;
        }
        Ok(())
    }

    /// Parse a statement
    fn parse_statement(&mut self) -> Result<(), ParserError> {
        match self.token.kind {
            TokenKind::Identifier => self.parse_designator_statement(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Repeat) => self.parse_repeat_statement(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::Inc) => self.parse_inc_dec(true),
            TokenKind::Keyword(Keyword::Dec) => self.parse_inc_dec(false),
            TokenKind::Keyword(Keyword::Assert) => self.parse_assert(),
            TokenKind::Keyword(Keyword::Break) => {
                self.advance()?;
                self.emit("break;\n");
                Ok(())
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance()?;
                self.emit("continue;\n");
                Ok(())
            }
            // empty statement
            TokenKind::Semicolon => Ok(()),
            _ => Err(ParserError::StatementExpected(self.found())),
        }
    }

    /// Assignment, call, or a bare procedure reference. The designator is
    /// rendered into a buffer first because what wraps it depends on what
    /// follows.
    fn parse_designator_statement(&mut self) -> Result<(), ParserError> {
        let (designator, target) = self.captured(Self::parse_designator)?;

        if self.accept(&TokenKind::Assign)? {
            if !designator.assignable {
                return Err(ParserError::NotAssignable(designator.name));
            }
            if self.check(&TokenKind::StringLiteral) {
                if designator.data_type != TypeId::UNKNOWN && self.types.form(designator.data_type) != TypeForm::Array {
                    return Err(TypeError::Mismatch(designator.data_type, TypeId::STRING).into());
                }
                let literal = self.advance()?.lexeme;
                self.emit(&format!("strcpy({target}, {literal})"));
            } else {
                self.emit(&format!("{target} = "));
                let value = self.parse_expression()?;
                self.types.check(designator.data_type, value)?;
            }
        } else if self.check(&TokenKind::OpenParen) {
            self.emit(&target);
            self.parse_actual_parameters(&designator)?;
        } else {
            if let Some(params) = &designator.params {
                self.check_arguments(&designator.name, params, &[])?;
            }
            self.emit(&format!("{target}()"));
        }

        self.emit(";\n");
        Ok(())
    }

    /// `expr` must be usable as a condition.
    fn parse_condition(&mut self) -> Result<(), ParserError> {
        let ty = self.parse_expression()?;
        self.types.check(ty, TypeId::BOOLEAN)?;
        Ok(())
    }

    fn parse_if_statement(&mut self) -> Result<(), ParserError> {
        self.advance()?;
        self.emit("if (");
        self.parse_condition()?;
        self.emit(") {\n");
        self.expect_keyword(Keyword::Then)?;
        self.parse_statement_sequence()?;

        while self.accept_keyword(Keyword::Elsif)? {
            self.emit("} else if (");
            self.parse_condition()?;
            self.emit(") {\n");
            self.expect_keyword(Keyword::Then)?;
            self.parse_statement_sequence()?;
        }

        if self.accept_keyword(Keyword::Else)? {
            self.emit("} else {\n");
            self.parse_statement_sequence()?;
        }

        self.expect_keyword(Keyword::End)?;
        self.emit("}\n");
        Ok(())
    }

    fn parse_while_statement(&mut self) -> Result<(), ParserError> {
        self.advance()?;
        self.emit("while (");
        self.parse_condition()?;
        self.emit(") {\n");
        self.expect_keyword(Keyword::Do)?;
        self.parse_statement_sequence()?;
        self.expect_keyword(Keyword::End)?;
        self.emit("}\n");
        Ok(())
    }

    fn parse_repeat_statement(&mut self) -> Result<(), ParserError> {
        self.advance()?;
        self.emit("do {\n");
        self.parse_statement_sequence()?;
        self.expect_keyword(Keyword::Until)?;
        self.emit("} while (!(");
        self.parse_condition()?;
        self.emit("));\n");
        Ok(())
    }

    fn parse_return_statement(&mut self) -> Result<(), ParserError> {
        self.advance()?;
        if self.at_sequence_end() || self.check(&TokenKind::Semicolon) {
            self.emit("return;\n");
            return Ok(());
        }
        self.emit("return ");
        let ty = self.parse_expression()?;
        self.types.check(self.return_type, ty)?;
        self.emit(";\n");
        Ok(())
    }

    /// `INC(v)` / `INC(v, n)` and the `DEC` counterparts.
    fn parse_inc_dec(&mut self, increment: bool) -> Result<(), ParserError> {
        self.advance()?;
        self.expect(&TokenKind::OpenParen)?;
        let designator = self.parse_designator()?;
        if !designator.assignable {
            return Err(ParserError::NotAssignable(designator.name));
        }
        if self.accept(&TokenKind::Comma)? {
            self.emit(if increment { " += " } else { " -= " });
            let step = self.parse_expression()?;
            self.types.check(designator.data_type, step)?;
        } else {
            self.emit(if increment { "++" } else { "--" });
        }
        self.expect(&TokenKind::CloseParen)?;
        self.emit(";\n");
        Ok(())
    }

    fn parse_assert(&mut self) -> Result<(), ParserError> {
        self.advance()?;
        self.expect(&TokenKind::OpenParen)?;
        self.emit("if (!(");
        self.parse_condition()?;
        self.expect(&TokenKind::CloseParen)?;
        self.emit(")) abort();\n");
        Ok(())
    }
}
