//! Recursive-descent parser with a single token of lookahead.

use std::rc::Rc;

use spi_lex::{Lexer, Token, TokenKind, TokenValue};
use spi_util::{DefIdGenerator, Position};

use crate::ast::*;
use crate::error::ParseError;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    def_ids: DefIdGenerator,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current_token = lexer.next_token()?;
        Ok(Self {
            lexer,
            current_token,
            def_ids: DefIdGenerator::new(),
        })
    }

    /// `program : PROGRAM variable SEMI block DOT`
    ///
    /// Consumes the whole input; anything left over after the trailing DOT
    /// is an error.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let program = self.program()?;
        if self.current_token.kind != TokenKind::Eof {
            return Err(self.unexpected_token());
        }
        Ok(program)
    }

    fn program(&mut self) -> Result<Program, ParseError> {
        self.eat(TokenKind::Program)?;
        let name = self.variable_name()?;
        self.eat(TokenKind::Semi)?;
        let block = self.block()?;
        self.eat(TokenKind::Dot)?;
        Ok(Program { name, block })
    }

    /// `block : declarations compound_statement`
    fn block(&mut self) -> Result<Block, ParseError> {
        let declarations = self.declarations()?;
        let compound_statement = self.compound_statement()?;
        Ok(Block {
            declarations,
            compound_statement,
        })
    }

    /// `declarations : (VAR (variable_declaration SEMI)+)? procedure_declaration*`
    ///
    /// A program may declare at most one `VAR` block: the grammar has no
    /// production for a second one, so it's left for whatever comes next
    /// (`compound_statement`'s `eat(BEGIN)`) to reject as an unexpected
    /// token.
    fn declarations(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        if self.current_token.kind == TokenKind::Var {
            self.eat(TokenKind::Var)?;
            while self.current_token.kind == TokenKind::Id {
                let mut vars = self.variable_declaration()?;
                declarations.append(&mut vars);
                self.eat(TokenKind::Semi)?;
            }
        }

        while self.current_token.kind == TokenKind::Procedure {
            declarations.push(Declaration::Procedure(self.procedure_declaration()?));
        }

        Ok(declarations)
    }

    /// `variable_declaration : ID (COMMA ID)* COLON type_spec`
    fn variable_declaration(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut names = vec![self.variable_name_with_position()?];
        while self.current_token.kind == TokenKind::Comma {
            self.eat(TokenKind::Comma)?;
            names.push(self.variable_name_with_position()?);
        }
        self.eat(TokenKind::Colon)?;
        let type_spec = self.type_spec()?;

        Ok(names
            .into_iter()
            .map(|(var_name, position)| {
                Declaration::Var(VarDecl {
                    var_name,
                    type_spec,
                    position,
                })
            })
            .collect())
    }

    /// `procedure_declaration : PROCEDURE ID (LPAREN formal_parameter_list RPAREN)? SEMI block SEMI`
    fn procedure_declaration(&mut self) -> Result<Rc<ProcedureDecl>, ParseError> {
        self.eat(TokenKind::Procedure)?;
        let position = self.current_token.position;
        let name = self.variable_name()?;

        let params = if self.current_token.kind == TokenKind::LParen {
            self.eat(TokenKind::LParen)?;
            let params = self.formal_parameter_list()?;
            self.eat(TokenKind::RParen)?;
            params
        } else {
            Vec::new()
        };

        self.eat(TokenKind::Semi)?;
        let block = self.block()?;
        self.eat(TokenKind::Semi)?;

        Ok(Rc::new(ProcedureDecl {
            name,
            params,
            block: Rc::new(block),
            position,
            def_id: std::cell::RefCell::new(Some(self.def_ids.next())),
        }))
    }

    /// `formal_parameter_list : formal_parameters | formal_parameters SEMI formal_parameter_list`
    fn formal_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        if self.current_token.kind != TokenKind::Id {
            return Ok(Vec::new());
        }

        let mut params = self.formal_parameters()?;
        while self.current_token.kind == TokenKind::Semi {
            self.eat(TokenKind::Semi)?;
            params.append(&mut self.formal_parameters()?);
        }
        Ok(params)
    }

    /// `formal_parameters : ID (COMMA ID)* COLON type_spec`
    fn formal_parameters(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut names = vec![self.variable_name()?];
        while self.current_token.kind == TokenKind::Comma {
            self.eat(TokenKind::Comma)?;
            names.push(self.variable_name()?);
        }
        self.eat(TokenKind::Colon)?;
        let type_spec = self.type_spec()?;

        Ok(names
            .into_iter()
            .map(|var_name| Param {
                var_name,
                type_spec,
            })
            .collect())
    }

    /// `type_spec : INTEGER | REAL`
    fn type_spec(&mut self) -> Result<Type, ParseError> {
        let type_spec = match self.current_token.kind {
            TokenKind::Integer => Type::Integer,
            TokenKind::Real => Type::Real,
            _ => return Err(self.unexpected_token()),
        };
        self.advance()?;
        Ok(type_spec)
    }

    /// `compound_statement : BEGIN statement_list END`
    fn compound_statement(&mut self) -> Result<Compound, ParseError> {
        self.eat(TokenKind::Begin)?;
        let children = self.statement_list()?;
        self.eat(TokenKind::End)?;
        Ok(Compound { children })
    }

    /// `statement_list : statement | statement SEMI statement_list`
    fn statement_list(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = vec![self.statement()?];
        while self.current_token.kind == TokenKind::Semi {
            self.eat(TokenKind::Semi)?;
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    /// `statement : compound_statement | proccall_statement | assignment_statement | empty`
    ///
    /// Disambiguating a procedure call from an assignment needs one more
    /// character of lookahead than the token stream gives: both start with
    /// an `ID`, so we peek the lexer's raw next character to see whether an
    /// `(` follows.
    fn statement(&mut self) -> Result<Statement, ParseError> {
        match self.current_token.kind {
            TokenKind::Begin => Ok(Statement::Compound(self.compound_statement()?)),
            TokenKind::Id if self.lexer.peek_char() == '(' => {
                Ok(Statement::ProcedureCall(self.proccall_statement()?))
            }
            TokenKind::Id => Ok(Statement::Assign(self.assignment_statement()?)),
            _ => Ok(Statement::NoOp),
        }
    }

    /// `proccall_statement : ID LPAREN (expr (COMMA expr)*)? RPAREN`
    fn proccall_statement(&mut self) -> Result<Rc<ProcedureCall>, ParseError> {
        let position = self.current_token.position;
        let proc_name = self.variable_name()?;
        self.eat(TokenKind::LParen)?;

        let mut actual_params = Vec::new();
        if self.current_token.kind != TokenKind::RParen {
            actual_params.push(self.expr()?);
        }
        while self.current_token.kind == TokenKind::Comma {
            self.eat(TokenKind::Comma)?;
            actual_params.push(self.expr()?);
        }
        self.eat(TokenKind::RParen)?;

        Ok(Rc::new(ProcedureCall {
            proc_name,
            actual_params,
            position,
            def_id: std::cell::RefCell::new(None),
        }))
    }

    /// `assignment_statement : variable ASSIGN expr`
    fn assignment_statement(&mut self) -> Result<Assign, ParseError> {
        let var = self.variable()?;
        let position = self.current_token.position;
        self.eat(TokenKind::Assign)?;
        let expr = self.expr()?;
        Ok(Assign {
            var,
            expr,
            position,
        })
    }

    fn variable(&mut self) -> Result<Var, ParseError> {
        let position = self.current_token.position;
        let name = self.variable_name()?;
        Ok(Var { name, position })
    }

    /// `expr : term ((PLUS | MINUS) term)*`
    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.term()?;
        while matches!(self.current_token.kind, TokenKind::Plus | TokenKind::Minus) {
            let op = self.current_token.kind;
            let position = self.current_token.position;
            self.advance()?;
            let right = self.term()?;
            node = Expr::BinOp(BinOp {
                left: Box::new(node),
                op,
                right: Box::new(right),
                position,
            });
        }
        Ok(node)
    }

    /// `term : factor ((MUL | INTEGER_DIV | FLOAT_DIV) factor)*`
    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.factor()?;
        while matches!(
            self.current_token.kind,
            TokenKind::Mul | TokenKind::IntegerDiv | TokenKind::FloatDiv
        ) {
            let op = self.current_token.kind;
            let position = self.current_token.position;
            self.advance()?;
            let right = self.factor()?;
            node = Expr::BinOp(BinOp {
                left: Box::new(node),
                op,
                right: Box::new(right),
                position,
            });
        }
        Ok(node)
    }

    /// `factor : PLUS factor | MINUS factor | INTEGER_CONST | REAL_CONST | LPAREN expr RPAREN | variable`
    fn factor(&mut self) -> Result<Expr, ParseError> {
        let position = self.current_token.position;
        match self.current_token.kind {
            TokenKind::Plus | TokenKind::Minus => {
                let op = self.current_token.kind;
                self.advance()?;
                Ok(Expr::UnaryOp(UnaryOp {
                    op,
                    expr: Box::new(self.factor()?),
                    position,
                }))
            }
            TokenKind::IntegerConst => {
                let value = self.integer_value()?;
                self.advance()?;
                Ok(Expr::Num(Num {
                    value: NumValue::Integer(value),
                    position,
                }))
            }
            TokenKind::RealConst => {
                let value = self.real_value()?;
                self.advance()?;
                Ok(Expr::Num(Num {
                    value: NumValue::Real(value),
                    position,
                }))
            }
            TokenKind::LParen => {
                self.eat(TokenKind::LParen)?;
                let node = self.expr()?;
                self.eat(TokenKind::RParen)?;
                Ok(node)
            }
            _ => Ok(Expr::Var(self.variable()?)),
        }
    }

    fn variable_name(&mut self) -> Result<String, ParseError> {
        Ok(self.variable_name_with_position()?.0)
    }

    /// Like [`Self::variable_name`] but also returns the identifier's own
    /// token position, captured before it is consumed.
    fn variable_name_with_position(&mut self) -> Result<(String, Position), ParseError> {
        if self.current_token.kind != TokenKind::Id {
            return Err(self.unexpected_token());
        }
        let position = self.current_token.position;
        let name = match &self.current_token.value {
            TokenValue::Str(s) => s.clone(),
            _ => return Err(self.unexpected_token()),
        };
        self.advance()?;
        Ok((name, position))
    }

    fn integer_value(&self) -> Result<i64, ParseError> {
        match self.current_token.value {
            TokenValue::Int(v) => Ok(v),
            _ => Err(self.unexpected_token()),
        }
    }

    fn real_value(&self) -> Result<f64, ParseError> {
        match self.current_token.value {
            TokenValue::Real(v) => Ok(v),
            _ => Err(self.unexpected_token()),
        }
    }

    fn eat(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.current_token.kind != expected {
            return Err(self.unexpected_token());
        }
        self.advance()
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected_token(&self) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.current_token.to_string(),
            position: self.current_token.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.parse()
    }

    #[test]
    fn parses_minimal_program() {
        let program = parse("PROGRAM Minimal; BEGIN END.").unwrap();
        assert_eq!(program.name, "Minimal");
        assert!(program.block.declarations.is_empty());
        assert!(program.block.compound_statement.children.is_empty());
    }

    #[test]
    fn parses_var_block_with_multiple_names() {
        let program = parse("PROGRAM P; VAR a, b : INTEGER; BEGIN END.").unwrap();
        assert_eq!(program.block.declarations.len(), 2);
        assert!(matches!(
            program.block.declarations[0],
            Declaration::Var(VarDecl {
                type_spec: Type::Integer,
                ..
            })
        ));
    }

    #[test]
    fn second_var_block_is_a_parse_error() {
        let err = parse("PROGRAM P; VAR a : INTEGER; VAR b : INTEGER; BEGIN END.").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn disambiguates_proccall_from_assignment() {
        let program = parse(
            "PROGRAM P; PROCEDURE Foo; BEGIN END; BEGIN Foo(); x := 1 END.",
        )
        .unwrap();
        let stmts = &program.block.compound_statement.children;
        assert!(matches!(stmts[0], Statement::ProcedureCall(_)));
        assert!(matches!(stmts[1], Statement::Assign(_)));
    }

    #[test]
    fn procedure_with_params_and_nested_block() {
        let program = parse(
            "PROGRAM P; PROCEDURE Foo(a : INTEGER; b, c : REAL); BEGIN END; BEGIN END.",
        )
        .unwrap();
        let Declaration::Procedure(proc) = &program.block.declarations[0] else {
            panic!("expected procedure declaration");
        };
        assert_eq!(proc.name, "Foo");
        assert_eq!(proc.params.len(), 3);
        assert_eq!(proc.params[0].type_spec, Type::Integer);
        assert_eq!(proc.params[1].type_spec, Type::Real);
    }

    #[test]
    fn trailing_garbage_after_dot_is_an_error() {
        let err = parse("PROGRAM P; BEGIN END. garbage").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn expression_precedence_and_parens() {
        let program = parse("PROGRAM P; VAR x : INTEGER; BEGIN x := 2 + 3 * 4 END.").unwrap();
        let Statement::Assign(assign) = &program.block.compound_statement.children[0] else {
            panic!("expected assignment");
        };
        let Expr::BinOp(top) = &assign.expr else {
            panic!("expected BinOp");
        };
        assert_eq!(top.op, TokenKind::Plus);
        assert!(matches!(&*top.right, Expr::BinOp(_)));
    }
}
