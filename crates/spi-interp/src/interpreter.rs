//! Tree-walking interpreter. Runs directly over the parser's AST using the
//! symbol table the semantic analyzer already built and validated.

use spi_lex::TokenKind;
use spi_par::ast::{Block, Compound, Expr, Program, ProcedureCall, Statement};
use spi_sem::SymbolTable;

use crate::activation::{ActivationRecord, ActivationRecordKind, CallStack};
use crate::error::RuntimeError;
use crate::value::Value;

pub struct Interpreter<'a> {
    symbol_table: &'a SymbolTable,
    call_stack: CallStack,
}

impl<'a> Interpreter<'a> {
    pub fn new(symbol_table: &'a SymbolTable) -> Self {
        Self {
            symbol_table,
            call_stack: CallStack::new(),
        }
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        tracing::trace!(target: "pascal::stack", program = %program.name, "ENTER");
        let frame = ActivationRecord::new(program.name.clone(), ActivationRecordKind::Program, 1);
        self.run_frame(frame, &program.block)?;
        tracing::trace!(target: "pascal::stack", program = %program.name, "LEAVE");
        Ok(())
    }

    /// Pushes `frame`, runs `block` under it, and pops `frame` regardless of
    /// whether the block succeeded — the only way a frame is torn down.
    fn run_frame(&mut self, frame: ActivationRecord, block: &Block) -> Result<(), RuntimeError> {
        self.call_stack.push(frame);
        tracing::trace!(target: "pascal::stack", "{}", self.call_stack);
        let result = self.visit_block(block);
        self.call_stack.pop();
        result
    }

    /// Declarations carry no runtime behaviour; a variable's storage is
    /// allocated lazily, the first time it's assigned.
    fn visit_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        self.visit_compound(&block.compound_statement)
    }

    fn visit_compound(&mut self, node: &Compound) -> Result<(), RuntimeError> {
        for statement in &node.children {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    fn visit_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::Compound(c) => self.visit_compound(c),
            Statement::Assign(assign) => {
                let value = self.visit_expr(&assign.expr)?;
                self.call_stack.peek_mut().set(&assign.var.name, value);
                Ok(())
            }
            Statement::ProcedureCall(call) => self.visit_procedure_call(call),
            Statement::NoOp => Ok(()),
        }
    }

    fn visit_procedure_call(&mut self, node: &ProcedureCall) -> Result<(), RuntimeError> {
        let def_id = node
            .def_id
            .borrow()
            .expect("semantic analysis resolves every procedure call before interpretation");
        let proc_symbol = self
            .symbol_table
            .get(def_id)
            .expect("resolved DefId always has a matching ProcedureSymbol")
            .clone();

        let mut frame = ActivationRecord::new(
            node.proc_name.clone(),
            ActivationRecordKind::Procedure,
            proc_symbol.scope_level + 1,
        );

        for (param, arg) in proc_symbol.formal_params.iter().zip(&node.actual_params) {
            let value = self.visit_expr(arg)?;
            frame.set(&param.name, value);
        }

        tracing::trace!(target: "pascal::stack", proc = %node.proc_name, "ENTER");
        self.run_frame(frame, &proc_symbol.body)?;
        tracing::trace!(target: "pascal::stack", proc = %node.proc_name, "LEAVE");
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::BinOp(bin) => {
                let left = self.visit_expr(&bin.left)?;
                let right = self.visit_expr(&bin.right)?;
                match bin.op {
                    TokenKind::Plus => Ok(left + right),
                    TokenKind::Minus => Ok(left - right),
                    TokenKind::Mul => Ok(left * right),
                    TokenKind::IntegerDiv => {
                        if !left.is_integer() || !right.is_integer() {
                            return Err(RuntimeError::IntegerDivType {
                                position: bin.position,
                            });
                        }
                        let (Value::Integer(a), Value::Integer(b)) = (left, right) else {
                            unreachable!("checked above");
                        };
                        if b == 0 {
                            return Err(RuntimeError::DivisionByZero {
                                position: bin.position,
                            });
                        }
                        Ok(Value::Integer(floor_div(a, b)))
                    }
                    TokenKind::FloatDiv => {
                        let divisor = right.as_real();
                        if divisor == 0.0 {
                            return Err(RuntimeError::DivisionByZero {
                                position: bin.position,
                            });
                        }
                        Ok(Value::Real(left.as_real() / divisor))
                    }
                    other => unreachable!("parser never produces BinOp with operator {other}"),
                }
            }
            Expr::UnaryOp(unary) => {
                let value = self.visit_expr(&unary.expr)?;
                match unary.op {
                    TokenKind::Plus => Ok(value),
                    TokenKind::Minus => Ok(-value),
                    other => unreachable!("parser never produces UnaryOp with operator {other}"),
                }
            }
            Expr::Num(num) => Ok(match num.value {
                spi_par::ast::NumValue::Integer(v) => Value::Integer(v),
                spi_par::ast::NumValue::Real(v) => Value::Real(v),
            }),
            Expr::Var(var) => self
                .call_stack
                .peek()
                .get(&var.name)
                .ok_or_else(|| RuntimeError::UninitializedVar {
                    name: var.name.clone(),
                    position: var.position,
                }),
        }
    }
}

/// `DIV` truncates toward negative infinity, not toward zero, so `-7 DIV 2`
/// is `-4`. `b` is never zero here; the caller checks that first.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spi_par::Parser;
    use spi_sem::SemanticAnalyzer;

    /// Runs `source` and reads `var` out of the program's own frame before
    /// [`Interpreter::run_frame`] tears it down, since `interpret` leaves
    /// the call stack empty once it returns.
    fn run_and_read(source: &str, var: &str) -> Value {
        let program = Parser::new(source).unwrap().parse().unwrap();
        let symbols = SemanticAnalyzer::new().analyze(&program).unwrap();
        let mut interp = Interpreter::new(&symbols);
        let frame = ActivationRecord::new(program.name.clone(), ActivationRecordKind::Program, 1);
        interp.call_stack.push(frame);
        interp.visit_block(&program.block).unwrap();
        let value = interp.call_stack.peek().get(var).unwrap();
        interp.call_stack.pop();
        value
    }

    #[test]
    fn arithmetic_promotes_to_real_when_mixed() {
        let v = run_and_read("PROGRAM P; VAR x : REAL; BEGIN x := 1 + 2.0 END.", "x");
        assert_eq!(v, Value::Real(3.0));
    }

    #[test]
    fn integer_div_stays_integer() {
        let v = run_and_read("PROGRAM P; VAR x : INTEGER; BEGIN x := 7 DIV 2 END.", "x");
        assert_eq!(v, Value::Integer(3));
    }

    #[test]
    fn integer_div_truncates_toward_negative_infinity() {
        let v = run_and_read("PROGRAM P; VAR x : INTEGER; BEGIN x := -7 DIV 2 END.", "x");
        assert_eq!(v, Value::Integer(-4));
    }

    #[test]
    fn float_div_is_always_real() {
        let v = run_and_read("PROGRAM P; VAR x : REAL; BEGIN x := 7 / 2 END.", "x");
        assert_eq!(v, Value::Real(3.5));
    }

    #[test]
    fn integer_div_rejects_real_operand() {
        let program = Parser::new("PROGRAM P; VAR x : REAL; BEGIN x := 7.0 DIV 2 END.")
            .unwrap()
            .parse()
            .unwrap();
        let symbols = SemanticAnalyzer::new().analyze(&program).unwrap();
        let mut interp = Interpreter::new(&symbols);
        let err = interp.interpret(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::IntegerDivType { .. }));
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let program = Parser::new("PROGRAM P; VAR x : INTEGER; BEGIN x := 1 DIV 0 END.")
            .unwrap()
            .parse()
            .unwrap();
        let symbols = SemanticAnalyzer::new().analyze(&program).unwrap();
        let mut interp = Interpreter::new(&symbols);
        let err = interp.interpret(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
    }

    #[test]
    fn reading_unassigned_variable_is_a_runtime_error() {
        let program = Parser::new("PROGRAM P; VAR x, y : INTEGER; BEGIN x := y END.")
            .unwrap()
            .parse()
            .unwrap();
        let symbols = SemanticAnalyzer::new().analyze(&program).unwrap();
        let mut interp = Interpreter::new(&symbols);
        let err = interp.interpret(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::UninitializedVar { .. }));
    }

    #[test]
    fn call_stack_is_empty_after_procedure_returns() {
        let program = Parser::new(
            "PROGRAM P; PROCEDURE Foo; BEGIN END; BEGIN Foo() END.",
        )
        .unwrap()
        .parse()
        .unwrap();
        let symbols = SemanticAnalyzer::new().analyze(&program).unwrap();
        let mut interp = Interpreter::new(&symbols);
        interp.interpret(&program).unwrap();
        assert!(interp.call_stack().is_empty());
    }

    #[test]
    fn procedure_call_binds_actual_params_without_error() {
        // Parameter values are written into the callee's own activation
        // record; this only checks binding and execution succeed, since a
        // popped frame's locals aren't observable from the caller.
        let program = Parser::new(
            "PROGRAM P; PROCEDURE Add(a, b : INTEGER); VAR sum : INTEGER; \
             BEGIN sum := a + b END; BEGIN Add(2, 3) END.",
        )
        .unwrap()
        .parse()
        .unwrap();
        let symbols = SemanticAnalyzer::new().analyze(&program).unwrap();
        let mut interp = Interpreter::new(&symbols);
        assert!(interp.interpret(&program).is_ok());
    }
}
