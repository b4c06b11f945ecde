//! Walks the AST once, building a symbol table and rejecting programs that
//! reference undeclared names, redeclare a name in the same scope, or call
//! a procedure with the wrong number of arguments.

use std::collections::HashMap;
use std::rc::Rc;

use spi_par::ast::{
    Block, Compound, Declaration, Expr, Program, ProcedureCall, ProcedureDecl, Statement, Type,
    VarDecl,
};
use spi_util::DefId;

use crate::error::AnalysisError;
use crate::scope::{ScopeTree, Symbol};
use crate::symbol::{BuiltinType, ProcedureSymbol, VarSymbol};

/// The output of a successful analysis pass: every procedure declaration
/// keyed by the `DefId` the parser minted for it, ready for the interpreter
/// to look up by the `DefId` each call site resolved.
#[derive(Debug, Default)]
pub struct SymbolTable {
    procedures: HashMap<DefId, Rc<ProcedureSymbol>>,
}

impl SymbolTable {
    pub fn get(&self, def_id: DefId) -> Option<&Rc<ProcedureSymbol>> {
        self.procedures.get(&def_id)
    }
}

pub struct SemanticAnalyzer {
    scopes: ScopeTree,
    symbol_table: SymbolTable,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeTree::new(),
            symbol_table: SymbolTable::default(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> Result<SymbolTable, AnalysisError> {
        tracing::trace!(target: "pascal::scope", "ENTER scope: global");
        self.visit_block(&program.block)?;
        tracing::trace!(target: "pascal::scope", "LEAVE scope: global");
        Ok(self.symbol_table)
    }

    fn visit_block(&mut self, block: &Block) -> Result<(), AnalysisError> {
        for declaration in &block.declarations {
            self.visit_declaration(declaration)?;
        }
        self.visit_compound(&block.compound_statement)
    }

    fn visit_declaration(&mut self, declaration: &Declaration) -> Result<(), AnalysisError> {
        match declaration {
            Declaration::Var(var_decl) => self.visit_var_decl(var_decl),
            Declaration::Procedure(proc_decl) => self.visit_procedure_decl(proc_decl),
        }
    }

    fn visit_var_decl(&mut self, node: &VarDecl) -> Result<(), AnalysisError> {
        if self.scopes.lookup_current_only(&node.var_name).is_some() {
            return Err(AnalysisError::DuplicateId {
                name: node.var_name.clone(),
                position: node.position,
            });
        }

        let var_symbol = VarSymbol {
            name: node.var_name.clone(),
            type_spec: builtin_type(node.type_spec),
            scope_level: self.scopes.current_scope_level(),
        };
        self.scopes
            .insert(node.var_name.clone(), Symbol::Var(var_symbol));
        Ok(())
    }

    fn visit_procedure_decl(&mut self, node: &Rc<ProcedureDecl>) -> Result<(), AnalysisError> {
        let def_id = node
            .def_id
            .borrow()
            .expect("parser assigns a DefId to every procedure declaration");

        self.scopes
            .insert(node.name.clone(), Symbol::Procedure(def_id));

        tracing::trace!(target: "pascal::scope", proc = %node.name, "ENTER scope");
        let outer = self.scopes.enter_scope(node.name.clone());

        let mut formal_params = Vec::with_capacity(node.params.len());
        for param in &node.params {
            let var_symbol = VarSymbol {
                name: param.var_name.clone(),
                type_spec: builtin_type(param.type_spec),
                scope_level: self.scopes.current_scope_level(),
            };
            self.scopes
                .insert(param.var_name.clone(), Symbol::Var(var_symbol.clone()));
            formal_params.push(var_symbol);
        }

        self.visit_block(&node.block)?;

        self.scopes.leave_scope(outer);
        tracing::trace!(target: "pascal::scope", proc = %node.name, "LEAVE scope");

        let proc_symbol = ProcedureSymbol {
            name: node.name.clone(),
            formal_params,
            body: Rc::clone(&node.block),
            scope_level: self.scopes.current_scope_level(),
        };
        self.symbol_table
            .procedures
            .insert(def_id, Rc::new(proc_symbol));

        Ok(())
    }

    fn visit_compound(&mut self, node: &Compound) -> Result<(), AnalysisError> {
        for statement in &node.children {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    fn visit_statement(&mut self, statement: &Statement) -> Result<(), AnalysisError> {
        match statement {
            Statement::Compound(c) => self.visit_compound(c),
            Statement::Assign(assign) => {
                self.visit_expr(&assign.expr)?;
                self.visit_var_use(&assign.var.name, assign.var.position)
            }
            Statement::ProcedureCall(call) => self.visit_procedure_call(call),
            Statement::NoOp => Ok(()),
        }
    }

    fn visit_procedure_call(&mut self, node: &Rc<ProcedureCall>) -> Result<(), AnalysisError> {
        for arg in &node.actual_params {
            self.visit_expr(arg)?;
        }

        let def_id = match self.scopes.lookup(&node.proc_name) {
            Some(Symbol::Procedure(def_id)) => *def_id,
            _ => {
                return Err(AnalysisError::IdNotFound {
                    name: node.proc_name.clone(),
                    position: node.position,
                })
            }
        };

        if let Some(proc_symbol) = self.symbol_table.get(def_id) {
            if proc_symbol.formal_params.len() != node.actual_params.len() {
                return Err(AnalysisError::ArityMismatch {
                    proc_name: node.proc_name.clone(),
                    expected: proc_symbol.formal_params.len(),
                    found: node.actual_params.len(),
                    position: node.position,
                });
            }
        }

        *node.def_id.borrow_mut() = Some(def_id);
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), AnalysisError> {
        match expr {
            Expr::BinOp(bin) => {
                self.visit_expr(&bin.left)?;
                self.visit_expr(&bin.right)
            }
            Expr::UnaryOp(unary) => self.visit_expr(&unary.expr),
            Expr::Num(_) => Ok(()),
            Expr::Var(var) => self.visit_var_use(&var.name, var.position),
        }
    }

    fn visit_var_use(&self, name: &str, position: spi_util::Position) -> Result<(), AnalysisError> {
        match self.scopes.lookup(name) {
            Some(_) => Ok(()),
            None => Err(AnalysisError::IdNotFound {
                name: name.to_string(),
                position,
            }),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_type(type_spec: Type) -> BuiltinType {
    match type_spec {
        Type::Integer => BuiltinType::Integer,
        Type::Real => BuiltinType::Real,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spi_par::Parser;

    fn analyze(source: &str) -> Result<SymbolTable, AnalysisError> {
        let program = Parser::new(source).unwrap().parse().unwrap();
        SemanticAnalyzer::new().analyze(&program)
    }

    #[test]
    fn accepts_well_formed_program() {
        assert!(analyze("PROGRAM P; VAR x : INTEGER; BEGIN x := 1 END.").is_ok());
    }

    #[test]
    fn rejects_undeclared_variable() {
        let err = analyze("PROGRAM P; BEGIN x := 1 END.").unwrap_err();
        assert!(matches!(err, AnalysisError::IdNotFound { .. }));
    }

    #[test]
    fn rejects_duplicate_declaration_in_same_scope() {
        let err =
            analyze("PROGRAM P; VAR x : INTEGER; x : REAL; BEGIN END.").unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateId { .. }));
    }

    #[test]
    fn rejects_arity_mismatch() {
        let err = analyze(
            "PROGRAM P; PROCEDURE Foo(a : INTEGER); BEGIN END; BEGIN Foo(1, 2) END.",
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::ArityMismatch { .. }));
    }

    #[test]
    fn procedure_params_shadow_nothing_outside_their_scope() {
        let table = analyze(
            "PROGRAM P; PROCEDURE Foo(a : INTEGER); VAR b : REAL; BEGIN a := a END; BEGIN Foo(1) END.",
        )
        .unwrap();
        assert_eq!(table.procedures.len(), 1);
    }
}
