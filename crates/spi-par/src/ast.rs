//! Abstract syntax tree produced by the parser and walked by every later
//! stage. Each enum is a closed set; adding a grammar production means
//! adding a variant here and a visit arm everywhere else.

use std::cell::RefCell;
use std::rc::Rc;

use spi_lex::TokenKind;
use spi_util::{DefId, Position};

/// `program ::= PROGRAM variable SEMI block DOT`
#[derive(Debug)]
pub struct Program {
    pub name: String,
    pub block: Block,
}

/// `block ::= declarations compound_statement`
#[derive(Debug)]
pub struct Block {
    pub declarations: Vec<Declaration>,
    pub compound_statement: Compound,
}

#[derive(Debug)]
pub enum Declaration {
    Var(VarDecl),
    Procedure(Rc<ProcedureDecl>),
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub var_name: String,
    pub type_spec: Type,
    pub position: Position,
}

/// A procedure declaration. Its body is `Rc`-shared with the symbol table
/// entry the semantic analyzer builds for it, so the interpreter can walk
/// the same allocation the parser produced.
#[derive(Debug)]
pub struct ProcedureDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub block: Rc<Block>,
    pub position: Position,
    /// Filled in once by the semantic analyzer; read by later stages to
    /// find this declaration's `ProcedureSymbol`.
    pub def_id: RefCell<Option<DefId>>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub var_name: String,
    pub type_spec: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer,
    Real,
}

#[derive(Debug, Default)]
pub struct Compound {
    pub children: Vec<Statement>,
}

#[derive(Debug)]
pub enum Statement {
    Compound(Compound),
    Assign(Assign),
    ProcedureCall(Rc<ProcedureCall>),
    NoOp,
}

#[derive(Debug)]
pub struct Assign {
    pub var: Var,
    pub expr: Expr,
    pub position: Position,
}

/// A call site. Resolved against its declaration's `DefId` by the semantic
/// analyzer, same indirection as `ProcedureDecl::def_id`.
#[derive(Debug)]
pub struct ProcedureCall {
    pub proc_name: String,
    pub actual_params: Vec<Expr>,
    pub position: Position,
    pub def_id: RefCell<Option<DefId>>,
}

#[derive(Debug)]
pub enum Expr {
    BinOp(BinOp),
    UnaryOp(UnaryOp),
    Num(Num),
    Var(Var),
}

#[derive(Debug)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub op: TokenKind,
    pub right: Box<Expr>,
    pub position: Position,
}

#[derive(Debug)]
pub struct UnaryOp {
    pub op: TokenKind,
    pub expr: Box<Expr>,
    pub position: Position,
}

#[derive(Debug)]
pub struct Num {
    pub value: NumValue,
    pub position: Position,
}

#[derive(Debug, Clone, Copy)]
pub enum NumValue {
    Integer(i64),
    Real(f64),
}

#[derive(Debug, Clone)]
pub struct Var {
    pub name: String,
    pub position: Position,
}
