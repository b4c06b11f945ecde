//! Symbol-table entries: the things a name can resolve to.

use std::rc::Rc;

use spi_par::ast::Block;

/// The two scalar types the language knows about. Every `VarSymbol` and
/// `ProcedureSymbol` parameter carries one of these, looked up from the
/// built-in scope by name during declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Integer,
    Real,
}

impl std::fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuiltinType::Integer => "INTEGER",
            BuiltinType::Real => "REAL",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct VarSymbol {
    pub name: String,
    pub type_spec: BuiltinType,
    pub scope_level: u32,
}

impl std::fmt::Display for VarSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<VarSymbol(name='{}', type='{}')>", self.name, self.type_spec)
    }
}

/// A declared procedure. `body` is shared with the AST's `ProcedureDecl` so
/// the interpreter can walk the exact block the parser built, without
/// cloning it.
#[derive(Debug)]
pub struct ProcedureSymbol {
    pub name: String,
    pub formal_params: Vec<VarSymbol>,
    pub body: Rc<Block>,
    pub scope_level: u32,
}

impl std::fmt::Display for ProcedureSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<ProcedureSymbol(name={}, parameters=[", self.name)?;
        for (i, p) in self.formal_params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "])>")
    }
}
