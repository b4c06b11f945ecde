//! Lexically-nested scope chain, built as a flat arena instead of an
//! `Rc`/`RefCell` tree so the analyzer can hold `&mut` access to the scope
//! it's currently in without fighting the borrow checker.

use indexmap::IndexMap;
use spi_util::{DefId, Idx, IndexVec};

use crate::symbol::{BuiltinType, VarSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl Idx for ScopeId {
    fn from_usize(idx: usize) -> Self {
        ScopeId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a name in scope resolves to. Procedures are stored as a `DefId`
/// rather than the `ProcedureSymbol` itself, which lives in the analyzer's
/// separate def table keyed by that same id.
#[derive(Debug, Clone)]
pub enum Symbol {
    Builtin(BuiltinType),
    Var(VarSymbol),
    Procedure(DefId),
}

#[derive(Debug)]
pub struct ScopedSymbolTable {
    pub scope_name: String,
    pub scope_level: u32,
    pub enclosing_scope: Option<ScopeId>,
    symbols: IndexMap<String, Symbol>,
}

impl ScopedSymbolTable {
    fn new(scope_name: String, scope_level: u32, enclosing_scope: Option<ScopeId>) -> Self {
        Self {
            scope_name,
            scope_level,
            enclosing_scope,
            symbols: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: String, symbol: Symbol) {
        tracing::trace!(target: "pascal::scope", scope = %self.scope_name, %name, "insert");
        self.symbols.insert(name, symbol);
    }

    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }
}

/// The chain of scopes built up during semantic analysis, from the built-in
/// scope (level 1) down through the global program scope and into any
/// nested procedure scopes currently open.
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, ScopedSymbolTable>,
    current: ScopeId,
}

impl ScopeTree {
    /// Builds the global scope (level 1) pre-populated with the built-in
    /// types `INTEGER` and `REAL`, already current.
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let global = scopes.push(ScopedSymbolTable::new("global".to_string(), 1, None));
        {
            let global_table = &mut scopes[global];
            global_table.insert("INTEGER".to_string(), Symbol::Builtin(BuiltinType::Integer));
            global_table.insert("REAL".to_string(), Symbol::Builtin(BuiltinType::Real));
        }
        Self {
            scopes,
            current: global,
        }
    }

    pub fn current_scope_level(&self) -> u32 {
        self.scopes[self.current].scope_level
    }

    pub fn current_scope_name(&self) -> &str {
        &self.scopes[self.current].scope_name
    }

    /// Opens a new scope nested inside the current one and makes it
    /// current. Returns the id of the scope just left, so the caller can
    /// restore it on exit.
    pub fn enter_scope(&mut self, scope_name: String) -> ScopeId {
        let previous = self.current;
        let level = self.scopes[self.current].scope_level + 1;
        tracing::trace!(target: "pascal::scope", scope = %scope_name, level, "enter");
        let new_scope = self.scopes.push(ScopedSymbolTable::new(
            scope_name,
            level,
            Some(self.current),
        ));
        self.current = new_scope;
        previous
    }

    pub fn leave_scope(&mut self, restore_to: ScopeId) {
        tracing::trace!(target: "pascal::scope", scope = %self.scopes[self.current].scope_name, "leave");
        self.current = restore_to;
    }

    pub fn insert(&mut self, name: String, symbol: Symbol) {
        self.scopes[self.current].insert(name, symbol);
    }

    pub fn lookup_current_only(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current].lookup_local(name)
    }

    /// Walks up the enclosing-scope chain looking for `name`.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = self.current;
        loop {
            let scope = &self.scopes[scope_id];
            if let Some(symbol) = scope.lookup_local(name) {
                return Some(symbol);
            }
            scope_id = scope.enclosing_scope?;
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtins_are_visible_from_the_start() {
        let tree = ScopeTree::new();
        assert!(matches!(
            tree.lookup("INTEGER"),
            Some(Symbol::Builtin(BuiltinType::Integer))
        ));
    }

    #[test]
    fn nested_scope_sees_enclosing_names_but_not_vice_versa() {
        let mut tree = ScopeTree::new();
        tree.insert(
            "x".to_string(),
            Symbol::Var(VarSymbol {
                name: "x".to_string(),
                type_spec: BuiltinType::Integer,
                scope_level: tree.current_scope_level(),
            }),
        );
        let outer = tree.enter_scope("inner".to_string());
        assert!(tree.lookup("x").is_some());
        tree.insert(
            "y".to_string(),
            Symbol::Var(VarSymbol {
                name: "y".to_string(),
                type_spec: BuiltinType::Integer,
                scope_level: tree.current_scope_level(),
            }),
        );
        tree.leave_scope(outer);
        assert!(tree.lookup_current_only("y").is_none());
    }

    #[test]
    fn current_scope_only_lookup_ignores_enclosing_scopes() {
        let mut tree = ScopeTree::new();
        assert!(tree.lookup_current_only("INTEGER").is_some());
        tree.enter_scope("inner".to_string());
        assert!(tree.lookup_current_only("INTEGER").is_none());
        assert!(tree.lookup("INTEGER").is_some());
    }
}
