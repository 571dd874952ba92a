//! Lexical scopes for local variable types
//!
//! Scopes form a tree stored in an arena; lookups walk from the current
//! scope to its ancestors. Shadowing across scopes is allowed, rebinding
//! inside one scope is not.

use super::error::CheckError;
use super::types::Ty;
use crate::parser::Span;
use rustc_hash::FxHashMap;

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// A local binding
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: Ty,
    pub scope_id: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    /// Parent scope (None for the root scope)
    pub parent: Option<ScopeId>,
    pub symbols: FxHashMap<String, Symbol>,
}

impl Scope {
    pub fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            parent,
            symbols: FxHashMap::default(),
        }
    }
}

/// Symbol table with scope tree
pub struct SymbolTable {
    /// All scopes (indexed by ScopeId)
    scopes: Vec<Scope>,
    current_scope: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(ScopeId(0), None)],
            current_scope: ScopeId(0),
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// Push a child of the current scope and make it current.
    pub fn push_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, Some(self.current_scope)));
        self.current_scope = id;
        id
    }

    /// Return to the parent scope. Does nothing at the root.
    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current_scope.0 as usize].parent {
            self.current_scope = parent;
        }
    }

    /// Bind a name in the current scope.
    pub fn define(&mut self, name: &str, ty: Ty, span: Span) -> Result<(), CheckError> {
        let scope_id = self.current_scope;
        let scope = &mut self.scopes[scope_id.0 as usize];

        if scope.symbols.contains_key(name) {
            return Err(CheckError::DuplicateBinding {
                name: name.to_string(),
                span,
            });
        }

        scope.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                ty,
                scope_id,
                span,
            },
        );
        Ok(())
    }

    /// Resolve a name from the current scope outwards.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = Some(self.current_scope);
        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0 as usize];
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            scope_id = scope.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_across_scopes() {
        let mut symbols = SymbolTable::new();
        symbols.define("x", Ty::NUMBER, Span::default()).unwrap();
        symbols.push_scope();
        symbols.define("x", Ty::STRING, Span::default()).unwrap();
        assert_eq!(symbols.resolve("x").map(|s| s.ty), Some(Ty::STRING));
        symbols.pop_scope();
        assert_eq!(symbols.resolve("x").map(|s| s.ty), Some(Ty::NUMBER));
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut symbols = SymbolTable::new();
        symbols.push_scope();
        symbols.define("x", Ty::NUMBER, Span::default()).unwrap();
        assert!(matches!(
            symbols.define("x", Ty::NUMBER, Span::default()),
            Err(CheckError::DuplicateBinding { .. })
        ));
    }

    #[test]
    fn test_lookup_falls_through_to_parent() {
        let mut symbols = SymbolTable::new();
        symbols.define("outer", Ty::BOOLEAN, Span::default()).unwrap();
        let inner = symbols.push_scope();
        assert_eq!(symbols.current_scope(), inner);
        assert!(symbols.resolve("outer").is_some());
        assert!(symbols.resolve("missing").is_none());
    }

    #[test]
    fn test_pop_at_root_is_noop() {
        let mut symbols = SymbolTable::new();
        symbols.pop_scope();
        assert_eq!(symbols.current_scope(), ScopeId(0));
    }
}
