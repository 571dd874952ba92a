//! Checking environment
//!
//! Couples the class table with the lexical scope of the member currently
//! being checked, the type `this` refers to, and the expected return type.

use super::class_table::ClassTable;
use super::error::CheckError;
use super::symbols::SymbolTable;
use super::types::{Ty, TypeId};
use crate::builtins::StandardLibrary;
use crate::parser::ast::Identifier;
use crate::parser::Span;

pub struct Environment {
    pub classes: ClassTable,
    scopes: SymbolTable,
    this_type: Option<TypeId>,
    return_type: Ty,
}

impl Environment {
    pub fn new(stdlib: &StandardLibrary) -> Self {
        Self {
            classes: ClassTable::new(stdlib),
            scopes: SymbolTable::new(),
            this_type: None,
            return_type: Ty::UNIT,
        }
    }

    pub fn declare(&mut self, name: &Identifier) -> Result<TypeId, CheckError> {
        self.classes.declare(name)
    }

    pub fn resolve(&self, name: &str, span: Span) -> Result<TypeId, CheckError> {
        self.classes.resolve(name, span)
    }

    pub fn enter(&mut self) {
        self.scopes.push_scope();
    }

    pub fn exit(&mut self) {
        self.scopes.pop_scope();
    }

    pub fn bind(&mut self, name: &Identifier, ty: Ty) -> Result<(), CheckError> {
        self.scopes.define(&name.name, ty, name.span)
    }

    pub fn lookup(&self, name: &Identifier) -> Result<Ty, CheckError> {
        self.scopes
            .resolve(&name.name)
            .map(|symbol| symbol.ty)
            .ok_or_else(|| CheckError::UndefinedVariable {
                name: name.name.clone(),
                span: name.span,
            })
    }

    /// Start checking a member of `this_type` that must produce `return_type`.
    ///
    /// Each member gets a fresh scope tree, so nothing leaks between members.
    pub fn begin_member(&mut self, this_type: TypeId, return_type: Ty) {
        self.scopes = SymbolTable::new();
        self.this_type = Some(this_type);
        self.return_type = return_type;
    }

    pub fn end_member(&mut self) {
        self.this_type = None;
        self.return_type = Ty::UNIT;
    }

    pub fn this_type(&self) -> Option<TypeId> {
        self.this_type
    }

    pub fn return_type(&self) -> Ty {
        self.return_type
    }

    pub fn into_classes(self) -> ClassTable {
        self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_context_resets_scopes() {
        let mut env = Environment::new(&StandardLibrary::new());
        let x = Identifier::new("x", Span::default());

        env.begin_member(TypeId::IO, Ty::NUMBER);
        env.bind(&x, Ty::NUMBER).unwrap();
        assert_eq!(env.lookup(&x), Ok(Ty::NUMBER));
        assert_eq!(env.return_type(), Ty::NUMBER);
        env.end_member();

        env.begin_member(TypeId::IO, Ty::UNIT);
        assert!(matches!(env.lookup(&x), Err(CheckError::UndefinedVariable { .. })));
        assert_eq!(env.this_type(), Some(TypeId::IO));
    }

    #[test]
    fn test_enter_exit() {
        let mut env = Environment::new(&StandardLibrary::new());
        let x = Identifier::new("x", Span::default());
        env.begin_member(TypeId::ANY, Ty::UNIT);
        env.enter();
        env.bind(&x, Ty::STRING).unwrap();
        env.exit();
        assert!(env.lookup(&x).is_err());
        env.bind(&x, Ty::BOOLEAN).unwrap();
        assert!(env.bind(&x, Ty::BOOLEAN).is_err());
    }
}
