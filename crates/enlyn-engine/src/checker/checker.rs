//! Type checker - builds the class table and validates every member
//!
//! Checking runs in passes over the program:
//!
//! 1. declare every class by name
//! 2. link each class to its parent (default `any`)
//! 3. detect inheritance cycles and cut them
//! 4. register fields, methods and constructors, then lay out fields
//! 5. check field initializers, method bodies and constructors
//!
//! Each declaration, member and statement is its own failure domain: an
//! error is recorded and checking moves on to the next unit.

use super::class_table::{ClassTable, MethodInfo};
use super::environment::Environment;
use super::error::CheckError;
use super::flow::stmt_definitely_returns;
use super::types::{Ty, TypeId};
use crate::builtins::{MemberKey, StandardLibrary};
use crate::parser::ast::*;
use crate::parser::Span;
use rustc_hash::{FxHashMap, FxHashSet};

/// Result of checking a program
#[derive(Debug)]
pub struct Analysis {
    /// Frozen class table with resolved members and field offsets
    pub classes: ClassTable,
    /// Expression types: maps expression ID (ptr as usize) to its static type
    pub expr_types: FxHashMap<usize, Ty>,
}

impl Analysis {
    /// Static type recorded for an expression of the checked tree.
    pub fn type_of(&self, expr: &Expression) -> Option<Ty> {
        self.expr_types.get(&expr.id()).copied()
    }
}

/// Type checker
///
/// Owns the checking environment while the passes run and hands back the
/// frozen class table on success.
pub struct TypeChecker {
    pub(super) env: Environment,

    /// Map from expression to its inferred type
    pub(super) expr_types: FxHashMap<usize, Ty>,

    /// Type checking errors, in discovery order
    errors: Vec<CheckError>,

    /// Classes excluded from member registration and body checks
    skipped: FxHashSet<TypeId>,

    /// Members whose registration failed (by node address); their bodies are not checked
    rejected: FxHashSet<usize>,

    /// Classes that received a synthesized zero-argument constructor
    synthesized: FxHashSet<TypeId>,
}

impl TypeChecker {
    pub fn new(stdlib: &StandardLibrary) -> Self {
        Self {
            env: Environment::new(stdlib),
            expr_types: FxHashMap::default(),
            errors: Vec::new(),
            skipped: FxHashSet::default(),
            rejected: FxHashSet::default(),
            synthesized: FxHashSet::default(),
        }
    }

    /// Check a whole program.
    ///
    /// All diagnostics are collected before returning; the analysis is only
    /// produced when there are none.
    pub fn check_program(mut self, program: &Program) -> Result<Analysis, Vec<CheckError>> {
        let classes = self.declare_classes(program);
        self.link_parents(&classes);
        self.detect_cycles(&classes);
        self.skip_descendants(&classes);

        for (id, decl) in &classes {
            if !self.skipped.contains(id) {
                self.register_members(*id, decl);
            }
        }
        self.env.classes.layout_fields();

        for (id, decl) in &classes {
            if !self.skipped.contains(id) {
                self.check_class(*id, decl);
            }
        }

        if self.errors.is_empty() {
            Ok(Analysis {
                classes: self.env.into_classes(),
                expr_types: self.expr_types,
            })
        } else {
            Err(self.errors)
        }
    }

    fn record<T>(&mut self, result: Result<T, CheckError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!(%error, "check error");
                self.errors.push(error);
                None
            }
        }
    }

    // ========================================================================
    // Pass 1-3: class table
    // ========================================================================

    /// Register every class name. A redeclared name is rejected, not merged.
    fn declare_classes<'p>(&mut self, program: &'p Program) -> Vec<(TypeId, &'p ClassDecl)> {
        let mut classes = Vec::with_capacity(program.classes.len());
        for decl in &program.classes {
            let declared = self.env.declare(&decl.name);
            if let Some(id) = self.record(declared) {
                classes.push((id, decl));
            }
        }
        classes
    }

    fn link_parents(&mut self, classes: &[(TypeId, &ClassDecl)]) {
        for (id, decl) in classes {
            let parent = match &decl.parent {
                None => Ok(TypeId::ANY),
                Some(name) => self.resolve_parent(name),
            };
            let parent = match parent {
                Ok(parent) => parent,
                Err(error) => {
                    self.errors.push(error);
                    self.skipped.insert(*id);
                    TypeId::ANY
                }
            };
            self.env.classes.get_mut(*id).parent = Some(parent);
        }
    }

    fn resolve_parent(&self, name: &Identifier) -> Result<TypeId, CheckError> {
        let parent = self.env.resolve(&name.name, name.span)?;
        let record = self.env.classes.get(parent);
        if record.sealed {
            return Err(CheckError::SealedType {
                name: record.name.clone(),
                span: name.span,
            });
        }
        Ok(parent)
    }

    /// Walk each parent chain, tracking the current path. Reaching a type
    /// already on the path closes a cycle: it is reported once and the link
    /// into it is cut so later passes terminate.
    fn detect_cycles(&mut self, classes: &[(TypeId, &ClassDecl)]) {
        let mut visited: FxHashSet<TypeId> = FxHashSet::default();

        for (start, _) in classes {
            let mut path: Vec<TypeId> = Vec::new();
            let mut current = Some(*start);

            while let Some(id) = current {
                if path.contains(&id) {
                    let record = self.env.classes.get(id);
                    self.errors.push(CheckError::CyclicInheritance {
                        name: record.name.clone(),
                        span: record.span,
                    });
                    if let Some(last) = path.last() {
                        self.env.classes.get_mut(*last).parent = Some(TypeId::ANY);
                    }
                    break;
                }
                if visited.contains(&id) {
                    break;
                }
                path.push(id);
                current = self.env.classes.get(id).parent;
            }

            visited.extend(path);
        }
    }

    /// A class whose parent failed to resolve takes its subclasses with it.
    fn skip_descendants(&mut self, classes: &[(TypeId, &ClassDecl)]) {
        for (id, _) in classes {
            let skip = self
                .env
                .classes
                .ancestors(*id)
                .any(|ancestor| self.skipped.contains(&ancestor));
            if skip {
                self.skipped.insert(*id);
            }
        }
    }

    // ========================================================================
    // Pass 4: members
    // ========================================================================

    fn register_members(&mut self, id: TypeId, decl: &ClassDecl) {
        for member in &decl.members {
            let result = match member {
                ClassMember::Field(field) => self.register_field(id, field),
                ClassMember::Method(method) => self.register_method(id, method),
                ClassMember::Constructor(ctor) => self.register_constructor(id, ctor),
            };
            if let Err(error) = result {
                self.errors.push(error);
                self.rejected.insert(member_id(member));
            }
        }

        if decl.constructors().next().is_none() {
            let info = MethodInfo {
                access: Access::Public,
                params: Vec::new(),
                returns: Ty::UNIT,
                is_override: false,
                span: decl.name.span,
            };
            let added = self.env.classes.add_method(id, MemberKey::Constructor, info);
            if self.record(added).is_some() {
                self.synthesized.insert(id);
            }
        }
    }

    fn register_field(&mut self, id: TypeId, field: &FieldDecl) -> Result<(), CheckError> {
        let ty = self.env.classes.resolve_annotation(&field.ty)?;
        self.env.classes.add_field(id, &field.name, field.access, ty)
    }

    fn register_method(&mut self, id: TypeId, method: &MethodDecl) -> Result<(), CheckError> {
        let key = method_key(&method.name);
        let required = match &method.name {
            MethodName::Named(_) => None,
            MethodName::Binary(..) => Some(1),
            MethodName::Unary(..) => Some(0),
        };
        if let Some(expected) = required {
            if method.params.len() != expected {
                return Err(CheckError::InvalidOperatorArity {
                    operator: key.to_string(),
                    expected,
                    actual: method.params.len(),
                    span: method.name.span(),
                });
            }
        }

        let params = self.resolve_params(&method.params)?;
        let returns = match &method.return_type {
            Some(annotation) => self.env.classes.resolve_annotation(annotation)?,
            None => Ty::UNIT,
        };
        let info = MethodInfo {
            access: method.access,
            params,
            returns,
            is_override: method.is_override,
            span: method.name.span(),
        };
        self.env.classes.add_method(id, key, info)
    }

    fn register_constructor(&mut self, id: TypeId, ctor: &ConstructorDecl) -> Result<(), CheckError> {
        let info = MethodInfo {
            access: ctor.access,
            params: self.resolve_params(&ctor.params)?,
            returns: Ty::UNIT,
            is_override: false,
            span: ctor.span,
        };
        self.env.classes.add_method(id, MemberKey::Constructor, info)
    }

    fn resolve_params(&self, params: &[Parameter]) -> Result<Vec<Ty>, CheckError> {
        params
            .iter()
            .map(|param| self.env.classes.resolve_annotation(&param.ty))
            .collect()
    }

    // ========================================================================
    // Pass 5: bodies
    // ========================================================================

    fn check_class(&mut self, id: TypeId, decl: &ClassDecl) {
        let _span = tracing::debug_span!("check_class", class = %decl.name.name).entered();

        for member in &decl.members {
            if self.rejected.contains(&member_id(member)) {
                continue;
            }
            let result = match member {
                ClassMember::Field(field) => self.check_field(id, field),
                ClassMember::Method(method) => self.check_method(id, method),
                ClassMember::Constructor(ctor) => self.check_constructor(id, ctor),
            };
            self.env.end_member();
            self.record(result);
        }

        if self.synthesized.contains(&id) {
            let result = self.check_implicit_constructor(id, decl.name.span);
            self.record(result);
        }
    }

    fn check_field(&mut self, id: TypeId, field: &FieldDecl) -> Result<(), CheckError> {
        let Some(initializer) = &field.initializer else {
            return Ok(());
        };
        let declared = match self.env.classes.get(id).fields.get(&field.name.name) {
            Some(info) => info.ty,
            None => return Ok(()),
        };

        self.env.begin_member(id, Ty::UNIT);
        let value = self.check_expr(initializer)?;
        self.expect_assignable(value, declared, initializer.span())
    }

    fn check_method(&mut self, id: TypeId, method: &MethodDecl) -> Result<(), CheckError> {
        let key = method_key(&method.name);
        let Some(info) = self.env.classes.get(id).methods.get(&key).cloned() else {
            return Ok(());
        };

        self.check_override(id, &key, &info, method)?;

        self.env.begin_member(id, info.returns);
        self.bind_params(&method.params, &info.params);
        self.check_stmt(&method.body);

        if info.returns != Ty::UNIT && !stmt_definitely_returns(&method.body) {
            return Err(CheckError::MissingReturn {
                method: key.to_string(),
                span: method.name.span(),
            });
        }
        Ok(())
    }

    /// Override rules: an inherited method must be overridden explicitly,
    /// the override must stay at least as accessible, keep the arity,
    /// accept every parent parameter type and return a parent return type.
    fn check_override(
        &self,
        id: TypeId,
        key: &MemberKey,
        info: &MethodInfo,
        method: &MethodDecl,
    ) -> Result<(), CheckError> {
        let classes = &self.env.classes;
        let inherited = classes
            .get(id)
            .parent
            .and_then(|parent| classes.lookup_method(parent, key));

        let (owner, parent) = match (inherited, method.is_override) {
            (None, false) => return Ok(()),
            (None, true) => {
                return Err(CheckError::NoMethodToOverride {
                    method: key.to_string(),
                    span: info.span,
                })
            }
            (Some((owner, _)), false) => {
                return Err(CheckError::MustDeclareOverride {
                    method: key.to_string(),
                    parent: classes.name(owner).to_string(),
                    span: info.span,
                })
            }
            (Some(found), true) => found,
        };

        if info.access > parent.access {
            return Err(CheckError::OverrideAccessNarrowed {
                method: key.to_string(),
                expected: parent.access,
                actual: info.access,
                span: info.span,
            });
        }

        if info.params.len() != parent.params.len() {
            return Err(CheckError::OverrideArityMismatch {
                method: key.to_string(),
                expected: parent.params.len(),
                actual: info.params.len(),
                span: info.span,
            });
        }

        for ((inherited, own), param) in parent.params.iter().zip(&info.params).zip(&method.params) {
            if !classes.is_assignable(*inherited, *own) {
                return Err(CheckError::TypeIncompatible {
                    expected: classes.display(*own),
                    actual: classes.display(*inherited),
                    note: Some(format!(
                        "parameter '{}' must accept the type declared by '{}'",
                        param.name.name,
                        classes.name(owner)
                    )),
                    span: param.span,
                });
            }
        }

        if !classes.is_assignable(info.returns, parent.returns) {
            return Err(CheckError::TypeIncompatible {
                expected: classes.display(parent.returns),
                actual: classes.display(info.returns),
                note: Some(format!(
                    "the return type must be compatible with the one declared by '{}'",
                    classes.name(owner)
                )),
                span: method.return_type.as_ref().map_or(info.span, |ty| ty.span()),
            });
        }

        Ok(())
    }

    fn check_constructor(&mut self, id: TypeId, ctor: &ConstructorDecl) -> Result<(), CheckError> {
        let Some(info) = self.env.classes.constructor(id).cloned() else {
            return Ok(());
        };

        self.env.begin_member(id, Ty::UNIT);
        self.bind_params(&ctor.params, &info.params);

        let base_args = ctor.base_args.as_deref().unwrap_or(&[]);
        let base = self.check_base_call(id, base_args, ctor.span);
        self.record(base);

        self.check_stmt(&ctor.body);
        Ok(())
    }

    fn check_implicit_constructor(&mut self, id: TypeId, span: Span) -> Result<(), CheckError> {
        self.env.begin_member(id, Ty::UNIT);
        let result = self.check_base_call(id, &[], span);
        self.env.end_member();
        result
    }

    /// The parent constructor runs before every constructor body.
    fn check_base_call(&mut self, id: TypeId, args: &[Expression], span: Span) -> Result<(), CheckError> {
        let Some(parent) = self.env.classes.get(id).parent else {
            return Ok(());
        };
        let Some(target) = self.env.classes.constructor(parent).cloned() else {
            return Err(CheckError::InvalidCallTarget {
                reason: format!("Type '{}' has no constructor", self.env.classes.name(parent)),
                span,
            });
        };
        self.check_access(parent, &MemberKey::Constructor.to_string(), target.access, span)?;
        self.check_arguments(&target.params, args, span)
    }

    fn bind_params(&mut self, params: &[Parameter], types: &[Ty]) {
        for (param, ty) in params.iter().zip(types) {
            let bound = self.env.bind(&param.name, *ty);
            self.record(bound);
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Check a statement, recording failures instead of propagating them.
    pub(super) fn check_stmt(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => {
                self.env.enter();
                for stmt in &block.statements {
                    self.check_stmt(stmt);
                }
                self.env.exit();
            }
            Statement::If(if_stmt) => {
                let condition = self.check_condition(&if_stmt.condition);
                self.record(condition);
                self.check_branch(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.check_branch(else_branch);
                }
            }
            Statement::While(while_stmt) => {
                let condition = self.check_condition(&while_stmt.condition);
                self.record(condition);
                self.check_branch(&while_stmt.body);
            }
            Statement::Let(let_stmt) => {
                let result = self.check_let(let_stmt);
                self.record(result);
            }
            Statement::Return(ret) => {
                let result = self.check_return(ret);
                self.record(result);
            }
            Statement::Expression(expr_stmt) => {
                let result = self.check_expr(&expr_stmt.expression);
                self.record(result);
            }
        }
    }

    /// Branches get their own scope even without braces.
    fn check_branch(&mut self, stmt: &Statement) {
        self.env.enter();
        self.check_stmt(stmt);
        self.env.exit();
    }

    fn check_condition(&mut self, condition: &Expression) -> Result<(), CheckError> {
        let ty = self.check_expr(condition)?;
        if ty != Ty::BOOLEAN {
            return Err(CheckError::incompatible(
                "boolean",
                self.env.classes.display(ty),
                condition.span(),
            ));
        }
        Ok(())
    }

    fn check_let(&mut self, let_stmt: &LetStatement) -> Result<(), CheckError> {
        let declared = match &let_stmt.ty {
            Some(annotation) => Some(self.env.classes.resolve_annotation(annotation)?),
            None => None,
        };

        let value = match self.check_expr(&let_stmt.value) {
            Ok(value) => value,
            Err(error) => {
                // Keep the name usable so one bad initializer does not cascade
                if let Some(ty) = declared {
                    self.env.bind(&let_stmt.name, ty)?;
                }
                return Err(error);
            }
        };

        let ty = match declared {
            Some(ty) => {
                let assignable = self.expect_assignable(value, ty, let_stmt.value.span());
                self.env.bind(&let_stmt.name, ty)?;
                assignable?;
                ty
            }
            None if value == Ty::Null => {
                return Err(CheckError::TypeIncompatible {
                    expected: "a typed value".to_string(),
                    actual: "null".to_string(),
                    note: Some(format!("cannot infer the type of '{}'; add an option type", let_stmt.name.name)),
                    span: let_stmt.value.span(),
                });
            }
            None => value,
        };

        if ty == Ty::UNIT {
            return Err(CheckError::incompatible("a value", "unit", let_stmt.value.span()));
        }
        if declared.is_none() {
            self.env.bind(&let_stmt.name, ty)?;
        }
        Ok(())
    }

    fn check_return(&mut self, ret: &ReturnStatement) -> Result<(), CheckError> {
        let expected = self.env.return_type();
        match &ret.value {
            None if expected == Ty::UNIT => Ok(()),
            None => Err(CheckError::TypeIncompatible {
                expected: self.env.classes.display(expected),
                actual: "unit".to_string(),
                note: Some("a bare return needs a value here".to_string()),
                span: ret.span,
            }),
            Some(value) => {
                let actual = self.check_expr(value)?;
                if expected == Ty::UNIT {
                    return Err(CheckError::TypeIncompatible {
                        expected: "unit".to_string(),
                        actual: self.env.classes.display(actual),
                        note: Some("this member does not return a value".to_string()),
                        span: value.span(),
                    });
                }
                self.expect_assignable(actual, expected, value.span())
            }
        }
    }

    // ========================================================================
    // Shared rules
    // ========================================================================

    /// `value` must be storable in a slot of type `target`.
    pub(super) fn expect_assignable(&self, value: Ty, target: Ty, span: Span) -> Result<(), CheckError> {
        if self.env.classes.is_assignable(value, target) {
            return Ok(());
        }
        if value == Ty::Null {
            return Err(CheckError::NotAnOption {
                ty: self.env.classes.display(target),
                span,
            });
        }
        Err(CheckError::incompatible(
            self.env.classes.display(target),
            self.env.classes.display(value),
            span,
        ))
    }

    /// Code in the current member may use `member` declared on `owner`.
    pub(super) fn check_access(
        &self,
        owner: TypeId,
        member: &str,
        access: Access,
        span: Span,
    ) -> Result<(), CheckError> {
        if self.env.classes.can_access(self.env.this_type(), owner, access) {
            return Ok(());
        }
        Err(CheckError::MemberInaccessible {
            member: member.to_string(),
            owner: self.env.classes.name(owner).to_string(),
            access,
            span,
        })
    }

    pub(super) fn check_arguments(
        &mut self,
        params: &[Ty],
        args: &[Expression],
        span: Span,
    ) -> Result<(), CheckError> {
        if params.len() != args.len() {
            return Err(CheckError::InvalidArgumentCount {
                expected: params.len(),
                actual: args.len(),
                span,
            });
        }
        for (param, arg) in params.iter().zip(args) {
            let ty = self.check_expr(arg)?;
            self.expect_assignable(ty, *param, arg.span())?;
        }
        Ok(())
    }
}

/// Method-table key of a declared method.
pub fn method_key(name: &MethodName) -> MemberKey {
    match name {
        MethodName::Named(id) => MemberKey::Named(id.name.clone()),
        MethodName::Binary(op, _) => MemberKey::Binary(*op),
        MethodName::Unary(op, _) => MemberKey::Unary(*op),
    }
}

fn member_id(member: &ClassMember) -> usize {
    member as *const ClassMember as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn check(source: &str) -> Result<Analysis, Vec<CheckError>> {
        let program = Parser::new(source).unwrap().parse().unwrap();
        TypeChecker::new(&StandardLibrary::new()).check_program(&program)
    }

    fn errors(source: &str) -> Vec<CheckError> {
        match check(source) {
            Ok(_) => Vec::new(),
            Err(errors) => errors,
        }
    }

    #[test]
    fn test_duplicate_class_reported_once() {
        let errors = errors("class A { }\nclass A { }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CheckError::DuplicateDeclaration { name, .. } if name == "A"));
    }

    #[test]
    fn test_unknown_parent_skips_subtree() {
        let errors = errors("class A : Missing { public f() : number = \"x\" }\nclass B : A { }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CheckError::UnknownType { name, .. } if name == "Missing"));
    }

    #[test]
    fn test_sealed_parent() {
        let errors = errors("class A : number { }");
        assert!(matches!(errors.as_slice(), [CheckError::SealedType { .. }]));
    }

    #[test]
    fn test_cycle_reported_once() {
        let errors = errors("class A : B { }\nclass B : C { }\nclass C : A { }");
        let cycles = errors
            .iter()
            .filter(|e| matches!(e, CheckError::CyclicInheritance { .. }))
            .count();
        assert_eq!(cycles, 1);
    }

    #[test]
    fn test_self_cycle() {
        let errors = errors("class A : A { }");
        assert!(matches!(errors.as_slice(), [CheckError::CyclicInheritance { name, .. }] if name == "A"));
    }

    #[test]
    fn test_acyclic_hierarchy_is_clean() {
        assert!(check("class A : B { }\nclass B : C { }\nclass C { }").is_ok());
    }

    #[test]
    fn test_field_offsets() {
        let analysis = check(
            "class A : B {\n  public a : number\n  public b : number\n  public c : number\n}\n\
             class B {\n  public a : number\n  public b : number\n  public c : number\n}",
        )
        .unwrap();
        let a = analysis.classes.get_by_name("A").unwrap();
        let b = analysis.classes.get_by_name("B").unwrap();
        assert_eq!(a.field_count, Some(6));
        assert_eq!(b.fields["a"].offset, 0);
        assert_eq!(a.fields["a"].offset, 3);
    }

    #[test]
    fn test_operator_arity() {
        let errors = errors("class V { public binary +() : V = this }");
        assert!(matches!(
            errors.as_slice(),
            [CheckError::InvalidOperatorArity { expected: 1, actual: 0, .. }]
        ));
    }

    #[test]
    fn test_duplicate_constructor() {
        let errors = errors("class A {\n  public new() = return\n  public new(x : number) = return\n}");
        assert!(matches!(errors.as_slice(), [CheckError::DuplicateDeclaration { .. }]));
    }

    #[test]
    fn test_missing_return() {
        let errors = errors("class A { public f(x : boolean) : number = if x then return 1 }");
        assert!(matches!(errors.as_slice(), [CheckError::MissingReturn { .. }]));
        assert!(check("class A { public f(x : boolean) : number = if x then return 1 else return 2 }").is_ok());
    }

    #[test]
    fn test_override_requires_keyword() {
        let errors = errors("class A { public f() = return }\nclass B : A { public f() = return }");
        assert!(matches!(errors.as_slice(), [CheckError::MustDeclareOverride { parent, .. }] if parent == "A"));
    }

    #[test]
    fn test_override_without_parent_method() {
        let errors = errors("class A { public override f() = return }");
        assert!(matches!(errors.as_slice(), [CheckError::NoMethodToOverride { .. }]));
    }

    #[test]
    fn test_override_access_narrowed() {
        let errors = errors("class A { public f() = return }\nclass B : A { private override f() = return }");
        assert!(matches!(errors.as_slice(), [CheckError::OverrideAccessNarrowed { .. }]));
        assert!(check("class A { protected f() = return }\nclass B : A { public override f() = return }").is_ok());
    }

    #[test]
    fn test_override_arity() {
        let errors = errors("class A { public f() = return }\nclass B : A { public override f(x : number) = return }");
        assert!(matches!(errors.as_slice(), [CheckError::OverrideArityMismatch { expected: 0, actual: 1, .. }]));
    }

    #[test]
    fn test_override_parameters_may_widen() {
        let source = "class A { public f(x : A) = return }\nclass B : A { public override f(x : any?) = return }";
        assert!(check(source).is_ok());
    }

    #[test]
    fn test_override_parameters_may_not_narrow() {
        let source = "class A { public f(x : A) = return }\nclass B : A { public override f(x : B) = return }";
        assert!(matches!(errors(source).as_slice(), [CheckError::TypeIncompatible { .. }]));
    }

    #[test]
    fn test_override_return_may_narrow() {
        let source = "class A { public f() : A = this }\nclass B : A { public override f() : B = this }";
        assert!(check(source).is_ok());
    }

    #[test]
    fn test_override_return_may_not_widen() {
        let source = "class A { public f() : A = this }\nclass B : A { public override f() : any = this }";
        assert!(matches!(errors(source).as_slice(), [CheckError::TypeIncompatible { .. }]));
    }

    #[test]
    fn test_errors_isolated_per_member() {
        let source = "class A {\n  public f() : number = \"x\"\n  public g() : string = 1\n  public h() : number = 1\n}";
        assert_eq!(errors(source).len(), 2);
    }

    #[test]
    fn test_errors_isolated_per_statement() {
        let source = "class A {\n  public f() {\n    let x : number = \"a\"\n    let y : string = 1\n    x = 2\n  }\n}";
        assert_eq!(errors(source).len(), 2);
    }

    #[test]
    fn test_base_constructor_arguments() {
        let parent = "class B { public new(x : number) = return }\n";
        assert!(check(&format!("{}class A : B {{ public new() : base(1) = return }}", parent)).is_ok());
        let wrong_type = errors(&format!("{}class A : B {{ public new() : base(\"1\") = return }}", parent));
        assert!(matches!(wrong_type.as_slice(), [CheckError::TypeIncompatible { .. }]));
        let implicit = errors(&format!("{}class A : B {{ }}", parent));
        assert!(matches!(
            implicit.as_slice(),
            [CheckError::InvalidArgumentCount { expected: 1, actual: 0, .. }]
        ));
    }

    #[test]
    fn test_private_parent_constructor() {
        let errors = errors("class B { private new() = return }\nclass A : B { }");
        assert!(matches!(errors.as_slice(), [CheckError::MemberInaccessible { .. }]));
    }

    #[test]
    fn test_field_initializer_type() {
        assert!(check("class A { public a : string = \"123\" }").is_ok());
        let errors = errors("class A { public a : string = 123 }");
        assert!(matches!(errors.as_slice(), [CheckError::TypeIncompatible { .. }]));
    }

    #[test]
    fn test_return_in_unit_method() {
        let errors = errors("class A { public f() { return 1 } }");
        assert!(matches!(errors.as_slice(), [CheckError::TypeIncompatible { .. }]));
    }

    #[test]
    fn test_let_null_without_type() {
        let errors = errors("class A { public f() { let x = null } }");
        assert!(matches!(errors.as_slice(), [CheckError::TypeIncompatible { .. }]));
    }

    #[test]
    fn test_duplicate_parameter() {
        let errors = errors("class A { public f(x : number, x : number) = return }");
        assert!(matches!(errors.as_slice(), [CheckError::DuplicateBinding { .. }]));
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let errors = errors("class A { public f() = while 1 do return }");
        assert!(matches!(errors.as_slice(), [CheckError::TypeIncompatible { .. }]));
    }
}
