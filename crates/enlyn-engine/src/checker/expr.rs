//! Expression type inference
//!
//! One bottom-up pass per expression. Every successfully typed node is
//! recorded in the checker's expression table so the code generator can
//! pick instructions by static type.

use super::checker::TypeChecker;
use super::error::CheckError;
use super::types::{Ty, TypeId};
use crate::builtins::MemberKey;
use crate::parser::ast::*;
use crate::parser::Span;

impl TypeChecker {
    pub(super) fn check_expr(&mut self, expr: &Expression) -> Result<Ty, CheckError> {
        let ty = match expr {
            Expression::NumberLiteral(_) => Ty::NUMBER,
            Expression::StringLiteral(_) => Ty::STRING,
            Expression::BooleanLiteral(_) => Ty::BOOLEAN,
            Expression::NullLiteral(_) => Ty::Null,
            Expression::Identifier(id) => self.env.lookup(id)?,
            Expression::This(span) => Ty::Class(self.this_type(*span)?),
            Expression::Base(span) => Ty::Class(self.base_type(*span)?),
            Expression::Member(member) => self.check_member(member)?,
            Expression::Call(call) => self.check_call(call)?,
            Expression::New(new) => self.check_new(new)?,
            Expression::Assign(assign) => self.check_assign(assign)?,
            Expression::Binary(binary) => self.check_binary(binary)?,
            Expression::Unary(unary) => self.check_unary(unary)?,
            Expression::Assert(assert) => self.check_assert(assert)?,
            Expression::Is(test) => {
                self.check_type_test(test)?;
                Ty::BOOLEAN
            }
            Expression::As(test) => self.check_type_test(test)?,
        };

        self.expr_types.insert(expr.id(), ty);
        Ok(ty)
    }

    fn this_type(&self, span: Span) -> Result<TypeId, CheckError> {
        self.env.this_type().ok_or(CheckError::InvalidCallTarget {
            reason: "'this' is only available inside a class".to_string(),
            span,
        })
    }

    fn base_type(&self, span: Span) -> Result<TypeId, CheckError> {
        let this = self.this_type(span)?;
        self.env
            .classes
            .get(this)
            .parent
            .ok_or_else(|| CheckError::InvalidCallTarget {
                reason: format!("'{}' has no base type", self.env.classes.name(this)),
                span,
            })
    }

    /// The class whose members a receiver of type `ty` exposes.
    ///
    /// Options must be unwrapped before any member is used.
    fn receiver_class(&self, ty: Ty, member: &MemberKey, span: Span) -> Result<TypeId, CheckError> {
        match ty {
            Ty::Class(id) if id != TypeId::UNIT => Ok(id),
            _ => Err(CheckError::MemberNotFound {
                member: member.to_string(),
                ty: self.env.classes.display(ty),
                span,
            }),
        }
    }

    fn check_member(&mut self, member: &MemberExpression) -> Result<Ty, CheckError> {
        let object = self.check_expr(&member.object)?;
        let key = MemberKey::named(member.property.name.as_str());
        let class = self.receiver_class(object, &key, member.property.span)?;

        let (owner, field) = self
            .env
            .classes
            .lookup_field(class, &member.property.name)
            .map(|(owner, field)| (owner, field.clone()))
            .ok_or_else(|| CheckError::MemberNotFound {
                member: member.property.name.clone(),
                ty: self.env.classes.display(object),
                span: member.property.span,
            })?;

        self.check_access(owner, &member.property.name, field.access, member.property.span)?;
        Ok(field.ty)
    }

    fn check_call(&mut self, call: &CallExpression) -> Result<Ty, CheckError> {
        let Expression::Member(callee) = call.callee.as_ref() else {
            return Err(CheckError::InvalidCallTarget {
                reason: "only methods can be called".to_string(),
                span: call.callee.span(),
            });
        };

        let object = self.check_expr(&callee.object)?;
        let key = MemberKey::named(callee.property.name.as_str());
        let class = self.receiver_class(object, &key, callee.property.span)?;

        let (owner, method) = self
            .env
            .classes
            .lookup_method(class, &key)
            .map(|(owner, method)| (owner, method.clone()))
            .ok_or_else(|| CheckError::MemberNotFound {
                member: key.to_string(),
                ty: self.env.classes.display(object),
                span: callee.property.span,
            })?;

        self.check_access(owner, &callee.property.name, method.access, callee.property.span)?;
        self.check_arguments(&method.params, &call.arguments, call.span)?;
        Ok(method.returns)
    }

    fn check_new(&mut self, new: &NewExpression) -> Result<Ty, CheckError> {
        let class = self.env.resolve(&new.class.name, new.class.span)?;
        let ctor = self
            .env
            .classes
            .constructor(class)
            .cloned()
            .ok_or_else(|| CheckError::InvalidCallTarget {
                reason: format!("Type '{}' cannot be constructed", new.class.name),
                span: new.span,
            })?;

        self.check_access(class, &MemberKey::Constructor.to_string(), ctor.access, new.span)?;
        self.check_arguments(&ctor.params, &new.arguments, new.span)?;
        Ok(Ty::Class(class))
    }

    fn check_assign(&mut self, assign: &AssignExpression) -> Result<Ty, CheckError> {
        let target = match assign.target.as_ref() {
            Expression::Identifier(_) => self.check_expr(&assign.target)?,
            Expression::Member(member) => {
                let ty = self.check_expr(&assign.target)?;
                if self.is_builtin_field(member) {
                    return Err(CheckError::InvalidAssignmentTarget { span: assign.target.span() });
                }
                ty
            }
            other => {
                return Err(CheckError::InvalidAssignmentTarget { span: other.span() });
            }
        };
        let value = self.check_expr(&assign.value)?;
        self.expect_assignable(value, target, assign.value.span())?;
        Ok(target)
    }

    /// Fields of built-in types are read-only: their values live in the
    /// primitive, not in instance slots.
    fn is_builtin_field(&self, member: &MemberExpression) -> bool {
        let Some(Ty::Class(class)) = self.expr_types.get(&member.object.id()).copied() else {
            return false;
        };
        self.env
            .classes
            .lookup_field(class, &member.property.name)
            .is_some_and(|(owner, _)| self.env.classes.get(owner).builtin)
    }

    /// Operators dispatch to the left operand's operator method. Equality
    /// on an option is typed by the universal `==`/`!=` of `any`, whose
    /// signature every override keeps.
    fn check_binary(&mut self, binary: &BinaryExpression) -> Result<Ty, CheckError> {
        let left = self.check_expr(&binary.left)?;
        let right = self.check_expr(&binary.right)?;
        let key = MemberKey::Binary(binary.operator);

        let class = if left.is_nullable() && binary.operator.is_equality() {
            TypeId::ANY
        } else {
            self.receiver_class(left, &key, binary.span)?
        };
        let (owner, method) = self.lookup_operator(class, left, &key, binary.span)?;

        self.check_access(owner, &key.to_string(), method.access, binary.span)?;
        if let Some(param) = method.params.first() {
            self.expect_assignable(right, *param, binary.right.span())?;
        }
        Ok(method.returns)
    }

    fn check_unary(&mut self, unary: &UnaryExpression) -> Result<Ty, CheckError> {
        let operand = self.check_expr(&unary.operand)?;
        let key = MemberKey::Unary(unary.operator);
        let class = self.receiver_class(operand, &key, unary.span)?;
        let (owner, method) = self.lookup_operator(class, operand, &key, unary.span)?;

        self.check_access(owner, &key.to_string(), method.access, unary.span)?;
        Ok(method.returns)
    }

    fn lookup_operator(
        &self,
        class: TypeId,
        ty: Ty,
        key: &MemberKey,
        span: Span,
    ) -> Result<(TypeId, super::class_table::MethodInfo), CheckError> {
        self.env
            .classes
            .lookup_method(class, key)
            .map(|(owner, method)| (owner, method.clone()))
            .ok_or_else(|| CheckError::MemberNotFound {
                member: key.to_string(),
                ty: self.env.classes.display(ty),
                span,
            })
    }

    fn check_assert(&mut self, assert: &AssertExpression) -> Result<Ty, CheckError> {
        let operand = self.check_expr(&assert.operand)?;
        operand
            .unwrapped()
            .ok_or_else(|| CheckError::InvalidAssertionTarget {
                ty: self.env.classes.display(operand),
                span: assert.span,
            })
    }

    /// `x is T` / `x as T`: the target must be the operand's type or more
    /// specific. Testing against `null` or an option needs a nullable operand.
    fn check_type_test(&mut self, test: &TypeTestExpression) -> Result<Ty, CheckError> {
        let operand = self.check_expr(&test.operand)?;
        let target = self.env.classes.resolve_annotation(&test.target)?;

        let compatible = match (operand, target) {
            (_, Ty::Null) | (Ty::Null, _) => {
                if !operand.is_nullable() {
                    return Err(CheckError::NotAnOption {
                        ty: self.env.classes.display(operand),
                        span: test.operand.span(),
                    });
                }
                target.is_nullable()
            }
            _ => self.env.classes.is_assignable(target, operand),
        };

        if !compatible {
            return Err(CheckError::TypeIncompatible {
                expected: self.env.classes.display(operand),
                actual: self.env.classes.display(target),
                note: Some("the target type must be the operand type or one of its subtypes".to_string()),
                span: test.target.span(),
            });
        }
        Ok(target)
    }
}
