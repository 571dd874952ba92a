//! Expression lowering

use super::context::ChunkBuilder;
use super::CodeGenerator;
use crate::builtins::MemberKey;
use crate::checker::Ty;
use crate::compiler::bytecode::Instruction;
use crate::compiler::error::{CompileError, CompileResult};
use crate::parser::ast::*;

impl CodeGenerator<'_> {
    /// Emit code leaving the value of `expr` on the stack.
    pub(super) fn compile_expr(&mut self, builder: &mut ChunkBuilder, expr: &Expression) -> CompileResult<()> {
        match expr {
            Expression::NumberLiteral(lit) => {
                let instruction = if lit.value == 0.0 && lit.value.is_sign_positive() {
                    Instruction::Zero
                } else if lit.value == 1.0 {
                    Instruction::One
                } else {
                    Instruction::Const(self.constants.add_number(lit.value))
                };
                builder.emit(instruction);
            }
            Expression::StringLiteral(lit) => {
                let index = self.constants.add_string(&lit.value);
                builder.emit(Instruction::Const(index));
            }
            Expression::BooleanLiteral(lit) => {
                builder.emit(if lit.value { Instruction::True } else { Instruction::False });
            }
            Expression::NullLiteral(_) => {
                builder.emit(Instruction::Null);
            }
            Expression::Identifier(id) => {
                let slot = builder.lookup(&id.name)?;
                builder.emit(Instruction::Load(slot));
            }
            Expression::This(_) | Expression::Base(_) => {
                builder.emit(Instruction::Load(0));
            }
            Expression::Member(member) => {
                self.compile_expr(builder, &member.object)?;
                let offset = self.field_offset_of(self.type_of(&member.object)?, &member.property.name)?;
                builder.emit(Instruction::GetField(offset));
            }
            Expression::Call(call) => self.compile_call(builder, call)?,
            Expression::New(new) => self.compile_new(builder, new)?,
            Expression::Assign(assign) => self.compile_assign(builder, assign)?,
            Expression::Binary(binary) => self.compile_binary(builder, binary)?,
            Expression::Unary(unary) => self.compile_unary(builder, unary)?,
            Expression::Assert(assert) => {
                self.compile_expr(builder, &assert.operand)?;
                builder.emit(Instruction::Assert);
            }
            Expression::Is(test) => {
                self.compile_expr(builder, &test.operand)?;
                let instruction = match self.type_test_target(&test.target)? {
                    None => Instruction::IsNull,
                    Some((construct, nullable)) => Instruction::Is { construct, nullable },
                };
                builder.emit(instruction);
            }
            Expression::As(test) => {
                self.compile_expr(builder, &test.operand)?;
                let (construct, nullable) = self
                    .type_test_target(&test.target)?
                    .ok_or_else(|| CompileError::internal("cast to null"))?;
                builder.emit(Instruction::Cast { construct, nullable });
            }
        }
        Ok(())
    }

    /// Method calls are virtual; calls on `base` are bound statically to the parent.
    fn compile_call(&mut self, builder: &mut ChunkBuilder, call: &CallExpression) -> CompileResult<()> {
        let Expression::Member(callee) = call.callee.as_ref() else {
            return Err(CompileError::internal("call target is not a member"));
        };
        let member = self.member(MemberKey::named(callee.property.name.as_str()));
        let construct = self.construct_index(self.class_of(self.type_of(&callee.object)?))?;

        self.compile_expr(builder, &callee.object)?;
        for arg in &call.arguments {
            self.compile_expr(builder, arg)?;
        }

        let instruction = if matches!(callee.object.as_ref(), Expression::Base(_)) {
            Instruction::Invoke { construct, member }
        } else {
            Instruction::Virtual { construct, member }
        };
        builder.emit(instruction);
        Ok(())
    }

    /// `New(T); Dup; args; Invoke(T, new); Pop` leaves the instance.
    fn compile_new(&mut self, builder: &mut ChunkBuilder, new: &NewExpression) -> CompileResult<()> {
        let id = self
            .analysis
            .classes
            .resolve(&new.class.name, new.class.span)
            .map_err(|error| CompileError::internal(error.to_string()))?;
        let construct = self.construct_index(id)?;
        let member = self.member(MemberKey::Constructor);

        builder.emit(Instruction::New(construct));
        builder.emit(Instruction::Dup);
        for arg in &new.arguments {
            self.compile_expr(builder, arg)?;
        }
        builder.emit(Instruction::Invoke { construct, member });
        builder.emit(Instruction::Pop);
        Ok(())
    }

    /// Assignment leaves the assigned value on the stack.
    fn compile_assign(&mut self, builder: &mut ChunkBuilder, assign: &AssignExpression) -> CompileResult<()> {
        match assign.target.as_ref() {
            Expression::Identifier(id) => {
                let slot = builder.lookup(&id.name)?;
                self.compile_expr(builder, &assign.value)?;
                builder.emit(Instruction::Dup);
                builder.emit(Instruction::Store(slot));
            }
            Expression::Member(member) => {
                let offset = self.field_offset_of(self.type_of(&member.object)?, &member.property.name)?;
                self.compile_expr(builder, &member.object)?;
                self.compile_expr(builder, &assign.value)?;
                builder.emit(Instruction::SetField(offset));
            }
            _ => return Err(CompileError::internal("invalid assignment target")),
        }
        Ok(())
    }

    /// Operators on two numbers or two booleans use dedicated instructions;
    /// everything else calls the operator method of the left operand.
    fn compile_binary(&mut self, builder: &mut ChunkBuilder, binary: &BinaryExpression) -> CompileResult<()> {
        let left = self.type_of(&binary.left)?;
        let right = self.type_of(&binary.right)?;

        self.compile_expr(builder, &binary.left)?;
        self.compile_expr(builder, &binary.right)?;

        if let Some(instruction) = primitive_binary(binary.operator, left, right) {
            builder.emit(instruction);
            return Ok(());
        }

        let member = self.member(MemberKey::Binary(binary.operator));
        let construct = self.construct_index(self.class_of(left))?;
        let instruction = if left.is_nullable() && binary.operator.is_equality() {
            Instruction::VirtualOrAny { construct, member }
        } else {
            Instruction::Virtual { construct, member }
        };
        builder.emit(instruction);
        Ok(())
    }

    fn compile_unary(&mut self, builder: &mut ChunkBuilder, unary: &UnaryExpression) -> CompileResult<()> {
        let operand = self.type_of(&unary.operand)?;
        self.compile_expr(builder, &unary.operand)?;

        let instruction = match (unary.operator, operand) {
            (UnaryOperator::Negate, Ty::NUMBER) => Instruction::Negate,
            (UnaryOperator::Not, Ty::BOOLEAN) => Instruction::Not,
            _ => Instruction::Virtual {
                construct: self.construct_index(self.class_of(operand))?,
                member: self.member(MemberKey::Unary(unary.operator)),
            },
        };
        builder.emit(instruction);
        Ok(())
    }

    /// Construct and nullability of an `is`/`as` target; `None` for `null`.
    fn type_test_target(&self, target: &TypeAnnotation) -> CompileResult<Option<(u32, bool)>> {
        let ty = self
            .analysis
            .classes
            .resolve_annotation(target)
            .map_err(|error| CompileError::internal(error.to_string()))?;
        match ty {
            Ty::Null => Ok(None),
            Ty::Class(id) => Ok(Some((self.construct_index(id)?, false))),
            Ty::Option(id) => Ok(Some((self.construct_index(id)?, true))),
        }
    }
}

fn primitive_binary(operator: BinaryOperator, left: Ty, right: Ty) -> Option<Instruction> {
    use BinaryOperator::*;

    let numbers = left == Ty::NUMBER && right == Ty::NUMBER;
    let booleans = left == Ty::BOOLEAN && right == Ty::BOOLEAN;
    let instruction = match operator {
        Add if numbers => Instruction::Add,
        Subtract if numbers => Instruction::Subtract,
        Multiply if numbers => Instruction::Multiply,
        Divide if numbers => Instruction::Divide,
        Modulo if numbers => Instruction::Modulo,
        Less if numbers => Instruction::Less,
        Greater if numbers => Instruction::Greater,
        LessEqual if numbers => Instruction::LessEqual,
        GreaterEqual if numbers => Instruction::GreaterEqual,
        Equal if numbers || booleans => Instruction::Equal,
        NotEqual if numbers || booleans => Instruction::NotEqual,
        And if booleans => Instruction::And,
        Or if booleans => Instruction::Or,
        _ => return None,
    };
    Some(instruction)
}
