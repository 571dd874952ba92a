//! Error types for type checking
//!
//! One variant per semantic error, each with the source location of the
//! offending declaration or expression.

use crate::parser::ast::Access;
use crate::parser::Span;
use thiserror::Error;

/// Errors that can occur during type checking
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// A class or member name is declared twice in the same table
    #[error("Redefinition of '{name}'")]
    DuplicateDeclaration {
        /// Declared name
        name: String,
        /// Location of the rejected declaration
        span: Span,
    },

    /// A local name is bound twice in the same scope
    #[error("Variable '{name}' is already defined in this scope")]
    DuplicateBinding {
        /// Variable name
        name: String,
        /// Location of the second binding
        span: Span,
    },

    /// A type name does not resolve
    #[error("Type '{name}' not found")]
    UnknownType {
        /// Unresolved name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// An identifier does not resolve in any enclosing scope
    #[error("Variable '{name}' not found")]
    UndefinedVariable {
        /// Unresolved name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// The parent chain loops back on itself
    #[error("Cyclic inheritance found at {name}")]
    CyclicInheritance {
        /// Class at which the cycle closes
        name: String,
        /// Location of that class
        span: Span,
    },

    /// A class inherits from a built-in that cannot be extended
    #[error("Cannot inherit from built-in type '{name}'")]
    SealedType {
        /// The sealed parent
        name: String,
        /// Location of the parent reference
        span: Span,
    },

    /// Operator method declared with the wrong number of parameters
    #[error("Operator '{operator}' must be declared with {expected} parameter(s), found {actual}")]
    InvalidOperatorArity {
        /// Operator identifier, e.g. `binary +`
        operator: String,
        /// Required parameter count
        expected: usize,
        /// Declared parameter count
        actual: usize,
        /// Location of the method
        span: Span,
    },

    /// A value of one type is used where another is required
    #[error("Type '{actual}' is not compatible with '{expected}'")]
    TypeIncompatible {
        /// Required type (human-readable)
        expected: String,
        /// Found type (human-readable)
        actual: String,
        /// Optional context
        note: Option<String>,
        /// Location of the value
        span: Span,
    },

    /// `null` flows into, or is tested against, a non-option type
    #[error("Type '{ty}' is not an option and cannot hold null")]
    NotAnOption {
        /// The non-option type
        ty: String,
        /// Location of the expression
        span: Span,
    },

    /// A non-unit method can fall off its end
    #[error("Method '{method}' does not return a value on every path")]
    MissingReturn {
        /// Method identifier
        method: String,
        /// Location of the method
        span: Span,
    },

    /// `override` without a parent method to override
    #[error("Method '{method}' is marked override but no parent method exists")]
    NoMethodToOverride {
        /// Method identifier
        method: String,
        /// Location of the method
        span: Span,
    },

    /// A parent method is redeclared without `override`
    #[error("Method '{method}' hides the method inherited from '{parent}' and must be marked override")]
    MustDeclareOverride {
        /// Method identifier
        method: String,
        /// Class that declares the inherited method
        parent: String,
        /// Location of the method
        span: Span,
    },

    /// An override is less accessible than the method it overrides
    #[error("Method '{method}' cannot be {actual} when the overridden method is {expected}")]
    OverrideAccessNarrowed {
        /// Method identifier
        method: String,
        /// Access of the overridden method
        expected: Access,
        /// Access of the override
        actual: Access,
        /// Location of the method
        span: Span,
    },

    /// An override declares a different number of parameters
    #[error("Method '{method}' overrides a method with {expected} parameter(s) but declares {actual}")]
    OverrideArityMismatch {
        /// Method identifier
        method: String,
        /// Parameter count of the overridden method
        expected: usize,
        /// Parameter count of the override
        actual: usize,
        /// Location of the method
        span: Span,
    },

    /// Member lookup failed on the static type
    #[error("'{member}' not found on type '{ty}'")]
    MemberNotFound {
        /// Field, method or operator identifier
        member: String,
        /// Static type searched
        ty: String,
        /// Location of the access
        span: Span,
    },

    /// Member exists but its access level forbids this use
    #[error("'{member}' is {access} in '{owner}'")]
    MemberInaccessible {
        /// Member identifier
        member: String,
        /// Declaring class
        owner: String,
        /// Declared access
        access: Access,
        /// Location of the access
        span: Span,
    },

    /// Call supplies the wrong number of arguments
    #[error("Expected {expected} argument(s), but got {actual}")]
    InvalidArgumentCount {
        /// Parameter count of the callee
        expected: usize,
        /// Supplied argument count
        actual: usize,
        /// Location of the call
        span: Span,
    },

    /// Something that is not a method is called, or a class cannot be constructed
    #[error("{reason}")]
    InvalidCallTarget {
        /// What went wrong
        reason: String,
        /// Location of the call
        span: Span,
    },

    /// Left-hand side of `=` is not a variable or field
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget {
        /// Location of the target
        span: Span,
    },

    /// `x!` applied to a non-option value
    #[error("Cannot unwrap a value of non-option type '{ty}'")]
    InvalidAssertionTarget {
        /// Type of the operand
        ty: String,
        /// Location of the assertion
        span: Span,
    },
}

impl CheckError {
    /// Source location of this error
    pub fn span(&self) -> Span {
        use CheckError::*;

        match self {
            DuplicateDeclaration { span, .. }
            | DuplicateBinding { span, .. }
            | UnknownType { span, .. }
            | UndefinedVariable { span, .. }
            | CyclicInheritance { span, .. }
            | SealedType { span, .. }
            | InvalidOperatorArity { span, .. }
            | TypeIncompatible { span, .. }
            | NotAnOption { span, .. }
            | MissingReturn { span, .. }
            | NoMethodToOverride { span, .. }
            | MustDeclareOverride { span, .. }
            | OverrideAccessNarrowed { span, .. }
            | OverrideArityMismatch { span, .. }
            | MemberNotFound { span, .. }
            | MemberInaccessible { span, .. }
            | InvalidArgumentCount { span, .. }
            | InvalidCallTarget { span, .. }
            | InvalidAssignmentTarget { span }
            | InvalidAssertionTarget { span, .. } => *span,
        }
    }

    /// Shorthand for [`CheckError::TypeIncompatible`] without a note
    pub fn incompatible(expected: impl Into<String>, actual: impl Into<String>, span: Span) -> Self {
        CheckError::TypeIncompatible {
            expected: expected.into(),
            actual: actual.into(),
            note: None,
            span,
        }
    }
}
