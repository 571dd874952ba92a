//! Semantic analysis
//!
//! Builds the class table for a parsed program and checks every member
//! against it: inheritance, overrides, access control, operator overloads,
//! option types and return paths.

pub mod checker;
pub mod class_table;
pub mod diagnostic;
pub mod environment;
pub mod error;
mod expr;
pub mod flow;
pub mod symbols;
pub mod types;

pub use checker::{method_key, Analysis, TypeChecker};
pub use class_table::{ClassTable, FieldInfo, MethodInfo, TypeRecord};
pub use diagnostic::{create_files, Diagnostic, ErrorCode};
pub use environment::Environment;
pub use error::CheckError;
pub use types::{Ty, TypeId};
