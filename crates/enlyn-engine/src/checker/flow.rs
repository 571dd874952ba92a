//! Return-path analysis

use crate::parser::ast::Statement;

/// Whether every path through `stmt` ends in a `return`.
///
/// A block returns if any of its statements does; an `if` only when both
/// branches do. Loops never count, since their body may run zero times.
pub fn stmt_definitely_returns(stmt: &Statement) -> bool {
    match stmt {
        Statement::Return(_) => true,
        Statement::Block(block) => block.statements.iter().any(stmt_definitely_returns),
        Statement::If(if_stmt) => {
            let then_returns = stmt_definitely_returns(&if_stmt.then_branch);
            let else_returns = if_stmt
                .else_branch
                .as_deref()
                .is_some_and(stmt_definitely_returns);
            then_returns && else_returns
        }
        Statement::While(_) | Statement::Let(_) | Statement::Expression(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn body(method_body: &str) -> Statement {
        let source = format!("class A {{ public f() : number {} }}", method_body);
        let program = Parser::new(&source).unwrap().parse().unwrap();
        let method = program.classes[0].methods().next().unwrap().clone();
        method.body
    }

    #[test]
    fn test_bare_return() {
        assert!(stmt_definitely_returns(&body("= return 1")));
    }

    #[test]
    fn test_block_with_return_anywhere() {
        assert!(stmt_definitely_returns(&body("{\n  return 1\n  let x = 2\n}")));
        assert!(!stmt_definitely_returns(&body("{\n  let x = 2\n}")));
    }

    #[test]
    fn test_if_needs_both_branches() {
        assert!(!stmt_definitely_returns(&body("= if true then return 1")));
        assert!(stmt_definitely_returns(&body("= if true then return 1 else return 2")));
        assert!(!stmt_definitely_returns(&body("= if true then return 1 else 2")));
    }

    #[test]
    fn test_while_never_returns() {
        assert!(!stmt_definitely_returns(&body("= while true do return 1")));
    }
}
