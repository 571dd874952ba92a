//! Indentation-sensitive newline filter.
//!
//! Enlyn has no statement terminator character. A line break ends a
//! statement only when the next line starts at the indentation of the
//! enclosing block; deeper-indented lines continue the previous one.
//! Block indentation is taken from the first token after `{`.

use crate::parser::token::{Span, Token};

/// Drop insignificant [`Token::Newline`]s and collapse runs of the rest.
pub fn filter_newlines(tokens: Vec<(Token, Span)>) -> Vec<(Token, Span)> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut indents = vec![indent_at(&tokens, 0)];
    let mut i = 0;

    while i < tokens.len() {
        let (token, span) = &tokens[i];
        match token {
            Token::Newline => {
                let next = skip_newlines(&tokens, i);
                if let Some((next_token, next_span)) = tokens.get(next) {
                    if !next_token.continues_line() && indents.last() == Some(&next_span.column) {
                        output.push((Token::Newline, *span));
                    }
                }
                i = next;
                continue;
            }
            Token::LeftBrace => {
                output.push((token.clone(), *span));
                indents.push(indent_at(&tokens, i + 1));
                i = skip_newlines(&tokens, i + 1);
                continue;
            }
            Token::RightBrace => {
                if indents.len() > 1 {
                    indents.pop();
                }
                output.push((token.clone(), *span));
            }
            _ => output.push((token.clone(), *span)),
        }
        i += 1;
    }

    output
}

fn skip_newlines(tokens: &[(Token, Span)], mut i: usize) -> usize {
    while matches!(tokens.get(i), Some((Token::Newline, _))) {
        i += 1;
    }
    i
}

fn indent_at(tokens: &[(Token, Span)], i: usize) -> u32 {
    tokens
        .get(skip_newlines(tokens, i))
        .map(|(_, span)| span.column)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn filtered(source: &str) -> Vec<Token> {
        let tokens = Lexer::new(source).tokenize().expect("lexing failed");
        filter_newlines(tokens).into_iter().map(|(t, _)| t).collect()
    }

    fn newline_count(source: &str) -> usize {
        filtered(source).iter().filter(|t| **t == Token::Newline).count()
    }

    #[test]
    fn test_same_indent_lines_are_terminated() {
        assert_eq!(newline_count("1\n2\n  3\n4"), 2);
    }

    #[test]
    fn test_newlines_around_braces_are_dropped() {
        assert_eq!(newline_count("1 <\n{\n  true\n"), 0);
    }

    #[test]
    fn test_block_statements_use_block_indent() {
        let source = "{\n    let a = 1\n    let b =\n        2\n    a\n}";
        assert_eq!(newline_count(source), 2);
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(newline_count("a\n\n\nb"), 1);
    }

    #[test]
    fn test_keywords_continue_the_statement() {
        let source = "if a then\n    b\nelse\n    c";
        assert_eq!(newline_count(source), 0);
        let source = "while a\ndo b";
        assert_eq!(newline_count(source), 0);
    }

    #[test]
    fn test_nested_blocks_restore_outer_indent() {
        let source = "class A\n{\n  x()\n  {\n      a\n      b\n  }\n  y()\n}\nclass B { }";
        let tokens = filtered(source);
        let count = tokens.iter().filter(|t| **t == Token::Newline).count();
        // a|b inside the method, x()|y() in the class, A|B at top level
        assert_eq!(count, 3);
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }
}
