// The grammar of the language, built from the primitives in
// `parser::combinators`. `|` below is `longest_alternative`; concatenation
// is `sequence`.
//
// ```
// module        := block end_of_input
// block         := expression block | expression | empty
// expression    := guarded binop expression | guarded
// guarded       := "(" expression ")"
//                | identifier "=" expression
//                | integer_literal | float_literal
//                | function_def
//                | function_call
//                | identifier
// binop         := "+" | "-" | "*" | "/"
// function_def  := "def" identifier "(" arg_list ")" "{" block "}"
// function_call := identifier "(" param_list ")"
// arg_list      := arg_decl "," arg_list | arg_decl | empty
// arg_decl      := identifier ":" identifier
// param_list    := expression "," param_list | expression | empty
// ```
//
// Expression recursion is right-associative by construction — `a + b + c`
// parses as `a + (b + c)` — which is wrong for `-` and `/`. This is kept
// deliberately, as a known, accepted limitation this crate does not patch.

use super::combinators::{
    empty, end_of_input, float_literal, identifier, integer_literal, keyword, longest_alternative,
    punct, seq2, seq3, seq4, skip_ws, BoxParser, Cursor, ParseResult,
};
use crate::ast::Expr;
use crate::error::ParseError;

pub fn module(text: &str, cursor: Cursor) -> ParseResult<Expr> {
    seq2(block, end_of_input)(text, cursor)
        .map(|((exprs, ()), nc)| (Expr::Module(Box::new(Expr::Block(exprs))), nc))
}

pub fn block(text: &str, cursor: Cursor) -> ParseResult<Vec<Expr>> {
    let alternatives: Vec<BoxParser<'_, Vec<Expr>>> = vec![
        Box::new(|t, c| {
            seq2(expression, block)(t, c).map(|((head, mut tail), nc)| {
                let mut exprs = vec![head];
                exprs.append(&mut tail);
                (exprs, nc)
            })
        }),
        Box::new(|t, c| expression(t, c).map(|(e, nc)| (vec![e], nc))),
        Box::new(|t, c| empty(t, c).map(|((), nc)| (Vec::new(), nc))),
    ];
    longest_alternative("block", alternatives)(text, cursor)
}

pub fn expression(text: &str, cursor: Cursor) -> ParseResult<Expr> {
    let alternatives: Vec<BoxParser<'_, Expr>> = vec![
        Box::new(|t, c| {
            seq3(guarded, binop, expression)(t, c).map(|((left, op, right), nc)| {
                (
                    Expr::BinOp { op, left: Box::new(left), right: Box::new(right) },
                    nc,
                )
            })
        }),
        Box::new(guarded),
    ];
    longest_alternative("expression", alternatives)(text, cursor)
}

fn guarded(text: &str, cursor: Cursor) -> ParseResult<Expr> {
    let alternatives: Vec<BoxParser<'_, Expr>> = vec![
        Box::new(|t, c| {
            seq3(punct("("), expression, punct(")"))(t, c).map(|((_, e, _), nc)| (e, nc))
        }),
        Box::new(|t, c| {
            seq3(identifier, punct("="), expression)(t, c)
                .map(|((name, _, value), nc)| (Expr::Assign { name, value: Box::new(value) }, nc))
        }),
        Box::new(|t, c| integer_literal(t, c).map(|(v, nc)| (Expr::Int(v), nc))),
        Box::new(|t, c| float_literal(t, c).map(|(v, nc)| (Expr::Float(v), nc))),
        Box::new(function_def),
        Box::new(function_call),
        Box::new(|t, c| identifier(t, c).map(|(name, nc)| (Expr::Ident(name), nc))),
    ];
    longest_alternative("guarded", alternatives)(text, cursor)
}

fn binop(text: &str, cursor: Cursor) -> ParseResult<char> {
    let alternatives: Vec<BoxParser<'_, char>> = vec![
        Box::new(|t, c| punct("+")(t, c).map(|((), nc)| ('+', nc))),
        Box::new(|t, c| punct("-")(t, c).map(|((), nc)| ('-', nc))),
        Box::new(|t, c| punct("*")(t, c).map(|((), nc)| ('*', nc))),
        Box::new(|t, c| punct("/")(t, c).map(|((), nc)| ('/', nc))),
    ];
    longest_alternative("binop", alternatives)(text, cursor)
}

fn function_def(text: &str, cursor: Cursor) -> ParseResult<Expr> {
    let ((_, name, _, args), cursor_after_args) =
        seq4(keyword("def"), identifier, punct("("), arg_list)(text, cursor)?;

    // A trailing comma in arg_list is a syntax error. `arg_list` never
    // consumes a trailing comma itself, so if
    // one remains right before the closing paren we can report it
    // precisely instead of surfacing a generic "expected `)`" failure.
    let after_ws = skip_ws(text, cursor_after_args);
    if text[after_ws..].starts_with(',') {
        return Err(ParseError::TrailingComma { cursor: cursor_after_args });
    }

    seq4(punct(")"), punct("{"), block, punct("}"))(text, cursor_after_args)
        .map(|((_, _, body, _), nc)| (Expr::FnDef { name, args, body: Box::new(Expr::Block(body)) }, nc))
        .map_err(|e| e.with_cursor(cursor))
}

fn function_call(text: &str, cursor: Cursor) -> ParseResult<Expr> {
    seq4(identifier, punct("("), param_list, punct(")"))(text, cursor)
        .map(|((name, _, params, _), nc)| (Expr::Call { name, params }, nc))
}

fn arg_decl(text: &str, cursor: Cursor) -> ParseResult<(String, String)> {
    seq3(identifier, punct(":"), identifier)(text, cursor)
        .map(|((name, _, ty), nc)| ((name, ty), nc))
}

/// `arg_decl "," arg_list | arg_decl | empty`. The first branch requires a
/// *non-empty* continuation after the comma (see `arg_list_tail`), which is
/// what keeps `(arg,)` from silently parsing as `(arg)`.
fn arg_list(text: &str, cursor: Cursor) -> ParseResult<Vec<(String, String)>> {
    let alternatives: Vec<BoxParser<'_, Vec<(String, String)>>> = vec![
        Box::new(|t, c| {
            seq3(arg_decl, punct(","), arg_list_tail)(t, c).map(|((head, _, mut tail), nc)| {
                let mut decls = vec![head];
                decls.append(&mut tail);
                (decls, nc)
            })
        }),
        Box::new(|t, c| arg_decl(t, c).map(|(d, nc)| (vec![d], nc))),
        Box::new(|t, c| empty(t, c).map(|((), nc)| (Vec::new(), nc))),
    ];
    longest_alternative("arg_list", alternatives)(text, cursor)
}

/// Like `arg_list` but without the `empty` alternative — used after a
/// comma, where at least one more declaration is required.
fn arg_list_tail(text: &str, cursor: Cursor) -> ParseResult<Vec<(String, String)>> {
    let alternatives: Vec<BoxParser<'_, Vec<(String, String)>>> = vec![
        Box::new(|t, c| {
            seq3(arg_decl, punct(","), arg_list_tail)(t, c).map(|((head, _, mut tail), nc)| {
                let mut decls = vec![head];
                decls.append(&mut tail);
                (decls, nc)
            })
        }),
        Box::new(|t, c| arg_decl(t, c).map(|(d, nc)| (vec![d], nc))),
    ];
    longest_alternative("arg_list_tail", alternatives)(text, cursor)
}

/// `expression "," param_list | expression | empty`. Unlike `arg_list`,
/// A trailing comma here is not treated as an issue, so this keeps the
/// same recursive structure (and accepts `f(1,)`) verbatim.
fn param_list(text: &str, cursor: Cursor) -> ParseResult<Vec<Expr>> {
    let alternatives: Vec<BoxParser<'_, Vec<Expr>>> = vec![
        Box::new(|t, c| {
            seq3(expression, punct(","), param_list)(t, c).map(|((head, _, mut tail), nc)| {
                let mut params = vec![head];
                params.append(&mut tail);
                (params, nc)
            })
        }),
        Box::new(|t, c| expression(t, c).map(|(e, nc)| (vec![e], nc))),
        Box::new(|t, c| empty(t, c).map(|((), nc)| (Vec::new(), nc))),
    ];
    longest_alternative("param_list", alternatives)(text, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(src: &str) -> Expr {
        expression(src, 0).unwrap().0
    }

    #[test]
    fn integer_and_float_literals() {
        assert_eq!(parse_expr("42"), Expr::Int(42));
        assert_eq!(parse_expr("42.0"), Expr::Float(42.0));
    }

    #[test]
    fn parenthesized_expression_unwraps() {
        assert_eq!(parse_expr("(42)"), Expr::Int(42));
    }

    #[test]
    fn bare_identifier() {
        assert_eq!(parse_expr("foo"), Expr::Ident("foo".to_string()));
    }

    #[test]
    fn binary_operator_is_right_associative() {
        match parse_expr("1 + 2 + 3") {
            Expr::BinOp { op: '+', left, right } => {
                assert_eq!(*left, Expr::Int(1));
                match *right {
                    Expr::BinOp { op: '+', left, right } => {
                        assert_eq!(*left, Expr::Int(2));
                        assert_eq!(*right, Expr::Int(3));
                    }
                    other => panic!("expected nested BinOp, got {other:?}"),
                }
            }
            other => panic!("expected BinOp, got {other:?}"),
        }
    }

    #[test]
    fn assignment() {
        match parse_expr("x = 5") {
            Expr::Assign { name, value } => {
                assert_eq!(name, "x");
                assert_eq!(*value, Expr::Int(5));
            }
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn function_call_with_params() {
        match parse_expr("f(1, 2)") {
            Expr::Call { name, params } => {
                assert_eq!(name, "f");
                assert_eq!(params, vec![Expr::Int(1), Expr::Int(2)]);
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn arg_list_accepts_empty_single_and_multiple() {
        assert_eq!(arg_list("", 0).unwrap().0, Vec::<(String, String)>::new());
        assert_eq!(arg_list("a:int", 0).unwrap().0, vec![("a".into(), "int".into())]);
        assert_eq!(
            arg_list("a:int, b:int", 0).unwrap().0,
            vec![("a".into(), "int".into()), ("b".into(), "int".into())]
        );
    }

    #[test]
    fn arg_list_does_not_consume_a_leading_comma() {
        // ",a:int" should not be absorbed as a valid (shifted) arg_list;
        // the longest match here is the empty alternative.
        let (decls, cursor) = arg_list(",a:int", 0).unwrap();
        assert!(decls.is_empty());
        assert_eq!(cursor, 0);
    }

    #[test]
    fn function_def_rejects_trailing_comma() {
        assert!(module("def f(a:int,){ a }", 0).is_err());
    }

    #[test]
    fn function_def_accepts_and_rejects() {
        assert!(module("def f(){}", 0).is_ok());
        assert!(module("def f(){", 0).is_err());
        assert!(module("def f){", 0).is_err());
    }
}
