// Parser entry point: the combinator framework (`combinators`) plus the
// grammar built on top of it (`grammar`). The parser holds no implicit
// cursor — every combinator is the pure function `(source, cursor) ->
// (token, new_cursor, outcome)`.

pub mod combinators;
pub mod grammar;

use crate::ast::Expr;
use crate::error::ParseError;

/// Parses a complete module: a block followed by end-of-input.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    grammar::module(source, 0).map(|(expr, _cursor)| expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn parses_a_whole_module() {
        let module = parse("1 + 2").unwrap();
        assert_eq!(module, Expr::Module(Box::new(Expr::Block(vec![Expr::BinOp {
            op: '+',
            left: Box::new(Expr::Int(1)),
            right: Box::new(Expr::Int(2)),
        }]))));
    }

    #[test]
    fn trailing_garbage_is_a_parse_error() {
        assert!(parse("1 + 2 )").is_err());
    }
}
