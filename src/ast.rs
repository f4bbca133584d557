// The tree produced by the grammar (src/parser/grammar.rs) and consumed by
// the lowering pass (src/lower.rs). A single sum type covers every
// emittable construct. The handful of grammar productions that never reach
// the emitter (argument declarations, argument/parameter lists,
// end-of-input, empty) are plain Rust values returned directly by their
// combinators in `parser::grammar` and never appear as an `Expr` variant.

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Ident(String),
    BinOp {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        name: String,
        value: Box<Expr>,
    },
    FnDef {
        name: String,
        /// (parameter name, type name) pairs in declaration order. Type
        /// names are carried but never checked against a real type system.
        args: Vec<(String, String)>,
        body: Box<Expr>,
    },
    Call {
        name: String,
        params: Vec<Expr>,
    },
    Block(Vec<Expr>),
    Module(Box<Expr>),
}
