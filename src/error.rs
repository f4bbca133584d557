// Error types shared across the parser, code builder, and interpreter.
//
// Each subsystem gets its own variant family; `GimmickError` is the
// top-level sum a caller (the CLI) actually matches on.

use thiserror::Error;

/// A position in the source text where a combinator gave up.
pub type Cursor = usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not match rule `{rule}` at position {cursor}")]
    NoMatch { rule: &'static str, cursor: Cursor },

    #[error("expected end of input at position {cursor}")]
    TrailingInput { cursor: Cursor },

    #[error("trailing comma is not allowed in an argument list at position {cursor}")]
    TrailingComma { cursor: Cursor },
}

impl ParseError {
    pub fn cursor(&self) -> Cursor {
        match self {
            ParseError::NoMatch { cursor, .. } => *cursor,
            ParseError::TrailingInput { cursor } => *cursor,
            ParseError::TrailingComma { cursor } => *cursor,
        }
    }

    /// Rewrites the reported cursor. Used by `sequence` combinators to
    /// restore the position they themselves were called at, so a failure
    /// partway through a multi-step match never leaks an intermediate
    /// cursor.
    pub fn with_cursor(self, cursor: Cursor) -> Self {
        match self {
            ParseError::NoMatch { rule, .. } => ParseError::NoMatch { rule, cursor },
            ParseError::TrailingInput { .. } => ParseError::TrailingInput { cursor },
            ParseError::TrailingComma { .. } => ParseError::TrailingComma { cursor },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("unresolved symbol `{0}`")]
    UnresolvedSymbol(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("operand stack underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("function id {0} out of range")]
    InvalidFunctionId(u32),

    #[error("program counter out of range")]
    InvalidProgramCounter,

    #[error("read of undefined local variable {0}")]
    UndefinedVariable(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GimmickError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
