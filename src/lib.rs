// gimmick: parser, bytecode emitter, and stack VM for a small
// curly-braced expression language.
//
// Copyright (C) 2019  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

pub mod ast;
pub mod bytecode;
pub mod codebuilder;
pub mod error;
pub mod interpreter;
pub mod lower;
pub mod parser;
pub mod stack;

use error::GimmickError;
use interpreter::Interpreter;

/// Parses, lowers, and runs a complete source module, returning the final
/// top-of-operand-stack value.
pub fn compile_and_run(source: &str) -> Result<i64, GimmickError> {
    let module = parser::parse(source)?;
    let functions = lower::build(&module)?;
    let result = Interpreter::run(functions)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_addition() {
        assert_eq!(compile_and_run("1 + 2").unwrap(), 3);
    }

    #[test]
    fn right_associative_subtraction() {
        assert_eq!(compile_and_run("10 - 3 - 2").unwrap(), 9);
    }

    #[test]
    fn parenthesized_grouping() {
        assert_eq!(compile_and_run("2 * (3 + 4)").unwrap(), 14);
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        assert!(compile_and_run("100 / 0").is_err());
    }

    #[test]
    fn function_call_with_load_semantics() {
        assert_eq!(compile_and_run("def f(x:int){ x * x } f(7)").unwrap(), 49);
    }

    #[test]
    fn assignment_defines_a_local_then_reads_it() {
        assert_eq!(compile_and_run("x = 5 x + 1").unwrap(), 6);
    }

    #[test]
    fn a_parse_error_surfaces_as_gimmick_error() {
        assert!(compile_and_run("def f(){").is_err());
    }

    #[test]
    fn an_unresolved_call_surfaces_as_gimmick_error() {
        assert!(compile_and_run("missing(1)").is_err());
    }
}

