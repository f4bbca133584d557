// Tree-to-bytecode lowering: one rule per `Expr` variant. Left-to-right
// parameter evaluation matches source order; binary operators emit left
// then right so the VM pops right first, matching `a op b` semantics
// directly.

use crate::ast::Expr;
use crate::bytecode::{BinOpCode, FunctionTable, Opcode};
use crate::codebuilder::CodeBuilder;
use crate::error::EmitError;

/// Lowers a parsed module into a function table. The module's own block is
/// emitted into function id 0, the implicit module entry function.
pub fn build(module: &Expr) -> Result<FunctionTable, EmitError> {
    let mut builder = CodeBuilder::new();
    lower(module, &mut builder)?;
    Ok(builder.finish())
}

pub fn lower(expr: &Expr, builder: &mut CodeBuilder) -> Result<(), EmitError> {
    match expr {
        Expr::Int(v) => {
            builder.emit(Opcode::Push(*v));
            Ok(())
        }
        // Float arithmetic is unimplemented; this truncates to an integer
        // as a placeholder until the operand stack carries tagged values.
        Expr::Float(v) => {
            builder.emit(Opcode::Push(v.trunc() as i64));
            Ok(())
        }
        Expr::Ident(name) => {
            let id = builder.resolve(name)?;
            builder.emit(Opcode::Load(id));
            Ok(())
        }
        Expr::BinOp { op, left, right } => {
            lower(left, builder)?;
            lower(right, builder)?;
            let op_code = BinOpCode::from_char(*op).expect("grammar only produces + - * /");
            builder.emit(Opcode::Binary(op_code));
            Ok(())
        }
        Expr::Assign { name, value } => {
            lower(value, builder)?;
            let id = builder.resolve_or_define(name);
            builder.emit(Opcode::Assign(id));
            Ok(())
        }
        Expr::Call { name, params } => {
            for param in params {
                lower(param, builder)?;
            }
            let id = builder.resolve(name)?;
            builder.emit(Opcode::Invoke(id));
            Ok(())
        }
        Expr::FnDef { name, args, body } => {
            let body_exprs: Vec<Expr> = match body.as_ref() {
                Expr::Block(exprs) => exprs.clone(),
                other => vec![other.clone()],
            };
            builder.define_function(name, args, |b| lower_block(&body_exprs, b))?;
            Ok(())
        }
        Expr::Block(exprs) => lower_block(exprs, builder),
        Expr::Module(block) => lower(block, builder),
    }
}

fn lower_block(exprs: &[Expr], builder: &mut CodeBuilder) -> Result<(), EmitError> {
    for (i, expr) in exprs.iter().enumerate() {
        lower(expr, builder)?;
        if i != exprs.len() - 1 {
            builder.emit(Opcode::Pop);
        }
    }
    Ok(())
}
