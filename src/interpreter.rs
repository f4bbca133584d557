// Stack VM. A single shared operand stack, a call-frame stack where the
// top is the active frame, implicit return when the program counter runs
// past the end of a function's instructions.

use std::collections::HashMap;

use tracing::trace;

use crate::bytecode::{BinOpCode, FunctionTable, Opcode};
use crate::error::RuntimeError;
use crate::stack::OperandStack;

/// One invocation's state: which function, where in it, and its locals.
/// Locals are created empty and grow only via `Assign`.
#[derive(Debug, Default)]
pub struct Frame {
    pub function_id: u32,
    pub pc: usize,
    pub locals: HashMap<u32, i64>,
}

impl Frame {
    fn new(function_id: u32) -> Self {
        Frame { function_id, pc: 0, locals: HashMap::new() }
    }
}

/// Owns everything needed to run a compiled program to completion: the
/// function table (immutable once built), the call-frame stack, and the
/// operand stack all frames share. One interpreter instance serves one
/// program, single-threaded, with no suspension.
pub struct Interpreter {
    functions: FunctionTable,
    call_stack: Vec<Frame>,
    operand_stack: OperandStack,
}

impl Interpreter {
    /// Loads a function table without running it. Exposed so hand-assembled
    /// bytecode (not just what `lower::build` produces) can be executed.
    pub fn load_program(functions: FunctionTable) -> Self {
        Interpreter { functions, call_stack: Vec::new(), operand_stack: OperandStack::new() }
    }

    /// Runs function id 0 (the module entry function) to completion and
    /// returns whatever is left on top of the operand stack.
    pub fn run(functions: FunctionTable) -> Result<i64, RuntimeError> {
        let mut interp = Interpreter::load_program(functions);
        interp.invoke(0)?;
        interp.start()?;
        interp.operand_stack.pop()
    }

    fn invoke(&mut self, function_id: u32) -> Result<(), RuntimeError> {
        if self.functions.get(function_id).is_none() {
            return Err(RuntimeError::InvalidFunctionId(function_id));
        }
        self.call_stack.push(Frame::new(function_id));
        Ok(())
    }

    fn start(&mut self) -> Result<(), RuntimeError> {
        loop {
            let (function_id, pc) = match self.call_stack.last() {
                None => return Ok(()),
                Some(frame) => (frame.function_id, frame.pc),
            };

            let function = self
                .functions
                .get(function_id)
                .ok_or(RuntimeError::InvalidFunctionId(function_id))?;

            if pc >= function.instructions.len() {
                self.call_stack.pop();
                continue;
            }

            let inst = function.instructions[pc];
            self.call_stack
                .last_mut()
                .expect("checked non-empty above")
                .pc = pc + 1;

            trace!(?inst, function_id, pc, "dispatch");
            self.exec(inst)?;
        }
    }

    fn exec(&mut self, inst: Opcode) -> Result<(), RuntimeError> {
        match inst {
            Opcode::Push(v) => {
                self.operand_stack.push(v);
                Ok(())
            }
            Opcode::Pop => self.operand_stack.pop().map(|_| ()),
            Opcode::Binary(op) => self.exec_binary(op),
            Opcode::Invoke(function_id) => self.invoke(function_id),
            Opcode::Assign(var_id) => self.exec_assign(var_id),
            Opcode::Load(var_id) => self.exec_load(var_id),
        }
    }

    fn exec_binary(&mut self, op: BinOpCode) -> Result<(), RuntimeError> {
        // `pop_n(2)` yields `[b, a]`, top first; for `A <op> B` the caller
        // pushed A then B, so B was on top.
        let popped = self.operand_stack.pop_n(2)?;
        let right = popped[0];
        let left = popped[1];
        let result = match op {
            BinOpCode::Add => left.wrapping_add(right),
            BinOpCode::Sub => left.wrapping_sub(right),
            BinOpCode::Mul => left.wrapping_mul(right),
            BinOpCode::Div => {
                if right == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                left.wrapping_div(right)
            }
        };
        self.operand_stack.push(result);
        Ok(())
    }

    fn exec_assign(&mut self, var_id: u32) -> Result<(), RuntimeError> {
        let value = self.operand_stack.pop()?;
        let frame = self.call_stack.last_mut().expect("assign only runs inside a frame");
        frame.locals.insert(var_id, value);
        Ok(())
    }

    fn exec_load(&mut self, var_id: u32) -> Result<(), RuntimeError> {
        let frame = self.call_stack.last().expect("load only runs inside a frame");
        let value = *frame.locals.get(&var_id).ok_or(RuntimeError::UndefinedVariable(var_id))?;
        self.operand_stack.push(value);
        Ok(())
    }
}
