// Instruction set: a fixed-shape opcode with up to two integer arguments
// The wire format is a triple `(opcode, arg1, arg2)` of
// machine words with `ARG_NOOP` filling unused argument slots; in memory we
// use a sum type instead, so an argument slot that doesn't exist for a
// given opcode simply isn't representable rather than being filled with
// the sentinel. `Opcode::wire` reconstructs the triple for anyone
// embedding or dumping bytecode. Bytecode here is in-process only and
// never persisted, so this is a debugging aid, not a serialization format.

/// Wire-format sentinel for an unused argument slot.
pub const ARG_NOOP: i64 = 0xFFFF_FFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpCode {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
}

impl BinOpCode {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinOpCode::Add),
            '-' => Some(BinOpCode::Sub),
            '*' => Some(BinOpCode::Mul),
            '/' => Some(BinOpCode::Div),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Push(i64),
    Pop,
    Binary(BinOpCode),
    Invoke(u32),
    Assign(u32),
    /// Reads the current frame's locals, so that reading a variable pushes
    /// its *value* rather than its id.
    Load(u32),
}

impl Opcode {
    /// The `(opcode, arg1, arg2)` wire triple, following the numbering
    /// (`PUSH=0, POP=1, BINARY=2, INVOKE=3, ASSIGN=4`; `LOAD=5` extends it).
    pub fn wire(&self) -> (i64, i64, i64) {
        match *self {
            Opcode::Push(v) => (0, v, ARG_NOOP),
            Opcode::Pop => (1, ARG_NOOP, ARG_NOOP),
            Opcode::Binary(op) => (2, op as i64, ARG_NOOP),
            Opcode::Invoke(id) => (3, id as i64, ARG_NOOP),
            Opcode::Assign(id) => (4, id as i64, ARG_NOOP),
            Opcode::Load(id) => (5, id as i64, ARG_NOOP),
        }
    }
}

/// An ordered sequence of instructions addressable by a dense function id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Function {
    pub instructions: Vec<Opcode>,
}

/// Function units indexed by the dense id assigned at emission time, in
/// declaration order starting at zero. Id 0 is always the implicit module
/// entry function.
#[derive(Clone, Debug, Default)]
pub struct FunctionTable {
    functions: Vec<Function>,
}

impl FunctionTable {
    pub fn new(functions: Vec<Function>) -> Self {
        FunctionTable { functions }
    }

    pub fn get(&self, id: u32) -> Option<&Function> {
        self.functions.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
