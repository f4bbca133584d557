// Scope resolution and function table assembly. `ScopeStack` mutates in
// place (rather than returning a modified copy on push) so that symbols
// defined mid-body-emission are visible to later emissions in the same
// body.

use std::collections::HashMap;

use tracing::debug;

use crate::bytecode::{Function, FunctionTable, Opcode};
use crate::error::EmitError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Variable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub id: u32,
    pub kind: SymbolKind,
}

/// Innermost scope last. A lookup walks top-to-bottom until found.
#[derive(Default)]
pub struct ScopeStack(Vec<HashMap<String, Symbol>>);

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack(vec![HashMap::new()])
    }

    pub fn push_scope(&mut self) {
        self.0.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.0.pop();
        debug_assert!(!self.0.is_empty(), "popped the outermost scope");
    }

    pub fn define(&mut self, name: &str, symbol: Symbol) {
        self.0
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.to_string(), symbol);
    }

    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        self.0.iter().rev().find_map(|scope| scope.get(name).copied())
    }
}

/// Owns the scope stack, the function table under construction, and the
/// currently-emitting function's instruction buffer.
pub struct CodeBuilder {
    scopes: ScopeStack,
    functions: Vec<Function>,
    emit_stack: Vec<Vec<Opcode>>,
    /// One counter per function-nesting level; variable ids are dense per
    /// function frame, reset to zero for each new `define_function`.
    var_counters: Vec<u32>,
}

impl CodeBuilder {
    pub fn new() -> Self {
        CodeBuilder {
            scopes: ScopeStack::new(),
            // Function id 0 is reserved for the implicit module entry
            // function; it's filled in by `finish`.
            functions: vec![Function::default()],
            emit_stack: vec![Vec::new()],
            var_counters: vec![0],
        }
    }

    pub fn emit(&mut self, op: Opcode) {
        self.emit_stack
            .last_mut()
            .expect("emit stack is never empty")
            .push(op);
    }

    /// Allocates the next function id, binds `name` as a function symbol in
    /// the *enclosing* scope, pushes a fresh scope, binds each parameter as
    /// a variable symbol in order, runs `body` to fill the function's
    /// instruction buffer, then pops the scope. Forward references across
    /// invocation are not supported in v1: the body
    /// is emitted into its slot before any `Invoke` referencing it may run,
    /// but nothing stops the caller from emitting an `Invoke` of an
    /// as-yet-undefined function id — that only fails at run time.
    ///
    /// `INVOKE` does no argument marshalling of its own:
    /// the caller's pushed arguments just sit on the shared operand stack
    /// when the callee's frame starts running. So the callee's own
    /// instruction buffer opens with one `Assign` per parameter, popping
    /// them into locals in reverse declaration order (the rightmost
    /// argument is on top of the stack, matching `resolve_or_define`'s
    /// general "pop and bind" contract for `Assign`).
    pub fn define_function(
        &mut self,
        name: &str,
        args: &[(String, String)],
        body: impl FnOnce(&mut CodeBuilder) -> Result<(), EmitError>,
    ) -> Result<u32, EmitError> {
        let id = self.functions.len() as u32;
        self.functions.push(Function::default());
        self.scopes.define(name, Symbol { id, kind: SymbolKind::Function });
        debug!(function = name, id, arg_count = args.len(), "defining function");

        self.scopes.push_scope();
        self.var_counters.push(0);
        self.emit_stack.push(Vec::new());
        let mut arg_ids = Vec::with_capacity(args.len());
        for (arg_name, _arg_type) in args {
            let vid = self.next_variable_id();
            self.scopes.define(arg_name, Symbol { id: vid, kind: SymbolKind::Variable });
            arg_ids.push(vid);
        }
        for vid in arg_ids.into_iter().rev() {
            self.emit(Opcode::Assign(vid));
        }

        let result = body(self);

        let instructions = self.emit_stack.pop().expect("pushed above");
        self.var_counters.pop();
        self.scopes.pop_scope();
        result?;
        debug!(function = name, id, instruction_count = instructions.len(), "function assembled");
        self.functions[id as usize] = Function { instructions };
        Ok(id)
    }

    pub fn resolve(&self, name: &str) -> Result<u32, EmitError> {
        self.scopes
            .resolve(name)
            .map(|symbol| symbol.id)
            .ok_or_else(|| EmitError::UnresolvedSymbol(name.to_string()))
    }

    /// Resolves `name`, or on miss allocates the next variable id in the
    /// innermost scope — "assignment defines a local".
    pub fn resolve_or_define(&mut self, name: &str) -> u32 {
        if let Some(symbol) = self.scopes.resolve(name) {
            return symbol.id;
        }
        let id = self.next_variable_id();
        self.scopes.define(name, Symbol { id, kind: SymbolKind::Variable });
        id
    }

    fn next_variable_id(&mut self) -> u32 {
        let counter = self.var_counters.last_mut().expect("var counter stack is never empty");
        let id = *counter;
        *counter += 1;
        id
    }

    pub fn finish(mut self) -> FunctionTable {
        let entry = self.emit_stack.pop().expect("module buffer is always present");
        self.functions[0] = Function { instructions: entry };
        debug!(function_count = self.functions.len(), "function table assembled");
        FunctionTable::new(self.functions)
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
