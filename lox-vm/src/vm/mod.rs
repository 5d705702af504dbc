// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Stack-based virtual machine for executing Lox bytecode.

pub mod config;
pub mod error;
pub mod frame;
pub mod handlers;
pub mod natives;
pub mod stack;

use std::fmt::Write as _;
use std::io::{self, Write};
use std::rc::Rc;

use log::{Level, debug, log_enabled, trace};

use crate::InterpretResult;
use crate::compiler::compile;
use crate::debug::disassemble_instruction;
use crate::object::{Function, NativeFunction, Obj};
use crate::opcode::OpCode;
use crate::table::Table;
use crate::value::Value;

pub use config::VmConfig;
pub use error::{Result, RuntimeError, RuntimeFailure};
pub use frame::CallFrame;
pub use handlers::control::ControlFlow;
pub use stack::ValueStack;

/// The Lox virtual machine.
///
/// Globals persist across calls to [`VM::interpret`], so one VM can serve a
/// whole REPL session.
pub struct VM {
    /// Operand stack shared by all frames.
    stack: ValueStack,

    /// Call frame stack.
    frames: Vec<CallFrame>,

    /// Global variables.
    globals: Table,

    config: VmConfig,

    /// Sink for `print` output.
    out: Box<dyn Write>,

    /// Sink for compile and runtime diagnostics.
    err: Box<dyn Write>,
}

impl VM {
    /// Create a new VM printing to stdout and reporting to stderr.
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    /// Create a new VM with the given capacity limits.
    pub fn with_config(config: VmConfig) -> Self {
        Self::with_config_and_output(config, io::stdout(), io::stderr())
    }

    /// Create a new VM writing `print` output to `out` and diagnostics to
    /// `err`.
    pub fn with_output(out: impl Write + 'static, err: impl Write + 'static) -> Self {
        Self::with_config_and_output(VmConfig::default(), out, err)
    }

    pub fn with_config_and_output(
        config: VmConfig,
        out: impl Write + 'static,
        err: impl Write + 'static,
    ) -> Self {
        let mut vm = Self {
            stack: ValueStack::new(config.stack_max()),
            frames: Vec::with_capacity(config.frames_max),
            globals: Table::new(),
            config,
            out: Box::new(out),
            err: Box::new(err),
        };
        vm.define_builtins();
        vm
    }

    /// Compile and run a source snippet.
    ///
    /// Diagnostics go to the error sink; the result says which phase, if
    /// any, failed.
    pub fn interpret(&mut self, source: &str) -> InterpretResult {
        debug!("interpret: {} bytes", source.len());

        let function = match compile(source) {
            Ok(function) => function,
            Err(errors) => {
                for error in &errors {
                    let _ = writeln!(self.err, "{}", error);
                }
                let _ = self.err.flush();
                return InterpretResult::CompileError;
            }
        };

        let result = match self.run(function) {
            Ok(()) => InterpretResult::Ok,
            Err(failure) => {
                let _ = writeln!(self.err, "{}", failure);
                let _ = self.err.flush();
                InterpretResult::RuntimeError
            }
        };
        let _ = self.out.flush();
        result
    }

    /// Execute a compiled script function.
    ///
    /// On failure the operand and frame stacks are reset, so the VM is
    /// ready for the next call.
    pub fn run(&mut self, function: Function) -> std::result::Result<(), RuntimeFailure> {
        let function = Rc::new(function);
        let result = self
            .stack
            .push(Value::function(Rc::clone(&function)))
            .and_then(|()| self.call_function(function, 0))
            .and_then(|()| self.run_loop());

        result.map_err(|error| {
            debug!("runtime error: {}", error);
            let failure = RuntimeFailure {
                error,
                trace: self.stack_trace(),
            };
            self.reset_stack();
            failure
        })
    }

    /// Bind a host function as a global.
    ///
    /// With `arity` set, calls with a different argument count fail before
    /// `function` runs.
    pub fn define_native<F>(&mut self, name: &str, arity: Option<u8>, function: F)
    where
        F: Fn(&[Value]) -> std::result::Result<Value, String> + 'static,
    {
        let name: Rc<str> = name.into();
        let native = NativeFunction::new(Rc::clone(&name), arity, function);
        self.globals.set(name, Value::native(Rc::new(native)));
    }

    /// The global variable table.
    pub fn globals(&self) -> &Table {
        &self.globals
    }

    /// Current operand stack depth. Zero between runs.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    fn run_loop(&mut self) -> Result<()> {
        loop {
            if log_enabled!(Level::Trace) {
                self.trace_instruction();
            }

            let op = self.read_op()?;

            match op {
                // Constants & Stack - handled inline (simple operations)
                OpCode::Constant => {
                    let val = self.read_constant()?;
                    self.stack.push(val)?;
                }
                OpCode::Nil => self.stack.push(Value::Nil)?,
                OpCode::True => self.stack.push(Value::Bool(true))?,
                OpCode::False => self.stack.push(Value::Bool(false))?,
                OpCode::Pop => {
                    self.stack.pop()?;
                }
                OpCode::Not => {
                    let val = self.stack.pop()?;
                    self.stack.push(Value::Bool(val.is_falsey()))?;
                }
                OpCode::Print => {
                    let val = self.stack.pop()?;
                    writeln!(self.out, "{}", val)
                        .map_err(|e| RuntimeError::Output(e.to_string()))?;
                }

                // Variables - delegated to handler
                OpCode::GetLocal
                | OpCode::SetLocal
                | OpCode::GetGlobal
                | OpCode::DefineGlobal
                | OpCode::SetGlobal => {
                    self.execute_variables(op)?;
                }

                // Arithmetic & comparison - delegated to handler
                OpCode::Equal
                | OpCode::Greater
                | OpCode::Less
                | OpCode::Add
                | OpCode::Subtract
                | OpCode::Multiply
                | OpCode::Divide
                | OpCode::Negate => {
                    self.execute_arithmetic(op)?;
                }

                // Control flow - delegated to handler
                OpCode::Jump
                | OpCode::JumpIfFalse
                | OpCode::Loop
                | OpCode::Call
                | OpCode::Return => match self.execute_control(op)? {
                    ControlFlow::Continue => {}
                    ControlFlow::Halt => return Ok(()),
                },
            }
        }
    }

    // =========================================================================
    // Instruction stream
    // =========================================================================

    fn read_byte(&mut self) -> Result<u8> {
        let frame = self.frame_mut()?;
        let byte = frame
            .function
            .chunk
            .code
            .get(frame.ip)
            .copied()
            .ok_or_else(|| RuntimeError::Internal("IP out of bounds".into()))?;
        frame.ip += 1;
        Ok(byte)
    }

    fn read_op(&mut self) -> Result<OpCode> {
        let byte = self.read_byte()?;
        OpCode::try_from(byte).map_err(|e| RuntimeError::Internal(e.to_string()))
    }

    fn read_u16(&mut self) -> Result<u16> {
        let hi = self.read_byte()?;
        let lo = self.read_byte()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn read_constant(&mut self) -> Result<Value> {
        let idx = self.read_byte()?;
        self.frame()?
            .function
            .chunk
            .constants
            .get(idx as usize)
            .cloned()
            .ok_or_else(|| RuntimeError::Internal("Constant index out of bounds".into()))
    }

    /// Read a constant that must be a variable name.
    fn read_string(&mut self) -> Result<Rc<str>> {
        match self.read_constant()? {
            Value::Obj(Obj::String(name)) => Ok(name),
            other => Err(RuntimeError::Internal(format!(
                "Global name must be a string, got {}",
                other.type_name()
            ))),
        }
    }

    fn frame(&self) -> Result<&CallFrame> {
        self.frames
            .last()
            .ok_or_else(|| RuntimeError::Internal("No active frame".into()))
    }

    fn frame_mut(&mut self) -> Result<&mut CallFrame> {
        self.frames
            .last_mut()
            .ok_or_else(|| RuntimeError::Internal("No active frame".into()))
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Call stack at the current point, innermost frame first.
    fn stack_trace(&self) -> Vec<String> {
        self.frames
            .iter()
            .rev()
            .map(|frame| format!("[line {}] in {}", frame.line(), frame.function.trace_name()))
            .collect()
    }

    fn reset_stack(&mut self) {
        self.stack.truncate(0);
        self.frames.clear();
    }

    fn trace_instruction(&self) {
        let Some(frame) = self.frames.last() else {
            return;
        };
        let mut slots = String::from("          ");
        for value in self.stack.iter() {
            let _ = write!(slots, "[ {} ]", value);
        }
        let (instruction, _) = disassemble_instruction(&frame.function.chunk, frame.ip);
        trace!("{}", slots);
        trace!("{}", instruction);
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}
