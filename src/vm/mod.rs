//! Register-based fetch-decode-execute loop.

pub mod opcode;
mod trace;

use std::io::Write;
use std::rc::Rc;

use crate::asm::Assembled;
use crate::ops;
use crate::pool::{ConstantPool, FunctionDescriptor, PoolItem};
use crate::value::Value;
use crate::Error;
use opcode::{Opcode, OperandKind};

/// Call stack depth bound; overflow is a fatal runtime error rather than a
/// host stack overflow.
pub const CALL_STACK_SIZE: usize = 1000;

struct Frame {
  descriptor: FunctionDescriptor,
  return_address: usize,
  registers: Vec<Value>,
}

impl Frame {
  fn new(descriptor: FunctionDescriptor, return_address: usize) -> Self {
    let size = descriptor.arg_count as usize + descriptor.local_count as usize + 1;
    Frame {
      descriptor,
      return_address,
      registers: vec![Value::Unset; size],
    }
  }
}

pub struct Vm<'a, W> {
  code: &'a [u8],
  code_size: usize,
  pool: &'a ConstantPool,
  globals: Vec<Value>,
  frames: Vec<Frame>,
  ip: usize,
  halted: bool,
  trace: bool,
  out: W,
}

impl<'a, W: Write> Vm<'a, W> {
  pub fn new(assembled: &'a Assembled, out: W) -> Self {
    let entry_frame = Frame::new(assembled.entry.clone(), 0);
    Vm {
      code: assembled.code.code(),
      code_size: assembled.code.size(),
      pool: &assembled.pool,
      globals: vec![Value::Unset; assembled.globals_size as usize],
      frames: vec![entry_frame],
      ip: assembled.entry.code_address as usize,
      halted: false,
      trace: false,
      out,
    }
  }

  pub fn with_trace(mut self, trace: bool) -> Self {
    self.trace = trace;
    self
  }

  pub fn globals(&self) -> &[Value] {
    &self.globals
  }

  fn frame(&self) -> &Frame {
    self.frames.last().unwrap()
  }

  fn frame_mut(&mut self) -> &mut Frame {
    self.frames.last_mut().unwrap()
  }

  fn read_u32(&self, at: usize) -> Result<u32, Error> {
    self
      .code
      .get(at..at + 4)
      .map(|b| u32::from_be_bytes(b.try_into().unwrap()))
      .ok_or_else(|| Error::Runtime("instruction pointer out of bounds".into()))
  }

  fn reg(&self, index: u32) -> Result<&Value, Error> {
    self
      .frame()
      .registers
      .get(index as usize)
      .ok_or_else(|| Error::Runtime(format!("register r{index} out of bounds")))
  }

  fn set_reg(&mut self, index: u32, value: Value) -> Result<(), Error> {
    let len = self.frame().registers.len();
    if index as usize >= len {
      return Err(Error::Runtime(format!("register r{index} out of bounds")));
    }
    self.frame_mut().registers[index as usize] = value;
    Ok(())
  }

  fn pool_item(&self, index: u32) -> Result<&PoolItem, Error> {
    self
      .pool
      .get(index)
      .ok_or_else(|| Error::Runtime(format!("bad constant pool index {index}")))
  }

  fn pool_value(&self, index: u32) -> Result<Value, Error> {
    match self.pool_item(index)? {
      PoolItem::Int(n) => Ok(Value::Int(*n)),
      PoolItem::Str(s) => Ok(Value::Str(s.clone())),
      PoolItem::Func(_) => Err(Error::Runtime(
        "cannot load a function descriptor as a value".into(),
      )),
    }
  }

  fn global_slot(&self, pool_index: u32) -> Result<usize, Error> {
    match self.pool_item(pool_index)? {
      PoolItem::Int(slot) => Ok(*slot as usize),
      other => Err(Error::Runtime(format!(
        "global slot operand must resolve to an integer, found {}",
        other.type_name()
      ))),
    }
  }

  pub fn run(&mut self) -> Result<(), Error> {
    while !self.halted && self.ip < self.code_size {
      self.step()?;
    }
    Ok(())
  }

  fn fetch_operands(&mut self, opcode: Opcode) -> Result<Vec<u32>, Error> {
    let mut values = Vec::with_capacity(opcode.operands().len());
    for _ in opcode.operands() {
      values.push(self.read_u32(self.ip)?);
      self.ip += 4;
    }
    Ok(values)
  }

  fn step(&mut self) -> Result<(), Error> {
    let opcode_byte = *self
      .code
      .get(self.ip)
      .ok_or_else(|| Error::Runtime("instruction pointer out of bounds".into()))?;
    let opcode = Opcode::from_u8(opcode_byte)
      .ok_or_else(|| Error::Runtime(format!("bad opcode byte {opcode_byte:#x}")))?;
    self.ip += 1;

    if self.trace {
      self.emit_trace(opcode);
    }

    let ops = self.fetch_operands(opcode)?;
    self.execute(opcode, &ops)
  }

  fn emit_trace(&mut self, opcode: Opcode) {
    let names: Vec<Rc<str>> = self.frames.iter().map(|f| f.descriptor.name.clone()).collect();
    let _ = writeln!(
      self.out,
      "{:<6} {} [{}]",
      opcode.mnemonic(),
      trace::format_registers(&self.frame().registers),
      trace::format_call_stack(&names),
    );
  }

  fn execute(&mut self, opcode: Opcode, ops: &[u32]) -> Result<(), Error> {
    match opcode {
      Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Lt | Opcode::Eq => {
        let (dst, a, b) = (ops[0], ops[1], ops[2]);
        let lhs = self.reg(a)?.clone();
        let rhs = self.reg(b)?.clone();
        let result = match opcode {
          Opcode::Add => ops::add(&lhs, &rhs)?,
          Opcode::Sub => ops::sub(&lhs, &rhs)?,
          Opcode::Mul => ops::mul(&lhs, &rhs)?,
          Opcode::Lt => Value::Int(ops::lt(&lhs, &rhs)? as i64),
          Opcode::Eq => Value::Int(ops::eq(&lhs, &rhs) as i64),
          _ => unreachable!(),
        };
        self.set_reg(dst, result)
      }
      Opcode::LoadK => {
        let value = self.pool_value(ops[1])?;
        self.set_reg(ops[0], value)
      }
      Opcode::GLoad => {
        let slot = self.global_slot(ops[1])?;
        let value = self
          .globals
          .get(slot)
          .cloned()
          .ok_or_else(|| Error::Runtime(format!("global slot {slot} out of bounds")))?;
        self.set_reg(ops[0], value)
      }
      Opcode::GStore => {
        let slot = self.global_slot(ops[0])?;
        let value = self.reg(ops[1])?.clone();
        let len = self.globals.len();
        if slot >= len {
          return Err(Error::Runtime(format!("global slot {slot} out of bounds")));
        }
        self.globals[slot] = value;
        Ok(())
      }
      Opcode::Move => {
        let value = self.reg(ops[1])?.clone();
        self.set_reg(ops[0], value)
      }
      Opcode::Br => {
        self.ip = ops[0] as usize;
        Ok(())
      }
      Opcode::Brt => {
        if ops::truthy(self.reg(ops[0])?) {
          self.ip = ops[1] as usize;
        }
        Ok(())
      }
      Opcode::Brf => {
        if !ops::truthy(self.reg(ops[0])?) {
          self.ip = ops[1] as usize;
        }
        Ok(())
      }
      Opcode::Call => self.call(ops[0], ops[1]),
      Opcode::Ret => self.ret(),
      Opcode::Print => {
        let value = self.reg(ops[0])?.clone();
        writeln!(self.out, "{value}").map_err(|e| Error::Runtime(e.to_string()))
      }
      Opcode::Halt => {
        self.halted = true;
        Ok(())
      }
    }
  }

  fn call(&mut self, func_index: u32, base: u32) -> Result<(), Error> {
    let descriptor = match self.pool_item(func_index)? {
      PoolItem::Func(d) => d.clone(),
      other => {
        return Err(Error::Runtime(format!(
          "call operand must be a function descriptor, found {}",
          other.type_name()
        )))
      }
    };

    if self.frames.len() >= CALL_STACK_SIZE {
      return Err(Error::Runtime("call stack overflow".into()));
    }

    let args: Vec<Value> = (0..descriptor.arg_count)
      .map(|i| self.reg(base + i).cloned())
      .collect::<Result<_, _>>()?;

    let return_address = self.ip;
    let mut new_frame = Frame::new(descriptor.clone(), return_address);
    for (i, value) in args.into_iter().enumerate() {
      new_frame.registers[i + 1] = value;
    }

    self.ip = descriptor.code_address as usize;
    self.frames.push(new_frame);
    Ok(())
  }

  fn ret(&mut self) -> Result<(), Error> {
    let result = self.frame().registers[0].clone();
    let finished = self.frames.pop().expect("ret with no active frame");
    if self.frames.is_empty() {
      self.halted = true;
      return Ok(());
    }
    self.frame_mut().registers[0] = result;
    self.ip = finished.return_address;
    Ok(())
  }
}
