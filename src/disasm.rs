//! Disassembler and core-dump formatting, sharing the opcode table with the
//! assembler and VM so no format can silently drift out of sync with what
//! actually executes.

use std::fmt::Write as _;

use crate::asm::Assembled;
use crate::pool::PoolItem;
use crate::value::Value;
use crate::vm::opcode::{Opcode, OperandKind};
use crate::Error;

struct Operand {
  kind: OperandKind,
  value: u32,
}

struct Instruction {
  address: usize,
  opcode: Opcode,
  operands: Vec<Operand>,
}

fn decode_at(code: &[u8], address: usize) -> Result<Instruction, Error> {
  let byte = *code
    .get(address)
    .ok_or_else(|| Error::Runtime("instruction pointer out of bounds".into()))?;
  let opcode =
    Opcode::from_u8(byte).ok_or_else(|| Error::Runtime(format!("bad opcode byte {byte:#x}")))?;
  let mut offset = address + 1;
  let mut operands = Vec::with_capacity(opcode.operands().len());
  for kind in opcode.operands() {
    let value = u32::from_be_bytes(
      code
        .get(offset..offset + 4)
        .ok_or_else(|| Error::Runtime("truncated operand".into()))?
        .try_into()
        .unwrap(),
    );
    operands.push(Operand { kind: *kind, value });
    offset += 4;
  }
  Ok(Instruction {
    address,
    opcode,
    operands,
  })
}

fn format_operand(op: &Operand, pool: &crate::pool::ConstantPool) -> String {
  match op.kind {
    OperandKind::Reg => format!("r{}", op.value),
    OperandKind::Int => op.value.to_string(),
    OperandKind::Pool => match pool.get(op.value) {
      Some(item) => format!("#{}:{}", op.value, item),
      None => format!("#{}:?", op.value),
    },
    OperandKind::Func => match pool.get(op.value) {
      Some(PoolItem::Func(d)) => format!("#{}:{}@{}", op.value, d.name, d.code_address),
      _ => format!("#{}:?", op.value),
    },
  }
}

fn format_instruction(instr: &Instruction, pool: &crate::pool::ConstantPool) -> String {
  let operands: Vec<String> = instr
    .operands
    .iter()
    .map(|op| format_operand(op, pool))
    .collect();
  if operands.is_empty() {
    format!("{:>6}  {}", instr.address, instr.opcode.mnemonic())
  } else {
    format!(
      "{:>6}  {} {}",
      instr.address,
      instr.opcode.mnemonic(),
      operands.join(", ")
    )
  }
}

/// Disassembles a single instruction at `address`, for trace-mode output.
pub fn disassemble_instruction(
  code: &[u8],
  pool: &crate::pool::ConstantPool,
  address: usize,
) -> Result<String, Error> {
  let instr = decode_at(code, address)?;
  Ok(format_instruction(&instr, pool))
}

/// Walks every instruction in `code[0..code_size]`, one line per
/// instruction, advancing by each opcode's fixed encoded length.
pub fn disassemble(assembled: &Assembled) -> Result<String, Error> {
  let code = assembled.code.code();
  let mut out = String::new();
  let mut address = 0;
  while address < code.len() {
    let instr = decode_at(code, address)?;
    let len = instr.opcode.encoded_len();
    writeln!(out, "{}", format_instruction(&instr, &assembled.pool)).ok();
    address += len;
  }
  Ok(out)
}

/// Dumps the constant pool and, if non-empty, the global slots (by dynamic
/// type, reflecting post-execution VM state), alongside the disassembly.
pub fn coredump(assembled: &Assembled, globals: &[Value]) -> Result<String, Error> {
  let mut out = String::new();
  writeln!(out, "constants:").ok();
  for (i, item) in assembled.pool.iter().enumerate() {
    writeln!(out, "  #{i}: {item}").ok();
  }
  if !globals.is_empty() {
    writeln!(out, "globals:").ok();
    for (i, value) in globals.iter().enumerate() {
      writeln!(out, "  #{i}: {}", value.type_name()).ok();
    }
  }
  writeln!(out, "code:").ok();
  out.push_str(&disassemble(assembled)?);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asm::assemble;

  #[test]
  fn disassembles_a_linear_program() {
    let assembled = assemble("loadk r1, 5\nprint r1\nhalt\n").unwrap();
    let text = disassemble(&assembled).unwrap();
    assert!(text.contains("loadk r1, #0:5"));
    assert!(text.contains("print r1"));
    assert!(text.contains("halt"));
  }

  #[test]
  fn coredump_lists_constants() {
    let assembled = assemble("loadk r1, 5\nhalt\n").unwrap();
    let text = coredump(&assembled, &[]).unwrap();
    assert!(text.contains("#0: 5"));
  }
}
