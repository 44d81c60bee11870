//! Single-pass assembler translating the textual assembly dialect into a
//! packed code buffer plus a constant pool.

mod codegen;
mod label;

use syntax::token::asm::{self, TokenKind};
use syntax::token::Token;

use crate::pool::{ConstantPool, FunctionDescriptor, PoolItem};
use crate::vm::opcode::{Opcode, OperandKind};
use crate::Error;

pub use codegen::CodeBuffer;
pub use label::LabelTable;

pub struct Assembled {
  pub code: CodeBuffer,
  pub pool: ConstantPool,
  pub globals_size: u32,
  pub entry: FunctionDescriptor,
}

pub fn assemble(src: &str) -> Result<Assembled, Error> {
  let tokens = asm::lex(src).map_err(|errs| {
    Error::assemble(
      "invalid character in assembly source",
      errs[0].span,
    )
  })?;
  Assembler::new(tokens).run()
}

struct Assembler<'src> {
  tokens: Vec<Token<'src, TokenKind>>,
  pos: usize,
  code: CodeBuffer,
  pool: ConstantPool,
  labels: LabelTable,
  globals_size: u32,
  main: Option<FunctionDescriptor>,
}

impl<'src> Assembler<'src> {
  fn new(tokens: Vec<Token<'src, TokenKind>>) -> Self {
    Assembler {
      tokens,
      pos: 0,
      code: CodeBuffer::new(),
      pool: ConstantPool::new(),
      labels: LabelTable::new(),
      globals_size: 0,
      main: None,
    }
  }

  fn current(&self) -> &Token<'src, TokenKind> {
    &self.tokens[self.pos]
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.current().is(kind)
  }

  fn bump(&mut self) -> Token<'src, TokenKind> {
    let tok = self.tokens[self.pos].clone();
    if !matches!(tok.kind, TokenKind::Tok_Eof) {
      self.pos += 1;
    }
    tok
  }

  fn bump_if(&mut self, kind: TokenKind) -> Option<Token<'src, TokenKind>> {
    if self.check(kind) {
      Some(self.bump())
    } else {
      None
    }
  }

  fn expect(&mut self, kind: TokenKind) -> Result<Token<'src, TokenKind>, Error> {
    if self.check(kind) {
      Ok(self.bump())
    } else {
      let found = self.current();
      Err(Error::assemble(
        format!("expected {}, found {}", kind.name(), found.kind.name()),
        found.span,
      ))
    }
  }

  fn skip_blank_lines(&mut self) {
    while self.bump_if(TokenKind::Tok_NL).is_some() {}
  }

  fn run(mut self) -> Result<Assembled, Error> {
    self.skip_blank_lines();
    if self.check(TokenKind::Dot_Globals) {
      self.globals_directive()?;
    }
    self.skip_blank_lines();

    while !self.check(TokenKind::Tok_Eof) {
      if self.check(TokenKind::Dot_Def) {
        self.func_def()?;
      } else if self.check(TokenKind::Lit_Ident) && self.peek_is_label() {
        self.label()?;
      } else {
        self.instruction()?;
      }
      self.skip_blank_lines();
    }

    if let Some(name) = self.labels.undefined().next() {
      return Err(Error::assemble_unspanned(format!(
        "undefined label '{name}'"
      )));
    }

    let entry = self.main.clone().unwrap_or(FunctionDescriptor {
      name: "main".into(),
      code_address: 0,
      arg_count: 0,
      local_count: 0,
    });

    Ok(Assembled {
      code: self.code,
      pool: self.pool,
      globals_size: self.globals_size,
      entry,
    })
  }

  fn peek_is_label(&self) -> bool {
    matches!(
      self.tokens.get(self.pos + 1),
      Some(t) if t.is(TokenKind::Tok_Colon)
    )
  }

  fn globals_directive(&mut self) -> Result<(), Error> {
    self.expect(TokenKind::Dot_Globals)?;
    let n = self.expect(TokenKind::Lit_Int)?;
    self.globals_size = parse_int(&n)? as u32;
    self.expect(TokenKind::Tok_NL)?;
    Ok(())
  }

  fn label(&mut self) -> Result<(), Error> {
    let name = self.bump();
    self.expect(TokenKind::Tok_Colon)?;
    self.expect(TokenKind::Tok_NL)?;
    let address = self.code.size() as u32;
    for site in self.labels.define(&name.lexeme, address) {
      self.code.patch_u32(site, address);
    }
    Ok(())
  }

  fn func_def(&mut self) -> Result<(), Error> {
    self.expect(TokenKind::Dot_Def)?;
    let name = self.expect(TokenKind::Lit_Ident)?;
    self.expect(TokenKind::Tok_Colon)?;
    self.expect(TokenKind::Kw_Args)?;
    self.expect(TokenKind::Op_Equal)?;
    let args = parse_int(&self.expect(TokenKind::Lit_Int)?)? as u32;
    self.expect(TokenKind::Tok_Comma)?;
    self.expect(TokenKind::Kw_Locals)?;
    self.expect(TokenKind::Op_Equal)?;
    let locals = parse_int(&self.expect(TokenKind::Lit_Int)?)? as u32;
    self.expect(TokenKind::Tok_NL)?;

    let address = self.code.size() as u32;
    self
      .pool
      .define_function(&name.lexeme, address, args, locals);
    if &*name.lexeme == "main" {
      self.main = Some(FunctionDescriptor {
        name: "main".into(),
        code_address: address,
        arg_count: args,
        local_count: locals,
      });
    }
    Ok(())
  }

  fn instruction(&mut self) -> Result<(), Error> {
    let mnem = self.expect(TokenKind::Lit_Ident)?;
    let opcode = Opcode::from_mnemonic(&mnem.lexeme)
      .ok_or_else(|| Error::assemble(format!("unknown mnemonic '{}'", mnem.lexeme), mnem.span))?;

    self.code.emit_u8(opcode.as_u8());
    let kinds = opcode.operands();
    for (i, kind) in kinds.iter().enumerate() {
      if i > 0 {
        self.expect(TokenKind::Tok_Comma)?;
      }
      self.operand(*kind)?;
    }
    self.expect(TokenKind::Tok_NL)?;
    Ok(())
  }

  fn operand(&mut self, kind: OperandKind) -> Result<(), Error> {
    match kind {
      OperandKind::Reg => {
        let tok = self.expect(TokenKind::Lit_Reg)?;
        let reg = asm::reg_index(&tok.lexeme)
          .ok_or_else(|| Error::assemble("malformed register operand", tok.span))?;
        self.code.emit_u32(reg);
      }
      OperandKind::Int => {
        if self.check(TokenKind::Lit_Ident) {
          let name = self.bump();
          let site = self.code.emit_u32(0);
          if let Some(addr) = self.labels.reference(&name.lexeme, site) {
            self.code.patch_u32(site, addr);
          }
        } else {
          let tok = self.expect(TokenKind::Lit_Int)?;
          self.code.emit_u32(parse_int(&tok)? as u32);
        }
      }
      OperandKind::Pool => {
        let item = self.literal_pool_item()?;
        let index = self.pool.insert(item);
        self.code.emit_u32(index);
      }
      OperandKind::Func => {
        let tok = self.expect(TokenKind::Lit_Ident)?;
        let index = self.pool.insert_function(&tok.lexeme);
        self.code.emit_u32(index);
      }
    }
    Ok(())
  }

  fn literal_pool_item(&mut self) -> Result<PoolItem, Error> {
    if self.check(TokenKind::Lit_String) {
      let tok = self.bump();
      Ok(PoolItem::Str(asm::unquote(&tok.lexeme).into()))
    } else {
      let tok = self.expect(TokenKind::Lit_Int)?;
      Ok(PoolItem::Int(parse_int(&tok)?))
    }
  }
}

fn parse_int(tok: &Token<'_, TokenKind>) -> Result<i64, Error> {
  tok
    .lexeme
    .parse()
    .map_err(|_| Error::assemble(format!("malformed integer '{}'", tok.lexeme), tok.span))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn assembles_a_bare_linear_program() {
    let asm = assemble("loadk r1, 5\nprint r1\nhalt\n").unwrap();
    assert_eq!(asm.entry.code_address, 0);
    assert_eq!(asm.entry.arg_count, 0);
    assert_eq!(asm.pool.len(), 1);
  }

  #[test]
  fn forward_label_is_patched() {
    let src = ".def main: args=0, locals=1\nloadk r1, 5\nbr end\nloadk r1, 7\nend:\nprint r1\n";
    let asm = assemble(src).unwrap();
    assert_eq!(asm.entry.name.as_ref(), "main");
    assert!(asm.code.size() > 0);
  }

  #[test]
  fn forward_call_reuses_pool_slot_after_def() {
    let src = ".def main: args=0, locals=1\ncall factorial, r1\nret\n.def factorial: args=1, locals=0\nret\n";
    let asm = assemble(src).unwrap();
    let entries: Vec<_> = asm.pool.iter().collect();
    assert_eq!(entries.len(), 1);
  }

  #[test]
  fn unknown_mnemonic_is_an_assemble_error() {
    assert!(matches!(assemble("bogus r1\n"), Err(Error::Assemble { .. })));
  }

  #[test]
  fn undefined_label_at_eof_is_an_assemble_error() {
    assert!(matches!(assemble("br nowhere\n"), Err(Error::Assemble { .. })));
  }
}
