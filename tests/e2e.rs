//! The literal end-to-end scenarios and invariants the two execution paths
//! are expected to satisfy.

fn run_source(src: &str) -> String {
  let mut out = Vec::new();
  tinypie::run_source(src, &mut out).unwrap();
  String::from_utf8(out).unwrap()
}

fn run_assembly(src: &str) -> String {
  let mut out = Vec::new();
  tinypie::run_assembly(src, &mut out, false).unwrap();
  String::from_utf8(out).unwrap()
}

#[test]
fn scenario_1_prints_a_literal() {
  assert_eq!(run_source("print 5\n"), "5\n");
}

#[test]
fn scenario_2_factorial_via_forward_reference() {
  let src = indoc::indoc! {"
    print factorial(6)
    def factorial(x):
      if x < 2 return 1
      return x * factorial(x - 1)
    .
  "};
  assert_eq!(run_source(src), "720\n");
}

#[test]
fn scenario_3_while_loop_prints_0_through_9() {
  let src = indoc::indoc! {"
    i = 0
    while i < 10:
      print i
      i = i + 1
    .
  "};
  let expected: String = (0..10).map(|n| format!("{n}\n")).collect();
  assert_eq!(run_source(src), expected);
}

#[test]
fn scenario_4_globals_mutation_by_function() {
  let src = indoc::indoc! {"
    x = 1
    def bar():
      x = 7
    .
    bar()
    print x
  "};
  assert_eq!(run_source(src), "7\n");
}

#[test]
fn scenario_5_assembly_factorial_via_call_and_ret() {
  let src = indoc::indoc! {"
    .def main: args=0, locals=1
    loadk r1, 5
    call factorial, r1
    print r0
    halt
    .def factorial: args=1, locals=2
    loadk r2, 2
    lt r2, r1, r2
    brf r2, recurse
    loadk r0, 1
    ret
    recurse:
    loadk r2, 1
    sub r2, r1, r2
    call factorial, r2
    mul r0, r1, r0
    ret
  "};
  assert_eq!(run_assembly(src), "120\n");
}

#[test]
fn scenario_6_assembly_forward_branch() {
  let src = indoc::indoc! {"
    .def main: args=0, locals=1
    loadk r1, 5
    br end
    loadk r1, 7
    end:
    print r1
  "};
  assert_eq!(run_assembly(src), "5\n");
}

#[test]
fn invariant_forward_reference_matches_definition_order() {
  let forward = indoc::indoc! {"
    print twice(21)
    def twice(x):
      return x + x
    .
  "};
  let defined_first = indoc::indoc! {"
    def twice(x):
      return x + x
    .
    print twice(21)
  "};
  assert_eq!(run_source(forward), run_source(defined_first));
}

#[test]
fn invariant_constant_pool_has_no_duplicate_literals() {
  let assembled = tinypie::asm::assemble("loadk r1, 5\nloadk r2, 5\nloadk r3, 5\nhalt\n").unwrap();
  assert_eq!(assembled.pool.len(), 1);
}

#[test]
fn invariant_label_patch_sites_hold_final_address_big_endian() {
  let src = "loadk r1, 5\nbr end\nloadk r1, 7\nend:\nprint r1\n";
  let assembled = tinypie::asm::assemble(src).unwrap();
  let text = tinypie::disasm::disassemble(&assembled).unwrap();
  let lines: Vec<&str> = text.lines().collect();

  let br_line = lines.iter().find(|l| l.contains("br ")).unwrap();
  let jump_target: usize = br_line.split("br ").nth(1).unwrap().trim().parse().unwrap();

  let print_line = lines.iter().find(|l| l.contains("print")).unwrap();
  let print_address: usize = print_line.split_whitespace().next().unwrap().parse().unwrap();

  assert_eq!(jump_target, print_address);
}

#[test]
fn invariant_assembly_is_deterministic_and_disassembly_reflects_it() {
  // disassembly can't be fed back through the assembler: its pool/func
  // operands are rendered as `#index:value` annotations (see disasm.rs),
  // and the assembler's own lexer treats a leading `#` as a line comment,
  // the same convention the original tinypie lexer uses. so the round-trip
  // property this checks is at the byte level instead of the text level:
  // assembling the same source twice produces byte-identical code and an
  // identical constant pool, and disassembling either one reports the same
  // addresses and pool contents.
  let src = indoc::indoc! {"
    .def main: args=0, locals=1
    loadk r1, 5
    br end
    loadk r1, 7
    end:
    print r1
  "};
  let first = tinypie::asm::assemble(src).unwrap();
  let second = tinypie::asm::assemble(src).unwrap();
  assert_eq!(first.code.code(), second.code.code());
  assert_eq!(first.pool.len(), second.pool.len());
  for i in 0..first.pool.len() as u32 {
    assert_eq!(first.pool.get(i), second.pool.get(i));
  }

  let first_text = tinypie::disasm::disassemble(&first).unwrap();
  let second_text = tinypie::disasm::disassemble(&second).unwrap();
  assert_eq!(first_text, second_text);
  assert!(first_text.contains("loadk"));
  assert!(first_text.contains("br "));
}

#[test]
fn string_concatenation_is_a_type_error() {
  let mut out = Vec::new();
  let err = tinypie::run_source("print 'a' + 1\n", &mut out).unwrap_err();
  assert!(matches!(err, tinypie::Error::Type(_)));
}
