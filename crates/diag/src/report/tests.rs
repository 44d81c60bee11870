use super::{Report, Snippet};
use crate::report::{Level, Source};

#[test]
fn snippet_single_line() {
  let src = "lorem ipsum dolor sit amet consectetur adipiscing elit";

  assert_eq!(
    Snippet::new(src, 6..17),
    Snippet {
      s: "lorem ipsum dolor sit amet consectetur adipiscing elit".into(),
      line: 1,
      count: 1,
      span: (6..17).into(),
    }
  );
}

#[test]
fn snippet_multi_line() {
  struct Case {
    src: &'static str,
    src_span: std::ops::Range<usize>,
    snippet: Snippet<'static>,
  }

  let tests = vec![
    Case {
      src: "lorem ipsum\ndolor sit amet\nconsectetur adipiscing elit",
      src_span: 6..17,
      snippet: Snippet {
        s: "lorem ipsum\ndolor sit amet".into(),
        line: 1,
        count: 2,
        span: (6..17).into(),
      },
    },
    Case {
      src: "lorem ipsum\ndolor sit amet\nconsectetur adipiscing elit",
      src_span: 17..31,
      snippet: Snippet {
        s: "dolor sit amet\nconsectetur adipiscing elit".into(),
        line: 2,
        count: 2,
        span: (5..19).into(),
      },
    },
    Case {
      src: "\n\\n",
      src_span: 1..3,
      snippet: Snippet {
        s: "\\n".into(),
        line: 2,
        count: 1,
        span: (0..2).into(),
      },
    },
    Case {
      src: "d(                 ",
      src_span: 19..19,
      snippet: Snippet {
        s: "d(".into(),
        line: 1,
        count: 1,
        span: (2..2).into(),
      },
    },
    Case {
      src: "\u{9389a}\"\n",
      src_span: 4..6,
      snippet: Snippet {
        s: "\u{9389a}\"".into(),
        line: 1,
        count: 1,
        span: (4..5).into(),
      },
    },
    Case {
      src: "x ",
      src_span: 0..2,
      snippet: Snippet {
        s: "x".into(),
        line: 1,
        count: 1,
        span: (0..1).into(),
      },
    },
    Case {
      src: "З  ",
      src_span: 0..2,
      snippet: Snippet {
        s: "З".into(),
        line: 1,
        count: 1,
        span: (0..2).into(),
      },
    },
    Case {
      src: "\"\n\\",
      src_span: 0..2,
      snippet: Snippet {
        s: "\"\n\\".into(),
        line: 1,
        count: 2,
        span: (0..1).into(),
      },
    },
  ];

  for (i, case) in tests.iter().enumerate() {
    let snippet = Snippet::new(case.src, case.src_span.clone());
    assert_eq!(snippet, case.snippet, "[Test #{i}] Snippets mismatch");
    assert_eq!(
      case.src[case.src_span.start..case.src_span.end]
        .trim_end_matches('\n')
        .trim_end_matches(' '),
      snippet.highlight(),
      "[Test #{i}] Highlighted slices mismatch"
    );
  }
}

#[test]
fn emit_report_single_line() {
  let report = Report {
    level: Level::Error,
    source: Source::file("test.tpy", "print 1\nx = 20"),
    message: "expected newline".into(),
    span: (7..8).into(),
    label: None,
    color: true,
  };
  let out = report.emit_to_string().unwrap();
  assert!(out.contains("error"));
  assert!(out.contains("test.tpy:1"));
  assert!(out.contains("expected newline"));
  // ANSI escapes present when color is enabled
  assert!(out.contains("\u{1b}["));
}

#[test]
fn emit_report_multi_line() {
  let report = Report {
    level: Level::Error,
    source: Source::file("test.tpy", "def f(x):\n  print x\n  return x\n.\n"),
    message: "unexpected end of block".into(),
    span: (10..32).into(),
    label: Some("expected `.` to close this block".into()),
    color: true,
  };
  let out = report.emit_to_string().unwrap();
  assert!(out.contains("unexpected end of block"));
  assert!(out.contains("expected `.` to close this block"));
}

#[test]
fn emit_report_multi_line_large() {
  let report = Report {
    level: Level::Error,
    source: Source::file(
      "test",
      "def f():\n  x = 0\n  y = 0\n  z = 0\n  w = 0\n  v = 0\n  u = 0\n  t = 0\n.\n",
    ),
    message: "too many locals".into(),
    span: (9..68).into(),
    label: Some("function body spans too many lines".into()),
    color: true,
  };
  let out = report.emit_to_string().unwrap();
  assert!(out.contains("too many locals"));
  assert!(out.contains("..."));
}

#[test]
fn emit_report_single_line_no_color() {
  let report = Report {
    level: Level::Error,
    source: Source::file("test.tpy", "print 1\nx = 20"),
    message: "expected newline".into(),
    span: (7..8).into(),
    label: None,
    color: false,
  };
  let out = report.emit_to_string().unwrap();
  assert!(out.contains("expected newline"));
  // no ANSI escapes when color is disabled
  assert!(!out.contains("\u{1b}["));
}

#[test]
fn emit_report_multi_line_no_color() {
  let report = Report {
    level: Level::Error,
    source: Source::file("test.tpy", "def f(x):\n  print x\n  return x\n.\n"),
    message: "unexpected end of block".into(),
    span: (10..32).into(),
    label: Some("expected `.` to close this block".into()),
    color: false,
  };
  let out = report.emit_to_string().unwrap();
  assert!(!out.contains("\u{1b}["));
}

#[test]
fn emit_report_multi_line_large_no_color() {
  let report = Report {
    level: Level::Error,
    source: Source::file(
      "test.tpy",
      "def f():\n  x = 0\n  y = 0\n  z = 0\n  w = 0\n  v = 0\n  u = 0\n  t = 0\n.\n",
    ),
    message: "too many locals".into(),
    span: (9..68).into(),
    label: Some("function body spans too many lines".into()),
    color: false,
  };
  let out = report.emit_to_string().unwrap();
  assert!(!out.contains("\u{1b}["));
}

#[test]
fn emit_report_multi_line_edge_case_sandwiched_newline() {
  let report = Report {
    level: Level::Error,
    source: Source::file("test.tpy", "'\n\\"),
    message: "unterminated string literal".into(),
    span: (0..2).into(),
    label: None,
    color: false,
  };
  assert!(report
    .emit_to_string()
    .unwrap()
    .contains("unterminated string literal"));
}

#[test]
fn emit_report_multi_line_edge_case_sandwiched_newline_2() {
  let report = Report {
    level: Level::Error,
    source: Source::file("test.tpy", "\0'\nl\n\n\n\n\\"),
    message: "invalid character".into(),
    span: (1..8).into(),
    label: None,
    color: false,
  };
  assert!(report
    .emit_to_string()
    .unwrap()
    .contains("invalid character"));
}
